//! Descriptor-driven serializer for structured object types.
//!
//! An object serializes as its fields in ascending order-index, nothing
//! else. Field access goes through typed accessor pairs captured at
//! registration time, so no runtime type inspection is ever needed.

use std::any::{Any, TypeId};

use crate::errors::{Error, Result};
use crate::serializer::{BoxedAny, Context, Mode, Serializer, downcast_value};
use crate::serializers::vector::{VECTOR_ID, VectorSerializer};

/// One field of a registered object type: wire order plus the closures that
/// move the value between the object and the stream.
///
/// The order index is the wire order. It is explicit and stable — fields are
/// sorted ascending by it before use, never taken in declaration order.
pub struct FieldDescriptor<T> {
    order: u32,
    write: Box<dyn Fn(&T, &mut Context<'_>) -> Result<()> + Send + Sync>,
    read: Box<dyn Fn(&mut T, &mut Context<'_>) -> Result<()> + Send + Sync>,
}

impl<T: 'static> FieldDescriptor<T> {
    /// A field serialized with its type's default framing.
    pub fn new<F: 'static>(order: u32, get: fn(&T) -> &F, set: fn(&mut T, F)) -> Self {
        Self {
            order,
            write: Box::new(move |obj, ctx| ctx.write_typed(get(obj), None)),
            read: Box::new(move |obj, ctx| {
                set(obj, ctx.read_typed::<F>(None)?);
                Ok(())
            }),
        }
    }

    /// A field with an explicit framing override.
    pub fn with_mode<F: 'static>(
        order: u32,
        mode: Mode,
        get: fn(&T) -> &F,
        set: fn(&mut T, F),
    ) -> Self {
        Self {
            order,
            write: Box::new(move |obj, ctx| ctx.write_typed(get(obj), Some(mode))),
            read: Box::new(move |obj, ctx| {
                set(obj, ctx.read_typed::<F>(Some(mode))?);
                Ok(())
            }),
        }
    }

    /// A vector field with optional overrides for the vector's own framing
    /// and for its items' framing.
    ///
    /// Polymorphic items ignore the items override — they are only decodable
    /// boxed.
    pub fn vector<I: 'static>(
        order: u32,
        mode: Option<Mode>,
        items_mode: Option<Mode>,
        get: fn(&T) -> &Vec<I>,
        set: fn(&mut T, Vec<I>),
    ) -> Self {
        Self {
            order,
            write: Box::new(move |obj, ctx| {
                if mode.unwrap_or(Mode::Boxed) == Mode::Boxed {
                    ctx.streamer.write_u32(VECTOR_ID);
                }
                VectorSerializer::<I>::write_items(get(obj), ctx, items_mode)
            }),
            read: Box::new(move |obj, ctx| {
                if mode.unwrap_or(Mode::Boxed) == Mode::Boxed {
                    let id = ctx.streamer.read_u32()?;
                    if id != VECTOR_ID {
                        return Err(Error::UnexpectedConstructor { id });
                    }
                }
                set(obj, VectorSerializer::<I>::read_items(ctx, items_mode)?);
                Ok(())
            }),
        }
    }

    /// A dynamic field: the value may be any boxed type known to the
    /// registry. Always written boxed — the concrete type comes from the
    /// runtime value, not the declaration — and resolved by constructor ID
    /// on read.
    pub fn dynamic(order: u32, get: fn(&T) -> &BoxedAny, set: fn(&mut T, BoxedAny)) -> Self {
        Self {
            order,
            write: Box::new(move |obj, ctx| ctx.write_any(get(obj).as_ref(), Some(Mode::Boxed))),
            read: Box::new(move |obj, ctx| {
                set(obj, ctx.read_dynamic()?);
                Ok(())
            }),
        }
    }

    /// The field's wire order index.
    pub fn order(&self) -> u32 {
        self.order
    }
}

/// Serializer for one structured object type, driven by its field
/// descriptors.
///
/// Reading builds a fresh `T::default()` and assigns each decoded field in
/// turn; decoding is all-or-nothing, the first error aborts the call.
pub struct ObjectSerializer<T> {
    id: u32,
    name: String,
    default_mode: Mode,
    fields: Vec<FieldDescriptor<T>>,
}

impl<T: Default + 'static> ObjectSerializer<T> {
    /// A boxed object type with the given constructor and fields.
    pub fn new(id: u32, name: impl Into<String>, fields: Vec<FieldDescriptor<T>>) -> Self {
        Self::with_default_mode(id, name, fields, Mode::Boxed)
    }

    /// An object type with an explicit default framing.
    pub fn with_default_mode(
        id: u32,
        name: impl Into<String>,
        mut fields: Vec<FieldDescriptor<T>>,
        default_mode: Mode,
    ) -> Self {
        fields.sort_by_key(|field| field.order);
        Self {
            id,
            name: name.into(),
            default_mode,
            fields,
        }
    }
}

impl<T: Default + 'static> Serializer for ObjectSerializer<T> {
    fn constructor_id(&self) -> u32 {
        self.id
    }

    fn supported_type(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn type_name(&self) -> &str {
        &self.name
    }

    fn default_mode(&self) -> Mode {
        self.default_mode
    }

    fn write_body(&self, value: &dyn Any, ctx: &mut Context<'_>) -> Result<()> {
        let obj = downcast_value::<T>(value, &self.name)?;
        for field in &self.fields {
            (field.write)(obj, ctx)?;
        }
        Ok(())
    }

    fn read_body(&self, _id: u32, ctx: &mut Context<'_>) -> Result<BoxedAny> {
        let mut obj = T::default();
        for field in &self.fields {
            (field.read)(&mut obj, ctx)?;
        }
        Ok(Box::new(obj))
    }
}
