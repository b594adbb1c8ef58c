//! The generic TL vector serializer.

use std::any::{Any, TypeId};
use std::marker::PhantomData;

use crate::errors::{Error, Result};
use crate::serializer::{BoxedAny, Context, Mode, Serializer};

/// `vector {t:Type} # [ t ] = Vector t`.
pub const VECTOR_ID: u32 = 0x1cb5_c415;

/// Serializer for `Vec<I>`: `[constructor if boxed][count:i32][count × item]`.
///
/// The vector itself is boxed by default. Item framing follows the promotion
/// rule in [`items_mode`](Self::items_mode).
pub struct VectorSerializer<I> {
    _items: PhantomData<fn() -> Vec<I>>,
}

impl<I> VectorSerializer<I> {
    /// A vector serializer for item type `I`.
    pub fn new() -> Self {
        Self { _items: PhantomData }
    }
}

impl<I> Default for VectorSerializer<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: 'static> VectorSerializer<I> {
    /// Resolves the framing applied to each item.
    ///
    /// Polymorphic items are always boxed — a bare one could never be decoded
    /// since the reader has no way to infer its shape. Otherwise an explicit
    /// per-field override applies, and the default is bare.
    fn items_mode(ctx: &Context<'_>, override_mode: Option<Mode>) -> Result<Mode> {
        let serializer = match ctx.registry.serializer_for_type(TypeId::of::<I>()) {
            Some(s) => s,
            None => {
                return Err(Error::SerializerNotFound {
                    type_name: std::any::type_name::<I>().to_owned(),
                });
            }
        };
        if serializer.polymorphic() {
            return Ok(Mode::Boxed);
        }
        Ok(override_mode.unwrap_or(Mode::Bare))
    }

    /// Writes `count` plus every item; the caller frames the vector itself.
    pub(crate) fn write_items(
        items: &[I],
        ctx: &mut Context<'_>,
        override_mode: Option<Mode>,
    ) -> Result<()> {
        let mode = Self::items_mode(ctx, override_mode)?;
        ctx.streamer.write_i32(items.len() as i32);
        for item in items {
            ctx.write_typed(item, Some(mode))?;
        }
        Ok(())
    }

    /// Reads `count` plus every item; the caller has consumed any framing.
    pub(crate) fn read_items(
        ctx: &mut Context<'_>,
        override_mode: Option<Mode>,
    ) -> Result<Vec<I>> {
        let mode = Self::items_mode(ctx, override_mode)?;
        let count = ctx.streamer.read_i32()? as usize;
        let mut items = Vec::new();
        for _ in 0..count {
            items.push(ctx.read_typed::<I>(Some(mode))?);
        }
        Ok(items)
    }
}

impl<I: 'static> Serializer for VectorSerializer<I> {
    fn constructor_id(&self) -> u32 {
        VECTOR_ID
    }

    fn supported_type(&self) -> TypeId {
        TypeId::of::<Vec<I>>()
    }

    fn type_name(&self) -> &str {
        std::any::type_name::<Vec<I>>()
    }

    fn write_body(&self, value: &dyn Any, ctx: &mut Context<'_>) -> Result<()> {
        let items = match value.downcast_ref::<Vec<I>>() {
            Some(v) => v,
            None => {
                return Err(Error::InvalidOperation {
                    reason: format!(
                        "vector serializer supports only {}",
                        std::any::type_name::<Vec<I>>()
                    ),
                });
            }
        };
        Self::write_items(items, ctx, None)
    }

    fn read_body(&self, _id: u32, ctx: &mut Context<'_>) -> Result<BoxedAny> {
        Ok(Box::new(Self::read_items(ctx, None)?))
    }
}
