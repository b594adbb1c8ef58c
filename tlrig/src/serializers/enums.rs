//! Multi-constructor serializer: one logical type, several concrete shapes.

use std::any::{Any, TypeId};
use std::sync::Arc;

use crate::errors::{Error, Result};
use crate::registry::Registry;
use crate::serializer::{BoxedAny, Context, Mode, Serializer, downcast_value};

struct Variant<E> {
    type_id: TypeId,
    type_name: &'static str,
    /// Resolved from the concrete type's serializer at registration.
    id: u32,
    project: Box<dyn Fn(&E) -> Option<&dyn Any> + Send + Sync>,
    wrap: Box<dyn Fn(BoxedAny) -> Result<E> + Send + Sync>,
}

/// Serializer for a sum type whose variants each carry one concrete
/// registered type.
///
/// A multi-constructor value is only decodable boxed, so writes always carry
/// the concrete constructor ID (delegated to the payload's own serializer)
/// and bare reads are rejected. On read, the consumed ID selects the variant,
/// the concrete serializer reads the body, and the result is wrapped back
/// into the sum type.
///
/// Declare variants with [`variant`](Self::variant), then register through
/// [`Registry::register_enum`] — that is where each variant's constructor ID
/// is resolved, so the concrete payload types must be registered first.
pub struct EnumSerializer<E> {
    name: String,
    variants: Vec<Variant<E>>,
}

impl<E: 'static> EnumSerializer<E> {
    /// An empty serializer for the sum type named `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variants: Vec::new(),
        }
    }

    /// Declares one concrete constructor of the type.
    ///
    /// `project` returns the payload when the value is this variant;
    /// `wrap` rebuilds the sum type around a decoded payload.
    pub fn variant<C: 'static>(mut self, project: fn(&E) -> Option<&C>, wrap: fn(C) -> E) -> Self {
        self.variants.push(Variant {
            type_id: TypeId::of::<C>(),
            type_name: std::any::type_name::<C>(),
            id: 0,
            project: Box::new(move |value| project(value).map(|c| c as &dyn Any)),
            wrap: Box::new(move |any| match any.downcast::<C>() {
                Ok(c) => Ok(wrap(*c)),
                Err(_) => Err(Error::InvalidOperation {
                    reason: format!(
                        "variant reader for {} produced a value of a different type",
                        std::any::type_name::<C>()
                    ),
                }),
            }),
        });
        self
    }

    /// Resolves every variant's constructor ID from the registry.
    pub(crate) fn resolve(&mut self, registry: &Registry) -> Result<()> {
        for variant in &mut self.variants {
            let serializer = match registry.serializer_for_type(variant.type_id) {
                Some(s) => s,
                None => {
                    return Err(Error::SerializerNotFound {
                        type_name: variant.type_name.to_owned(),
                    });
                }
            };
            variant.id = serializer.constructor_id();
        }
        Ok(())
    }
}

impl<E: 'static> Serializer for EnumSerializer<E> {
    fn constructor_id(&self) -> u32 {
        self.variants.first().map(|v| v.id).unwrap_or(0)
    }

    fn constructor_ids(&self) -> Vec<u32> {
        self.variants.iter().map(|v| v.id).collect()
    }

    fn supported_type(&self) -> TypeId {
        TypeId::of::<E>()
    }

    fn type_name(&self) -> &str {
        &self.name
    }

    fn polymorphic(&self) -> bool {
        true
    }

    fn write(&self, value: &dyn Any, ctx: &mut Context<'_>, _mode: Option<Mode>) -> Result<()> {
        self.write_body(value, ctx)
    }

    fn write_body(&self, value: &dyn Any, ctx: &mut Context<'_>) -> Result<()> {
        let value = downcast_value::<E>(value, &self.name)?;
        for variant in &self.variants {
            if let Some(payload) = (variant.project)(value) {
                return ctx.write_any(payload, Some(Mode::Boxed));
            }
        }
        Err(Error::InvalidOperation {
            reason: format!("{}: value matches no declared variant", self.name),
        })
    }

    fn read(&self, ctx: &mut Context<'_>, mode: Option<Mode>) -> Result<BoxedAny> {
        if mode == Some(Mode::Bare) {
            return Err(Error::InvalidOperation {
                reason: format!("{}: a multi-constructor type cannot be read bare", self.name),
            });
        }
        let id = ctx.streamer.read_u32()?;
        if !self.accepts(id) {
            return Err(Error::UnexpectedConstructor { id });
        }
        self.read_body(id, ctx)
    }

    fn read_body(&self, id: u32, ctx: &mut Context<'_>) -> Result<BoxedAny> {
        let variant = match self.variants.iter().find(|v| v.id == id) {
            Some(v) => v,
            None => return Err(Error::UnexpectedConstructor { id }),
        };
        let serializer = match ctx.registry.serializer_for_id(id) {
            Some(s) => Arc::clone(s),
            None => return Err(Error::UnexpectedConstructor { id }),
        };
        let payload = serializer.read_body(id, ctx)?;
        Ok(Box::new((variant.wrap)(payload)?))
    }
}
