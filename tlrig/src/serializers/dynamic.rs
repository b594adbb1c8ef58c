//! Serializer for dynamic values: any boxed type known to the registry.

use std::any::{Any, TypeId};

use crate::errors::{Error, Result};
use crate::serializer::{BoxedAny, Context, Mode, Serializer, downcast_value};

/// Serializer registered for [`BoxedAny`] itself.
///
/// A dynamic value has no constructor of its own: writes resolve the inner
/// value's concrete serializer by runtime type and are always boxed; reads
/// are ID-driven through the registry and only possible boxed. This is what
/// makes heterogeneous `Vec<BoxedAny>` collections work.
pub struct DynamicSerializer;

impl Serializer for DynamicSerializer {
    fn constructor_id(&self) -> u32 {
        // No constructor of its own; never written, never claimed.
        0
    }

    fn supported_type(&self) -> TypeId {
        TypeId::of::<BoxedAny>()
    }

    fn type_name(&self) -> &str {
        "dynamic object"
    }

    fn polymorphic(&self) -> bool {
        true
    }

    fn write(&self, value: &dyn Any, ctx: &mut Context<'_>, _mode: Option<Mode>) -> Result<()> {
        self.write_body(value, ctx)
    }

    fn write_body(&self, value: &dyn Any, ctx: &mut Context<'_>) -> Result<()> {
        let inner = downcast_value::<BoxedAny>(value, self.type_name())?;
        ctx.write_any(inner.as_ref(), Some(Mode::Boxed))
    }

    fn read(&self, ctx: &mut Context<'_>, mode: Option<Mode>) -> Result<BoxedAny> {
        if mode == Some(Mode::Bare) {
            return Err(Error::InvalidOperation {
                reason: "a dynamic value cannot be read bare: the expected type is unknown"
                    .to_owned(),
            });
        }
        self.read_body(0, ctx)
    }

    fn read_body(&self, _id: u32, ctx: &mut Context<'_>) -> Result<BoxedAny> {
        // Boxed again so the declared type (`BoxedAny`) survives the typed
        // read path's downcast.
        Ok(Box::new(ctx.read_dynamic()?))
    }
}
