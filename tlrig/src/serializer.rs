//! The serializer contract and the per-call context.

use std::any::{Any, TypeId};
use std::sync::Arc;

use crate::errors::{Error, Result};
use crate::registry::Registry;
use crate::stream::Streamer;

/// Wire framing of one value.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Mode {
    /// The value is preceded by its 32-bit constructor ID.
    Boxed,
    /// Body only; the reader must know the expected type out of band.
    Bare,
}

/// A type-erased TL value, as carried by dynamic fields and heterogeneous
/// vectors. The concrete type is recovered through the registry at decode
/// time, keyed by the constructor ID on the wire.
pub type BoxedAny = Box<dyn Any>;

/// Per-call state threaded through every recursive (de)serialization step.
///
/// Created once per top-level call and owned exclusively by it; serializers
/// recurse by calling back into the helpers below.
pub struct Context<'a> {
    /// The active byte stream.
    pub streamer: &'a mut Streamer,
    /// The registry resolving types and constructor IDs to serializers.
    pub registry: &'a Registry,
}

impl<'a> Context<'a> {
    /// Builds a context for one (de)serialization call.
    pub fn new(streamer: &'a mut Streamer, registry: &'a Registry) -> Self {
        Self { streamer, registry }
    }

    /// Serializes a value whose static type is known.
    pub fn write_typed<T: 'static>(&mut self, value: &T, mode: Option<Mode>) -> Result<()> {
        let serializer = match self.registry.serializer_for_type(TypeId::of::<T>()) {
            Some(s) => Arc::clone(s),
            None => {
                return Err(Error::SerializerNotFound {
                    type_name: std::any::type_name::<T>().to_owned(),
                });
            }
        };
        serializer.write(value, self, mode)
    }

    /// Serializes a type-erased value, resolved by its runtime type.
    pub fn write_any(&mut self, value: &dyn Any, mode: Option<Mode>) -> Result<()> {
        let serializer = match self.registry.serializer_for_type(value.type_id()) {
            Some(s) => Arc::clone(s),
            None => {
                return Err(Error::SerializerNotFound {
                    type_name: format!("{:?}", value.type_id()),
                });
            }
        };
        serializer.write(value, self, mode)
    }

    /// Deserializes a value whose static type is known.
    pub fn read_typed<T: 'static>(&mut self, mode: Option<Mode>) -> Result<T> {
        let serializer = match self.registry.serializer_for_type(TypeId::of::<T>()) {
            Some(s) => Arc::clone(s),
            None => {
                return Err(Error::SerializerNotFound {
                    type_name: std::any::type_name::<T>().to_owned(),
                });
            }
        };
        let value = serializer.read(self, mode)?;
        match value.downcast::<T>() {
            Ok(v) => Ok(*v),
            Err(_) => Err(Error::InvalidOperation {
                reason: format!(
                    "serializer for {} produced a value of a different type",
                    std::any::type_name::<T>()
                ),
            }),
        }
    }

    /// Deserializes a boxed value of unknown type: the constructor ID read
    /// from the stream selects the concrete registered serializer.
    pub fn read_dynamic(&mut self) -> Result<BoxedAny> {
        let id = self.streamer.read_u32()?;
        let serializer = match self.registry.serializer_for_id(id) {
            Some(s) => Arc::clone(s),
            None => {
                log::debug!("dynamic read hit unknown constructor {id:#010x}");
                return Err(Error::UnexpectedConstructor { id });
            }
        };
        serializer.read_body(id, self)
    }
}

/// The capability every (de)serializer implements.
///
/// `write`/`read` carry the shared header logic — writing or validating the
/// constructor ID when the effective mode is boxed — and delegate the body to
/// `write_body`/`read_body`. Implementations are stateless after
/// construction and shared freely across concurrent calls.
pub trait Serializer: Send + Sync {
    /// The primary constructor ID.
    fn constructor_id(&self) -> u32;

    /// Every constructor ID this serializer can decode. One for most
    /// serializers; several for multi-constructor types.
    fn constructor_ids(&self) -> Vec<u32> {
        vec![self.constructor_id()]
    }

    /// The runtime type this serializer handles.
    fn supported_type(&self) -> TypeId;

    /// Human-readable name of the supported type, for diagnostics.
    fn type_name(&self) -> &str;

    /// Framing applied when the caller gives no override.
    fn default_mode(&self) -> Mode {
        Mode::Boxed
    }

    /// Whether values of this type can take several wire shapes. Polymorphic
    /// vector items are always boxed — a bare one would be undecodable.
    fn polymorphic(&self) -> bool {
        false
    }

    /// Whether `id` belongs to this serializer.
    fn accepts(&self, id: u32) -> bool {
        self.constructor_ids().contains(&id)
    }

    /// Writes the value's body, without any constructor ID.
    fn write_body(&self, value: &dyn Any, ctx: &mut Context<'_>) -> Result<()>;

    /// Reads a body. `id` is the constructor ID already consumed by the
    /// caller; multi-constructor serializers use it to pick the concrete
    /// body reader, everything else can ignore it.
    fn read_body(&self, id: u32, ctx: &mut Context<'_>) -> Result<BoxedAny>;

    /// Writes the value, boxed or bare per `mode` (falling back to
    /// [`Self::default_mode`]).
    fn write(&self, value: &dyn Any, ctx: &mut Context<'_>, mode: Option<Mode>) -> Result<()> {
        if mode.unwrap_or_else(|| self.default_mode()) == Mode::Boxed {
            ctx.streamer.write_u32(self.constructor_id());
        }
        self.write_body(value, ctx)
    }

    /// Reads a value, boxed or bare per `mode`. A boxed read validates the
    /// incoming constructor ID against [`Self::constructor_ids`].
    fn read(&self, ctx: &mut Context<'_>, mode: Option<Mode>) -> Result<BoxedAny> {
        let id = match mode.unwrap_or_else(|| self.default_mode()) {
            Mode::Boxed => {
                let id = ctx.streamer.read_u32()?;
                if !self.accepts(id) {
                    return Err(Error::UnexpectedConstructor { id });
                }
                id
            }
            Mode::Bare => self.constructor_id(),
        };
        self.read_body(id, ctx)
    }
}

/// Recovers the concrete value a serializer was handed.
pub(crate) fn downcast_value<'v, T: 'static>(value: &'v dyn Any, name: &str) -> Result<&'v T> {
    value.downcast_ref::<T>().ok_or_else(|| Error::InvalidOperation {
        reason: format!("{name} serializer received an incompatible value"),
    })
}
