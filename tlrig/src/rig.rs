//! The dispatcher: the single entry point for every (de)serialization call.

use std::any::Any;
use std::sync::Arc;

use crate::errors::Result;
use crate::registry::Registry;
use crate::serializer::{BoxedAny, Context, Mode};
use crate::stream::Streamer;

/// The serialization dispatcher.
///
/// Owns the frozen registry and is what every serializer recurses back into:
/// object serializer → rig → vector/primitive serializer → possibly the rig
/// again. Cloning shares the registry; every call builds its own private
/// [`Context`] and stream, so any number of calls may run concurrently.
///
/// ```
/// use tlrig::{Registry, Rig};
///
/// let rig = Rig::new(Registry::new());
/// let bytes = rig.serialize(&3i32)?;
/// assert_eq!(rig.deserialize::<i32>(&bytes)?, 3);
/// # Ok::<(), tlrig::Error>(())
/// ```
#[derive(Clone)]
pub struct Rig {
    registry: Arc<Registry>,
}

impl Rig {
    /// Freezes `registry` and builds a dispatcher around it.
    ///
    /// Registration happens before this point, on the exclusively-owned
    /// registry; from here on it is read-only and shared.
    pub fn new(registry: Registry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    /// The frozen registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Serializes `value` into a fresh buffer using its type's default
    /// framing.
    pub fn serialize<T: 'static>(&self, value: &T) -> Result<Vec<u8>> {
        let mut streamer = Streamer::new();
        self.serialize_into(value, &mut streamer, None)?;
        Ok(streamer.into_bytes())
    }

    /// Serializes `value` onto an existing stream.
    pub fn serialize_into<T: 'static>(
        &self,
        value: &T,
        streamer: &mut Streamer,
        mode: Option<Mode>,
    ) -> Result<()> {
        Context::new(streamer, &self.registry).write_typed(value, mode)
    }

    /// Serializes a type-erased value, resolved by its runtime type.
    pub fn serialize_any(
        &self,
        value: &dyn Any,
        streamer: &mut Streamer,
        mode: Option<Mode>,
    ) -> Result<()> {
        Context::new(streamer, &self.registry).write_any(value, mode)
    }

    /// Deserializes a value of a statically known type.
    pub fn deserialize<T: 'static>(&self, bytes: &[u8]) -> Result<T> {
        let mut streamer = Streamer::from_bytes(bytes);
        self.deserialize_from(&mut streamer, None)
    }

    /// Deserializes a value of a statically known type from an existing
    /// stream, with an optional framing override.
    pub fn deserialize_from<T: 'static>(
        &self,
        streamer: &mut Streamer,
        mode: Option<Mode>,
    ) -> Result<T> {
        Context::new(streamer, &self.registry).read_typed::<T>(mode)
    }

    /// Deserializes a boxed value without knowing its type up front: the
    /// constructor ID on the wire selects the registered serializer.
    ///
    /// Bare data cannot be decoded this way — with no ID and no expected
    /// type there is nothing to dispatch on — so this always reads boxed.
    pub fn deserialize_dynamic(&self, bytes: &[u8]) -> Result<BoxedAny> {
        let mut streamer = Streamer::from_bytes(bytes);
        self.deserialize_dynamic_from(&mut streamer)
    }

    /// Dynamic deserialization from an existing stream.
    pub fn deserialize_dynamic_from(&self, streamer: &mut Streamer) -> Result<BoxedAny> {
        Context::new(streamer, &self.registry).read_dynamic()
    }
}
