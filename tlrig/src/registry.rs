//! The serializer registry: runtime type ↔ constructor ID resolution.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use tlrig_bigint::{Int128, Int256};

use crate::errors::{Error, Result};
use crate::serializer::{BoxedAny, Mode, Serializer};
use crate::serializers::dynamic::DynamicSerializer;
use crate::serializers::enums::EnumSerializer;
use crate::serializers::object::{FieldDescriptor, ObjectSerializer};
use crate::serializers::primitives::{
    BoolSerializer, DoubleSerializer, Int32Serializer, Int64Serializer, Int128Serializer,
    Int256Serializer, UInt32Serializer, UInt64Serializer,
};
use crate::serializers::text::{BytesSerializer, StringSerializer};
use crate::serializers::vector::VectorSerializer;

/// Maps runtime types to serializers for writing, and constructor IDs to
/// serializers for reading.
///
/// Lookups are exact — there is no fallback of any kind; every concrete type
/// that crosses the wire must be registered. The registry is append-only
/// while exclusively owned (`&mut self`), and freezing it is just moving it
/// into the dispatcher's `Arc`: after that the type system only permits
/// reads, which any number of concurrent calls may share.
pub struct Registry {
    by_type: HashMap<TypeId, Arc<dyn Serializer>>,
    by_id: HashMap<u32, Arc<dyn Serializer>>,
}

impl Registry {
    /// A registry with every built-in serializer installed.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.install_builtins();
        registry
    }

    /// A registry with nothing installed, not even the built-ins.
    pub fn empty() -> Self {
        Self {
            by_type: HashMap::new(),
            by_id: HashMap::new(),
        }
    }

    /// The serializer handling `type_id`, if any.
    pub fn serializer_for_type(&self, type_id: TypeId) -> Option<&Arc<dyn Serializer>> {
        self.by_type.get(&type_id)
    }

    /// The serializer owning constructor `id`, if any.
    ///
    /// Where two registered types share an ID (`i32`/`u32`, `String`/bytes),
    /// the first registered one is canonical for ID-driven decodes.
    pub fn serializer_for_id(&self, id: u32) -> Option<&Arc<dyn Serializer>> {
        self.by_id.get(&id)
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.by_type.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }

    /// Registers a serializer, claiming its constructor IDs.
    ///
    /// Re-registering an already-known type is a no-op. Claiming an ID that
    /// belongs to a different type is an error — never a silent overwrite.
    pub fn register(&mut self, serializer: Arc<dyn Serializer>) -> Result<()> {
        let type_id = serializer.supported_type();
        if let Some(existing) = self.by_type.get(&type_id) {
            log::trace!("{} is already registered; skipping", existing.type_name());
            return Ok(());
        }
        for id in serializer.constructor_ids() {
            if let Some(existing) = self.by_id.get(&id) {
                if existing.supported_type() != type_id {
                    return Err(Error::InvalidOperation {
                        reason: format!(
                            "constructor {id:#010x} is already registered to {}",
                            existing.type_name()
                        ),
                    });
                }
            }
        }
        self.insert(serializer, true);
        Ok(())
    }

    /// Registers a boxed object type from its descriptor data: constructor
    /// ID, name, and ordered field list. Also registers `Vec<T>`.
    pub fn register_object<T: Default + 'static>(
        &mut self,
        id: u32,
        name: impl Into<String>,
        fields: Vec<FieldDescriptor<T>>,
    ) -> Result<()> {
        self.register(Arc::new(ObjectSerializer::new(id, name, fields)))?;
        self.register_vector_of::<T>();
        Ok(())
    }

    /// Registers an object type that serializes bare by default.
    pub fn register_bare_object<T: Default + 'static>(
        &mut self,
        id: u32,
        name: impl Into<String>,
        fields: Vec<FieldDescriptor<T>>,
    ) -> Result<()> {
        self.register(Arc::new(ObjectSerializer::with_default_mode(
            id,
            name,
            fields,
            Mode::Bare,
        )))?;
        self.register_vector_of::<T>();
        Ok(())
    }

    /// Registers a multi-constructor type. Its concrete payload types must
    /// already be registered — each variant resolves its constructor ID from
    /// them here. Also registers `Vec<E>`.
    ///
    /// The variant IDs stay with their concrete types in the ID table, so a
    /// dynamic decode yields the concrete value, not the sum type.
    pub fn register_enum<E: 'static>(&mut self, mut serializer: EnumSerializer<E>) -> Result<()> {
        serializer.resolve(self)?;
        self.insert(Arc::new(serializer), false);
        self.register_vector_of::<E>();
        Ok(())
    }

    /// Registers the vector serializer for `Vec<I>`. A no-op when present.
    pub fn register_vector_of<I: 'static>(&mut self) {
        self.insert(Arc::new(VectorSerializer::<I>::new()), false);
    }

    /// Installs a serializer; `claim_ids` controls whether its constructor
    /// IDs enter the ID table (aliases of shared IDs stay out of it).
    fn insert(&mut self, serializer: Arc<dyn Serializer>, claim_ids: bool) {
        log::trace!(
            "registering serializer for {} ({:#010x})",
            serializer.type_name(),
            serializer.constructor_id(),
        );
        if claim_ids {
            for id in serializer.constructor_ids() {
                self.by_id.entry(id).or_insert_with(|| Arc::clone(&serializer));
            }
        }
        self.by_type
            .entry(serializer.supported_type())
            .or_insert(serializer);
    }

    fn install_builtins(&mut self) {
        // The signed / string serializers claim the shared constructor IDs;
        // their aliases register type-only. The heterogeneous vector claims
        // the vector ID so dynamic decodes of vectors produce boxed items.
        self.insert(Arc::new(Int32Serializer), true);
        self.insert(Arc::new(UInt32Serializer), false);
        self.insert(Arc::new(Int64Serializer), true);
        self.insert(Arc::new(UInt64Serializer), false);
        self.insert(Arc::new(DoubleSerializer), true);
        self.insert(Arc::new(BoolSerializer), true);
        self.insert(Arc::new(StringSerializer), true);
        self.insert(Arc::new(BytesSerializer), false);
        self.insert(Arc::new(Int128Serializer), true);
        self.insert(Arc::new(Int256Serializer), true);
        self.insert(Arc::new(DynamicSerializer), false);
        self.insert(Arc::new(VectorSerializer::<BoxedAny>::new()), true);
        self.register_vector_of::<i32>();
        self.register_vector_of::<u32>();
        self.register_vector_of::<i64>();
        self.register_vector_of::<u64>();
        self.register_vector_of::<f64>();
        self.register_vector_of::<bool>();
        self.register_vector_of::<String>();
        self.register_vector_of::<Vec<u8>>();
        self.register_vector_of::<Int128>();
        self.register_vector_of::<Int256>();
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serializers::primitives::{BOOL_FALSE_ID, BOOL_TRUE_ID, INT_ID};
    use crate::serializers::vector::VECTOR_ID;

    #[test]
    fn builtins_resolve_by_type_and_id() {
        let registry = Registry::new();
        assert!(registry.serializer_for_type(TypeId::of::<i32>()).is_some());
        assert!(registry.serializer_for_type(TypeId::of::<u64>()).is_some());
        assert!(registry.serializer_for_type(TypeId::of::<String>()).is_some());
        assert!(registry.serializer_for_type(TypeId::of::<Vec<u8>>()).is_some());
        assert!(registry.serializer_for_type(TypeId::of::<Vec<i32>>()).is_some());
        assert!(registry.serializer_for_type(TypeId::of::<BoxedAny>()).is_some());

        let int = registry.serializer_for_id(INT_ID).unwrap();
        assert_eq!(int.supported_type(), TypeId::of::<i32>());

        let vector = registry.serializer_for_id(VECTOR_ID).unwrap();
        assert_eq!(vector.supported_type(), TypeId::of::<Vec<BoxedAny>>());

        for id in [BOOL_TRUE_ID, BOOL_FALSE_ID] {
            let b = registry.serializer_for_id(id).unwrap();
            assert_eq!(b.supported_type(), TypeId::of::<bool>());
        }
    }

    #[test]
    fn reregistering_a_type_is_a_noop() {
        #[derive(Debug, Default, PartialEq)]
        struct Empty;

        let mut registry = Registry::new();
        registry.register_object::<Empty>(0x11223344, "Empty", vec![]).unwrap();
        let before = registry.len();
        registry.register_object::<Empty>(0x55667788, "Empty", vec![]).unwrap();
        assert_eq!(registry.len(), before);
        // First registration stays canonical.
        assert!(registry.serializer_for_id(0x55667788).is_none());
    }

    #[test]
    fn conflicting_id_claim_is_rejected() {
        #[derive(Debug, Default)]
        struct Clash;

        let mut registry = Registry::new();
        let err = registry
            .register_object::<Clash>(INT_ID, "Clash", vec![])
            .unwrap_err();
        assert!(matches!(err, Error::InvalidOperation { .. }));
    }

    #[test]
    fn enum_registration_requires_concrete_types() {
        #[derive(Debug, Default)]
        struct Missing;
        enum Sum {
            Only(Missing),
        }

        let mut registry = Registry::new();
        let serializer = EnumSerializer::<Sum>::new("Sum").variant::<Missing>(
            |s| match s {
                Sum::Only(m) => Some(m),
            },
            Sum::Only,
        );
        let err = registry.register_enum(serializer).unwrap_err();
        assert!(matches!(err, Error::SerializerNotFound { .. }));
    }
}
