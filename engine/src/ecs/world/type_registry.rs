//! Registry of singleton types known to a world.
//!
//! [`TypeRegistry`] hands out a dense [`SingletonId`] per singleton type. Per-type storage
//! (slots and converter record tables) is indexed by that id, and diagnostics use the short
//! type name cached at registration.
//!
//! # Thread Safety
//!
//! Lookups are lock-free reads through a `DashMap`. Registration takes the entry lock for the
//! type, so two threads registering the same type concurrently receive the same id.
//!
//! # Example
//!
//! ```rust,ignore
//! let registry = TypeRegistry::new();
//!
//! let time = registry.register::<TimeConfig>();
//! assert_eq!(registry.register::<TimeConfig>(), time);
//! assert_eq!(registry.name(time).as_deref(), Some("TimeConfig"));
//! ```

use std::{
    any::TypeId as StdTypeId,
    sync::{
        PoisonError, RwLock,
        atomic::{AtomicU32, Ordering},
    },
};

use dashmap::DashMap;

use crate::ecs::singleton::{Singleton, short_type_name};

/// Dense identifier of a registered singleton type.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SingletonId(u32);

impl SingletonId {
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Index of this id in id-indexed storage.
    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for SingletonId {
    #[inline]
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

/// Metadata about a registered singleton type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeInfo {
    id: SingletonId,
    type_id: StdTypeId,
    name: String,
}

impl TypeInfo {
    #[inline]
    pub fn id(&self) -> SingletonId {
        self.id
    }

    #[inline]
    pub fn type_id(&self) -> StdTypeId {
        self.type_id
    }

    /// Short type name, module paths stripped.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A thread-safe registry of singleton types.
pub struct TypeRegistry {
    /// Rust TypeId to singleton id. Lock-free reads.
    type_map: DashMap<StdTypeId, SingletonId>,

    /// Registered types, indexed by singleton id. Written once per type.
    types: RwLock<Vec<Option<TypeInfo>>>,

    next_id: AtomicU32,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    #[inline]
    pub fn new() -> Self {
        Self {
            type_map: DashMap::new(),
            types: RwLock::new(Vec::new()),
            next_id: AtomicU32::new(0),
        }
    }

    /// Register `T`, returning its id. Registering a type twice returns the same id.
    pub fn register<T: Singleton>(&self) -> SingletonId {
        let std_type_id = StdTypeId::of::<T>();

        // Fast path: already registered
        if let Some(existing) = self.type_map.get(&std_type_id) {
            return *existing;
        }

        match self.type_map.entry(std_type_id) {
            dashmap::Entry::Occupied(occupied) => *occupied.get(),
            dashmap::Entry::Vacant(vacant) => {
                let id_value = self.next_id.fetch_add(1, Ordering::Relaxed);
                let id = SingletonId(id_value);

                let mut types = self.types.write().unwrap_or_else(PoisonError::into_inner);
                let index = id.index();
                if index >= types.len() {
                    types.resize(index + 1, None);
                }
                types[index] = Some(TypeInfo {
                    id,
                    type_id: std_type_id,
                    name: short_type_name::<T>(),
                });
                vacant.insert(id);

                id
            }
        }
    }

    /// The id of `T`, if registered.
    #[inline]
    pub fn get<T: Singleton>(&self) -> Option<SingletonId> {
        self.type_map
            .get(&StdTypeId::of::<T>())
            .map(|entry| *entry.value())
    }

    pub fn info(&self, id: SingletonId) -> Option<TypeInfo> {
        let types = self.types.read().unwrap_or_else(PoisonError::into_inner);
        types.get(id.index()).and_then(|info| info.clone())
    }

    /// Short type name of a registered type.
    pub fn name(&self, id: SingletonId) -> Option<String> {
        self.info(id).map(|info| info.name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.next_id.load(Ordering::Relaxed) as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, thread};

    use super::*;
    use crate::ecs::singleton::BlobRef;

    #[derive(Clone, Debug)]
    struct TimeConfig;

    impl Singleton for TimeConfig {}

    #[derive(Clone, Debug)]
    struct Gravity;

    impl Singleton for Gravity {}

    #[test]
    fn register_assigns_dense_ids() {
        let registry = TypeRegistry::new();

        let time = registry.register::<TimeConfig>();
        let gravity = registry.register::<Gravity>();

        assert_eq!(time, SingletonId::new(0));
        assert_eq!(gravity, SingletonId::new(1));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn register_is_idempotent() {
        let registry = TypeRegistry::new();

        let first = registry.register::<TimeConfig>();
        let second = registry.register::<TimeConfig>();

        assert_eq!(first, second);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn get_returns_none_for_unregistered_types() {
        let registry = TypeRegistry::new();
        registry.register::<TimeConfig>();

        assert!(registry.get::<Gravity>().is_none());
        assert_eq!(registry.get::<TimeConfig>(), Some(SingletonId::new(0)));
    }

    #[test]
    fn names_are_short() {
        let registry = TypeRegistry::new();

        let time = registry.register::<TimeConfig>();
        let blob = registry.register::<BlobRef<Vec<String>>>();

        assert_eq!(registry.name(time).as_deref(), Some("TimeConfig"));
        assert_eq!(registry.name(blob).as_deref(), Some("BlobRef<Vec<String>>"));
        assert!(registry.name(SingletonId::new(7)).is_none());
    }

    #[test]
    fn concurrent_registration_agrees_on_ids() {
        // Given
        let registry = Arc::new(TypeRegistry::new());

        // When
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || (registry.register::<TimeConfig>(), registry.register::<Gravity>()))
            })
            .collect();
        let ids: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        // Then
        assert!(ids.windows(2).all(|pair| pair[0] == pair[1]));
        assert_eq!(registry.len(), 2);
    }
}
