//! Type-erased storage for singleton slots.
//!
//! [`Slots`] holds at most one value per singleton type, indexed by the dense
//! [`SingletonId`] handed out by the world's
//! [`TypeRegistry`](crate::ecs::world::TypeRegistry). Values are boxed as
//! `dyn Any + Send + Sync` and downcast on access, so every public method stays typed.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut slots = Slots::new();
//! let id = registry.register::<TimeConfig>();
//!
//! slots.insert(id, TimeConfig::new(60));
//! assert_eq!(slots.get::<TimeConfig>(id).unwrap().target_frame_rate, 60);
//!
//! let old = slots.remove::<TimeConfig>(id);
//! assert!(!slots.contains(id));
//! ```

use std::any::Any;

use crate::ecs::{singleton::Singleton, world::SingletonId};

/// One optional value per singleton type.
pub struct Slots {
    data: Vec<Option<Box<dyn Any + Send + Sync>>>,
    len: usize,
}

impl Slots {
    #[inline]
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            len: 0,
        }
    }

    /// Store `value` in the slot for `id`, returning the previous value.
    pub fn insert<T: Singleton>(&mut self, id: SingletonId, value: T) -> Option<T> {
        let index = id.index();
        if index >= self.data.len() {
            self.data.resize_with(index + 1, || None);
        }

        let previous = self.data[index].replace(Box::new(value));
        if previous.is_none() {
            self.len += 1;
        }
        previous
            .and_then(|stored| (stored as Box<dyn Any>).downcast::<T>().ok())
            .map(|boxed| *boxed)
    }

    #[inline]
    pub fn get<T: Singleton>(&self, id: SingletonId) -> Option<&T> {
        self.data
            .get(id.index())
            .and_then(|slot| slot.as_ref())
            .and_then(|stored| stored.downcast_ref::<T>())
    }

    #[inline]
    pub fn get_mut<T: Singleton>(&mut self, id: SingletonId) -> Option<&mut T> {
        self.data
            .get_mut(id.index())
            .and_then(|slot| slot.as_mut())
            .and_then(|stored| stored.downcast_mut::<T>())
    }

    /// Empty the slot for `id`, returning its value.
    pub fn remove<T: Singleton>(&mut self, id: SingletonId) -> Option<T> {
        let stored = self.data.get_mut(id.index())?.take()?;
        self.len -= 1;
        (stored as Box<dyn Any>).downcast::<T>().ok().map(|boxed| *boxed)
    }

    #[inline]
    pub fn contains(&self, id: SingletonId) -> bool {
        matches!(self.data.get(id.index()), Some(Some(_)))
    }

    /// Number of filled slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for Slots {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct TimeConfig(u32);

    impl Singleton for TimeConfig {}

    #[derive(Clone, Debug, PartialEq)]
    struct Gravity(f32);

    impl Singleton for Gravity {}

    const TIME: SingletonId = SingletonId::new(0);
    const GRAVITY: SingletonId = SingletonId::new(3);

    // ==================== Basic Operations ====================

    #[test]
    fn new_creates_empty_storage() {
        let slots = Slots::new();

        assert!(slots.is_empty());
        assert!(!slots.contains(TIME));
        assert!(slots.get::<TimeConfig>(TIME).is_none());
    }

    #[test]
    fn insert_fills_the_slot() {
        let mut slots = Slots::new();

        let previous = slots.insert(TIME, TimeConfig(60));

        assert_eq!(previous, None);
        assert!(slots.contains(TIME));
        assert_eq!(slots.get::<TimeConfig>(TIME), Some(&TimeConfig(60)));
        assert_eq!(slots.len(), 1);
    }

    #[test]
    fn insert_replaces_and_returns_previous() {
        let mut slots = Slots::new();
        slots.insert(TIME, TimeConfig(60));

        let previous = slots.insert(TIME, TimeConfig(30));

        assert_eq!(previous, Some(TimeConfig(60)));
        assert_eq!(slots.get::<TimeConfig>(TIME), Some(&TimeConfig(30)));
        assert_eq!(slots.len(), 1);
    }

    #[test]
    fn get_mut_allows_modification() {
        let mut slots = Slots::new();
        slots.insert(TIME, TimeConfig(60));

        slots.get_mut::<TimeConfig>(TIME).unwrap().0 = 144;

        assert_eq!(slots.get::<TimeConfig>(TIME), Some(&TimeConfig(144)));
    }

    // ==================== Remove ====================

    #[test]
    fn remove_empties_the_slot() {
        let mut slots = Slots::new();
        slots.insert(TIME, TimeConfig(60));

        let removed = slots.remove::<TimeConfig>(TIME);

        assert_eq!(removed, Some(TimeConfig(60)));
        assert!(!slots.contains(TIME));
        assert!(slots.is_empty());
        assert_eq!(slots.remove::<TimeConfig>(TIME), None);
    }

    #[test]
    fn slots_are_independent() {
        let mut slots = Slots::new();
        slots.insert(TIME, TimeConfig(60));
        slots.insert(GRAVITY, Gravity(-9.81));

        slots.remove::<TimeConfig>(TIME);

        assert!(!slots.contains(TIME));
        assert_eq!(slots.get::<Gravity>(GRAVITY), Some(&Gravity(-9.81)));
        assert_eq!(slots.len(), 1);
    }

    #[test]
    fn wrong_type_does_not_downcast() {
        let mut slots = Slots::new();
        slots.insert(TIME, TimeConfig(60));

        assert!(slots.get::<Gravity>(TIME).is_none());
    }
}
