//! Deferred operations performed once after a conversion pass.
//!
//! Post-convert operations are queued on a carrier entity with
//! [`World::spawn_post_convert`](crate::ecs::world::World::spawn_post_convert). The next
//! [`Group::update`](crate::ecs::convert::Group::update) performs every queued operation after
//! all controllers have ticked, then frees the carrier. Each batch runs exactly once.
//!
//! ```rust,ignore
//! world.spawn_post_convert(vec![
//!     Box::new(SetSingleton::new(TimeConfig::new(30))) as Box<dyn Operation>,
//! ]);
//! group.update(&mut world)?;
//! ```

use std::fmt;

use crate::ecs::{convert::StoreError, singleton::Singleton, world::World};

/// A one-shot action against the world.
pub trait Operation: Send + Sync + fmt::Debug {
    fn perform(&self, world: &mut World) -> Result<(), StoreError>;
}

/// Creates or overwrites a singleton directly, bypassing arbitration.
#[derive(Debug, Clone, PartialEq)]
pub struct SetSingleton<T> {
    value: T,
}

impl<T: Singleton> SetSingleton<T> {
    pub fn new(value: T) -> Self {
        Self { value }
    }

    #[inline]
    pub fn value(&self) -> &T {
        &self.value
    }
}

impl<T: Singleton> Operation for SetSingleton<T> {
    fn perform(&self, world: &mut World) -> Result<(), StoreError> {
        world.upsert_singleton(self.value.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::world;

    #[derive(Clone, Debug, PartialEq)]
    struct Gravity(f32);

    impl Singleton for Gravity {}

    #[test]
    fn set_singleton_creates_a_missing_slot() {
        let mut world = World::new(world::Id::new(0));

        SetSingleton::new(Gravity(-9.81)).perform(&mut world).unwrap();

        assert_eq!(world.singleton::<Gravity>(), Some(&Gravity(-9.81)));
    }

    #[test]
    fn set_singleton_overwrites_an_existing_slot() {
        let mut world = World::new(world::Id::new(0));
        world.create_singleton(Gravity(-9.81)).unwrap();

        SetSingleton::new(Gravity(-1.62)).perform(&mut world).unwrap();

        assert_eq!(world.singleton::<Gravity>(), Some(&Gravity(-1.62)));
    }
}
