//! Registry of singleton controllers, updated together once per tick.
//!
//! A [`Group`] owns exactly one [`Controller`] per singleton type. Registering a second
//! controller for a type that already has one panics, so two passes can never race for the same
//! slot.
//!
//! # Update Order
//!
//! 1. Every controller ticks, in registration order.
//! 2. Queued post-convert operations are performed and their carriers freed.
//!
//! Controllers for different types are independent: the order between them only affects the
//! order of their reports.
//!
//! # Type Erasure
//!
//! Controllers are stored as `Box<dyn ErasedController>`, keyed by the `TypeId` of their
//! singleton type. Typed access goes back through [`controller_mut`](Group::controller_mut).

use std::{
    any::{Any, TypeId},
    collections::HashMap,
};

use log::trace;

use crate::ecs::{
    convert::{Controller, StoreError, Tick},
    singleton::{Prepare, Singleton},
    world::World,
};

/// The outcome of one controller's tick inside a group update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub type_name: String,
    pub tick: Tick,
}

trait ErasedController {
    fn tick(&mut self, world: &mut World) -> Result<Tick, StoreError>;

    fn type_name(&self) -> &str;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T, P> ErasedController for Controller<T, P>
where
    T: Singleton,
    P: Prepare<T> + 'static,
{
    fn tick(&mut self, world: &mut World) -> Result<Tick, StoreError> {
        Controller::tick(self, world)
    }

    fn type_name(&self) -> &str {
        Controller::type_name(self)
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// One controller per singleton type.
pub struct Group {
    controllers: Vec<Box<dyn ErasedController>>,
    /// Singleton type to its index in `controllers`.
    registered: HashMap<TypeId, usize>,
}

impl Group {
    pub fn new() -> Self {
        Self {
            controllers: Vec::new(),
            registered: HashMap::new(),
        }
    }

    /// Register the controller for singleton type `T`.
    ///
    /// # Panics
    ///
    /// Panics if a controller for `T` is already registered, whatever its prepare strategy.
    pub fn add<T, P>(&mut self, controller: Controller<T, P>) -> &mut Self
    where
        T: Singleton,
        P: Prepare<T> + 'static,
    {
        let type_id = TypeId::of::<T>();
        assert!(
            !self.registered.contains_key(&type_id),
            "Singleton controller already registered: {}",
            controller.type_name()
        );
        self.registered.insert(type_id, self.controllers.len());
        self.controllers.push(Box::new(controller));
        self
    }

    /// Returns `true` if singleton type `T` has a controller.
    #[inline]
    pub fn contains<T: Singleton>(&self) -> bool {
        self.registered.contains_key(&TypeId::of::<T>())
    }

    /// Typed access to a registered controller, for example to attach hooks after registration.
    ///
    /// Returns `None` if `T` is not registered or was registered with another prepare type.
    pub fn controller_mut<T, P>(&mut self) -> Option<&mut Controller<T, P>>
    where
        T: Singleton,
        P: Prepare<T> + 'static,
    {
        let index = *self.registered.get(&TypeId::of::<T>())?;
        self.controllers[index]
            .as_any_mut()
            .downcast_mut::<Controller<T, P>>()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }

    /// Tick every controller against `world`, then run post-convert operations.
    ///
    /// The first store failure aborts the update: later controllers do not tick and
    /// post-convert operations stay queued.
    pub fn update(&mut self, world: &mut World) -> Result<Vec<Report>, StoreError> {
        let mut reports = Vec::with_capacity(self.controllers.len());
        for controller in &mut self.controllers {
            let tick = controller.tick(world)?;
            trace!("{}: {:?}", controller.type_name(), tick);
            reports.push(Report {
                type_name: controller.type_name().to_string(),
                tick,
            });
        }

        world.run_post_convert()?;
        Ok(reports)
    }
}

impl Default for Group {
    fn default() -> Self {
        Self::new()
    }
}
