//! The storage contract a conversion pass runs against.

use crate::ecs::{
    convert::{Candidate, StoreError, Tag},
    entity::Entity,
    singleton::Singleton,
};

/// Host storage for one singleton type `T`: its converter records and its slot.
///
/// The [`Controller`](crate::ecs::convert::Controller) drives a pass entirely through this
/// trait. Implementations are expected to be effectively atomic per call within a tick; a
/// failing call aborts the tick without rollback.
///
/// [`World`](crate::ecs::world::World) implements `Store<T>` for every singleton type.
pub trait Store<T: Singleton> {
    /// Records not yet tagged [`Tag::Processed`].
    fn count_pending(&self) -> usize;

    /// Records tagged [`Tag::Processed`] by a previous pass.
    fn count_processed(&self) -> usize;

    /// Number of slots holding a `T`: 0 or 1.
    fn count_slot(&self) -> usize;

    /// Pending records as candidates, in acquisition (creation) order.
    ///
    /// The order must be stable and deterministic: arbitration resolves conflicts by it.
    fn enumerate_pending(&self) -> Result<Vec<Candidate<T>>, StoreError>;

    /// Delete every processed record. Returns how many were deleted.
    fn delete_all_processed(&mut self) -> Result<usize, StoreError>;

    /// Tag a record.
    fn tag(&mut self, record: Entity, tag: Tag) -> Result<(), StoreError>;

    /// The current singleton value, if the slot exists.
    fn get_slot(&self) -> Option<&T>;

    /// Create the slot. Fails if it already exists.
    fn create_slot(&mut self, value: T) -> Result<(), StoreError>;

    /// Overwrite the slot. Fails if it does not exist.
    fn set_slot(&mut self, value: T) -> Result<(), StoreError>;

    /// Destroy the slot, returning its value. Never called by the controller itself.
    fn destroy_slot(&mut self) -> Option<T>;
}
