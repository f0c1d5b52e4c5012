//! The World owns singleton slots, converter records and post-convert operations.
//!
//! A `World` is the in-memory [`Store`] every [`Controller`](crate::ecs::convert::Controller)
//! runs against. Producers spawn converter records into it; the conversion pass reads, tags and
//! deletes them and writes the winning value into the singleton slot.
//!
//! # Architecture
//!
//! The World coordinates several subsystems:
//! - **Entity Allocator**: Generational ids for converter records and post-convert carriers
//! - **Type Registry**: Dense [`SingletonId`] per singleton type
//! - **Slots**: At most one value per singleton type
//! - **Record Tables**: Converter records per type, in acquisition order, with their tags
//! - **Post Convert Queue**: Operation batches performed after the conversion pass
//!
//! # Example
//!
//! ```rust,ignore
//! use hydrogen_engine::ecs::world::{self, World};
//!
//! let mut world = World::new(world::Id::new(1));
//!
//! // Seed a singleton directly
//! world.create_singleton(TimeConfig::new(60))?;
//!
//! // Propose a new value, to be arbitrated on the next tick
//! let record = world.spawn_converter(Converter::dont_replace(TimeConfig::new(144)));
//!
//! // Read it back
//! assert_eq!(world.singleton::<TimeConfig>().unwrap().target_frame_rate, 60);
//! ```
mod type_registry;

use std::mem;

use log::trace;

use crate::ecs::{
    convert::{Candidate, Collect, Converter, IntoConverter, Store, StoreError, Tag, post},
    entity::{self, Entity},
    singleton::{Singleton, short_type_name},
    storage::{RecordTables, Records, Slots},
};

pub use type_registry::{SingletonId, TypeInfo, TypeRegistry};

/// A world identifier. This is a unique identifier for a world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(u32);

impl Id {
    /// Create a new world identifier.
    #[inline]
    pub const fn new(id: u32) -> Self {
        Id(id)
    }

    /// Get the raw identifier value.
    #[inline]
    pub const fn id(&self) -> u32 {
        self.0
    }
}

/// A queued batch of post-convert operations and the entity carrying it.
struct PostConvert {
    carrier: Entity,
    operations: Vec<Box<dyn post::Operation>>,
}

/// The World is the container for singletons and the converter records competing for them.
pub struct World {
    /// The world's unique identifier.
    id: Id,

    /// Allocates converter records and post-convert carriers.
    entity_allocator: entity::Allocator,

    /// The registry of all known singleton types in the world.
    types: TypeRegistry,

    /// Singleton values, one per type.
    slots: Slots,

    /// Converter records, one table per type.
    records: RecordTables,

    /// Post-convert batches, in spawn order.
    post_convert: Vec<PostConvert>,

    /// How pending records are collected.
    collect: Collect,
}

impl World {
    pub fn new(id: Id) -> Self {
        Self {
            id,
            entity_allocator: entity::Allocator::default(),
            types: TypeRegistry::default(),
            slots: Slots::default(),
            records: RecordTables::default(),
            post_convert: Vec::new(),
            collect: Collect::default(),
        }
    }

    #[inline]
    pub fn id(&self) -> Id {
        self.id
    }

    #[inline]
    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    #[inline]
    pub fn collect(&self) -> Collect {
        self.collect
    }

    /// Choose how conversion passes collect pending records.
    #[inline]
    pub fn set_collect(&mut self, collect: Collect) {
        self.collect = collect;
    }

    /// Returns `true` if `entity` is a live record or carrier of this world.
    #[inline]
    pub fn contains_entity(&self, entity: Entity) -> bool {
        self.entity_allocator.is_alive(entity)
    }

    // ==================== Singletons ====================

    /// Create the singleton of type `T`.
    ///
    /// Fails with [`StoreError::SlotExists`] if it already exists.
    pub fn create_singleton<T: Singleton>(&mut self, value: T) -> Result<(), StoreError> {
        let id = self.types.register::<T>();
        if self.slots.contains(id) {
            return Err(StoreError::SlotExists {
                type_name: short_type_name::<T>(),
            });
        }
        self.slots.insert(id, value);
        Ok(())
    }

    #[inline]
    pub fn contains_singleton<T: Singleton>(&self) -> bool {
        self.types
            .get::<T>()
            .is_some_and(|id| self.slots.contains(id))
    }

    #[inline]
    pub fn singleton<T: Singleton>(&self) -> Option<&T> {
        let id = self.types.get::<T>()?;
        self.slots.get::<T>(id)
    }

    #[inline]
    pub fn singleton_mut<T: Singleton>(&mut self) -> Option<&mut T> {
        let id = self.types.get::<T>()?;
        self.slots.get_mut::<T>(id)
    }

    /// Create the singleton of type `T`, or overwrite it. Returns the previous value.
    pub fn upsert_singleton<T: Singleton>(&mut self, value: T) -> Option<T> {
        let id = self.types.register::<T>();
        self.slots.insert(id, value)
    }

    /// Destroy the singleton of type `T`, returning its value.
    pub fn destroy_singleton<T: Singleton>(&mut self) -> Option<T> {
        let id = self.types.get::<T>()?;
        self.slots.remove::<T>(id)
    }

    // ==================== Converter Records ====================

    /// Spawn a converter record. Records are arbitrated in the order they are spawned.
    ///
    /// ```rust,ignore
    /// world.spawn_converter(TimeConfig::new(60));
    /// world.spawn_converter(Converter::dont_replace(TimeConfig::new(144)));
    /// ```
    pub fn spawn_converter<C: IntoConverter>(&mut self, converter: C) -> Entity {
        let entity = self.entity_allocator.alloc();
        self.records_mut::<C::Value>()
            .push(entity, converter.into_converter());
        entity
    }

    /// Spawn several converter records, in iteration order.
    pub fn spawn_converters<C: IntoConverter>(
        &mut self,
        converters: impl IntoIterator<Item = C>,
    ) -> Vec<Entity> {
        let converters: Vec<_> = converters
            .into_iter()
            .map(IntoConverter::into_converter)
            .collect();
        let entities = self.entity_allocator.alloc_many(converters.len());
        let records = self.records_mut::<C::Value>();
        for (&entity, converter) in entities.iter().zip(converters) {
            records.push(entity, converter);
        }
        entities
    }

    /// The converter carried by a record, if it is still alive.
    pub fn converter<T: Singleton>(&self, entity: Entity) -> Option<&Converter<T>> {
        self.records::<T>()?.get(entity)
    }

    pub fn has_tag<T: Singleton>(&self, entity: Entity, tag: Tag) -> bool {
        self.records::<T>()
            .is_some_and(|records| records.has_tag(entity, tag))
    }

    /// Records of type `T` carrying `tag`, in acquisition order.
    ///
    /// After a pass, `tagged::<T>(Tag::Changed)` is the winning record and
    /// `tagged::<T>(Tag::Unchanged)` the records of a pass without a winner.
    pub fn tagged<T: Singleton>(&self, tag: Tag) -> Vec<Entity> {
        self.records::<T>()
            .map(|records| records.tagged(tag))
            .unwrap_or_default()
    }

    /// Records of type `T` not yet read by a conversion pass.
    pub fn pending_count<T: Singleton>(&self) -> usize {
        self.records::<T>().map_or(0, Records::count_pending)
    }

    /// All live records of type `T`, processed or not.
    pub fn converter_count<T: Singleton>(&self) -> usize {
        self.records::<T>().map_or(0, Records::len)
    }

    fn records<T: Singleton>(&self) -> Option<&Records<T>> {
        let id = self.types.get::<T>()?;
        self.records.get::<T>(id)
    }

    fn records_mut<T: Singleton>(&mut self) -> &mut Records<T> {
        let id = self.types.register::<T>();
        self.records.get_or_insert::<T>(id)
    }

    // ==================== Post Convert ====================

    /// Queue a batch of operations to run after the next conversion pass.
    ///
    /// Returns the carrier entity, freed once the batch has run.
    pub fn spawn_post_convert(&mut self, operations: Vec<Box<dyn post::Operation>>) -> Entity {
        let carrier = self.entity_allocator.alloc();
        self.post_convert.push(PostConvert {
            carrier,
            operations,
        });
        carrier
    }

    /// Number of queued post-convert batches.
    #[inline]
    pub fn post_convert_count(&self) -> usize {
        self.post_convert.len()
    }

    /// Perform and discard every queued post-convert batch, in spawn order.
    ///
    /// A failing operation consumes its batch and stops the run; later batches stay queued.
    /// Returns the number of batches performed.
    pub fn run_post_convert(&mut self) -> Result<usize, StoreError> {
        let mut batches = mem::take(&mut self.post_convert).into_iter();
        let mut performed = 0;

        while let Some(batch) = batches.next() {
            let result = batch
                .operations
                .iter()
                .try_for_each(|operation| operation.perform(self));
            self.entity_allocator.free(batch.carrier);

            if let Err(err) = result {
                // Batches queued by the operations themselves run after the remaining ones.
                let spawned = mem::replace(&mut self.post_convert, batches.collect());
                self.post_convert.extend(spawned);
                return Err(err);
            }

            trace!(
                "performed {} post-convert operations from {:?}",
                batch.operations.len(),
                batch.carrier
            );
            performed += 1;
        }

        Ok(performed)
    }
}

impl<T: Singleton> Store<T> for World {
    fn count_pending(&self) -> usize {
        self.pending_count::<T>()
    }

    fn count_processed(&self) -> usize {
        self.records::<T>()
            .map_or(0, |records| records.count_tagged(Tag::Processed))
    }

    fn count_slot(&self) -> usize {
        usize::from(self.contains_singleton::<T>())
    }

    fn enumerate_pending(&self) -> Result<Vec<Candidate<T>>, StoreError> {
        Ok(self
            .records::<T>()
            .map(|records| records.pending(self.collect))
            .unwrap_or_default())
    }

    fn delete_all_processed(&mut self) -> Result<usize, StoreError> {
        let Some(id) = self.types.get::<T>() else {
            return Ok(0);
        };
        let removed = self
            .records
            .get_mut::<T>(id)
            .map(Records::remove_processed)
            .unwrap_or_default();
        for entity in &removed {
            self.entity_allocator.free(*entity);
        }
        Ok(removed.len())
    }

    fn tag(&mut self, record: Entity, tag: Tag) -> Result<(), StoreError> {
        let tagged = self
            .types
            .get::<T>()
            .and_then(|id| self.records.get_mut::<T>(id))
            .is_some_and(|records| records.tag(record, tag));

        if tagged {
            Ok(())
        } else {
            Err(StoreError::UnknownRecord {
                entity: record,
                type_name: short_type_name::<T>(),
            })
        }
    }

    fn get_slot(&self) -> Option<&T> {
        self.singleton::<T>()
    }

    fn create_slot(&mut self, value: T) -> Result<(), StoreError> {
        self.create_singleton(value)
    }

    fn set_slot(&mut self, value: T) -> Result<(), StoreError> {
        match self.singleton_mut::<T>() {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(StoreError::MissingSlot {
                type_name: short_type_name::<T>(),
            }),
        }
    }

    fn destroy_slot(&mut self) -> Option<T> {
        self.destroy_singleton::<T>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{convert::post::SetSingleton, singleton::BlobRef};

    #[derive(Clone, Debug, PartialEq)]
    struct TimeConfig(u32);

    impl Singleton for TimeConfig {}

    #[derive(Clone, Debug, PartialEq)]
    struct Gravity(f32);

    impl Singleton for Gravity {}

    fn new_world() -> World {
        World::new(Id::new(0))
    }

    // ==================== Singletons ====================

    #[test]
    fn create_singleton_fails_when_present() {
        // Given
        let mut world = new_world();
        world.create_singleton(TimeConfig(60)).unwrap();

        // When
        let result = world.create_singleton(TimeConfig(30));

        // Then
        assert_eq!(
            result,
            Err(StoreError::SlotExists {
                type_name: "TimeConfig".to_string()
            })
        );
        assert_eq!(world.singleton::<TimeConfig>(), Some(&TimeConfig(60)));
    }

    #[test]
    fn upsert_singleton_creates_then_overwrites() {
        let mut world = new_world();

        assert_eq!(world.upsert_singleton(TimeConfig(60)), None);
        assert_eq!(world.upsert_singleton(TimeConfig(30)), Some(TimeConfig(60)));
        assert_eq!(world.singleton::<TimeConfig>(), Some(&TimeConfig(30)));
    }

    #[test]
    fn singleton_mut_allows_modification() {
        let mut world = new_world();
        world.create_singleton(Gravity(-9.81)).unwrap();

        world.singleton_mut::<Gravity>().unwrap().0 = -1.62;

        assert_eq!(world.singleton::<Gravity>(), Some(&Gravity(-1.62)));
    }

    #[test]
    fn destroy_singleton_empties_the_slot() {
        let mut world = new_world();
        world.create_singleton(TimeConfig(60)).unwrap();

        assert_eq!(world.destroy_singleton::<TimeConfig>(), Some(TimeConfig(60)));
        assert!(!world.contains_singleton::<TimeConfig>());
        assert_eq!(world.destroy_singleton::<TimeConfig>(), None);

        world.create_singleton(TimeConfig(30)).unwrap();
        assert_eq!(world.singleton::<TimeConfig>(), Some(&TimeConfig(30)));
    }

    #[test]
    fn unknown_singleton_types_read_as_missing() {
        let world = new_world();

        assert!(!world.contains_singleton::<Gravity>());
        assert!(world.singleton::<Gravity>().is_none());
        assert!(world.types().is_empty());
    }

    // ==================== Converter Records ====================

    #[test]
    fn spawn_converter_accepts_values_and_converters() {
        // Given
        let mut world = new_world();

        // When
        let plain = world.spawn_converter(TimeConfig(60));
        let skip = world.spawn_converter(Converter::dont_replace(TimeConfig(144)));

        // Then
        assert_eq!(world.converter::<TimeConfig>(plain), Some(&Converter::new(TimeConfig(60))));
        assert_eq!(
            world.converter::<TimeConfig>(skip),
            Some(&Converter::dont_replace(TimeConfig(144)))
        );
        assert_eq!(world.pending_count::<TimeConfig>(), 2);
        assert!(world.contains_entity(plain));
    }

    #[test]
    fn records_are_kept_per_type() {
        let mut world = new_world();
        world.spawn_converter(TimeConfig(60));
        let gravity = world.spawn_converter(Gravity(-9.81));

        assert_eq!(world.converter_count::<TimeConfig>(), 1);
        assert_eq!(world.converter_count::<Gravity>(), 1);
        assert!(world.converter::<TimeConfig>(gravity).is_none());
    }

    #[test]
    fn enumerate_pending_keeps_acquisition_order() {
        let mut world = new_world();
        let records = world.spawn_converters(vec![
            Converter::new(TimeConfig(15)),
            Converter::dont_replace(TimeConfig(30)),
            Converter::new(TimeConfig(60)),
        ]);

        let candidates: Vec<Candidate<TimeConfig>> = world.enumerate_pending().unwrap();

        let sources: Vec<Entity> = candidates.iter().map(Candidate::source).collect();
        assert_eq!(sources, records);
        assert!(candidates[1].dont_replace());
    }

    #[test]
    fn spawn_converters_reuses_freed_records() {
        // Given
        let mut world = new_world();
        let first = world.spawn_converters(vec![TimeConfig(15), TimeConfig(30)]);
        for record in &first {
            Store::<TimeConfig>::tag(&mut world, *record, Tag::Processed).unwrap();
        }
        Store::<TimeConfig>::delete_all_processed(&mut world).unwrap();

        // When
        let second = world.spawn_converters(vec![TimeConfig(60), TimeConfig(120), TimeConfig(144)]);

        // Then
        let reused: Vec<usize> = second[..2].iter().map(|e| e.index()).collect();
        assert_eq!(reused, vec![first[0].index(), first[1].index()]);
        assert!(second.iter().all(|e| world.contains_entity(*e)));
        assert!(first.iter().all(|e| !world.contains_entity(*e)));
        assert_eq!(world.converter::<TimeConfig>(second[2]), Some(&Converter::new(TimeConfig(144))));
        assert_eq!(world.pending_count::<TimeConfig>(), 3);
    }

    // ==================== Store ====================

    #[test]
    fn tag_rejects_unknown_records() {
        let mut world = new_world();
        let gravity = world.spawn_converter(Gravity(-9.81));

        let result = Store::<TimeConfig>::tag(&mut world, gravity, Tag::Processed);

        assert_eq!(
            result,
            Err(StoreError::UnknownRecord {
                entity: gravity,
                type_name: "TimeConfig".to_string()
            })
        );
    }

    #[test]
    fn set_slot_requires_an_existing_slot() {
        let mut world = new_world();

        let result = world.set_slot(TimeConfig(60));

        assert_eq!(
            result,
            Err(StoreError::MissingSlot {
                type_name: "TimeConfig".to_string()
            })
        );
    }

    #[test]
    fn delete_all_processed_frees_entities() {
        // Given
        let mut world = new_world();
        let first = world.spawn_converter(TimeConfig(60));
        let second = world.spawn_converter(TimeConfig(30));
        Store::<TimeConfig>::tag(&mut world, first, Tag::Processed).unwrap();

        // When
        let deleted = Store::<TimeConfig>::delete_all_processed(&mut world).unwrap();

        // Then
        assert_eq!(deleted, 1);
        assert!(!world.contains_entity(first));
        assert!(world.contains_entity(second));
        assert_eq!(Store::<TimeConfig>::count_processed(&world), 0);
        assert_eq!(Store::<TimeConfig>::count_pending(&world), 1);
    }

    #[test]
    fn count_slot_is_zero_or_one() {
        let mut world = new_world();
        assert_eq!(Store::<BlobRef<String>>::count_slot(&world), 0);

        world.create_singleton(BlobRef::create("en".to_string())).unwrap();

        assert_eq!(Store::<BlobRef<String>>::count_slot(&world), 1);
    }

    #[test]
    fn parallel_collection_matches_serial() {
        let mut world = new_world();
        world.spawn_converters((0..50).map(|rate| Converter {
            value: TimeConfig(rate),
            dont_replace: rate % 4 == 0,
        }));
        let serial: Vec<Candidate<TimeConfig>> = world.enumerate_pending().unwrap();

        world.set_collect(Collect::Parallel { chunk_size: 6 });
        let parallel: Vec<Candidate<TimeConfig>> = world.enumerate_pending().unwrap();

        assert_eq!(parallel, serial);
    }

    // ==================== Post Convert ====================

    #[derive(Debug)]
    struct Failing;

    impl post::Operation for Failing {
        fn perform(&self, _world: &mut World) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("asset database offline".to_string()))
        }
    }

    #[test]
    fn run_post_convert_performs_batches_once() {
        // Given
        let mut world = new_world();
        let carrier = world.spawn_post_convert(vec![
            Box::new(SetSingleton::new(TimeConfig(60))) as Box<dyn post::Operation>,
            Box::new(SetSingleton::new(Gravity(-9.81))),
        ]);

        // When
        let first = world.run_post_convert().unwrap();
        let second = world.run_post_convert().unwrap();

        // Then
        assert_eq!((first, second), (1, 0));
        assert_eq!(world.singleton::<TimeConfig>(), Some(&TimeConfig(60)));
        assert_eq!(world.singleton::<Gravity>(), Some(&Gravity(-9.81)));
        assert!(!world.contains_entity(carrier));
    }

    #[test]
    fn failing_post_convert_keeps_later_batches() {
        let mut world = new_world();
        world.spawn_post_convert(vec![Box::new(Failing) as Box<dyn post::Operation>]);
        world.spawn_post_convert(vec![
            Box::new(SetSingleton::new(TimeConfig(60))) as Box<dyn post::Operation>,
        ]);

        let result = world.run_post_convert();

        assert_eq!(
            result,
            Err(StoreError::Unavailable("asset database offline".to_string()))
        );
        assert_eq!(world.post_convert_count(), 1);
        assert_eq!(world.run_post_convert(), Ok(1));
        assert_eq!(world.singleton::<TimeConfig>(), Some(&TimeConfig(60)));
    }
}
