//! Converter record storage.
//!
//! [`Records<T>`] stores the converter records of one singleton type in acquisition order,
//! together with their lifecycle [`Tag`]s. Each tag is a `FixedBitSet` indexed by the record
//! entity's index, so tag queries and counts never touch the records themselves.
//!
//! ```text
//!  rows:       [ e4:60 | e1:30(skip) | e7:15 ]      acquisition order
//!  Processed:  0 1 0 0 1 0 0 1                       bit per entity index
//!  Changed:    0 0 0 0 1 0 0 0
//!  Unchanged:  0 0 0 0 0 0 0 0
//! ```
//!
//! Tag bits of a removed record are cleared, so an entity index reused by the allocator starts
//! out untagged.
//!
//! [`RecordTables`] holds the `Records<T>` of every singleton type, type erased and indexed by
//! [`SingletonId`].

use std::{any::Any, collections::HashMap};

use fixedbitset::FixedBitSet;

use crate::ecs::{
    convert::{Candidate, Collect, Converter, Tag},
    entity::Entity,
    singleton::Singleton,
    world::SingletonId,
};

struct Row<T> {
    entity: Entity,
    converter: Converter<T>,
}

/// Converter records of one singleton type.
pub struct Records<T> {
    /// Records in acquisition order.
    rows: Vec<Row<T>>,
    /// Record entity to its position in `rows`.
    positions: HashMap<Entity, usize>,
    /// One bitset per tag, indexed by `Tag::index()`.
    tags: [FixedBitSet; 3],
}

impl<T> Records<T> {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            positions: HashMap::new(),
            tags: [FixedBitSet::new(), FixedBitSet::new(), FixedBitSet::new()],
        }
    }

    /// Append a record. `entity` must be freshly allocated.
    pub fn push(&mut self, entity: Entity, converter: Converter<T>) {
        debug_assert!(
            !self.positions.contains_key(&entity),
            "converter record {:?} pushed twice",
            entity
        );
        self.positions.insert(entity, self.rows.len());
        self.rows.push(Row { entity, converter });
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[inline]
    pub fn contains(&self, entity: Entity) -> bool {
        self.positions.contains_key(&entity)
    }

    pub fn get(&self, entity: Entity) -> Option<&Converter<T>> {
        self.positions
            .get(&entity)
            .map(|&position| &self.rows[position].converter)
    }

    /// Number of records carrying `tag`.
    #[inline]
    pub fn count_tagged(&self, tag: Tag) -> usize {
        self.tags[tag.index()].count_ones(..)
    }

    /// Number of records not yet processed.
    #[inline]
    pub fn count_pending(&self) -> usize {
        self.len() - self.count_tagged(Tag::Processed)
    }

    /// Tag a record. Returns `false` if `entity` is not a record of this table.
    pub fn tag(&mut self, entity: Entity, tag: Tag) -> bool {
        if !self.contains(entity) {
            return false;
        }
        let bits = &mut self.tags[tag.index()];
        let index = entity.index();
        if index >= bits.len() {
            bits.grow(index + 1);
        }
        bits.insert(index);
        true
    }

    pub fn has_tag(&self, entity: Entity, tag: Tag) -> bool {
        self.contains(entity) && self.tags[tag.index()].contains(entity.index())
    }

    /// Records carrying `tag`, in acquisition order.
    pub fn tagged(&self, tag: Tag) -> Vec<Entity> {
        let bits = &self.tags[tag.index()];
        self.rows
            .iter()
            .filter(|row| bits.contains(row.entity.index()))
            .map(|row| row.entity)
            .collect()
    }

    /// Remove every processed record, returning their entities in acquisition order.
    pub fn remove_processed(&mut self) -> Vec<Entity> {
        let processed = self.tagged(Tag::Processed);
        if processed.is_empty() {
            return processed;
        }

        for entity in &processed {
            let index = entity.index();
            for bits in &mut self.tags {
                if index < bits.len() {
                    bits.set(index, false);
                }
            }
            self.positions.remove(entity);
        }

        let positions = &self.positions;
        self.rows.retain(|row| positions.contains_key(&row.entity));
        for (position, row) in self.rows.iter().enumerate() {
            self.positions.insert(row.entity, position);
        }

        processed
    }
}

impl<T: Clone + Send + Sync> Records<T> {
    /// Pending records as candidates, in acquisition order.
    pub fn pending(&self, collect: Collect) -> Vec<Candidate<T>> {
        let processed = &self.tags[Tag::Processed.index()];
        collect.collect(&self.rows, |row| {
            (!processed.contains(row.entity.index()))
                .then(|| Candidate::new(row.entity, row.converter.clone()))
        })
    }
}

impl<T> Default for Records<T> {
    fn default() -> Self {
        Self::new()
    }
}

trait ErasedRecords: Send + Sync {
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Singleton> ErasedRecords for Records<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// The record tables of every singleton type.
pub struct RecordTables {
    tables: Vec<Option<Box<dyn ErasedRecords>>>,
}

impl RecordTables {
    pub fn new() -> Self {
        Self { tables: Vec::new() }
    }

    pub fn get<T: Singleton>(&self, id: SingletonId) -> Option<&Records<T>> {
        self.tables
            .get(id.index())
            .and_then(|table| table.as_ref())
            .and_then(|table| table.as_any().downcast_ref::<Records<T>>())
    }

    pub fn get_mut<T: Singleton>(&mut self, id: SingletonId) -> Option<&mut Records<T>> {
        self.tables
            .get_mut(id.index())
            .and_then(|table| table.as_mut())
            .and_then(|table| table.as_any_mut().downcast_mut::<Records<T>>())
    }

    /// The table for `id`, created on first use.
    ///
    /// # Panics
    ///
    /// Panics if `id` already holds the records of another type.
    pub fn get_or_insert<T: Singleton>(&mut self, id: SingletonId) -> &mut Records<T> {
        let index = id.index();
        if index >= self.tables.len() {
            self.tables.resize_with(index + 1, || None);
        }
        self.tables[index]
            .get_or_insert_with(|| Box::new(Records::<T>::new()) as Box<dyn ErasedRecords>)
            .as_any_mut()
            .downcast_mut::<Records<T>>()
            .unwrap_or_else(|| {
                panic!(
                    "Singleton id {:?} holds records of another type than {}",
                    id,
                    std::any::type_name::<T>()
                )
            })
    }
}

impl Default for RecordTables {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(specs: &[(u32, u32, bool)]) -> Records<u32> {
        let mut records = Records::new();
        for &(id, value, dont_replace) in specs {
            records.push(
                Entity::new(id),
                Converter {
                    value,
                    dont_replace,
                },
            );
        }
        records
    }

    // ==================== Tags ====================

    #[test]
    fn new_records_are_pending() {
        let records = records(&[(4, 60, false), (1, 30, true)]);

        assert_eq!(records.len(), 2);
        assert_eq!(records.count_pending(), 2);
        assert_eq!(records.count_tagged(Tag::Processed), 0);
    }

    #[test]
    fn tag_marks_only_known_records() {
        // Given
        let mut records = records(&[(4, 60, false)]);

        // When
        let known = records.tag(Entity::new(4), Tag::Processed);
        let unknown = records.tag(Entity::new(9), Tag::Processed);

        // Then
        assert!(known);
        assert!(!unknown);
        assert!(records.has_tag(Entity::new(4), Tag::Processed));
        assert!(!records.has_tag(Entity::new(4), Tag::Changed));
        assert_eq!(records.count_pending(), 0);
    }

    #[test]
    fn tagged_keeps_acquisition_order() {
        let mut records = records(&[(7, 15, false), (2, 30, false), (5, 60, false)]);
        for id in [5, 7, 2] {
            records.tag(Entity::new(id), Tag::Unchanged);
        }

        assert_eq!(
            records.tagged(Tag::Unchanged),
            vec![Entity::new(7), Entity::new(2), Entity::new(5)]
        );
    }

    // ==================== Pending ====================

    #[test]
    fn pending_skips_processed_records() {
        let mut records = records(&[(7, 15, false), (2, 30, true), (5, 60, false)]);
        records.tag(Entity::new(7), Tag::Processed);

        let pending = records.pending(Collect::Serial);

        assert_eq!(
            pending,
            vec![
                Candidate::new(Entity::new(2), Converter::dont_replace(30)),
                Candidate::new(Entity::new(5), Converter::new(60)),
            ]
        );
    }

    #[test]
    fn parallel_pending_matches_serial() {
        let specs: Vec<(u32, u32, bool)> =
            (0..100).rev().map(|id| (id, id * 3, id % 3 == 0)).collect();
        let mut records = records(&specs);
        for id in (0..100).step_by(7) {
            records.tag(Entity::new(id), Tag::Processed);
        }

        let serial = records.pending(Collect::Serial);
        let parallel = records.pending(Collect::Parallel { chunk_size: 8 });

        assert_eq!(parallel, serial);
        assert_eq!(serial.len(), records.count_pending());
    }

    // ==================== Removal ====================

    #[test]
    fn remove_processed_drops_rows_and_clears_tags() {
        // Given
        let mut records = records(&[(7, 15, false), (2, 30, false), (5, 60, false)]);
        records.tag(Entity::new(7), Tag::Processed);
        records.tag(Entity::new(7), Tag::Changed);
        records.tag(Entity::new(5), Tag::Processed);

        // When
        let removed = records.remove_processed();

        // Then
        assert_eq!(removed, vec![Entity::new(7), Entity::new(5)]);
        assert_eq!(records.len(), 1);
        assert_eq!(records.get(Entity::new(2)), Some(&Converter::new(30)));
        assert_eq!(records.count_tagged(Tag::Changed), 0);
        assert_eq!(records.count_pending(), 1);
    }

    #[test]
    fn reused_index_starts_untagged() {
        let mut allocator = crate::ecs::entity::Allocator::new();
        let first = allocator.alloc();
        let mut records = Records::new();
        records.push(first, Converter::new(15u32));
        records.tag(first, Tag::Processed);
        records.remove_processed();
        allocator.free(first);

        let reused = allocator.alloc();
        records.push(reused, Converter::new(60));

        assert_eq!(reused.index(), first.index());
        assert!(!records.contains(first));

        assert!(!records.has_tag(reused, Tag::Processed));
        assert_eq!(records.count_pending(), 1);
    }

    // ==================== Tables ====================

    #[derive(Clone, Debug, PartialEq)]
    struct TimeConfig(u32);

    impl Singleton for TimeConfig {}

    #[derive(Clone, Debug, PartialEq)]
    struct Gravity(f32);

    impl Singleton for Gravity {}

    #[test]
    fn tables_are_created_on_first_use() {
        let mut tables = RecordTables::new();
        let id = SingletonId::new(2);
        assert!(tables.get::<TimeConfig>(id).is_none());

        tables
            .get_or_insert::<TimeConfig>(id)
            .push(Entity::new(0), Converter::new(TimeConfig(60)));

        assert_eq!(tables.get::<TimeConfig>(id).map(Records::len), Some(1));
        assert!(tables.get::<Gravity>(id).is_none());
    }
}
