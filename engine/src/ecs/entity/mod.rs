//! Record handles for converter and post-convert entities.
//!
//! Every converter record in a [`World`](crate::ecs::world::World) is addressed by an
//! [`Entity`]: an [`Id`] plus a [`Generation`]. The id names a slot in the allocator, the
//! generation counts how many times that slot has been handed out. Converter records only
//! live for two ticks, so ids are recycled constantly; the generation keeps a handle that
//! outlived its record from aliasing whatever record reuses the id next.
//!
//! ```rust,ignore
//! let mut allocator = Allocator::new();
//! let first = allocator.alloc();   // Entity { id: 0, generation: 0 }
//! allocator.free(first);
//! let reused = allocator.alloc();  // Entity { id: 0, generation: 1 }
//! assert!(!allocator.is_alive(first));
//! ```

use std::{collections::VecDeque, fmt};

use fixedbitset::FixedBitSet;

/// The generation of an entity id. Bumped every time the id is freed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u32);

impl Generation {
    /// The first generation of an entity.
    const FIRST: Self = Self(0);

    /// Get the next generation from the current.
    #[inline]
    pub fn next(&self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// An entity identifier, the index half of an [`Entity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(u32);

impl From<u32> for Id {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// A generational handle to a record in the world.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Entity {
    id: Id,
    generation: Generation,
}

impl Entity {
    /// Construct an entity with just an id, at the first generation.
    #[inline]
    pub fn new(id: u32) -> Self {
        Self::new_with_generation(Id(id), Generation::FIRST)
    }

    #[inline]
    pub(crate) const fn new_with_generation(id: Id, generation: Generation) -> Self {
        Self { id, generation }
    }

    /// Get the id of this entity.
    #[inline]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Get the generation of this entity.
    #[inline]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Index of this entity in id-indexed storage (vectors, bitsets).
    #[inline]
    pub fn index(&self) -> usize {
        self.id.0 as usize
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({}v{})", self.id.0, self.generation.0)
    }
}

impl PartialOrd for Entity {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entity {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.id
            .cmp(&other.id)
            .then_with(|| self.generation.cmp(&other.generation))
    }
}

/// Allocates entity handles and recycles freed ids.
///
/// Freed ids go to a FIFO dead pool with their generation bumped, and are handed out again
/// before any fresh id is minted. The allocator is owned by the world and only touched
/// through `&mut`, so no atomics are involved.
#[derive(Debug, Default)]
pub struct Allocator {
    /// Current generation per id slot.
    generations: Vec<Generation>,

    /// Ids available for reuse.
    dead_pool: VecDeque<Id>,

    /// Ids currently in the dead pool.
    dead: FixedBitSet,
}

impl Allocator {
    /// Construct an empty allocator starting from id 0.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an entity, reusing a freed id when one is available.
    pub fn alloc(&mut self) -> Entity {
        if let Some(id) = self.dead_pool.pop_front() {
            self.dead.set(id.0 as usize, false);
            return Entity::new_with_generation(id, self.generations[id.0 as usize]);
        }

        let id = Id(self.generations.len() as u32);
        self.generations.push(Generation::FIRST);
        self.dead.grow(self.generations.len());
        Entity::new(id.0)
    }

    /// Allocate `count` entities at once.
    pub fn alloc_many(&mut self, count: usize) -> Vec<Entity> {
        (0..count).map(|_| self.alloc()).collect()
    }

    /// Free an entity for reuse. Returns `false` if the handle was already stale.
    pub fn free(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }
        let slot = &mut self.generations[entity.index()];
        *slot = slot.next();
        self.dead.insert(entity.index());
        self.dead_pool.push_back(entity.id);
        true
    }

    /// Whether `entity` is the live handle for its id.
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.generations
            .get(entity.index())
            .is_some_and(|generation| *generation == entity.generation)
            && !self.dead.contains(entity.index())
    }

    /// Number of live entities.
    pub fn len(&self) -> usize {
        self.generations.len() - self.dead_pool.len()
    }

    /// Whether no entity is live.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_hands_out_sequential_ids() {
        // Given
        let mut allocator = Allocator::new();

        // When
        let entities = allocator.alloc_many(3);

        // Then
        assert_eq!(entities, vec![Entity::new(0), Entity::new(1), Entity::new(2)]);
        assert_eq!(allocator.len(), 3);
    }

    #[test]
    fn free_bumps_generation_and_recycles_id() {
        // Given
        let mut allocator = Allocator::new();
        let first = allocator.alloc();

        // When
        assert!(allocator.free(first));
        let reused = allocator.alloc();

        // Then
        assert_eq!(reused.id(), first.id());
        assert_eq!(reused.generation(), first.generation().next());
        assert!(!allocator.is_alive(first));
        assert!(allocator.is_alive(reused));
    }

    #[test]
    fn free_rejects_stale_handles() {
        // Given
        let mut allocator = Allocator::new();
        let entity = allocator.alloc();
        allocator.free(entity);

        // When
        let freed_twice = allocator.free(entity);

        // Then
        assert!(!freed_twice);
        assert!(allocator.is_empty());
    }

    #[test]
    fn dead_pool_is_drained_before_fresh_ids() {
        // Given
        let mut allocator = Allocator::new();
        let entities = allocator.alloc_many(5);
        for entity in entities {
            allocator.free(entity);
        }

        // When
        let next = allocator.alloc_many(6);

        // Then - five recycled at generation 1, one fresh at generation 0
        let recycled = next.iter().filter(|e| e.generation() == Generation(1)).count();
        let fresh: Vec<_> = next.iter().filter(|e| e.generation() == Generation::FIRST).collect();
        assert_eq!(recycled, 5);
        assert_eq!(fresh, vec![&Entity::new(5)]);
    }

    #[test]
    fn entities_order_by_id_then_generation() {
        let older = Entity::new(1);
        let newer = Entity::new_with_generation(Id(1), Generation(1));
        let other = Entity::new(0);

        let mut sorted = vec![newer, older, other];
        sorted.sort();

        assert_eq!(sorted, vec![other, older, newer]);
    }
}
