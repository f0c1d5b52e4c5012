//! World storage for singleton conversion.
//!
//! Two kinds of data live in a world:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  World                                                      │
//! │  - Entity allocator, TypeRegistry (TypeId → SingletonId)    │
//! └──────────────┬──────────────────────────────┬───────────────┘
//!                │                              │
//! ┌──────────────▼──────────────┐ ┌─────────────▼──────────────┐
//! │  Slots                      │ │  RecordTables              │
//! │  - At most one value per    │ │  - Records<T> per type     │
//! │    singleton type           │ │  - Acquisition order       │
//! │  - Type erased, downcast    │ │  - Tag bitsets per entity  │
//! └─────────────────────────────┘ └────────────────────────────┘
//! ```
//!
//! Both are indexed by [`SingletonId`](crate::ecs::world::SingletonId) rather than Rust's
//! `TypeId`, so per-type storage is a plain vector lookup.

mod records;
mod slots;

pub use records::{RecordTables, Records};
pub use slots::Slots;
