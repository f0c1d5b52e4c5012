//! Singleton conversion.
//!
//! Any number of independent producers may propose a value for a world singleton during a
//! frame. Each proposal is a converter record: an entity carrying a [`Converter`] for the
//! singleton type. Once per tick the [`Controller`] for that type collects the pending records,
//! asks the [`Arbitrator`] for a single winner and writes it into the singleton slot.
//!
//! # Architecture
//!
//! ```text
//!  producers ──spawn_converter──► World (records + tags + slots)
//!                                   ▲            │
//!                          tag/slot │            │ enumerate_pending
//!                                   │            ▼
//!                              Controller ──► Arbitrator ──► Prepare
//!                                   │
//!                                   └──► Hooks (changed / unchanged)
//! ```
//!
//! | Piece | Role |
//! |-------|------|
//! | [`Converter`] / [`Candidate`] | A proposed value and the record it came from |
//! | [`Tag`] | Record lifecycle: Processed, then Changed or Unchanged |
//! | [`Arbitrator`] | Pure winner election in acquisition order |
//! | [`Store`] | Storage contract; implemented by [`World`](crate::ecs::world::World) |
//! | [`Controller`] | Per-type tick: cleanup, collect, tag, arbitrate, apply, notify |
//! | [`Group`] | One controller per type, updated together with post-convert operations |
//! | [`Collect`] | Serial or chunk-parallel candidate collection |
//!
//! # Example
//!
//! ```rust,ignore
//! use hydrogen_engine::ecs::{convert::{Controller, Converter, Group}, world::{self, World}};
//!
//! let mut world = World::new(world::Id::new(0));
//! let mut group = Group::new();
//! group.add(Controller::<TimeConfig>::new());
//!
//! world.spawn_converter(TimeConfig::new(60));
//! world.spawn_converter(Converter::dont_replace(TimeConfig::new(144)));
//! group.update(&mut world)?;
//!
//! assert_eq!(world.singleton::<TimeConfig>().unwrap().target_frame_rate, 60);
//! ```

mod arbitrate;
mod collect;
mod controller;
mod converter;
mod error;
mod group;
mod hooks;
pub mod post;
mod store;

pub use arbitrate::{Arbitrator, Outcome};
pub use collect::Collect;
pub use controller::{Controller, Tick};
pub use converter::{Candidate, Converter, IntoConverter, Tag};
pub use error::{ArbitrationError, StoreError};
pub use group::{Group, Report};
pub use hooks::{Hooks, UnchangedReport};
pub use store::Store;
