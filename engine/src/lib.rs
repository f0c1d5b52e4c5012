//! Hydrogen engine: singleton conversion for an ECS world.
//!
//! Independent producers (scene authoring, asset loading, tools) each propose a value for a
//! world singleton by spawning a converter record. Once per tick a controller per singleton
//! type collects the proposals, elects a single winner in acquisition order and writes it into
//! the world, honoring "don't replace" requests against an existing value.
//!
//! ```rust,ignore
//! use hydrogen_engine::ecs::{
//!     Singleton,
//!     convert::{Controller, Converter, Group},
//!     world::{self, World},
//! };
//!
//! #[derive(Clone, Debug, Singleton)]
//! struct TimeConfig { target_frame_rate: u32 }
//!
//! let mut world = World::new(world::Id::new(0));
//! let mut group = Group::new();
//! group.add(Controller::<TimeConfig>::new());
//!
//! world.spawn_converter(TimeConfig { target_frame_rate: 60 });
//! group.update(&mut world)?;
//! ```
//!
//! The engine logs through the `log` facade; see [`core::log::ChannelLogger`] for a backend.

extern crate self as hydrogen_engine;

pub mod core;
pub mod ecs;
