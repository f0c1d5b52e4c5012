pub mod convert;
pub mod entity;
pub mod singleton;
pub mod storage;
pub mod world;

pub use entity::Entity;
pub use singleton::Singleton;
pub use world::{Id as WorldId, World};

/// Derive macro for [`Singleton`](trait@Singleton).
pub use hydrogen_macros::Singleton;
