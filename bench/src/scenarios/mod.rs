//! Frame-shaped singleton conversion workloads.
//!
//! # Scenarios
//!
//! - **Contention**: Many producers per frame competing for plain data singletons
//! - **Localization**: Blob singletons deep-copied out of disposable producer storage

pub mod contention;
pub mod localization;

pub use contention::{ContentionConfig, ContentionScenario};
pub use localization::{LocalizationConfig, LocalizationScenario};

use hydrogen_engine::ecs::convert::StoreError;

/// Common trait for benchmark scenarios.
pub trait Scenario {
    /// Human-readable name of the scenario.
    fn name(&self) -> &'static str;

    /// Brief description of what this scenario tests.
    fn description(&self) -> &'static str;

    /// Number of converter records spawned per frame.
    fn converters_per_frame(&self) -> usize;

    /// Set up the scenario (register controllers, seed singletons).
    fn setup(&mut self);

    /// Run one "frame" of the scenario: spawn converters, then update the convert group.
    fn update(&mut self) -> Result<(), StoreError>;

    /// Clean up the scenario.
    fn teardown(&mut self);
}
