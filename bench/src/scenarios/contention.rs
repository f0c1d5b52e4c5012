//! Many producers competing for the same singletons every frame.
//!
//! Each frame spawns `producers` TimeConfig converters with random frame rates, a configurable
//! share of them flagged "don't replace", plus a single Gravity converter. This scenario tests:
//! - Arbitration cost at high candidate counts
//! - Serial versus chunk-parallel candidate collection
//! - Record cleanup on the following frame

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use hydrogen_engine::ecs::{
    convert::{Collect, Controller, Converter, Group, StoreError, Tick},
    world,
};

use crate::scenarios::Scenario;
use crate::singletons::{Gravity, TimeConfig};

/// Configuration for the contention benchmark.
pub struct ContentionConfig {
    /// TimeConfig converters spawned per frame.
    pub producers: usize,
    /// Probability that a converter asks not to replace an existing value.
    pub dont_replace_ratio: f64,
    /// How pending records are collected.
    pub collect: Collect,
    /// Random seed for reproducibility.
    pub seed: u64,
}

impl Default for ContentionConfig {
    fn default() -> Self {
        Self {
            producers: 1_000,
            dont_replace_ratio: 0.25,
            collect: Collect::Serial,
            seed: 12345,
        }
    }
}

/// Contention benchmark scenario.
pub struct ContentionScenario {
    config: ContentionConfig,
    world: world::World,
    group: Group,
    rng: ChaCha8Rng,
    /// Frames in which the TimeConfig singleton changed.
    changed_frames: usize,
}

impl ContentionScenario {
    /// Create a new contention scenario with default config.
    pub fn new() -> Self {
        Self::with_config(ContentionConfig::default())
    }

    /// Create a new contention scenario with custom config.
    pub fn with_config(config: ContentionConfig) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            world: world::World::new(world::Id::new(0)),
            group: Group::new(),
            changed_frames: 0,
            config,
        }
    }

    fn spawn_converters(&mut self) {
        let converters: Vec<_> = (0..self.config.producers)
            .map(|_| Converter {
                value: TimeConfig::new(self.rng.gen_range(30..=240)),
                dont_replace: self.rng.gen_bool(self.config.dont_replace_ratio),
            })
            .collect();
        self.world.spawn_converters(converters);

        self.world.spawn_converter(Gravity {
            x: 0.0,
            y: self.rng.gen_range(-12.0..-8.0),
            z: 0.0,
        });
    }

    /// Frames in which the TimeConfig singleton changed.
    pub fn changed_frames(&self) -> usize {
        self.changed_frames
    }

    pub fn world(&self) -> &world::World {
        &self.world
    }
}

impl Default for ContentionScenario {
    fn default() -> Self {
        Self::new()
    }
}

impl Scenario for ContentionScenario {
    fn name(&self) -> &'static str {
        "contention"
    }

    fn description(&self) -> &'static str {
        "Many producers per frame competing for plain data singletons"
    }

    fn converters_per_frame(&self) -> usize {
        self.config.producers + 1
    }

    fn setup(&mut self) {
        self.world.set_collect(self.config.collect);
        self.group
            .add(Controller::<TimeConfig>::new())
            .add(Controller::<Gravity>::new());
    }

    fn update(&mut self) -> Result<(), StoreError> {
        self.spawn_converters();

        let reports = self.group.update(&mut self.world)?;
        if matches!(reports.first().map(|r| r.tick), Some(Tick::Changed { .. })) {
            self.changed_frames += 1;
        }
        Ok(())
    }

    fn teardown(&mut self) {
        self.world = world::World::new(world::Id::new(0));
        self.group = Group::new();
        self.changed_frames = 0;
    }
}
