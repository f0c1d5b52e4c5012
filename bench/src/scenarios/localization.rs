//! Blob singletons fed from disposable producer storage.
//!
//! Each frame spawns `producers` `BlobRef<Locales>` converters drawn from a fixed pool of
//! locale tables, updates the convert group and disposes every producer blob. The singleton
//! must survive the disposal, so this scenario tests:
//! - Deep copy cost of the winning blob
//! - Blob handle cloning during candidate collection

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use hydrogen_engine::ecs::{
    convert::{Controller, Converter, Group, StoreError},
    singleton::{BlobRef, DeepCopy},
    world,
};

use crate::scenarios::Scenario;
use crate::singletons::Locales;

const LOCALE_POOL: &[(&str, &[&str])] = &[
    ("en", &["en", "fr", "it", "de", "es"]),
    ("zh", &["zh", "ja", "ko"]),
    ("en-us", &["en-us", "en-gb", "en-au", "en-ca"]),
    ("la", &["la"]),
];

/// Configuration for the localization benchmark.
pub struct LocalizationConfig {
    /// Blob converters spawned per frame.
    pub producers: usize,
    /// Probability that a converter asks not to replace an existing value.
    pub dont_replace_ratio: f64,
    /// Random seed for reproducibility.
    pub seed: u64,
}

impl Default for LocalizationConfig {
    fn default() -> Self {
        Self {
            producers: 64,
            dont_replace_ratio: 0.5,
            seed: 4242,
        }
    }
}

/// Localization benchmark scenario.
pub struct LocalizationScenario {
    config: LocalizationConfig,
    world: world::World,
    group: Group,
    rng: ChaCha8Rng,
}

impl LocalizationScenario {
    /// Create a new localization scenario with default config.
    pub fn new() -> Self {
        Self::with_config(LocalizationConfig::default())
    }

    /// Create a new localization scenario with custom config.
    pub fn with_config(config: LocalizationConfig) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            world: world::World::new(world::Id::new(0)),
            group: Group::new(),
            config,
        }
    }

    fn producer_blob(&mut self) -> BlobRef<Locales> {
        let (default, available) = LOCALE_POOL[self.rng.gen_range(0..LOCALE_POOL.len())];
        Locales::blob(default, available)
    }

    /// The current default locale, if the singleton exists.
    pub fn default_locale(&self) -> Option<String> {
        self.world
            .singleton::<BlobRef<Locales>>()?
            .resolve(|locales| locales.default.clone())
    }
}

impl Default for LocalizationScenario {
    fn default() -> Self {
        Self::new()
    }
}

impl Scenario for LocalizationScenario {
    fn name(&self) -> &'static str {
        "localization"
    }

    fn description(&self) -> &'static str {
        "Blob singletons deep-copied out of disposable producer storage"
    }

    fn converters_per_frame(&self) -> usize {
        self.config.producers
    }

    fn setup(&mut self) {
        self.group
            .add(Controller::<BlobRef<Locales>, DeepCopy>::blob());
    }

    fn update(&mut self) -> Result<(), StoreError> {
        let mut producers = Vec::with_capacity(self.config.producers);
        for _ in 0..self.config.producers {
            let blob = self.producer_blob();
            let dont_replace = self.rng.gen_bool(self.config.dont_replace_ratio);
            self.world.spawn_converter(Converter {
                value: blob.clone(),
                dont_replace,
            });
            producers.push(blob);
        }

        self.group.update(&mut self.world)?;

        for blob in producers {
            blob.dispose();
        }
        Ok(())
    }

    fn teardown(&mut self) {
        self.world = world::World::new(world::Id::new(0));
        self.group = Group::new();
    }
}
