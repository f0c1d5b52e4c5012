//! Singleton types used across benchmarks.
//!
//! Sized like typical engine settings singletons: a few scalars, or a blob of strings for the
//! reference-bearing case.

use hydrogen_engine::ecs::{Singleton, singleton::BlobRef};

/// Frame timing settings.
#[derive(Singleton, Clone, Copy, Debug, PartialEq)]
pub struct TimeConfig {
    pub target_frame_rate: u32,
    pub fixed_delta_time: f32,
}

impl TimeConfig {
    pub fn new(target_frame_rate: u32) -> Self {
        Self {
            target_frame_rate,
            fixed_delta_time: 1.0 / target_frame_rate.max(1) as f32,
        }
    }
}

/// World gravity.
#[derive(Singleton, Clone, Copy, Debug, PartialEq)]
pub struct Gravity {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Localization tables, shipped as a blob.
#[derive(Clone, Debug, PartialEq)]
pub struct Locales {
    pub default: String,
    pub available: Vec<String>,
}

impl Locales {
    pub fn blob(default: &str, available: &[&str]) -> BlobRef<Locales> {
        BlobRef::create(Locales {
            default: default.to_string(),
            available: available.iter().map(|locale| locale.to_string()).collect(),
        })
    }
}
