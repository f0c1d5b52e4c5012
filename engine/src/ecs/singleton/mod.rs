//! Singleton payload types.
//!
//! A singleton is a value of which at most one authoritative instance exists per world. This
//! module provides the [`Singleton`] marker trait for payload types, the reference-bearing
//! [`BlobRef`] payload, and the [`Prepare`] strategies applied to a winning value before it is
//! written into the slot.
//!
//! # Payload Variants
//!
//! | Variant | Example | Prepare |
//! |---------|---------|---------|
//! | Plain data | `#[derive(Clone, Debug, Singleton)] struct TimeConfig { .. }` | [`Identity`] |
//! | Reference-bearing | `BlobRef<Locales>` | [`DeepCopy`] |
//!
//! # Example
//!
//! ```rust,ignore
//! use hydrogen_engine::ecs::Singleton;
//!
//! #[derive(Clone, Debug, PartialEq, Singleton)]
//! struct TimeConfig {
//!     target_frame_rate: u32,
//!     fixed_delta_time: f32,
//! }
//! ```

mod blob;
mod prepare;

use std::fmt;

pub use blob::BlobRef;
pub use prepare::{DeepCopy, Identity, Prepare};

/// A trait for types that can be converted into a world singleton.
///
/// Use `#[derive(Singleton)]` to implement it.
///
/// # Trait Bounds
///
/// - `'static`: No borrowed data
/// - `Send + Sync`: Candidates may be collected on worker threads
/// - `Clone`: The current slot value is read out for arbitration and hooks
/// - `Debug`: Values show up in conversion diagnostics
pub trait Singleton: 'static + Send + Sync + Clone + fmt::Debug {}

impl<T: 'static + Send + Sync + fmt::Debug> Singleton for BlobRef<T> {}

/// Short, human readable name for a singleton type: the last path segment of every path in
/// `std::any::type_name`, generics kept (`BlobRef<Locales>` rather than the full paths).
pub fn short_type_name<T: ?Sized>() -> String {
    let full = std::any::type_name::<T>();
    let mut name = String::with_capacity(full.len());
    let mut segment_start = 0;

    for (index, ch) in full.char_indices() {
        match ch {
            ':' => segment_start = index + 1,
            '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | ';' | '&' => {
                name.push_str(&full[segment_start..index]);
                name.push(ch);
                segment_start = index + 1;
            }
            _ => {}
        }
    }
    name.push_str(&full[segment_start..]);
    name
}
