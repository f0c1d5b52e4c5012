//! Strategies applied to a winning candidate value before it is written into the slot.

use crate::ecs::singleton::BlobRef;

/// Transforms the winning value of an arbitration pass.
///
/// Any `Fn(T) -> T` is a `Prepare<T>`, so a closure can be injected directly:
///
/// ```rust,ignore
/// let controller = Controller::with_prepare(|mut config: TimeConfig| {
///     config.fixed_delta_time = 1.0 / config.target_frame_rate as f32;
///     config
/// });
/// ```
pub trait Prepare<T> {
    fn prepare(&self, value: T) -> T;
}

/// Writes the winning value as-is. The default for plain data singletons.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Identity;

impl<T> Prepare<T> for Identity {
    #[inline]
    fn prepare(&self, value: T) -> T {
        value
    }
}

/// Copies blob contents into storage owned by the slot, so the converter's blob can be
/// disposed without invalidating the singleton.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DeepCopy;

impl<T: Clone> Prepare<BlobRef<T>> for DeepCopy {
    fn prepare(&self, value: BlobRef<T>) -> BlobRef<T> {
        value.deep_copy()
    }
}

impl<T, F> Prepare<T> for F
where
    F: Fn(T) -> T,
{
    #[inline]
    fn prepare(&self, value: T) -> T {
        self(value)
    }
}
