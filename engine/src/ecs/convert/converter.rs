//! Converter records and the candidates collected from them.

use crate::ecs::{entity::Entity, singleton::Singleton};

/// A proposed value for a singleton, as delivered by an authoring or loading step.
///
/// A converter is consumed by exactly one conversion pass. `dont_replace` only matters when
/// the singleton already exists: the converter is still processed, but it will not replace
/// the current value.
#[derive(Debug, Clone, PartialEq)]
pub struct Converter<T> {
    /// The value that becomes the singleton if this converter wins.
    pub value: T,
    /// If the singleton is already loaded, don't replace it with this value.
    pub dont_replace: bool,
}

impl<T> Converter<T> {
    /// A converter that replaces any existing singleton.
    #[inline]
    pub fn new(value: T) -> Self {
        Self {
            value,
            dont_replace: false,
        }
    }

    /// A converter that only sets the singleton when none exists yet.
    #[inline]
    pub fn dont_replace(value: T) -> Self {
        Self {
            value,
            dont_replace: true,
        }
    }
}

impl<T> From<T> for Converter<T> {
    #[inline]
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

/// Anything a converter record can be spawned from: a bare singleton value (replacing) or a
/// [`Converter`] carrying its own flags.
pub trait IntoConverter {
    type Value: Singleton;

    fn into_converter(self) -> Converter<Self::Value>;
}

impl<T: Singleton> IntoConverter for T {
    type Value = T;

    #[inline]
    fn into_converter(self) -> Converter<T> {
        Converter::new(self)
    }
}

impl<T: Singleton> IntoConverter for Converter<T> {
    type Value = T;

    #[inline]
    fn into_converter(self) -> Converter<T> {
        self
    }
}

/// A converter paired with the record it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate<T> {
    source: Entity,
    converter: Converter<T>,
}

impl<T> Candidate<T> {
    #[inline]
    pub fn new(source: Entity, converter: Converter<T>) -> Self {
        Self { source, converter }
    }

    /// The record this candidate was collected from. Only used for tagging and diagnostics.
    #[inline]
    pub fn source(&self) -> Entity {
        self.source
    }

    #[inline]
    pub fn value(&self) -> &T {
        &self.converter.value
    }

    #[inline]
    pub fn dont_replace(&self) -> bool {
        self.converter.dont_replace
    }

    #[inline]
    pub fn into_value(self) -> T {
        self.converter.value
    }

    /// Replace the value, keeping source and flags.
    pub(crate) fn map_value(self, f: impl FnOnce(T) -> T) -> Self {
        let Converter {
            value,
            dont_replace,
        } = self.converter;
        Self {
            source: self.source,
            converter: Converter {
                value: f(value),
                dont_replace,
            },
        }
    }
}

/// Lifecycle tags on converter records.
///
/// `pending → Processed → {Changed | Unchanged} → deleted on the next tick`. Only the winning
/// record of a pass is tagged `Changed`; every record of a pass without a winner is tagged
/// `Unchanged`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// The record was read by a conversion pass.
    Processed,
    /// The record's value became the singleton.
    Changed,
    /// The pass this record took part in left the singleton untouched.
    Unchanged,
}

impl Tag {
    pub const ALL: [Tag; 3] = [Tag::Processed, Tag::Changed, Tag::Unchanged];

    #[inline]
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}
