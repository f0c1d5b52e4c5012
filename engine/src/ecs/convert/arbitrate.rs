//! Winner election among competing singleton converters.
//!
//! The [`Arbitrator`] is a pure decision function: given whether the singleton already
//! exists and the candidates collected this pass, it elects at most one winner and prepares
//! its value. It never touches storage; the [`Controller`](crate::ecs::convert::Controller)
//! applies the outcome.
//!
//! # Policy
//!
//! | Slot | Candidates | Result |
//! |------|------------|--------|
//! | any | 0 | [`ArbitrationError::NoCandidates`] |
//! | missing | 1 | the candidate wins |
//! | exists | 1 | the candidate wins unless `dont_replace` |
//! | missing | n > 1 | the first candidate is the seed; every later candidate without `dont_replace` overrides it |
//! | exists | n > 1 | the current value is the seed; every candidate without `dont_replace` overrides it |
//!
//! Multiple candidates are resolved in acquisition order, so the last eligible candidate
//! wins. That situation is supported but logged as a warning.
//!
//! When the slot is missing, the first candidate seeds the election regardless of its own
//! `dont_replace` flag. With no eligible candidate after it, it wins even if it asked not to
//! replace. This is the long-standing behavior and is kept as is.
//!
//! # Change Detection
//!
//! `changed` is `true` whenever a winner is applied. Values are never compared: a winner
//! identical to the current value still reports a change.

use std::marker::PhantomData;

use log::{trace, warn};

use crate::ecs::{
    convert::{ArbitrationError, Candidate},
    singleton::{Identity, Prepare, Singleton, short_type_name},
};

/// The result of one arbitration pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<T> {
    winner: Option<Candidate<T>>,
    changed: bool,
    contenders: usize,
}

impl<T> Outcome<T> {
    /// The winning candidate, carrying its prepared value.
    #[inline]
    pub fn winner(&self) -> Option<&Candidate<T>> {
        self.winner.as_ref()
    }

    #[inline]
    pub fn into_winner(self) -> Option<Candidate<T>> {
        self.winner
    }

    /// Whether the slot value is replaced by this outcome.
    #[inline]
    pub fn changed(&self) -> bool {
        self.changed
    }

    /// Number of candidates that took part.
    #[inline]
    pub fn contenders(&self) -> usize {
        self.contenders
    }
}

/// Elects the winning converter for singleton type `T`.
pub struct Arbitrator<T, P = Identity> {
    prepare: P,
    type_name: String,
    _marker: PhantomData<fn(T) -> T>,
}

impl<T: Singleton> Arbitrator<T, Identity> {
    pub fn new() -> Self {
        Self::with_prepare(Identity)
    }
}

impl<T: Singleton> Default for Arbitrator<T, Identity> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Singleton, P: Prepare<T>> Arbitrator<T, P> {
    pub fn with_prepare(prepare: P) -> Self {
        Self {
            prepare,
            type_name: short_type_name::<T>(),
            _marker: PhantomData,
        }
    }

    /// Short name of `T`, as used in diagnostics.
    #[inline]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Elect a winner among `candidates`, which must be in acquisition order.
    ///
    /// `current` is the slot value when `slot_exists`; it seeds the election so that a pass
    /// without eligible candidates keeps it.
    pub fn resolve(
        &self,
        slot_exists: bool,
        current: Option<&T>,
        candidates: Vec<Candidate<T>>,
    ) -> Result<Outcome<T>, ArbitrationError> {
        let contenders = candidates.len();

        let elected = match contenders {
            0 => {
                return Err(ArbitrationError::NoCandidates {
                    type_name: self.type_name.clone(),
                });
            }
            1 => candidates.into_iter().next(),
            _ => {
                warn!(
                    "There are {} singleton conversion candidates for {}! Resolving in the order acquired!",
                    contenders, self.type_name
                );

                if slot_exists {
                    trace!("{}: seeding election with current value {:?}", self.type_name, current);
                    candidates.into_iter().filter(|c| !c.dont_replace()).last()
                } else {
                    let mut ordered = candidates.into_iter();
                    let seed = ordered.next();
                    ordered.filter(|c| !c.dont_replace()).last().or(seed)
                }
            }
        };

        let winner = match elected {
            Some(candidate) if slot_exists && candidate.dont_replace() => None,
            Some(candidate) => Some(candidate.map_value(|value| self.prepare.prepare(value))),
            None => None,
        };

        Ok(Outcome {
            changed: winner.is_some(),
            winner,
            contenders,
        })
    }
}
