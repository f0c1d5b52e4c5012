use thiserror::Error;

use crate::ecs::entity::Entity;

/// Contract violations of the arbitration step.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArbitrationError {
    /// The arbitrator was invoked without any candidate.
    #[error("no singleton conversion candidates for {type_name}")]
    NoCandidates { type_name: String },
}

/// Failures reported by a [`Store`](crate::ecs::convert::Store) adapter.
///
/// These propagate out of a tick unchanged; no partially applied tick is rolled back. The
/// controller logs each one at `error` together with the singleton type name and the number
/// of pending converters, which an adapter error such as [`StoreError::Unavailable`] does not
/// carry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("singleton {type_name} already exists")]
    SlotExists { type_name: String },

    #[error("singleton {type_name} does not exist")]
    MissingSlot { type_name: String },

    #[error("no converter record {entity:?} for {type_name}")]
    UnknownRecord { entity: Entity, type_name: String },

    #[error("store unavailable: {0}")]
    Unavailable(String),
}
