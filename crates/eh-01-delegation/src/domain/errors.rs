//! # Domain Errors
//!
//! Denials are expected outcomes; the intake pipeline turns them into
//! rejections. Everything else in [`DelegationError`] is a hard failure.

use shared_types::{ActorNumber, GridAreaCode};
use thiserror::Error;

/// Why a delegated request was not authorised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DelegationDenied {
    /// No effective grant for the delegate.
    #[error("Actor {delegate} holds no delegation{}", for_delegator(.delegator))]
    NotDelegated {
        delegate: ActorNumber,
        delegator: Option<ActorNumber>,
    },

    /// No original actor declared and several delegators resolve.
    #[error("Actor {delegate} is delegated by {} actors; specify a grid area", .delegators.len())]
    Ambiguous {
        delegate: ActorNumber,
        delegators: Vec<ActorNumber>,
    },
}

fn for_delegator(delegator: &Option<ActorNumber>) -> String {
    delegator
        .as_ref()
        .map(|d| format!(" from {d}"))
        .unwrap_or_default()
}

/// Delegation subsystem errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DelegationError {
    #[error("Delegation denied: {0}")]
    Denied(#[from] DelegationDenied),

    /// Grant window ends before it starts.
    #[error("Invalid grant window: start {start} is after end {end}")]
    InvalidWindow { start: String, end: String },

    #[error("Actor {actor} cannot delegate to itself")]
    SelfDelegation { actor: ActorNumber },

    /// A grant with the same key and sequence number already exists.
    #[error("Duplicate sequence number {sequence_number} for {delegator} -> {delegate} in grid area {grid_area}")]
    DuplicateSequence {
        delegator: ActorNumber,
        delegate: ActorNumber,
        grid_area: GridAreaCode,
        sequence_number: u64,
    },

    #[error("Delegation repository error: {0}")]
    Repository(String),
}

impl DelegationError {
    /// The denial, when this error is one.
    #[must_use]
    pub fn as_denied(&self) -> Option<&DelegationDenied> {
        match self {
            Self::Denied(denied) => Some(denied),
            _ => None,
        }
    }
}
