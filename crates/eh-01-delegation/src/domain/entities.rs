//! # Domain Entities
//!
//! Delegation grants and the query/result types of resolution.

use serde::{Deserialize, Serialize};
use shared_types::{ActorNumber, ActorRole, GridAreaCode, ProcessType, Timestamp};

/// Grant letting `delegate` act for `delegator` in one grid area.
///
/// A grant with `start == end` is a cancellation marker: it outranks
/// lower-sequence grants from `start` onwards without granting anything.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegationGrant {
    pub delegator: ActorNumber,
    pub delegator_role: ActorRole,
    pub delegate: ActorNumber,
    pub process_type: ProcessType,
    pub grid_area: GridAreaCode,
    /// Inclusive.
    pub start: Timestamp,
    /// Exclusive.
    pub end: Timestamp,
    pub sequence_number: u64,
}

impl DelegationGrant {
    #[must_use]
    pub fn is_cancellation(&self) -> bool {
        self.start == self.end
    }

    /// Whether the grant has taken effect at `as_of`, cancellation or not.
    #[must_use]
    pub fn has_started(&self, as_of: Timestamp) -> bool {
        self.start <= as_of
    }

    /// Whether this grant, taken alone, authorises the delegate at `as_of`.
    #[must_use]
    pub fn grants_at(&self, as_of: Timestamp) -> bool {
        !self.is_cancellation() && self.start <= as_of && as_of < self.end
    }

    /// Grants with the same key compete on sequence number.
    #[must_use]
    pub fn key(&self) -> GrantKey {
        GrantKey {
            delegator: self.delegator.clone(),
            delegate: self.delegate.clone(),
            grid_area: self.grid_area.clone(),
            process_type: self.process_type.clone(),
        }
    }
}

/// Identity of a competing grant group.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GrantKey {
    pub delegator: ActorNumber,
    pub delegate: ActorNumber,
    pub grid_area: GridAreaCode,
    pub process_type: ProcessType,
}

/// Input to [`crate::domain::resolve_effective_actor`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DelegationQuery {
    /// The authenticated caller.
    pub requesting_actor: ActorNumber,
    /// The actor the message claims to act for, if declared.
    pub claimed_original_actor: Option<ActorNumber>,
    /// Role the original actor must hold.
    pub role: ActorRole,
    /// Grid area the request is restricted to, if any.
    pub grid_area: Option<GridAreaCode>,
    pub process_type: ProcessType,
    pub as_of: Timestamp,
}

/// The principal on whose behalf the request is made.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginalActor {
    pub actor_number: ActorNumber,
    pub role: ActorRole,
    /// Grid areas delegated by this actor at the query instant, sorted.
    pub grid_areas: Vec<GridAreaCode>,
}
