//! # Domain Invariants
//!
//! Rules a grant must satisfy before it is stored.

use super::entities::DelegationGrant;
use super::errors::DelegationError;

/// Invariant: `start <= end`. Equality marks a cancellation.
pub fn invariant_valid_window(grant: &DelegationGrant) -> Result<(), DelegationError> {
    if grant.start > grant.end {
        return Err(DelegationError::InvalidWindow {
            start: grant.start.to_rfc3339(),
            end: grant.end.to_rfc3339(),
        });
    }
    Ok(())
}

/// Invariant: an actor never delegates to itself.
pub fn invariant_distinct_parties(grant: &DelegationGrant) -> Result<(), DelegationError> {
    if grant.delegator == grant.delegate {
        return Err(DelegationError::SelfDelegation {
            actor: grant.delegator.clone(),
        });
    }
    Ok(())
}

/// Runs every grant invariant.
pub fn validate_grant(grant: &DelegationGrant) -> Result<(), DelegationError> {
    invariant_valid_window(grant)?;
    invariant_distinct_parties(grant)
}
