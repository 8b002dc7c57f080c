//! # Effective Actor Resolution
//!
//! Pure resolution over a set of grants.
//!
//! 1. Keep grants for the requesting delegate, the process type, the role
//!    the original actor must hold, and the requested grid area (or, without
//!    one, the claimed original actor's grid areas). Only grants that have
//!    started at `as_of` compete.
//! 2. Group by (delegator, grid area); the highest sequence number wins.
//! 3. A winning cancellation marker, or a winner whose window has ended,
//!    leaves that group not delegated.
//! 4. With a claimed original actor, it must be among the effective
//!    delegators. Without one, exactly one delegator must remain.

use super::entities::{DelegationGrant, DelegationQuery, GrantKey, OriginalActor};
use super::errors::DelegationDenied;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Resolves the principal a delegate acts for.
pub fn resolve_effective_actor(
    grants: &[DelegationGrant],
    query: &DelegationQuery,
) -> Result<OriginalActor, DelegationDenied> {
    let mut winners: HashMap<GrantKey, &DelegationGrant> = HashMap::new();

    for grant in grants.iter().filter(|g| is_candidate(g, query)) {
        winners
            .entry(grant.key())
            .and_modify(|current| {
                if grant.sequence_number > current.sequence_number {
                    *current = grant;
                }
            })
            .or_insert(grant);
    }

    // delegator -> grid areas it effectively delegates
    let mut effective: BTreeMap<_, BTreeSet<_>> = BTreeMap::new();
    for winner in winners.values().filter(|w| w.grants_at(query.as_of)) {
        effective
            .entry(winner.delegator.clone())
            .or_default()
            .insert(winner.grid_area.clone());
    }

    let chosen = match &query.claimed_original_actor {
        Some(claimed) => effective.remove_entry(claimed),
        None if effective.len() > 1 => {
            return Err(DelegationDenied::Ambiguous {
                delegate: query.requesting_actor.clone(),
                delegators: effective.into_keys().collect(),
            });
        }
        None => effective.pop_first(),
    };

    chosen
        .map(|(actor_number, grid_areas)| OriginalActor {
            actor_number,
            role: query.role.clone(),
            grid_areas: grid_areas.into_iter().collect(),
        })
        .ok_or_else(|| DelegationDenied::NotDelegated {
            delegate: query.requesting_actor.clone(),
            delegator: query.claimed_original_actor.clone(),
        })
}

fn is_candidate(grant: &DelegationGrant, query: &DelegationQuery) -> bool {
    if grant.delegate != query.requesting_actor
        || grant.process_type != query.process_type
        || grant.delegator_role != query.role
        || !grant.has_started(query.as_of)
    {
        return false;
    }
    match (&query.grid_area, &query.claimed_original_actor) {
        (Some(area), _) => &grant.grid_area == area,
        (None, Some(claimed)) => &grant.delegator == claimed,
        (None, None) => true,
    }
}
