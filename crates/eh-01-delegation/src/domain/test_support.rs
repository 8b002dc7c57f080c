//! Grant builders for tests. Times are hours after a fixed base instant.

use super::entities::{DelegationGrant, DelegationQuery};
use chrono::{Duration, TimeZone, Utc};
use shared_types::{ActorNumber, ActorRole, GridAreaCode, ProcessType, Timestamp};

pub fn at(hours: i64) -> Timestamp {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::hours(hours)
}

pub fn grant(
    delegator: &str,
    delegate: &str,
    grid_area: &str,
    start: i64,
    end: i64,
    sequence_number: u64,
) -> DelegationGrant {
    DelegationGrant {
        delegator: ActorNumber::create(delegator).unwrap(),
        delegator_role: ActorRole::GRID_OPERATOR,
        delegate: ActorNumber::create(delegate).unwrap(),
        process_type: ProcessType::REQUEST_ENERGY_RESULTS,
        grid_area: GridAreaCode::create(grid_area).unwrap(),
        start: at(start),
        end: at(end),
        sequence_number,
    }
}

pub fn query(
    delegate: &str,
    claimed: Option<&str>,
    grid_area: Option<&str>,
    as_of: i64,
) -> DelegationQuery {
    DelegationQuery {
        requesting_actor: ActorNumber::create(delegate).unwrap(),
        claimed_original_actor: claimed.map(|c| ActorNumber::create(c).unwrap()),
        role: ActorRole::GRID_OPERATOR,
        grid_area: grid_area.map(|g| GridAreaCode::create(g).unwrap()),
        process_type: ProcessType::REQUEST_ENERGY_RESULTS,
        as_of: at(as_of),
    }
}
