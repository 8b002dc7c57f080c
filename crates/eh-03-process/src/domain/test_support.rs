//! Builders for process tests.

use super::entities::{InitiateProcess, Process};
use chrono::{TimeZone, Utc};
use shared_types::{
    AcceptedSeries, ActorNumber, ActorRole, BusinessReason, EnergyPoint, GridAreaCode,
    InboxEvent, MeasurementUnit, MessageId, MeteringPointType, Period, ProcessId, ProcessType,
    RejectedReason, Resolution, TransactionId,
};
use uuid::Uuid;

pub fn period() -> Period {
    Period::new(
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(),
    )
    .unwrap()
}

pub fn initiate(grid_areas: &[&str]) -> InitiateProcess {
    InitiateProcess {
        message_id: MessageId::from_string("msg-1").unwrap(),
        business_transaction_id: TransactionId::from_string("tx-1").unwrap(),
        process_type: ProcessType::REQUEST_ENERGY_RESULTS,
        business_reason: BusinessReason::BALANCE_FIXING,
        requested_by: ActorNumber::create("5790001330583").unwrap(),
        original_actor: ActorNumber::create("5790001330583").unwrap(),
        original_actor_role: ActorRole::ENERGY_SUPPLIER,
        period: period(),
        grid_areas: grid_areas
            .iter()
            .map(|g| GridAreaCode::create(*g).unwrap())
            .collect(),
        metering_point_type: Some(MeteringPointType::CONSUMPTION),
        settlement_method: None,
        settlement_version: None,
        energy_supplier_id: None,
        balance_responsible_id: None,
    }
}

pub fn new_process(grid_areas: &[&str]) -> Process {
    Process::new(
        ProcessId::new(),
        initiate(grid_areas),
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
    )
}

pub fn series(grid_area: &str) -> AcceptedSeries {
    AcceptedSeries {
        grid_area: GridAreaCode::create(grid_area).unwrap(),
        metering_point_type: Some(MeteringPointType::CONSUMPTION),
        settlement_method: None,
        resolution: Resolution::QUARTER_HOURLY,
        unit: MeasurementUnit::KILOWATT_HOUR,
        period: period(),
        calculation_version: 1,
        points: vec![EnergyPoint {
            position: 1,
            quantity: Some(12.5),
            quality: Some("A04".to_string()),
        }],
    }
}

pub fn accepted(process_id: ProcessId, grid_areas: &[&str]) -> InboxEvent {
    InboxEvent::Accepted {
        process_id,
        series: grid_areas.iter().map(|g| series(g)).collect(),
    }
}

pub fn rejected(process_id: ProcessId, codes: &[&str]) -> InboxEvent {
    InboxEvent::Rejected {
        process_id,
        reasons: codes
            .iter()
            .map(|code| RejectedReason {
                error_code: (*code).to_string(),
                error_message: format!("reason {code}"),
            })
            .collect(),
    }
}

pub fn partial(process_id: ProcessId, part_id: Uuid, grid_area: &str) -> InboxEvent {
    InboxEvent::PartialResponse {
        process_id,
        part_id,
        series: vec![series(grid_area)],
    }
}

pub fn receipt(process_id: ProcessId, part_ids: &[Uuid]) -> InboxEvent {
    InboxEvent::Receipt {
        process_id,
        part_ids: part_ids.to_vec(),
    }
}
