//! Message builders for tests.

use super::entities::{IncomingMessage, IncomingTransaction};
use chrono::{TimeZone, Utc};
use shared_types::{
    ActorNumber, ActorRole, AuthenticatedActor, BusinessReason, DocumentFormat, GridAreaCode,
    IncomingDocumentType, MeteringPointType, Period, Restriction,
};

pub fn caller(number: &str, role: ActorRole) -> AuthenticatedActor {
    AuthenticatedActor::new(ActorNumber::create(number).unwrap(), role, Restriction::Owned)
}

pub fn transaction(id: &str, grid_area: Option<&str>) -> IncomingTransaction {
    IncomingTransaction {
        transaction_id: id.to_string(),
        period: Period::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(),
        )
        .unwrap(),
        grid_area: grid_area.map(|g| GridAreaCode::create(g).unwrap()),
        metering_point_type: Some(MeteringPointType::CONSUMPTION),
        settlement_method: None,
        settlement_version: None,
        energy_supplier_id: None,
        balance_responsible_id: None,
        original_actor: None,
    }
}

pub fn message(sender: &str, role: ActorRole) -> IncomingMessage {
    IncomingMessage {
        message_id: "msg-1".to_string(),
        document_type: IncomingDocumentType::REQUEST_AGGREGATED_MEASURE_DATA,
        format: DocumentFormat::JSON,
        business_reason: BusinessReason::BALANCE_FIXING,
        sender_number: ActorNumber::create(sender).unwrap(),
        sender_role: role,
        receiver_number: ActorNumber::create("5790001330552").unwrap(),
        receiver_role: ActorRole::METERED_DATA_ADMINISTRATOR,
        created_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        transactions: vec![transaction("tx-1", Some("512"))],
    }
}
