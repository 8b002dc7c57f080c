//! # Downstream Payloads
//!
//! Messages exchanged with the calculation engine.
//!
//! | Direction | Payload | Correlation |
//! |-----------|---------|-------------|
//! | hub → engine | [`DownstreamRequest`] | `process_id` |
//! | engine → hub | [`InboxEvent`] | `process_id` |
//!
//! Delivery is at-least-once and unordered in both directions.

use crate::codes::{
    BusinessReason, MeasurementUnit, MeteringPointType, ProcessType, Resolution,
    SettlementMethod, SettlementVersion,
};
use crate::identity::{ActorNumber, GridAreaCode};
use crate::ids::ProcessId;
use crate::roles::ActorRole;
use crate::time::Period;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request the hub forwards downstream for one process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownstreamRequest {
    pub process_id: ProcessId,
    pub process_type: ProcessType,
    pub business_reason: BusinessReason,
    pub period: Period,
    /// Empty means all grid areas the requester is entitled to.
    pub grid_areas: Vec<GridAreaCode>,
    pub metering_point_type: Option<MeteringPointType>,
    pub settlement_method: Option<SettlementMethod>,
    pub settlement_version: Option<SettlementVersion>,
    pub energy_supplier_id: Option<ActorNumber>,
    pub balance_responsible_id: Option<ActorNumber>,
    /// The actor the data is requested for (the delegator when delegated).
    pub requested_for_actor: ActorNumber,
    pub requested_for_role: ActorRole,
}

/// One position in a time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyPoint {
    pub position: u32,
    pub quantity: Option<f64>,
    pub quality: Option<String>,
}

/// A calculated series for one grid area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcceptedSeries {
    pub grid_area: GridAreaCode,
    pub metering_point_type: Option<MeteringPointType>,
    pub settlement_method: Option<SettlementMethod>,
    pub resolution: Resolution,
    pub unit: MeasurementUnit,
    pub period: Period,
    pub calculation_version: u64,
    pub points: Vec<EnergyPoint>,
}

/// Reject reason supplied by the calculation engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedReason {
    pub error_code: String,
    pub error_message: String,
}

/// Asynchronous response correlated to a process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum InboxEvent {
    /// Complete accepted response.
    Accepted {
        process_id: ProcessId,
        series: Vec<AcceptedSeries>,
    },
    /// Rejection; the process resolves immediately.
    Rejected {
        process_id: ProcessId,
        reasons: Vec<RejectedReason>,
    },
    /// One part of a multi-part response, buffered until its receipt.
    PartialResponse {
        process_id: ProcessId,
        part_id: Uuid,
        series: Vec<AcceptedSeries>,
    },
    /// Completes a multi-part response by naming the parts it covers.
    Receipt {
        process_id: ProcessId,
        part_ids: Vec<Uuid>,
    },
}

impl InboxEvent {
    #[must_use]
    pub fn process_id(&self) -> ProcessId {
        match self {
            Self::Accepted { process_id, .. }
            | Self::Rejected { process_id, .. }
            | Self::PartialResponse { process_id, .. }
            | Self::Receipt { process_id, .. } => *process_id,
        }
    }

    /// Short label for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Accepted { .. } => "accepted",
            Self::Rejected { .. } => "rejected",
            Self::PartialResponse { .. } => "partial_response",
            Self::Receipt { .. } => "receipt",
        }
    }
}
