//! # Domain Entities
//!
//! The format-neutral record every parser produces, and the command handed
//! to the process initiator once a message is accepted.

use serde::{Deserialize, Serialize};
use shared_types::{
    ActorNumber, ActorRole, BusinessReason, DocumentFormat, GridAreaCode, IncomingDocumentType,
    MessageId, MeteringPointType, Period, ProcessType, SettlementMethod, SettlementVersion,
    Timestamp, TransactionId,
};

/// A parsed incoming document.
///
/// Identifiers stay raw strings here; structural validation turns them into
/// [`MessageId`] and [`TransactionId`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IncomingMessage {
    pub message_id: String,
    pub document_type: IncomingDocumentType,
    pub format: DocumentFormat,
    pub business_reason: BusinessReason,
    pub sender_number: ActorNumber,
    pub sender_role: ActorRole,
    pub receiver_number: ActorNumber,
    pub receiver_role: ActorRole,
    pub created_at: Timestamp,
    pub transactions: Vec<IncomingTransaction>,
}

/// One transaction (series) inside a message.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IncomingTransaction {
    pub transaction_id: String,
    pub period: Period,
    pub grid_area: Option<GridAreaCode>,
    pub metering_point_type: Option<MeteringPointType>,
    pub settlement_method: Option<SettlementMethod>,
    pub settlement_version: Option<SettlementVersion>,
    pub energy_supplier_id: Option<ActorNumber>,
    pub balance_responsible_id: Option<ActorNumber>,
    /// Actor the sender claims to act for, when delegated.
    pub original_actor: Option<ActorNumber>,
}

/// A message that passed structural validation.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidatedMessage {
    pub message_id: MessageId,
    /// Same order as the incoming transactions.
    pub transaction_ids: Vec<TransactionId>,
}

/// Who a transaction is effectively for after authorization.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveActor {
    pub actor_number: ActorNumber,
    pub role: ActorRole,
    /// Grid areas the request covers. Empty means unrestricted.
    pub grid_areas: Vec<GridAreaCode>,
    pub delegated: bool,
}

/// Command to start a business process for one accepted transaction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InitiateProcessRequest {
    pub message_id: MessageId,
    pub business_transaction_id: TransactionId,
    pub document_type: IncomingDocumentType,
    pub process_type: ProcessType,
    pub business_reason: BusinessReason,
    /// The authenticated sender.
    pub requested_by: ActorNumber,
    /// The actor the request is for (the delegator when delegated).
    pub original_actor: ActorNumber,
    pub original_actor_role: ActorRole,
    pub period: Period,
    pub grid_areas: Vec<GridAreaCode>,
    pub metering_point_type: Option<MeteringPointType>,
    pub settlement_method: Option<SettlementMethod>,
    pub settlement_version: Option<SettlementVersion>,
    pub energy_supplier_id: Option<ActorNumber>,
    pub balance_responsible_id: Option<ActorNumber>,
}

impl InitiateProcessRequest {
    #[must_use]
    pub fn build(
        message: &IncomingMessage,
        message_id: &MessageId,
        transaction: &IncomingTransaction,
        transaction_id: TransactionId,
        effective: &EffectiveActor,
    ) -> Self {
        Self {
            message_id: message_id.clone(),
            business_transaction_id: transaction_id,
            document_type: message.document_type.clone(),
            process_type: message.document_type.process_type(),
            business_reason: message.business_reason.clone(),
            requested_by: message.sender_number.clone(),
            original_actor: effective.actor_number.clone(),
            original_actor_role: effective.role.clone(),
            period: transaction.period,
            grid_areas: effective.grid_areas.clone(),
            metering_point_type: transaction.metering_point_type.clone(),
            settlement_method: transaction.settlement_method.clone(),
            settlement_version: transaction.settlement_version.clone(),
            energy_supplier_id: transaction.energy_supplier_id.clone(),
            balance_responsible_id: transaction.balance_responsible_id.clone(),
        }
    }
}

/// Archive key: `actorNumber/yyyy/mm/dd/documentId`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ArchiveReference(String);

impl ArchiveReference {
    #[must_use]
    pub fn new(actor: &ActorNumber, received_at: Timestamp, document_id: &MessageId) -> Self {
        Self(format!(
            "{}/{}/{}",
            actor,
            received_at.format("%Y/%m/%d"),
            document_id
        ))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ArchiveReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
