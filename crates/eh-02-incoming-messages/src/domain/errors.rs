//! # Domain Errors
//!
//! [`RejectReason`] values end up in the rejection response. Everything in
//! [`IncomingMessageError`] fails the whole `receive` call.

use shared_types::{DocumentFormat, IncomingDocumentType, MessageId, TransactionId};
use thiserror::Error;

/// Failure class of a rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectionCategory {
    /// Malformed input or disallowed code combination.
    Structural,
    /// Sender, role or delegation check failed.
    Authorization,
    /// Message or transaction id already registered.
    IdempotencyConflict,
}

/// Why a message was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("Document could not be read: {detail}")]
    InvalidStructure { detail: String },

    #[error("Document type {document_type} is not supported in format {format}")]
    UnsupportedDocumentFormat {
        format: DocumentFormat,
        document_type: IncomingDocumentType,
    },

    #[error("Authenticated actor does not match the sender: {detail}")]
    SenderMismatch { detail: String },

    #[error("Role {role} is not permitted to send {document_type}")]
    RoleNotPermitted {
        role: String,
        document_type: IncomingDocumentType,
    },

    #[error("Authenticated actor does not hold the required delegation: {detail}")]
    DelegationDenied { detail: String },

    #[error("Business reason {business_reason} is not allowed for {document_type} in format {format}")]
    BusinessReasonNotAllowed {
        business_reason: String,
        document_type: IncomingDocumentType,
        format: DocumentFormat,
    },

    #[error("Settlement version is only allowed for corrections")]
    SettlementVersionNotAllowed,

    #[error("Energy supplier {energy_supplier} does not match the requesting actor")]
    EnergySupplierMismatch { energy_supplier: String },

    #[error("Message contains no transactions")]
    EmptyMessage,

    #[error("Message id '{value}' is invalid")]
    InvalidMessageId { value: String },

    #[error("Transaction id '{value}' is invalid")]
    InvalidTransactionId { value: String },

    #[error("Transaction id {transaction_id} appears more than once in the message")]
    DuplicateTransactionIdInMessage { transaction_id: String },

    #[error("Duplicate message id detected: {message_id}")]
    DuplicateMessageId { message_id: MessageId },

    #[error("Duplicate transaction id detected: {transaction_id}")]
    DuplicateTransactionId { transaction_id: TransactionId },
}

impl RejectReason {
    #[must_use]
    pub fn category(&self) -> RejectionCategory {
        match self {
            Self::SenderMismatch { .. }
            | Self::RoleNotPermitted { .. }
            | Self::DelegationDenied { .. }
            | Self::EnergySupplierMismatch { .. } => RejectionCategory::Authorization,
            Self::DuplicateMessageId { .. } | Self::DuplicateTransactionId { .. } => {
                RejectionCategory::IdempotencyConflict
            }
            _ => RejectionCategory::Structural,
        }
    }
}

/// Parser failure; always becomes `RejectReason::InvalidStructure`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{detail}")]
pub struct ParseError {
    pub detail: String,
}

impl ParseError {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

/// Idempotency registry failure (storage unavailable, not a duplicate).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Idempotency registry error: {0}")]
pub struct RegistryError(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Archive error: {0}")]
pub struct ArchiveError(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Process initiation failed: {0}")]
pub struct InitiationError(pub String);

/// Hard failures of the intake pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IncomingMessageError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error("Delegation lookup failed: {0}")]
    Delegation(String),

    /// The message is registered but its process could not be started.
    /// Resubmitting hits the duplicate guard.
    #[error("Message {message_id} accepted but process initiation failed for transaction {transaction_id}: {source}")]
    ProcessInitiation {
        message_id: MessageId,
        transaction_id: TransactionId,
        source: InitiationError,
    },
}
