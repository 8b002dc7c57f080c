//! # Structural Validation
//!
//! Rules that need nothing but the message itself.
//!
//! ## Business reason allow-list
//!
//! | Document Type | CIM (Xml/Json) | ebIX |
//! |---------------|----------------|------|
//! | `RequestAggregatedMeasureData` | D04, D05, D32 | D03, D04, D05, D32 |
//! | `RequestWholesaleSettlement` | D05, D32 | D05, D32 |
//! | `NotifyValidatedMeasureData` | E23 | E23 |

use super::entities::{IncomingMessage, ValidatedMessage};
use super::errors::RejectReason;
use shared_types::{BusinessReason, DocumentFormat, IncomingDocumentType, MessageId, TransactionId};
use std::collections::HashSet;

/// Business reasons allowed for `document_type` in `format`.
#[must_use]
pub fn allowed_business_reasons(
    document_type: &IncomingDocumentType,
    format: &DocumentFormat,
) -> Vec<BusinessReason> {
    if *document_type == IncomingDocumentType::REQUEST_AGGREGATED_MEASURE_DATA {
        let mut allowed = vec![
            BusinessReason::BALANCE_FIXING,
            BusinessReason::WHOLESALE_FIXING,
            BusinessReason::CORRECTION,
        ];
        // Legacy actors still request preliminary aggregations.
        if format.is_legacy() {
            allowed.push(BusinessReason::PRELIMINARY_AGGREGATION);
        }
        allowed
    } else if *document_type == IncomingDocumentType::REQUEST_WHOLESALE_SETTLEMENT {
        vec![BusinessReason::WHOLESALE_FIXING, BusinessReason::CORRECTION]
    } else if *document_type == IncomingDocumentType::NOTIFY_VALIDATED_MEASURE_DATA {
        vec![BusinessReason::PERIODIC_METERING]
    } else {
        Vec::new()
    }
}

/// Runs every structural rule, stopping at the first failure.
pub fn validate_structure(message: &IncomingMessage) -> Result<ValidatedMessage, RejectReason> {
    if message.transactions.is_empty() {
        return Err(RejectReason::EmptyMessage);
    }

    let message_id = MessageId::from_string(message.message_id.clone()).map_err(|_| {
        RejectReason::InvalidMessageId {
            value: message.message_id.clone(),
        }
    })?;

    if !allowed_business_reasons(&message.document_type, &message.format)
        .contains(&message.business_reason)
    {
        return Err(RejectReason::BusinessReasonNotAllowed {
            business_reason: message.business_reason.to_string(),
            document_type: message.document_type.clone(),
            format: message.format.clone(),
        });
    }

    let mut seen = HashSet::with_capacity(message.transactions.len());
    let mut transaction_ids = Vec::with_capacity(message.transactions.len());
    for transaction in &message.transactions {
        let id = TransactionId::from_string(transaction.transaction_id.clone()).map_err(|_| {
            RejectReason::InvalidTransactionId {
                value: transaction.transaction_id.clone(),
            }
        })?;
        if !seen.insert(id.clone()) {
            return Err(RejectReason::DuplicateTransactionIdInMessage {
                transaction_id: transaction.transaction_id.clone(),
            });
        }
        if transaction.settlement_version.is_some()
            && message.business_reason != BusinessReason::CORRECTION
        {
            return Err(RejectReason::SettlementVersionNotAllowed);
        }
        transaction_ids.push(id);
    }

    Ok(ValidatedMessage {
        message_id,
        transaction_ids,
    })
}
