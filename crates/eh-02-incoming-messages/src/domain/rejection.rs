//! # Rejection Codes
//!
//! The same semantic failure has one external code per format family. The
//! table is chosen by the declared incoming format: CIM for `Xml`/`Json`,
//! ebIX for `Ebix`. Existing consumers match on these strings, so they must
//! not change.
//!
//! | Reason | CIM | ebIX |
//! |--------|-----|------|
//! | InvalidStructure | 00001 | E10 |
//! | UnsupportedDocumentFormat | 00002 | E11 |
//! | SenderMismatch | 00003 | E16 |
//! | RoleNotPermitted | 00004 | E17 |
//! | DelegationDenied | 00005 | E18 |
//! | BusinessReasonNotAllowed | 00006 | D19 |
//! | SettlementVersionNotAllowed | 00012 | E86 |
//! | EnergySupplierMismatch | 00011 | E19 |
//! | EmptyMessage | 00010 | E15 |
//! | InvalidMessageId | 00007 | E12 |
//! | InvalidTransactionId | 00008 | E13 |
//! | DuplicateTransactionIdInMessage | 00009 | E14 |
//! | DuplicateMessageId | 00101 | E61 |
//! | DuplicateTransactionId | 00102 | E62 |

use super::errors::RejectReason;
use serde::Serialize;
use shared_types::{DocumentFormat, MessageId, ProcessId};

/// `(cim, ebix)` code pair for a reason.
fn code_pair(reason: &RejectReason) -> (&'static str, &'static str) {
    match reason {
        RejectReason::InvalidStructure { .. } => ("00001", "E10"),
        RejectReason::UnsupportedDocumentFormat { .. } => ("00002", "E11"),
        RejectReason::SenderMismatch { .. } => ("00003", "E16"),
        RejectReason::RoleNotPermitted { .. } => ("00004", "E17"),
        RejectReason::DelegationDenied { .. } => ("00005", "E18"),
        RejectReason::BusinessReasonNotAllowed { .. } => ("00006", "D19"),
        RejectReason::SettlementVersionNotAllowed => ("00012", "E86"),
        RejectReason::EnergySupplierMismatch { .. } => ("00011", "E19"),
        RejectReason::EmptyMessage => ("00010", "E15"),
        RejectReason::InvalidMessageId { .. } => ("00007", "E12"),
        RejectReason::InvalidTransactionId { .. } => ("00008", "E13"),
        RejectReason::DuplicateTransactionIdInMessage { .. } => ("00009", "E14"),
        RejectReason::DuplicateMessageId { .. } => ("00101", "E61"),
        RejectReason::DuplicateTransactionId { .. } => ("00102", "E62"),
    }
}

/// External code of `reason` for documents declared in `format`.
#[must_use]
pub fn rejection_code(reason: &RejectReason, format: &DocumentFormat) -> &'static str {
    let (cim, ebix) = code_pair(reason);
    if format.is_legacy() {
        ebix
    } else {
        cim
    }
}

/// A rejection rendered for the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub reason: RejectReason,
    pub code: &'static str,
    pub message: String,
    /// Format the response body is written in.
    pub response_format: DocumentFormat,
}

impl Rejection {
    #[must_use]
    pub fn new(
        reason: RejectReason,
        incoming_format: &DocumentFormat,
        response_format: DocumentFormat,
    ) -> Self {
        Self {
            code: rejection_code(&reason, incoming_format),
            message: reason.to_string(),
            reason,
            response_format,
        }
    }
}

/// Outcome of `receive`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceiveResponse {
    /// No response body.
    Accepted {
        message_id: MessageId,
        process_ids: Vec<ProcessId>,
    },
    Rejected(Rejection),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    #[serde(rename = "Error")]
    error: ErrorDetail<'a>,
}

#[derive(Serialize)]
struct ErrorDetail<'a> {
    code: &'a str,
    message: &'a str,
}

impl ReceiveResponse {
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }

    #[must_use]
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Rejected(rejection) => Some(rejection),
            Self::Accepted { .. } => None,
        }
    }

    /// JSON response body; `None` for an acceptance.
    ///
    /// # Errors
    /// Only if serialisation itself fails.
    pub fn to_json_body(&self) -> Result<Option<String>, serde_json::Error> {
        match self {
            Self::Accepted { .. } => Ok(None),
            Self::Rejected(rejection) => serde_json::to_string(&ErrorBody {
                error: ErrorDetail {
                    code: rejection.code,
                    message: &rejection.message,
                },
            })
            .map(Some),
        }
    }
}
