//! Outgoing messages scheduled for actor mailboxes.

use crate::codes::BusinessReason;
use crate::downstream::{AcceptedSeries, RejectedReason};
use crate::identity::ActorNumber;
use crate::ids::{ProcessId, TransactionId};
use crate::roles::ActorRole;
use serde::{Deserialize, Serialize};

/// Which way the process resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutcomeKind {
    Accepted,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OutgoingPayload {
    /// One series per accepted message.
    Accepted(AcceptedSeries),
    /// Union of all reject reasons.
    Rejected(Vec<RejectedReason>),
}

/// Message handed to the document writer for one actor mailbox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    pub process_id: ProcessId,
    /// The transaction id from the original request.
    pub business_transaction_id: TransactionId,
    pub business_reason: BusinessReason,
    pub receiver: ActorNumber,
    /// Role on the document.
    pub document_receiver_role: ActorRole,
    /// Role whose mailbox receives the document.
    pub queue_role: ActorRole,
    pub payload: OutgoingPayload,
}

impl OutgoingMessage {
    #[must_use]
    pub fn outcome(&self) -> OutcomeKind {
        match self.payload {
            OutgoingPayload::Accepted(_) => OutcomeKind::Accepted,
            OutgoingPayload::Rejected(_) => OutcomeKind::Rejected,
        }
    }
}
