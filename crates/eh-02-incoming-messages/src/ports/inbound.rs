//! # Inbound Ports
//!
//! API trait defining what the Incoming Messages subsystem can do.

use crate::domain::{IncomingMessageError, ReceiveResponse};
use async_trait::async_trait;
use shared_types::{AuthenticatedActor, DocumentFormat, IncomingDocumentType};

/// Incoming message intake - inbound port.
#[async_trait]
pub trait IncomingMessageApi: Send + Sync {
    /// Parses, authorizes, validates and registers one raw document, then
    /// starts one process per transaction.
    ///
    /// Every validation failure is returned as `Ok(ReceiveResponse::Rejected)`.
    /// `Err` is reserved for storage and dispatch failures.
    async fn receive(
        &self,
        raw: &[u8],
        format: DocumentFormat,
        document_type: IncomingDocumentType,
        response_format: DocumentFormat,
        caller: &AuthenticatedActor,
    ) -> Result<ReceiveResponse, IncomingMessageError>;
}
