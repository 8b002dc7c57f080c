//! # Outbound Ports
//!
//! Dependencies of the intake pipeline: parsers, the idempotency registry,
//! the archive, process initiation and time.

use crate::domain::{
    ArchiveError, ArchiveReference, InitiateProcessRequest, InitiationError, IncomingMessage,
    ParseError, RegistryError,
};
use async_trait::async_trait;
use shared_types::{
    ActorNumber, DocumentFormat, IncomingDocumentType, MessageId, ProcessId, Timestamp,
    TransactionId,
};

/// Turns raw bytes of one `(format, document type)` pair into a message.
pub trait DocumentParser: Send + Sync {
    fn format(&self) -> DocumentFormat;

    fn document_type(&self) -> IncomingDocumentType;

    /// # Errors
    /// `ParseError` when the bytes are not a well-formed document.
    fn parse(&self, raw: &[u8]) -> Result<IncomingMessage, ParseError>;
}

/// Result of an atomic registration attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// Message id and every transaction id were inserted.
    Registered,
    /// Nothing was inserted; the message id already exists for the sender.
    DuplicateMessageId,
    /// Nothing was inserted; this transaction id already exists for the sender.
    DuplicateTransactionId(TransactionId),
}

/// Uniqueness-enforcing store of `(sender, id)` pairs.
///
/// Implementations insert and branch on the uniqueness outcome; they must not
/// check for existence first and insert afterwards.
#[async_trait]
pub trait IdempotencyRegistry: Send + Sync {
    /// Registers the message id and all transaction ids as one unit.
    ///
    /// # Errors
    /// `RegistryError` when the store itself fails. A duplicate is never an
    /// error.
    async fn try_register(
        &self,
        sender: &ActorNumber,
        message_id: &MessageId,
        transaction_ids: &[TransactionId],
    ) -> Result<RegistrationOutcome, RegistryError>;

    /// Whether `(sender, transaction_id)` is registered.
    async fn contains_transaction(
        &self,
        sender: &ActorNumber,
        transaction_id: &TransactionId,
    ) -> Result<bool, RegistryError>;
}

/// Raw document archive.
#[async_trait]
pub trait ArchiveStore: Send + Sync {
    async fn store(
        &self,
        category: &IncomingDocumentType,
        reference: &ArchiveReference,
        raw: Vec<u8>,
    ) -> Result<(), ArchiveError>;
}

/// Starts the business process for one accepted transaction.
#[async_trait]
pub trait ProcessInitiator: Send + Sync {
    async fn initiate(&self, request: InitiateProcessRequest)
        -> Result<ProcessId, InitiationError>;
}

/// Time source for consistent timestamp handling.
///
/// Abstracted to allow testing with deterministic time.
pub trait TimeSource: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Default system time source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        chrono::Utc::now()
    }
}

/// Time source pinned to one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedTimeSource(pub Timestamp);

impl TimeSource for FixedTimeSource {
    fn now(&self) -> Timestamp {
        self.0
    }
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// Initiator that records every request and hands out fresh process ids.
#[derive(Default)]
pub struct RecordingProcessInitiator {
    requests: parking_lot::Mutex<Vec<InitiateProcessRequest>>,
    fail: std::sync::atomic::AtomicBool,
    attempts: std::sync::atomic::AtomicUsize,
}

impl RecordingProcessInitiator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later call fail.
    pub fn fail_next(&self, fail: bool) {
        self.fail.store(fail, std::sync::atomic::Ordering::SeqCst);
    }

    #[must_use]
    pub fn requests(&self) -> Vec<InitiateProcessRequest> {
        self.requests.lock().clone()
    }

    /// Calls made so far, failed ones included.
    #[must_use]
    pub fn attempts(&self) -> usize {
        self.attempts.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[async_trait]
impl ProcessInitiator for RecordingProcessInitiator {
    async fn initiate(
        &self,
        request: InitiateProcessRequest,
    ) -> Result<ProcessId, InitiationError> {
        self.attempts.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        if self.fail.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(InitiationError("dispatcher unavailable".to_string()));
        }
        self.requests.lock().push(request);
        Ok(ProcessId::new())
    }
}
