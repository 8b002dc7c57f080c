//! # Outbound Ports
//!
//! Process storage, the downstream dispatcher and the outgoing-message
//! scheduler.

use crate::domain::{Process, ProcessError, ProcessState};
use async_trait::async_trait;
use parking_lot::Mutex;
use shared_types::{DownstreamRequest, OutgoingMessage, ProcessId, Timestamp};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Process storage with optimistic concurrency - outbound port.
#[async_trait]
pub trait ProcessRepository: Send + Sync {
    /// Stores a new process at version 1.
    async fn insert(&self, process: Process) -> Result<(), ProcessError>;

    async fn get(&self, id: ProcessId) -> Result<Option<Process>, ProcessError>;

    /// Stores `process` if the stored version equals `process.version()`,
    /// then bumps the version.
    ///
    /// # Errors
    /// `VersionConflict` when another writer saved first.
    async fn save(&self, process: &Process) -> Result<(), ProcessError>;

    async fn find_by_state(&self, state: ProcessState) -> Result<Vec<Process>, ProcessError>;

    /// Processes holding outgoing messages that nobody is delivering.
    async fn find_with_undelivered_outbox(&self) -> Result<Vec<Process>, ProcessError>;
}

/// Sends requests to the calculation engine. At-least-once transport.
#[async_trait]
pub trait DownstreamDispatcher: Send + Sync {
    async fn dispatch(&self, request: DownstreamRequest) -> Result<(), ProcessError>;
}

/// Queues outgoing documents for actor mailboxes.
#[async_trait]
pub trait OutgoingMessageScheduler: Send + Sync {
    async fn enqueue(&self, message: OutgoingMessage) -> Result<(), ProcessError>;
}

/// Time source for creation timestamps.
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

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// Dispatcher that records requests and can be switched to failing.
#[derive(Default)]
pub struct RecordingDispatcher {
    requests: Mutex<Vec<DownstreamRequest>>,
    fail: AtomicBool,
    delay: Mutex<Option<Duration>>,
}

impl RecordingDispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Holds every dispatch for `delay` before recording it.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = Some(delay);
    }

    #[must_use]
    pub fn requests(&self) -> Vec<DownstreamRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl DownstreamDispatcher for RecordingDispatcher {
    async fn dispatch(&self, request: DownstreamRequest) -> Result<(), ProcessError> {
        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(ProcessError::Dispatch("no receivers".to_string()));
        }
        self.requests.lock().push(request);
        Ok(())
    }
}

/// Scheduler that records every enqueued message.
#[derive(Default)]
pub struct RecordingScheduler {
    messages: Mutex<Vec<OutgoingMessage>>,
    /// Enqueues to accept before failing; `None` never fails.
    fail_after: Mutex<Option<usize>>,
}

impl RecordingScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts `accepted` more messages, then fails until reset.
    pub fn fail_after(&self, accepted: usize) {
        *self.fail_after.lock() = Some(accepted);
    }

    pub fn recover(&self) {
        *self.fail_after.lock() = None;
    }

    #[must_use]
    pub fn messages(&self) -> Vec<OutgoingMessage> {
        self.messages.lock().clone()
    }
}

#[async_trait]
impl OutgoingMessageScheduler for RecordingScheduler {
    async fn enqueue(&self, message: OutgoingMessage) -> Result<(), ProcessError> {
        let mut fail_after = self.fail_after.lock();
        match fail_after.as_mut() {
            Some(0) => return Err(ProcessError::Scheduling("mailbox unavailable".to_string())),
            Some(remaining) => *remaining -= 1,
            None => {}
        }
        self.messages.lock().push(message);
        Ok(())
    }
}
