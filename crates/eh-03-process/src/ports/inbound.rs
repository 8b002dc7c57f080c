//! # Inbound Ports
//!
//! API trait defining what the Process subsystem can do.

use crate::domain::{ApplyOutcome, InitiateProcess, Process, ProcessError};
use async_trait::async_trait;
use shared_types::{InboxEvent, ProcessId};

/// Process orchestrator API - inbound port.
#[async_trait]
pub trait ProcessApi: Send + Sync {
    /// Creates a process in `Initialized`.
    async fn initiate(&self, command: InitiateProcess) -> Result<ProcessId, ProcessError>;

    /// Dispatches the downstream request and marks the process `Sent`.
    async fn send_request(&self, id: ProcessId) -> Result<(), ProcessError>;

    /// Applies an asynchronous response. Safe to call repeatedly with the
    /// same event.
    async fn apply_inbox_event(&self, event: InboxEvent) -> Result<ApplyOutcome, ProcessError>;

    /// Re-dispatches every process still in `Initialized`. Returns how many
    /// were sent.
    async fn send_pending_requests(&self) -> Result<usize, ProcessError>;

    async fn get(&self, id: ProcessId) -> Result<Option<Process>, ProcessError>;
}
