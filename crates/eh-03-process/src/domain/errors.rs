//! # Domain Errors

use super::entities::ProcessState;
use shared_types::{GridAreaCode, OutcomeKind, ProcessId};
use thiserror::Error;

/// Process orchestrator errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessError {
    /// Event for a process that was never created. Upstream sequencing defect.
    #[error("Process {process_id} not found")]
    NotFound { process_id: ProcessId },

    #[error("Process {process_id} already exists")]
    AlreadyExists { process_id: ProcessId },

    #[error("Request for process {process_id} already sent (state {state:?})")]
    AlreadySent {
        process_id: ProcessId,
        state: ProcessState,
    },

    /// A transaction may not resolve two ways.
    #[error("Process {process_id} is {current:?}, cannot become {attempted:?}")]
    ConflictingOutcome {
        process_id: ProcessId,
        current: ProcessState,
        attempted: OutcomeKind,
    },

    /// Response covers grid areas that were never requested.
    #[error("Process {process_id} received unexpected grid areas {unexpected:?}")]
    UnexpectedGridAreas {
        process_id: ProcessId,
        unexpected: Vec<GridAreaCode>,
    },

    #[error("Version conflict on process {process_id}: expected {expected}, found {actual}")]
    VersionConflict {
        process_id: ProcessId,
        expected: u64,
        actual: u64,
    },

    #[error("Gave up on process {process_id} after {attempts} concurrent updates")]
    RetriesExhausted { process_id: ProcessId, attempts: u32 },

    #[error("Process storage error: {0}")]
    Repository(String),

    #[error("Downstream dispatch failed: {0}")]
    Dispatch(String),

    #[error("Outgoing message scheduling failed: {0}")]
    Scheduling(String),
}

impl ProcessError {
    /// Defect-class errors: the event must not be retried.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. }
                | Self::ConflictingOutcome { .. }
                | Self::UnexpectedGridAreas { .. }
        )
    }
}
