//! # EH-03 Process
//!
//! Orchestrates one business process per accepted transaction: dispatches
//! the downstream request, applies asynchronous responses and schedules the
//! outgoing document for the requesting actor.
//!
//! **Subsystem ID:** eh-03
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## State Machine
//!
//! | From | Event | To |
//! |------|-------|----|
//! | Initialized | request dispatched | Sent |
//! | Initialized, Sent | accepted, all expected grid areas | Accepted |
//! | Initialized, Sent | accepted, some grid areas | unchanged |
//! | Initialized, Sent | rejected | Rejected |
//! | Accepted | accepted | unchanged, no side effect |
//! | Rejected | rejected | unchanged, no side effect |
//! | Accepted / Rejected | the other outcome | `ConflictingOutcome` |
//!
//! Partial responses are buffered by part id; a receipt names the parts that
//! make up the response and triggers evaluation once all of them arrived.
//!
//! ## Module Structure
//!
//! ```text
//! eh-03-process/
//! ├── domain/          # Process aggregate, ProcessError
//! ├── ports/           # ProcessApi, repository/dispatcher/scheduler SPIs
//! ├── adapters/        # InMemoryProcessRepository
//! └── service.rs       # ProcessService
//! ```

#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::InMemoryProcessRepository;
pub use domain::{
    ApplyOutcome, InitiateProcess, Process, ProcessDomainEvent, ProcessError, ProcessState,
};
pub use ports::{
    DownstreamDispatcher, OutgoingMessageScheduler, ProcessApi, ProcessRepository,
    RecordingDispatcher, RecordingScheduler, SystemTimeSource, TimeSource,
};
pub use service::{ProcessConfig, ProcessService};
