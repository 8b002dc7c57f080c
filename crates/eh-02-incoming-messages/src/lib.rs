//! # EH-02 Incoming Messages
//!
//! Intake pipeline for actor-submitted market documents.
//!
//! **Subsystem ID:** eh-02
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Pipeline
//!
//! | Stage | Failure |
//! |-------|---------|
//! | Parse | `InvalidStructure`, `UnsupportedDocumentFormat` |
//! | Authenticate | `SenderMismatch` |
//! | Authorize | `RoleNotPermitted`, `DelegationDenied`, `EnergySupplierMismatch` |
//! | Validate | `EmptyMessage`, id and business reason rules |
//! | Register | `DuplicateMessageId`, `DuplicateTransactionId` |
//! | Archive | hard error |
//! | Initiate | hard error, registration kept |
//!
//! Rejections are values ([`ReceiveResponse::Rejected`]) rendered with the
//! code table of the declared incoming format.
//!
//! ## Module Structure
//!
//! ```text
//! eh-02-incoming-messages/
//! ├── domain/          # IncomingMessage, rules, rejection codes, errors
//! ├── ports/           # IncomingMessageApi, parser/registry/archive/initiator SPIs
//! ├── adapters/        # CIM JSON parser, in-memory + SQLite registries, archive
//! └── service.rs       # IncomingMessageService
//! ```

#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{
    ArchivedDocument, CimJsonParser, DocumentParserRegistry, InMemoryArchive,
    InMemoryIdempotencyRegistry, SqliteIdempotencyRegistry,
};
pub use domain::{
    rejection_code, ArchiveError, ArchiveReference, EffectiveActor, IncomingMessage,
    IncomingMessageError, IncomingTransaction, InitiateProcessRequest, InitiationError,
    ParseError, ReceiveResponse, RegistryError, RejectReason, Rejection, RejectionCategory,
};
pub use ports::{
    ArchiveStore, DocumentParser, FixedTimeSource, IdempotencyRegistry, IncomingMessageApi,
    ProcessInitiator, RecordingProcessInitiator, RegistrationOutcome, SystemTimeSource,
    TimeSource,
};
pub use service::{IncomingMessageService, IntakeConfig, IntakeDependencies};
