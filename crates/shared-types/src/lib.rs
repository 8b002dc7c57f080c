//! # Shared Types Crate
//!
//! Value objects and payloads shared by every energy hub subsystem.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: all cross-subsystem types are defined here.
//! - **Validated on construction**: `ActorNumber`, `GridAreaCode`,
//!   `TransactionId`, `MessageId` and `Period` cannot hold malformed values.
//! - **Explicit code tables**: coded concepts are closed sets declared with
//!   `coded_enumeration!`; open sets opt in through `WithUnknown` or
//!   `WithUnused`.
//! - **Caller authority**: `AuthenticatedActor` is the sole source of truth for
//!   who is calling.

#[macro_use]
pub mod coded;

pub mod codes;
pub mod downstream;
pub mod envelope;
pub mod errors;
pub mod identity;
pub mod ids;
pub mod outgoing;
pub mod roles;
pub mod time;

pub use coded::{CodeKind, CodedEnumeration, WithUnknown, WithUnused};
pub use codes::*;
pub use downstream::*;
pub use envelope::{AuthenticatedActor, Restriction};
pub use errors::*;
pub use identity::{is_eic, is_gln, ActorNumber, ActorNumberScheme, GridAreaCode};
pub use ids::{MessageId, ProcessId, TransactionId, MAX_ID_LENGTH};
pub use outgoing::{OutcomeKind, OutgoingMessage, OutgoingPayload};
pub use roles::ActorRole;
pub use time::{Period, Timestamp};
