//! # EH-01 Delegation
//!
//! Resolves on whose behalf a delegated actor submits a request.
//!
//! **Subsystem ID:** eh-01
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Grant ordering
//!
//! | Rule | Effect |
//! |------|--------|
//! | Highest sequence wins | Per (delegator, delegate, grid area, process type) |
//! | Only started grants compete | `start <= as_of` |
//! | Window is half-open | `[start, end)` |
//! | `start == end` | Cancellation marker, grants nothing |
//!
//! ## Module Structure
//!
//! ```text
//! eh-01-delegation/
//! ├── domain/          # DelegationGrant, resolution, invariants, errors
//! ├── ports/           # DelegationApi, DelegationRepository
//! ├── adapters/        # InMemoryDelegationRepository
//! └── service.rs       # DelegationService
//! ```

#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::InMemoryDelegationRepository;
pub use domain::{
    resolve_effective_actor, validate_grant, DelegationDenied, DelegationError, DelegationGrant,
    DelegationQuery, GrantKey, OriginalActor,
};
pub use ports::{DelegationApi, DelegationRepository, UnavailableDelegationRepository};
pub use service::DelegationService;
