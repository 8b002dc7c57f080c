//! # Energy Hub Test Suite
//!
//! End-to-end flows through `HubRuntime`: intake, delegation, process
//! orchestration and the bus, with a stub calculation engine answering
//! downstream requests.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── fixtures.rs      # Documents, actors, engine stub, mailbox
//!     ├── request_flow.rs  # Accept / reject / mailbox routing / recovery
//!     ├── idempotency.rs   # Concurrent duplicates, memory and SQLite
//!     ├── responses.rs     # Duplicate, partial and conflicting responses
//!     └── delegation.rs    # Delegated submissions
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p eh-tests
//! cargo test -p eh-tests integration::idempotency::
//! ```

#![allow(dead_code)]

pub mod integration;
