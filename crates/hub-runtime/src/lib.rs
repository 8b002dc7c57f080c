//! # Hub Runtime Library
//!
//! Wires the energy hub subsystems together and runs their background tasks.
//! The main entry point is the `main.rs` binary.
//!
//! ## Architectural Patterns
//!
//! - **EDA**: eh-03 reaches the calculation engine and the document writer
//!   over the shared bus only
//! - **Hexagonal Architecture**: every subsystem is wired through its ports;
//!   the adapters in this crate implement the cross-subsystem ones
//!
//! ## Module Structure
//!
//! ```text
//! hub-runtime/
//! ├── adapters/     # Bus dispatcher, bus scheduler, eh-02 → eh-03 initiator
//! ├── container/    # HubConfig, HubContainer
//! ├── handlers/     # InboxHandler
//! └── runtime.rs    # HubRuntime (start / receive / shutdown)
//! ```

#![warn(clippy::all)]

pub mod adapters;
pub mod container;
pub mod handlers;
pub mod runtime;

pub use container::{ConfigError, ContainerError, HubConfig, HubContainer, RegistryBackend};
pub use handlers::InboxHandler;
pub use runtime::HubRuntime;
