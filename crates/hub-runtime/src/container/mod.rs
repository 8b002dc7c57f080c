//! # Hub Container
//!
//! Holds every subsystem instance and wires them through their ports.
//!
//! - eh-01 and eh-03 are called directly through their inbound ports
//! - eh-03 talks to the calculation engine and document writer over the bus

pub mod config;
pub mod subsystems;

pub use config::{
    ArchiveConfig, BusConfig, ConfigError, HubConfig, LoggingConfig, ProcessSettings,
    RegistryBackend, StorageConfig,
};
pub use subsystems::{ContainerError, HubContainer};
