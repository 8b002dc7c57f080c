//! # Hub Configuration
//!
//! Runtime configuration with defaults and `EH_*` environment overrides.
//!
//! | Variable | Field |
//! |----------|-------|
//! | `EH_REGISTRY_BACKEND` | `storage.registry_backend` (`memory` or `sqlite`) |
//! | `EH_REGISTRY_PATH` | `storage.registry_path` |
//! | `EH_BUS_CAPACITY` | `bus.channel_capacity` |
//! | `EH_ARCHIVE_ENABLED` | `archive.enabled` |
//! | `EH_PROCESS_MAX_RETRIES` | `process.max_retries` |
//! | `EH_PENDING_SWEEP_SECS` | `process.pending_sweep_interval` |
//! | `EH_LOG_LEVEL` | `logging.level` |

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Complete hub configuration.
#[derive(Debug, Clone, Default)]
pub struct HubConfig {
    pub storage: StorageConfig,
    pub bus: BusConfig,
    pub archive: ArchiveConfig,
    pub process: ProcessSettings,
    pub logging: LoggingConfig,
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{key} has invalid value '{value}'")]
    InvalidValue { key: &'static str, value: String },

    #[error("SQLite registry selected but registry path is empty")]
    EmptyRegistryPath,

    #[error("Bus channel capacity must be greater than zero")]
    ZeroCapacity,

    #[error("Process retry budget must be greater than zero")]
    ZeroRetries,

    #[error("Pending sweep interval must be greater than zero")]
    ZeroSweepInterval,
}

impl HubConfig {
    /// Defaults overridden from the process environment.
    ///
    /// # Errors
    /// `ConfigError::InvalidValue` for unparsable variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Applies overrides from `lookup`, keyed by variable name.
    ///
    /// # Errors
    /// `ConfigError::InvalidValue` for unparsable variables.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("EH_REGISTRY_BACKEND") {
            self.storage.registry_backend = parse("EH_REGISTRY_BACKEND", &value)?;
        }
        if let Some(value) = lookup("EH_REGISTRY_PATH") {
            self.storage.registry_path = PathBuf::from(value);
        }
        if let Some(value) = lookup("EH_BUS_CAPACITY") {
            self.bus.channel_capacity = parse("EH_BUS_CAPACITY", &value)?;
        }
        if let Some(value) = lookup("EH_ARCHIVE_ENABLED") {
            self.archive.enabled = parse("EH_ARCHIVE_ENABLED", &value)?;
        }
        if let Some(value) = lookup("EH_PROCESS_MAX_RETRIES") {
            self.process.max_retries = parse("EH_PROCESS_MAX_RETRIES", &value)?;
        }
        if let Some(value) = lookup("EH_PENDING_SWEEP_SECS") {
            self.process.pending_sweep_interval =
                Duration::from_secs(parse("EH_PENDING_SWEEP_SECS", &value)?);
        }
        if let Some(value) = lookup("EH_LOG_LEVEL") {
            self.logging.level = value;
        }
        Ok(())
    }

    /// Checks values no override can make usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.registry_backend == RegistryBackend::Sqlite
            && self.storage.registry_path.as_os_str().is_empty()
        {
            return Err(ConfigError::EmptyRegistryPath);
        }
        if self.bus.channel_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.process.max_retries == 0 {
            return Err(ConfigError::ZeroRetries);
        }
        if self.process.pending_sweep_interval.is_zero() {
            return Err(ConfigError::ZeroSweepInterval);
        }
        Ok(())
    }
}

fn parse<T: FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    })
}

/// Idempotency registry backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegistryBackend {
    #[default]
    Memory,
    Sqlite,
}

impl FromStr for RegistryBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "sqlite" => Ok(Self::Sqlite),
            _ => Err(()),
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub registry_backend: RegistryBackend,
    /// SQLite database file, used with `RegistryBackend::Sqlite`.
    pub registry_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            registry_backend: RegistryBackend::Memory,
            registry_path: PathBuf::from("./data/idempotency.db"),
        }
    }
}

/// Event bus configuration.
#[derive(Debug, Clone)]
pub struct BusConfig {
    pub channel_capacity: usize,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            channel_capacity: shared_bus::DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ArchiveConfig {
    pub enabled: bool,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Process orchestrator settings.
#[derive(Debug, Clone)]
pub struct ProcessSettings {
    /// Reload-and-retry budget on version conflicts.
    pub max_retries: u32,
    /// How often `Initialized` processes are re-dispatched.
    pub pending_sweep_interval: Duration,
}

impl Default for ProcessSettings {
    fn default() -> Self {
        Self {
            max_retries: 8,
            pending_sweep_interval: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
