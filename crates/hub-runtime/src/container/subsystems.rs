//! # Subsystem Container
//!
//! ## Initialization Order
//!
//! ```text
//! Phase 1: event bus
//! Phase 2: eh-01 delegation (no dependencies)
//! Phase 3: eh-03 process (bus adapters)
//! Phase 4: eh-02 intake (delegation, registry, archive, eh-03 initiator)
//! ```

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, instrument};

use eh_01_delegation::{DelegationService, InMemoryDelegationRepository};
use eh_02_incoming_messages::{
    DocumentParserRegistry, IdempotencyRegistry, IncomingMessageService, InMemoryArchive,
    InMemoryIdempotencyRegistry, IntakeConfig, IntakeDependencies, RegistryError,
    SqliteIdempotencyRegistry, SystemTimeSource as IntakeTimeSource,
};
use eh_03_process::{
    InMemoryProcessRepository, ProcessConfig, ProcessService,
    SystemTimeSource as ProcessTimeSource,
};
use shared_bus::InMemoryEventBus;

use crate::adapters::{
    BusDownstreamDispatcher, BusOutgoingMessageScheduler, ProcessInitiatorAdapter,
};
use crate::container::config::{ConfigError, HubConfig, RegistryBackend};

pub type HubDelegationService = DelegationService<InMemoryDelegationRepository>;

/// Failures while building the container.
#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Cannot open idempotency registry: {0}")]
    Registry(#[from] RegistryError),

    #[error("Cannot create data directory: {0}")]
    Io(#[from] std::io::Error),
}

/// Central container holding all subsystem instances.
pub struct HubContainer {
    /// Delegation grants (Subsystem eh-01).
    pub delegation: Arc<HubDelegationService>,

    /// Process orchestrator (Subsystem eh-03).
    pub processes: Arc<ProcessService>,

    /// Intake pipeline (Subsystem eh-02).
    pub intake: Arc<IncomingMessageService>,

    pub registry: Arc<dyn IdempotencyRegistry>,
    pub archive: Arc<InMemoryArchive>,

    /// All cross-subsystem events flow through this bus.
    pub event_bus: Arc<InMemoryEventBus>,

    /// Immutable after initialization.
    pub config: HubConfig,
}

impl HubContainer {
    /// # Errors
    /// `ContainerError` for invalid configuration or an unusable registry.
    #[instrument(name = "hub_init", skip(config))]
    pub fn new(config: HubConfig) -> Result<Self, ContainerError> {
        config.validate()?;
        info!("Initializing energy hub container");

        info!("Phase 1: Creating event bus");
        let event_bus = Arc::new(InMemoryEventBus::with_capacity(config.bus.channel_capacity));

        info!("Phase 2: Initializing delegation");
        let delegation = Arc::new(DelegationService::new(Arc::new(
            InMemoryDelegationRepository::new(),
        )));
        info!("  [eh-01] Delegation initialized");

        info!("Phase 3: Initializing process orchestrator");
        let processes = Arc::new(ProcessService::new(
            Arc::new(InMemoryProcessRepository::new()),
            Arc::new(BusDownstreamDispatcher::new(Arc::clone(&event_bus))),
            Arc::new(BusOutgoingMessageScheduler::new(Arc::clone(&event_bus))),
            Arc::new(ProcessTimeSource),
            ProcessConfig {
                max_retries: config.process.max_retries,
            },
        ));
        info!("  [eh-03] Process orchestrator initialized (max_retries={})", config.process.max_retries);

        info!("Phase 4: Initializing intake");
        let registry = Self::init_registry(&config)?;
        let archive = Arc::new(InMemoryArchive::new());
        let intake = Arc::new(IncomingMessageService::new(
            IntakeDependencies {
                parsers: DocumentParserRegistry::with_cim_json(),
                delegation: delegation.clone(),
                registry: Arc::clone(&registry),
                archive: archive.clone(),
                initiator: Arc::new(ProcessInitiatorAdapter::new(processes.clone())),
                time_source: Arc::new(IntakeTimeSource),
            },
            IntakeConfig {
                archive_enabled: config.archive.enabled,
            },
        ));
        info!("  [eh-02] Intake initialized (archive_enabled={})", config.archive.enabled);

        info!("Energy hub container ready");
        Ok(Self {
            delegation,
            processes,
            intake,
            registry,
            archive,
            event_bus,
            config,
        })
    }

    fn init_registry(config: &HubConfig) -> Result<Arc<dyn IdempotencyRegistry>, ContainerError> {
        match config.storage.registry_backend {
            RegistryBackend::Memory => {
                info!("  [eh-02] Idempotency registry: memory");
                Ok(Arc::new(InMemoryIdempotencyRegistry::new()))
            }
            RegistryBackend::Sqlite => {
                let path = &config.storage.registry_path;
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)?;
                }
                info!("  [eh-02] Idempotency registry: sqlite at {}", path.display());
                Ok(Arc::new(SqliteIdempotencyRegistry::open(path)?))
            }
        }
    }
}
