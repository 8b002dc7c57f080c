//! # Hub Runtime
//!
//! Owns the container and the background tasks:
//!
//! - inbox handler (calculation responses → eh-03)
//! - pending sweep (re-dispatches `Initialized` processes)
//!
//! Every task stops on the shared `watch` shutdown signal.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use eh_02_incoming_messages::{IncomingMessageApi, IncomingMessageError, ReceiveResponse};
use eh_03_process::ProcessApi;
use shared_types::{AuthenticatedActor, DocumentFormat, IncomingDocumentType};

use crate::container::{ContainerError, HubConfig, HubContainer};
use crate::handlers::InboxHandler;

const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

pub struct HubRuntime {
    container: Arc<HubContainer>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl HubRuntime {
    /// # Errors
    /// `ContainerError` when the container cannot be built.
    pub fn new(config: HubConfig) -> Result<Self, ContainerError> {
        let container = Arc::new(HubContainer::new(config)?);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Ok(Self {
            container,
            shutdown_tx,
            shutdown_rx,
            tasks: Mutex::new(Vec::new()),
        })
    }

    /// Spawns the background tasks.
    ///
    /// The inbox subscription exists when this returns.
    pub fn start(&self) {
        info!("Starting energy hub runtime");
        let handler = InboxHandler::new(
            Arc::clone(&self.container.event_bus),
            self.container.processes.clone(),
        );
        let inbox = tokio::spawn(handler.run(self.shutdown_rx.clone()));

        let sweep = tokio::spawn(pending_sweep(
            self.container.processes.clone(),
            self.container.config.process.pending_sweep_interval,
            self.shutdown_rx.clone(),
        ));

        self.tasks.lock().extend([inbox, sweep]);
        info!("Energy hub runtime started");
    }

    /// Runs one inbound document through the intake pipeline.
    ///
    /// # Errors
    /// `IncomingMessageError` for infrastructure failures; business
    /// rejections are returned as `ReceiveResponse::Rejected`.
    pub async fn receive(
        &self,
        raw: &[u8],
        format: DocumentFormat,
        document_type: IncomingDocumentType,
        response_format: DocumentFormat,
        caller: &AuthenticatedActor,
    ) -> Result<ReceiveResponse, IncomingMessageError> {
        self.container
            .intake
            .receive(raw, format, document_type, response_format, caller)
            .await
    }

    /// Signals every task to stop and waits for them.
    pub async fn shutdown(&self) {
        info!("Initiating graceful shutdown...");
        if let Err(e) = self.shutdown_tx.send(true) {
            error!("Failed to send shutdown signal: {}", e);
        }

        let tasks: Vec<_> = self.tasks.lock().drain(..).collect();
        for task in tasks {
            match tokio::time::timeout(SHUTDOWN_GRACE, task).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => error!("Background task failed: {}", e),
                Err(_) => warn!("Background task did not stop within {:?}", SHUTDOWN_GRACE),
            }
        }
        info!("Shutdown complete");
    }

    pub fn container(&self) -> Arc<HubContainer> {
        Arc::clone(&self.container)
    }
}

async fn pending_sweep(
    processes: Arc<dyn ProcessApi>,
    every: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + every, every);
    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = shutdown.changed() => break,
        }
        if let Err(e) = processes.send_pending_requests().await {
            warn!("[hub] Pending sweep failed: {e}");
        }
    }
}
