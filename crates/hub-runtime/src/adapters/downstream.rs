//! # Downstream Dispatcher Adapter
//!
//! Publishes process requests for the calculation engine on the bus.

use std::sync::Arc;

use async_trait::async_trait;
use eh_03_process::{DownstreamDispatcher, ProcessError};
use shared_bus::{EventPublisher, HubEvent, InMemoryEventBus};
use shared_types::DownstreamRequest;
use tracing::debug;

/// Dispatches requests as `HubEvent::DownstreamRequestDispatched`.
///
/// Delivery is required: an event nobody received is a dispatch failure,
/// so the process stays `Initialized` and is picked up by the pending sweep.
pub struct BusDownstreamDispatcher {
    bus: Arc<InMemoryEventBus>,
}

impl BusDownstreamDispatcher {
    pub fn new(bus: Arc<InMemoryEventBus>) -> Self {
        Self { bus }
    }
}

#[async_trait]
impl DownstreamDispatcher for BusDownstreamDispatcher {
    async fn dispatch(&self, request: DownstreamRequest) -> Result<(), ProcessError> {
        let process_id = request.process_id;
        let receivers = self
            .bus
            .try_publish(HubEvent::DownstreamRequestDispatched(request))
            .await
            .map_err(|e| ProcessError::Dispatch(e.to_string()))?;
        debug!(process_id = %process_id, receivers, "[eh-03] Downstream request published");
        Ok(())
    }
}
