//! # Outgoing Message Scheduler Adapter

use std::sync::Arc;

use async_trait::async_trait;
use eh_03_process::{OutgoingMessageScheduler, ProcessError};
use shared_bus::{EventPublisher, HubEvent, InMemoryEventBus};
use shared_types::OutgoingMessage;
use tracing::{debug, warn};

/// Hands outgoing messages to the document writer via the bus.
///
/// The process has already been saved when this runs, so a message nobody
/// received is logged rather than failed.
pub struct BusOutgoingMessageScheduler {
    bus: Arc<InMemoryEventBus>,
}

impl BusOutgoingMessageScheduler {
    pub fn new(bus: Arc<InMemoryEventBus>) -> Self {
        Self { bus }
    }
}

#[async_trait]
impl OutgoingMessageScheduler for BusOutgoingMessageScheduler {
    async fn enqueue(&self, message: OutgoingMessage) -> Result<(), ProcessError> {
        let process_id = message.process_id;
        let receiver = message.receiver.clone();
        let queue_role = message.queue_role.clone();

        let receivers = self
            .bus
            .publish(HubEvent::OutgoingMessageEnqueued(message))
            .await;
        if receivers == 0 {
            warn!(
                process_id = %process_id,
                receiver = %receiver,
                "[eh-03] Outgoing message published with no document writer listening"
            );
        } else {
            debug!(
                process_id = %process_id,
                receiver = %receiver,
                queue_role = %queue_role,
                "[eh-03] Outgoing message enqueued"
            );
        }
        Ok(())
    }
}
