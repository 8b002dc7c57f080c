//! # Inbox Handler
//!
//! Feeds calculation engine responses into the process orchestrator.
//!
//! ## Flow
//!
//! 1. Calculation engine publishes `InboxEventReceived`
//! 2. Handler applies it through `ProcessApi::apply_inbox_event`
//! 3. eh-03 schedules outgoing messages on completion
//! 4. Events that cannot be applied are re-published as `DeadLettered`
//!
//! Delivery is at-least-once; duplicates resolve to `AlreadyApplied`.

use std::sync::Arc;

use tokio::sync::watch;
use tokio_stream::StreamExt;
use tracing::{debug, error, info, warn};

use eh_03_process::{ApplyOutcome, ProcessApi, ProcessError};
use shared_bus::{EventFilter, EventPublisher, EventStream, EventTopic, HubEvent, InMemoryEventBus};
use shared_types::InboxEvent;

pub struct InboxHandler {
    stream: EventStream,
    processes: Arc<dyn ProcessApi>,
    bus: Arc<InMemoryEventBus>,
}

impl InboxHandler {
    /// Subscribes immediately so no event published after this call is missed.
    pub fn new(bus: Arc<InMemoryEventBus>, processes: Arc<dyn ProcessApi>) -> Self {
        let stream = bus.event_stream(EventFilter::topics(vec![EventTopic::Inbox]));
        Self {
            stream,
            processes,
            bus,
        }
    }

    /// Applies one event; failures are dead-lettered.
    pub async fn handle(&self, event: InboxEvent) -> Result<ApplyOutcome, ProcessError> {
        let process_id = event.process_id();
        let kind = event.kind();
        match self.processes.apply_inbox_event(event.clone()).await {
            Ok(outcome) => {
                debug!(process_id = %process_id, kind, outcome = ?outcome, "[hub] Inbox event applied");
                Ok(outcome)
            }
            Err(e) => {
                if e.is_fatal() {
                    error!(process_id = %process_id, kind, "[hub] Inbox event rejected: {e}");
                } else {
                    warn!(process_id = %process_id, kind, "[hub] Inbox event failed: {e}");
                }
                self.bus
                    .publish(HubEvent::DeadLettered {
                        process_id,
                        event,
                        reason: e.to_string(),
                    })
                    .await;
                Err(e)
            }
        }
    }

    /// Runs until shutdown is signalled or the bus goes away.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        info!("[hub] Inbox handler started");
        loop {
            let next = tokio::select! {
                next = self.stream.next() => next,
                _ = shutdown.changed() => break,
            };
            match next {
                Some(HubEvent::InboxEventReceived(event)) => {
                    let _ = self.handle(event).await;
                }
                Some(_) => {}
                None => {
                    warn!("[hub] Event bus closed, inbox handler stopping");
                    break;
                }
            }
        }
        info!("[hub] Inbox handler stopped");
    }
}
