//! # Hub Events
//!
//! Every event that flows through the shared bus.

use serde::{Deserialize, Serialize};
use shared_types::downstream::{DownstreamRequest, InboxEvent};
use shared_types::ids::ProcessId;
use shared_types::outgoing::OutgoingMessage;

/// Subsystem tag of the process orchestrator.
pub const PROCESS_SUBSYSTEM: &str = "eh-03";
/// Tag for events originating outside the hub.
pub const CALCULATION_ENGINE: &str = "calculation-engine";
/// Tag of the runtime itself.
pub const RUNTIME: &str = "hub-runtime";

/// All events that can be published to the event bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum HubEvent {
    /// A process forwarded its request to the calculation engine.
    /// Source: eh-03 | Target: calculation engine
    DownstreamRequestDispatched(DownstreamRequest),

    /// The calculation engine answered a request.
    /// Source: calculation engine | Target: eh-03 via the inbox handler
    InboxEventReceived(InboxEvent),

    /// A process produced an outgoing message for an actor mailbox.
    /// Source: eh-03 | Target: document writer
    OutgoingMessageEnqueued(OutgoingMessage),

    /// An inbox event could not be applied and was parked.
    DeadLettered {
        process_id: ProcessId,
        event: InboxEvent,
        reason: String,
    },
}

impl HubEvent {
    /// Get the topic for this event (for filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::DownstreamRequestDispatched(_) => EventTopic::Downstream,
            Self::InboxEventReceived(_) => EventTopic::Inbox,
            Self::OutgoingMessageEnqueued(_) => EventTopic::Outgoing,
            Self::DeadLettered { .. } => EventTopic::DeadLetterQueue,
        }
    }

    /// Get the originating subsystem tag.
    #[must_use]
    pub fn source_subsystem(&self) -> &'static str {
        match self {
            Self::DownstreamRequestDispatched(_) | Self::OutgoingMessageEnqueued(_) => {
                PROCESS_SUBSYSTEM
            }
            Self::InboxEventReceived(_) => CALCULATION_ENGINE,
            Self::DeadLettered { .. } => RUNTIME,
        }
    }

    /// The process the event concerns.
    #[must_use]
    pub fn process_id(&self) -> ProcessId {
        match self {
            Self::DownstreamRequestDispatched(request) => request.process_id,
            Self::InboxEventReceived(event) => event.process_id(),
            Self::OutgoingMessageEnqueued(message) => message.process_id,
            Self::DeadLettered { process_id, .. } => *process_id,
        }
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Requests to the calculation engine.
    Downstream,
    /// Responses from the calculation engine.
    Inbox,
    /// Messages bound for actor mailboxes.
    Outgoing,
    /// Unprocessable events.
    DeadLetterQueue,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
    /// Source subsystems to include. Empty means all sources.
    pub source_subsystems: Vec<&'static str>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self {
            topics,
            source_subsystems: Vec::new(),
        }
    }

    /// Create a filter for events from specific subsystems.
    #[must_use]
    pub fn from_subsystems(subsystems: Vec<&'static str>) -> Self {
        Self {
            topics: Vec::new(),
            source_subsystems: subsystems,
        }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &HubEvent) -> bool {
        let topic_match = self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic());

        let source_match = self.source_subsystems.is_empty()
            || self.source_subsystems.contains(&event.source_subsystem());

        topic_match && source_match
    }
}
