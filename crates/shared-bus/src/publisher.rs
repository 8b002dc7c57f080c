//! # Event Publisher
//!
//! Defines the publishing side of the event bus.

use crate::events::{EventFilter, EventTopic, HubEvent};
use crate::subscriber::{EventStream, Subscription};
use crate::DEFAULT_CHANNEL_CAPACITY;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Errors from publishing when delivery is required.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PublishError {
    /// Nobody was subscribed, the event was dropped.
    #[error("No subscribers for topic {topic:?}, event dropped")]
    NoReceivers { topic: EventTopic },
}

/// Trait for publishing events to the bus.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish an event to the bus.
    ///
    /// Returns the number of live subscriptions interested in the event's
    /// topic.
    async fn publish(&self, event: HubEvent) -> usize;

    /// Get the total number of events published.
    fn events_published(&self) -> u64;

    /// Publish and fail when no subscriber received the event.
    ///
    /// # Errors
    /// `PublishError::NoReceivers` when the event reached nobody.
    async fn try_publish(&self, event: HubEvent) -> Result<usize, PublishError> {
        let topic = event.topic();
        match self.publish(event).await {
            0 => Err(PublishError::NoReceivers { topic }),
            receivers => Ok(receivers),
        }
    }
}

/// In-memory implementation of the event bus.
///
/// Uses `tokio::sync::broadcast` for multi-producer, multi-consumer semantics.
pub struct InMemoryEventBus {
    sender: broadcast::Sender<HubEvent>,

    /// Active subscription count by topic set.
    subscriptions: Arc<RwLock<HashMap<Vec<EventTopic>, usize>>>,

    events_published: AtomicU64,

    capacity: usize,
}

impl InMemoryEventBus {
    /// Create a new in-memory event bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a new in-memory event bus with specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            subscriptions: Arc::new(RwLock::new(HashMap::new())),
            events_published: AtomicU64::new(0),
            capacity,
        }
    }

    /// Subscribe to events matching a filter.
    #[must_use]
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        let receiver = self.sender.subscribe();
        let topic_key = filter.topics.clone();

        *self
            .subscriptions
            .write()
            .entry(topic_key.clone())
            .or_insert(0) += 1;

        debug!(topics = ?filter.topics, "New subscription created");

        Subscription::new(receiver, filter, self.subscriptions.clone(), topic_key)
    }

    /// Get a stream of events matching a filter.
    #[must_use]
    pub fn event_stream(&self, filter: EventFilter) -> EventStream {
        EventStream::new(self.subscribe(filter))
    }

    /// Get the number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Number of live subscriptions registered with exactly these topics.
    #[must_use]
    pub fn subscriptions_for(&self, topics: &[EventTopic]) -> usize {
        self.subscriptions.read().get(topics).copied().unwrap_or(0)
    }

    /// Number of live subscriptions whose topic set covers `topic`.
    #[must_use]
    pub fn interested_in(&self, topic: EventTopic) -> usize {
        self.subscriptions
            .read()
            .iter()
            .filter(|(topics, _)| {
                topics.is_empty() || topics.contains(&EventTopic::All) || topics.contains(&topic)
            })
            .map(|(_, count)| count)
            .sum()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: HubEvent) -> usize {
        let topic = event.topic();
        let source = event.source_subsystem();
        let process_id = event.process_id();

        // Counted even when nobody receives it.
        self.events_published.fetch_add(1, Ordering::Relaxed);

        match self.sender.send(event) {
            Ok(_) => {
                let receivers = self.interested_in(topic);
                debug!(
                    topic = ?topic,
                    source = source,
                    process_id = %process_id,
                    receivers,
                    "Event published"
                );
                receivers
            }
            Err(e) => {
                warn!(
                    topic = ?topic,
                    source = source,
                    process_id = %process_id,
                    error = %e,
                    "Event dropped (no receivers)"
                );
                0
            }
        }
    }

    fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }
}
