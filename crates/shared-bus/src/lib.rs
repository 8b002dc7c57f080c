//! # Shared Bus - Event Bus for Hub Subsystems
//!
//! Carries the asynchronous traffic between the process orchestrator, the
//! calculation engine and the outgoing document writer.
//!
//! ## Flows
//!
//! ```text
//! ┌──────────────┐ DownstreamRequestDispatched ┌────────────────────┐
//! │   eh-03      │ ──────────────────────────▶ │ calculation engine │
//! │   process    │                             │                    │
//! │              │ ◀────────────────────────── │                    │
//! └──────────────┘     InboxEventReceived      └────────────────────┘
//!        │
//!        │ OutgoingMessageEnqueued
//!        ▼
//! ┌──────────────┐
//! │ doc writer   │
//! └──────────────┘
//! ```
//!
//! Delivery is at-least-once and unordered; consumers must be idempotent.
//! Inbox events that cannot be applied are parked on [`DLQ_TOPIC`].

#![allow(clippy::missing_const_for_fn)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod events;
pub mod publisher;
pub mod subscriber;

pub use events::{EventFilter, EventTopic, HubEvent};
pub use publisher::{EventPublisher, InMemoryEventBus, PublishError};
pub use subscriber::{EventStream, Subscription};

/// Current protocol version for event bus messages.
pub const PROTOCOL_VERSION: u16 = 1;

/// Maximum events to buffer per subscriber before lagging.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;

/// Dead Letter Queue topic name, for log correlation.
pub const DLQ_TOPIC: &str = "dlq.inbox";
