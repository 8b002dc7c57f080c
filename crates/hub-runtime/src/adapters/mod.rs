//! # Adapters
//!
//! Connect the subsystem ports to the shared bus and to each other.

pub mod downstream;
pub mod initiator;
pub mod outgoing;

pub use downstream::BusDownstreamDispatcher;
pub use initiator::ProcessInitiatorAdapter;
pub use outgoing::BusOutgoingMessageScheduler;
