//! # Event Handlers
//!
//! Bus consumers run by the hub runtime.

pub mod inbox;

pub use inbox::InboxHandler;
