//! # Domain Module
//!
//! Process aggregate, its state machine and errors.

pub mod entities;
pub mod errors;

#[cfg(test)]
pub(crate) mod test_support;

pub use entities::*;
pub use errors::*;
