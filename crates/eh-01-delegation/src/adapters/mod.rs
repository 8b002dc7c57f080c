//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implements outbound port traits for delegation storage.

mod in_memory;

pub use in_memory::InMemoryDelegationRepository;
