//! # Domain Module
//!
//! Grants, resolution and the rules grants obey.

pub mod entities;
pub mod errors;
pub mod invariants;
pub mod resolution;

#[cfg(test)]
pub(crate) mod test_support;

pub use entities::*;
pub use errors::*;
pub use invariants::*;
pub use resolution::resolve_effective_actor;
