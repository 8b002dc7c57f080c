//! # Domain Module
//!
//! Message record, validation rules, rejection codes and errors.

pub mod authorization;
pub mod entities;
pub mod errors;
pub mod rejection;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_support;

pub use authorization::AuthorizationRules;
pub use entities::*;
pub use errors::*;
pub use rejection::{rejection_code, ReceiveResponse, Rejection};
pub use validation::{allowed_business_reasons, validate_structure};
