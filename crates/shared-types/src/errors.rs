//! # Error Types
//!
//! Validation errors shared by every hub subsystem.

use thiserror::Error;

/// Errors raised while constructing identity values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// Actor number is neither a 13-digit GLN nor a 16-character EIC.
    #[error("Invalid actor number '{value}': expected 13-digit GLN or 16-character EIC")]
    InvalidActorNumber { value: String },

    /// Grid area code must be exactly three digits.
    #[error("Invalid grid area code '{value}': expected 3 digits")]
    InvalidGridAreaCode { value: String },

    /// Identifier empty or too long.
    #[error("Invalid {kind} '{value}': must be 1..={max} characters")]
    InvalidIdentifier {
        kind: &'static str,
        value: String,
        max: usize,
    },

    /// Period start is not strictly before its end.
    #[error("Invalid period: start {start} is not before end {end}")]
    InvalidPeriod { start: String, end: String },
}

/// Errors raised by coded enumeration lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodeError {
    #[error("{value} is not a valid {type_name} code")]
    InvalidCode {
        type_name: &'static str,
        value: String,
    },

    #[error("{value} is not a valid {type_name} name")]
    InvalidName {
        type_name: &'static str,
        value: String,
    },
}
