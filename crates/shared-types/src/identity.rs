//! # Market Participant Identity
//!
//! `ActorNumber` identifies a market participant; `GridAreaCode` identifies a
//! grid area. Both validate their format on construction and are immutable
//! afterwards.

use crate::errors::IdentityError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// GLN numbers are 13 digits.
pub const GLN_LENGTH: usize = 13;
/// EIC codes are 16 characters.
pub const EIC_LENGTH: usize = 16;

/// True for exactly 13 ASCII digits.
#[must_use]
pub fn is_gln(value: &str) -> bool {
    value.len() == GLN_LENGTH && value.bytes().all(|b| b.is_ascii_digit())
}

/// True for any 16-character value. Only the length is checked; the EIC
/// check digit belongs to the issuing registry.
#[must_use]
pub fn is_eic(value: &str) -> bool {
    value.chars().count() == EIC_LENGTH
}

/// Numbering scheme of an [`ActorNumber`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorNumberScheme {
    /// Global Location Number.
    Gln,
    /// Energy Identification Code.
    Eic,
}

/// Market participant number (GLN or EIC).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ActorNumber(String);

impl ActorNumber {
    /// Validates and wraps an actor number.
    ///
    /// # Errors
    /// `IdentityError::InvalidActorNumber` unless [`is_gln`] or [`is_eic`]
    /// holds.
    pub fn create(value: impl Into<String>) -> Result<Self, IdentityError> {
        let value = value.into();
        if Self::scheme_of(&value).is_none() {
            return Err(IdentityError::InvalidActorNumber { value });
        }
        Ok(Self(value))
    }

    fn scheme_of(value: &str) -> Option<ActorNumberScheme> {
        if is_gln(value) {
            Some(ActorNumberScheme::Gln)
        } else if is_eic(value) {
            Some(ActorNumberScheme::Eic)
        } else {
            None
        }
    }

    /// Which numbering scheme this number follows.
    #[must_use]
    pub fn scheme(&self) -> ActorNumberScheme {
        // Construction guarantees one of the two matched.
        Self::scheme_of(&self.0).unwrap_or(ActorNumberScheme::Eic)
    }

    #[must_use]
    pub fn is_gln(&self) -> bool {
        self.scheme() == ActorNumberScheme::Gln
    }

    #[must_use]
    pub fn is_eic(&self) -> bool {
        self.scheme() == ActorNumberScheme::Eic
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ActorNumber {
    type Error = IdentityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::create(value)
    }
}

impl From<ActorNumber> for String {
    fn from(value: ActorNumber) -> Self {
        value.0
    }
}

impl fmt::Display for ActorNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Three-digit grid area code, e.g. `"512"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GridAreaCode(String);

impl GridAreaCode {
    /// # Errors
    /// `IdentityError::InvalidGridAreaCode` unless exactly three ASCII digits.
    pub fn create(value: impl Into<String>) -> Result<Self, IdentityError> {
        let value = value.into();
        if value.len() != 3 || !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(IdentityError::InvalidGridAreaCode { value });
        }
        Ok(Self(value))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for GridAreaCode {
    type Error = IdentityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::create(value)
    }
}

impl From<GridAreaCode> for String {
    fn from(value: GridAreaCode) -> Self {
        value.0
    }
}

impl fmt::Display for GridAreaCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
