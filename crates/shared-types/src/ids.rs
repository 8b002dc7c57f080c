//! # Identifiers
//!
//! Sender-supplied identifiers (`MessageId`, `TransactionId`) are bounded
//! strings; hub-generated ones use UUIDs.

use crate::errors::IdentityError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Upper bound on sender-supplied identifier length.
pub const MAX_ID_LENGTH: usize = 36;

macro_rules! bounded_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Fresh identifier: a v4 UUID without hyphens (32 chars).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4().simple().to_string())
            }

            /// # Errors
            /// `IdentityError::InvalidIdentifier` if empty or longer than
            /// [`MAX_ID_LENGTH`] characters.
            pub fn from_string(value: impl Into<String>) -> Result<Self, IdentityError> {
                let value = value.into();
                let len = value.chars().count();
                if len == 0 || len > MAX_ID_LENGTH {
                    return Err(IdentityError::InvalidIdentifier {
                        kind: stringify!($name),
                        value,
                        max: MAX_ID_LENGTH,
                    });
                }
                Ok(Self(value))
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdentityError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::from_string(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

bounded_id! {
    /// Sender-assigned id of one transaction inside a message.
    TransactionId
}

bounded_id! {
    /// Sender-assigned id of a whole message.
    MessageId
}

/// Hub-assigned id of a business process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProcessId(Uuid);

impl ProcessId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ProcessId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
