//! Instants and half-open periods.

use crate::errors::IdentityError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// UTC instant used throughout the hub.
pub type Timestamp = DateTime<Utc>;

/// Half-open interval `[start, end)` with `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPeriod", into = "RawPeriod")]
pub struct Period {
    start: Timestamp,
    end: Timestamp,
}

impl Period {
    /// # Errors
    /// `IdentityError::InvalidPeriod` unless `start < end`.
    pub fn new(start: Timestamp, end: Timestamp) -> Result<Self, IdentityError> {
        if start >= end {
            return Err(IdentityError::InvalidPeriod {
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
            });
        }
        Ok(Self { start, end })
    }

    #[must_use]
    pub fn start(&self) -> Timestamp {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> Timestamp {
        self.end
    }

    #[must_use]
    pub fn contains(&self, instant: Timestamp) -> bool {
        self.start <= instant && instant < self.end
    }
}

#[derive(Serialize, Deserialize)]
struct RawPeriod {
    start: Timestamp,
    end: Timestamp,
}

impl TryFrom<RawPeriod> for Period {
    type Error = IdentityError;

    fn try_from(raw: RawPeriod) -> Result<Self, Self::Error> {
        Period::new(raw.start, raw.end)
    }
}

impl From<Period> for RawPeriod {
    fn from(period: Period) -> Self {
        Self {
            start: period.start,
            end: period.end,
        }
    }
}
