//! Availability signal

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether an instance currently serves as primary/writable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    /// Not in recovery: primary and writable
    Available,
    /// In recovery, or the probe failed
    Unavailable,
    /// The recovery query returned no row
    Undetermined,
}

impl Availability {
    /// Map a `pg_is_in_recovery()` answer
    pub fn from_recovery(in_recovery: bool) -> Self {
        if in_recovery {
            Self::Unavailable
        } else {
            Self::Available
        }
    }

    /// Value reported to Dynatrace; `None` is serialized as `null`
    pub fn as_value(self) -> Option<i64> {
        match self {
            Self::Available => Some(1),
            Self::Unavailable => Some(0),
            Self::Undetermined => None,
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_value() {
            Some(v) => write!(f, "{}", v),
            None => f.write_str("undetermined"),
        }
    }
}
