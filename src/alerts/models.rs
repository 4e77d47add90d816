// src/alerts/models.rs
//!
//! Shared value types for the alert engine: event timestamps, validated
//! ingestion events and attack durations.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{RelayError, Result};

/// Timestamp as supplied by the reporter: RFC 3339 text or epoch milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    Millis(i64),
    Text(String),
}

impl RawTimestamp {
    /// Blank strings count as absent, matching how reporters omit fields
    pub fn is_blank(&self) -> bool {
        matches!(self, RawTimestamp::Text(s) if s.trim().is_empty())
    }

    pub fn parse(&self, field: &str) -> Result<DateTime<Utc>> {
        match self {
            RawTimestamp::Millis(ms) => Utc.timestamp_millis_opt(*ms).single().ok_or_else(|| {
                RelayError::Validation(format!("{} is out of range: {}", field, ms))
            }),
            RawTimestamp::Text(text) => DateTime::parse_from_rfc3339(text.trim())
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| {
                    RelayError::Validation(format!("{} is not a valid timestamp: {}", field, e))
                }),
        }
    }
}

/// Format a timestamp for human-readable alert text
pub fn display_time(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// A validated attack event
#[derive(Debug, Clone, PartialEq)]
pub enum AttackEvent {
    Start {
        ip: String,
        location: String,
        start_time: DateTime<Utc>,
    },
    End {
        ip: String,
        end_time: DateTime<Utc>,
    },
}

/// A validated IP-block notification
#[derive(Debug, Clone, PartialEq)]
pub struct BlockEvent {
    pub ip: String,
    pub timestamp: DateTime<Utc>,
}

/// Elapsed time between the start and end of an attack, in whole minutes and
/// remaining seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackDuration {
    millis: i64,
}

impl AttackDuration {
    pub fn between(start: &DateTime<Utc>, end: &DateTime<Utc>) -> Option<Self> {
        let millis = (*end - *start).num_milliseconds();
        (millis >= 0).then_some(Self { millis })
    }

    pub fn minutes(&self) -> i64 {
        self.millis / 60_000
    }

    pub fn seconds(&self) -> i64 {
        (self.millis % 60_000) / 1_000
    }

    pub fn as_secs_f64(&self) -> f64 {
        self.millis as f64 / 1_000.0
    }
}

impl fmt::Display for AttackDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} minutes {} seconds", self.minutes(), self.seconds())
    }
}
