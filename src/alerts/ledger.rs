// src/alerts/ledger.rs
//!
//! Attacks currently in progress, keyed by source IP.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::alerts::models::{AttackDuration, RawTimestamp};

/// One open attack. Serialized form is the persisted and served layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttackRecord {
    pub ip: String,
    pub location: String,
    /// Written as RFC 3339; older snapshots may hold epoch milliseconds
    #[serde(deserialize_with = "stored_start_time")]
    pub start_time: DateTime<Utc>,
}

fn stored_start_time<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    RawTimestamp::deserialize(deserializer)?
        .parse("startTime")
        .map_err(serde::de::Error::custom)
}

/// An attack that has been closed by a matching end event
#[derive(Debug, Clone, PartialEq)]
pub struct ClosedAttack {
    pub ip: String,
    pub location: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration: AttackDuration,
}

/// Result of closing an attack
#[derive(Debug, Clone, PartialEq)]
pub enum CloseOutcome {
    Closed(ClosedAttack),
    /// No open record for the IP
    NotFound,
    /// The end precedes the recorded start; the record is left open
    EndsBeforeStart { start_time: DateTime<Utc> },
}

/// Set of open attacks, at most one per source IP, in start order
#[derive(Debug, Clone, Default)]
pub struct AttackLedger {
    records: Vec<AttackRecord>,
}

impl AttackLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from a persisted snapshot. Later duplicates replace earlier ones.
    pub fn from_records(records: Vec<AttackRecord>) -> Self {
        let mut ledger = Self::new();
        for record in records {
            ledger.open(record.ip, record.location, record.start_time);
        }
        ledger
    }

    /// Open an attack for `ip`. A repeated start replaces the open record and
    /// resets its clock. Returns the replaced record, if any.
    pub fn open(
        &mut self,
        ip: String,
        location: String,
        start_time: DateTime<Utc>,
    ) -> Option<AttackRecord> {
        let replaced = self.take(&ip);
        self.records.push(AttackRecord {
            ip,
            location,
            start_time,
        });
        replaced
    }

    pub fn close(&mut self, ip: &str, end_time: DateTime<Utc>) -> CloseOutcome {
        let Some(record) = self.get(ip) else {
            return CloseOutcome::NotFound;
        };

        let Some(duration) = AttackDuration::between(&record.start_time, &end_time) else {
            return CloseOutcome::EndsBeforeStart {
                start_time: record.start_time,
            };
        };

        match self.take(ip) {
            Some(record) => CloseOutcome::Closed(ClosedAttack {
                ip: record.ip,
                location: record.location,
                start_time: record.start_time,
                end_time,
                duration,
            }),
            None => CloseOutcome::NotFound,
        }
    }

    pub fn get(&self, ip: &str) -> Option<&AttackRecord> {
        self.records.iter().find(|r| r.ip == ip)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn snapshot(&self) -> Vec<AttackRecord> {
        self.records.clone()
    }

    fn take(&mut self, ip: &str) -> Option<AttackRecord> {
        let index = self.records.iter().position(|r| r.ip == ip)?;
        Some(self.records.remove(index))
    }
}
