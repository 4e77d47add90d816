// src/alerts/history.rs
//!
//! Bounded record of the most recent alerts, shown on the dashboard as
//! "recent activity". Never persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Number of alerts retained
pub const HISTORY_CAPACITY: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    AttackStarted,
    AttackEnded,
    /// End event without a matching start
    UnmatchedEnd,
    IpBlocked,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEntry {
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub kind: AlertKind,
}

#[derive(Debug, Clone)]
pub struct AlertHistory {
    entries: VecDeque<AlertEntry>,
    capacity: usize,
}

impl Default for AlertHistory {
    fn default() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }
}

impl AlertHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an entry, evicting the oldest once capacity is exceeded
    pub fn record(&mut self, kind: AlertKind, message: String, timestamp: DateTime<Utc>) {
        self.entries.push_back(AlertEntry {
            message,
            timestamp,
            kind,
        });
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// Entries oldest first
    pub fn snapshot(&self) -> Vec<AlertEntry> {
        self.entries.iter().cloned().collect()
    }
}
