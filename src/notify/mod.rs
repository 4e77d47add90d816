// src/notify/mod.rs
//!
//! Outbound notification channel.
//!
//! The engine builds a [`Notification`] for every accepted event and hands it
//! to a [`Notifier`] together with the destination identifier. Delivery is
//! best-effort: failures are logged by the caller and never undo state changes.

pub mod discord;

use crate::alerts::ledger::{AttackRecord, ClosedAttack};
use crate::alerts::models::display_time;
use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const COLOR_RED: u32 = 0xff0000;
pub const COLOR_GREEN: u32 = 0x00ff00;

/// A formatted chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub color: u32,
    pub footer: String,
}

impl Notification {
    pub fn attack_started(record: &AttackRecord) -> Self {
        Self {
            title: "🚨 **DDoS Attack Started** 🚨".to_string(),
            description: format!(
                "**IP:** {}\n**Location:** {}\n**Start Time:** {}",
                record.ip,
                record.location,
                display_time(&record.start_time)
            ),
            color: COLOR_RED,
            footer: "⚠️ Immediate action required! ⚠️".to_string(),
        }
    }

    pub fn attack_ended(attack: &ClosedAttack) -> Self {
        Self {
            title: "✅ **DDoS Attack Ended** ✅".to_string(),
            description: format!(
                "**IP:** {}\n**Location:** {}\n**Start Time:** {}\n**End Time:** {}\n**Duration:** {}",
                attack.ip,
                attack.location,
                display_time(&attack.start_time),
                display_time(&attack.end_time),
                attack.duration
            ),
            color: COLOR_GREEN,
            footer: "🔍 The attack has ended. Monitor for any further issues.".to_string(),
        }
    }

    pub fn unmatched_end(ip: &str) -> Self {
        Self {
            title: "⚠️ **DDoS Attack Ended** ⚠️".to_string(),
            description: format!("**IP:** {} (no start record found)", ip),
            color: COLOR_RED,
            footer: "🚨 No start record found for this IP. Investigate further.".to_string(),
        }
    }

    pub fn ip_blocked(ip: &str, timestamp: &DateTime<Utc>) -> Self {
        Self {
            title: "🚫 **IP Blocked** 🚫".to_string(),
            description: format!(
                "**IP:** {}\n**Status:** Blocked\n**Timestamp:** {}",
                ip,
                display_time(timestamp)
            ),
            color: COLOR_RED,
            footer: "⚠️ Action taken due to suspicious activity. ⚠️".to_string(),
        }
    }
}

/// Chat service the relay posts alerts to
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver `notification` to `destination`
    async fn send(&self, notification: &Notification, destination: &str) -> Result<()>;

    /// Whether `destination` is known and can receive messages
    async fn resolves(&self, destination: &str) -> bool;

    /// Whether the service is currently reachable and authenticated
    async fn is_online(&self) -> bool;
}

/// Notifier used when no credential is configured: offline, resolves nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifier;

#[async_trait::async_trait]
impl Notifier for NullNotifier {
    async fn send(&self, _notification: &Notification, destination: &str) -> Result<()> {
        Err(crate::error::RelayError::DestinationUnavailable(format!(
            "no notification service configured for {}",
            destination
        )))
    }

    async fn resolves(&self, _destination: &str) -> bool {
        false
    }

    async fn is_online(&self) -> bool {
        false
    }
}
