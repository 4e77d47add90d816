// src/alerts/mod.rs
//!
//! Alert state and ingestion.
//!
//! ```text
//!   POST /ddos-alert ──┐                        ┌──► ongoingAttacks.json
//!                      ├─► AlertRelay ─► AlertEngine ──► blockedIPs.json
//!   POST /ip-blocked ──┘        │          (ledger, blocklist, history)
//!                               ▼
//!                           Notifier (best-effort, bounded timeout)
//! ```
//!
//! All mutations go through one lock around the [`AlertEngine`], so snapshot
//! writes are never interleaved. Notification happens after the lock is
//! released.

pub mod blocklist;
pub mod engine;
pub mod history;
pub mod ledger;
pub mod models;

pub use engine::*;

use crate::error::{RelayError, Result};
use crate::logging::LogLevel;
use crate::notify::{Notification, Notifier};
use models::{AttackEvent, BlockEvent};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Outcome of handing a notification to the chat service
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    Delivered,
    Failed(String),
    TimedOut,
}

/// Acknowledgement for an accepted event
#[derive(Debug, Clone)]
pub struct Receipt {
    pub outcome: IngestOutcome,
    pub delivery: Delivery,
    pub persistence_error: Option<String>,
}

/// Serializes event ingestion over the engine and relays alerts
pub struct AlertRelay {
    engine: Mutex<AlertEngine>,
    notifier: Arc<dyn Notifier>,
    destination: Option<String>,
    notify_timeout: Duration,
}

impl AlertRelay {
    pub fn new(
        engine: AlertEngine,
        notifier: Arc<dyn Notifier>,
        destination: Option<String>,
        notify_timeout: Duration,
    ) -> Self {
        Self {
            engine: Mutex::new(engine),
            notifier,
            destination,
            notify_timeout,
        }
    }

    pub fn engine(&self) -> &Mutex<AlertEngine> {
        &self.engine
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    pub async fn ingest_attack(&self, event: AttackEvent) -> Result<Receipt> {
        let destination = self.resolve_destination().await?;
        let ingested = {
            let mut engine = self.engine.lock().await;
            engine.apply_attack(event, chrono::Utc::now())?
        };
        Ok(self.finish(ingested, &destination).await)
    }

    pub async fn ingest_block(&self, event: BlockEvent) -> Result<Receipt> {
        let destination = self.resolve_destination().await?;
        let ingested = {
            let mut engine = self.engine.lock().await;
            engine.apply_block(event, chrono::Utc::now())
        };
        Ok(self.finish(ingested, &destination).await)
    }

    async fn resolve_destination(&self) -> Result<String> {
        let Some(destination) = self.destination.as_deref() else {
            alert_log!(LogLevel::Error, "No notification channel configured");
            return Err(RelayError::DestinationUnavailable(
                "no channel configured".to_string(),
            ));
        };

        if !self.notifier.resolves(destination).await {
            alert_log!(LogLevel::Error, "Notification channel not found: {}", destination);
            return Err(RelayError::DestinationUnavailable(format!(
                "channel {} not found",
                destination
            )));
        }

        Ok(destination.to_string())
    }

    async fn finish(&self, ingested: Ingested, destination: &str) -> Receipt {
        let delivery = self.dispatch(&ingested.notification, destination).await;
        Receipt {
            outcome: ingested.outcome,
            delivery,
            persistence_error: ingested.persistence_error,
        }
    }

    async fn dispatch(&self, notification: &Notification, destination: &str) -> Delivery {
        match tokio::time::timeout(
            self.notify_timeout,
            self.notifier.send(notification, destination),
        )
        .await
        {
            Ok(Ok(())) => {
                notify_log!(LogLevel::Debug, "Delivered '{}' to {}", notification.title, destination);
                Delivery::Delivered
            }
            Ok(Err(e)) => {
                notify_log!(LogLevel::Warn, "Delivery to {} failed: {}", destination, e);
                Delivery::Failed(e.to_string())
            }
            Err(_) => {
                notify_log!(
                    LogLevel::Warn,
                    "Delivery to {} timed out after {:?}",
                    destination,
                    self.notify_timeout
                );
                Delivery::TimedOut
            }
        }
    }
}
