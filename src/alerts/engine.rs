// src/alerts/engine.rs
//!
//! Alert state machine: correlates start/end events per source IP, keeps the
//! blocklist and recent-alert history, and writes snapshots after every
//! mutation. Callers serialize access (see [`crate::alerts::AlertRelay`]).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::alerts::blocklist::Blocklist;
use crate::alerts::history::{AlertEntry, AlertHistory, AlertKind};
use crate::alerts::ledger::{AttackLedger, AttackRecord, CloseOutcome, ClosedAttack};
use crate::alerts::models::{display_time, AttackEvent, BlockEvent};
use crate::error::{RelayError, Result};
use crate::logging::LogLevel;
use crate::notify::Notification;
use crate::storage::{DurableStore, StoreKey};

/// What an accepted event did to the state
#[derive(Debug, Clone, PartialEq)]
pub enum IngestOutcome {
    Started { replaced: Option<AttackRecord> },
    Ended(ClosedAttack),
    /// End event with no open attack for the IP
    CorrelationMiss { ip: String },
    Blocked { ip: String, added: bool },
}

/// Result of applying one event
#[derive(Debug, Clone)]
pub struct Ingested {
    pub outcome: IngestOutcome,
    pub notification: Notification,
    /// Set when the snapshot write failed; memory remains authoritative
    pub persistence_error: Option<String>,
}

/// Derived dashboard statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkStats {
    pub total_attacks: usize,
    /// Mean seconds from attack start to end, two decimals, or "N/A"
    pub average_response_time: String,
    #[serde(rename = "blockedIPCount")]
    pub blocked_ip_count: usize,
}

pub struct AlertEngine {
    ledger: AttackLedger,
    blocklist: Blocklist,
    history: AlertHistory,
    store: DurableStore,
    closed_count: u64,
    closed_total_secs: f64,
}

impl AlertEngine {
    /// Restore open attacks and blocked IPs from the store
    pub fn load(store: DurableStore) -> Self {
        let records: Vec<AttackRecord> = store.load(StoreKey::OngoingAttacks);
        let ips: Vec<String> = store.load(StoreKey::BlockedIps);

        let ledger = AttackLedger::from_records(records);
        let blocklist = Blocklist::from_ips(ips);
        if ledger.is_empty() && blocklist.is_empty() {
            alert_log!(LogLevel::Info, "No persisted attacks or blocked IPs, starting fresh");
        } else {
            alert_log!(
                LogLevel::Info,
                "Restored {} ongoing attacks and {} blocked IPs",
                ledger.len(),
                blocklist.len()
            );
        }

        Self {
            ledger,
            blocklist,
            history: AlertHistory::new(),
            store,
            closed_count: 0,
            closed_total_secs: 0.0,
        }
    }

    /// Apply an attack start or end event received at `now`
    pub fn apply_attack(&mut self, event: AttackEvent, now: DateTime<Utc>) -> Result<Ingested> {
        match event {
            AttackEvent::Start {
                ip,
                location,
                start_time,
            } => {
                let replaced = self.ledger.open(ip.clone(), location.clone(), start_time);
                if let Some(prev) = &replaced {
                    alert_log!(
                        LogLevel::Warn,
                        "Duplicate start for {}; replacing attack started at {}",
                        ip,
                        display_time(&prev.start_time)
                    );
                }
                let persistence_error = self.persist_ledger();

                let record = AttackRecord {
                    ip,
                    location,
                    start_time,
                };
                alert_log!(
                    LogLevel::Info,
                    "DDoS attack started ip={} location={} start={}",
                    record.ip,
                    record.location,
                    display_time(&record.start_time)
                );
                self.history.record(
                    AlertKind::AttackStarted,
                    format!(
                        "DDoS attack started from IP {} at {}",
                        record.ip,
                        display_time(&record.start_time)
                    ),
                    now,
                );

                Ok(Ingested {
                    notification: Notification::attack_started(&record),
                    outcome: IngestOutcome::Started { replaced },
                    persistence_error,
                })
            }
            AttackEvent::End { ip, end_time } => match self.ledger.close(&ip, end_time) {
                CloseOutcome::Closed(attack) => {
                    let persistence_error = self.persist_ledger();
                    self.closed_count += 1;
                    self.closed_total_secs += attack.duration.as_secs_f64();

                    alert_log!(
                        LogLevel::Info,
                        "DDoS attack ended ip={} location={} start={} end={} duration={}",
                        attack.ip,
                        attack.location,
                        display_time(&attack.start_time),
                        display_time(&attack.end_time),
                        attack.duration
                    );
                    self.history.record(
                        AlertKind::AttackEnded,
                        format!(
                            "DDoS attack ended from IP {} at {} after {}",
                            attack.ip,
                            display_time(&attack.end_time),
                            attack.duration
                        ),
                        now,
                    );

                    Ok(Ingested {
                        notification: Notification::attack_ended(&attack),
                        outcome: IngestOutcome::Ended(attack),
                        persistence_error,
                    })
                }
                CloseOutcome::NotFound => {
                    alert_log!(
                        LogLevel::Warn,
                        "DDoS attack end received with no start record ip={} end={}",
                        ip,
                        display_time(&end_time)
                    );
                    self.history.record(
                        AlertKind::UnmatchedEnd,
                        format!(
                            "DDoS attack ended from IP {} at {} (no start record found)",
                            ip,
                            display_time(&end_time)
                        ),
                        now,
                    );

                    Ok(Ingested {
                        notification: Notification::unmatched_end(&ip),
                        outcome: IngestOutcome::CorrelationMiss { ip },
                        persistence_error: None,
                    })
                }
                CloseOutcome::EndsBeforeStart { start_time } => {
                    alert_log!(
                        LogLevel::Error,
                        "End time {} precedes start time {} for {}",
                        display_time(&end_time),
                        display_time(&start_time),
                        ip
                    );
                    Err(RelayError::Validation(format!(
                        "endTime precedes the recorded startTime for {}",
                        ip
                    )))
                }
            },
        }
    }

    /// Apply an IP-block notification received at `now`. A repeated block
    /// leaves the set unchanged but still produces an alert.
    pub fn apply_block(&mut self, event: BlockEvent, now: DateTime<Utc>) -> Ingested {
        let BlockEvent { ip, timestamp } = event;
        let added = self.blocklist.block(ip.clone());

        let persistence_error = if added {
            alert_log!(LogLevel::Info, "IP blocked ip={}", ip);
            self.persist_blocklist()
        } else {
            alert_log!(LogLevel::Info, "IP already blocked ip={}", ip);
            None
        };

        let suffix = if added { "" } else { " (already blocked)" };
        self.history.record(
            AlertKind::IpBlocked,
            format!("IP {} blocked at {}{}", ip, display_time(&timestamp), suffix),
            now,
        );

        Ingested {
            notification: Notification::ip_blocked(&ip, &timestamp),
            outcome: IngestOutcome::Blocked { ip, added },
            persistence_error,
        }
    }

    pub fn ongoing_attacks(&self) -> Vec<AttackRecord> {
        self.ledger.snapshot()
    }

    pub fn recent_alerts(&self) -> Vec<AlertEntry> {
        self.history.snapshot()
    }

    pub fn blocked_ips(&self) -> Vec<String> {
        self.blocklist.snapshot()
    }

    pub fn stats(&self) -> NetworkStats {
        let average_response_time = if self.closed_count == 0 {
            "N/A".to_string()
        } else {
            format!("{:.2}", self.closed_total_secs / self.closed_count as f64)
        };

        NetworkStats {
            total_attacks: self.ledger.len(),
            average_response_time,
            blocked_ip_count: self.blocklist.len(),
        }
    }

    fn persist_ledger(&self) -> Option<String> {
        self.persist(StoreKey::OngoingAttacks, &self.ledger.snapshot())
    }

    fn persist_blocklist(&self) -> Option<String> {
        self.persist(StoreKey::BlockedIps, &self.blocklist.snapshot())
    }

    fn persist<T: Serialize>(&self, key: StoreKey, value: &T) -> Option<String> {
        match self.store.save(key, value) {
            Ok(()) => None,
            Err(e) => {
                store_log!(LogLevel::Error, "{}; keeping in-memory state", e);
                Some(e.to_string())
            }
        }
    }
}
