//! Test fixtures for the relay
//!
//! Provides a recording notifier and helpers for building engines and relays
//! over an in-memory store.

use crate::alerts::models::{AttackEvent, BlockEvent};
use crate::alerts::{AlertEngine, AlertRelay};
use crate::error::{RelayError, Result};
use crate::notify::{Notification, Notifier};
use crate::storage::{DurableStore, SnapshotStore, StoreKey};
use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const CHANNEL: &str = "alerts-channel";

/// In-memory snapshot store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: Arc<Mutex<HashMap<StoreKey, Vec<u8>>>>,
    set_aside: Arc<Mutex<HashMap<StoreKey, Vec<u8>>>>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent writes fail, simulating a full or read-only disk
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Seed raw bytes for a key
    pub fn put_raw(&self, key: StoreKey, data: &[u8]) {
        self.data.lock().unwrap().insert(key, data.to_vec());
    }

    pub fn read_raw(&self, key: StoreKey) -> Option<Vec<u8>> {
        self.data.lock().unwrap().get(&key).cloned()
    }

    /// Bytes moved aside as corrupt
    pub fn set_aside_raw(&self, key: StoreKey) -> Option<Vec<u8>> {
        self.set_aside.lock().unwrap().get(&key).cloned()
    }

    /// Stored value for `key` parsed as JSON
    pub fn read_json(&self, key: StoreKey) -> serde_json::Value {
        serde_json::from_slice(&self.read_raw(key).unwrap()).unwrap()
    }
}

impl SnapshotStore for MemoryStore {
    fn read(&self, key: StoreKey) -> Result<Option<Vec<u8>>> {
        Ok(self.data.lock().unwrap().get(&key).cloned())
    }

    fn write(&self, key: StoreKey, data: &[u8]) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RelayError::IoError(io::Error::new(
                io::ErrorKind::Other,
                "simulated write failure",
            )));
        }
        self.data.lock().unwrap().insert(key, data.to_vec());
        Ok(())
    }

    fn set_aside(&self, key: StoreKey) -> Result<()> {
        let data = self.data.lock().unwrap().remove(&key);
        if let Some(data) = data {
            self.set_aside.lock().unwrap().insert(key, data);
        }
        Ok(())
    }
}

/// Notifier that records every message it is asked to send
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(Notification, String)>>,
    fail: AtomicBool,
    offline: AtomicBool,
    unresolvable: AtomicBool,
    delay: Mutex<Option<Duration>>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn set_unresolvable(&self, unresolvable: bool) {
        self.unresolvable.store(unresolvable, Ordering::SeqCst);
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn sent(&self) -> Vec<(Notification, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn titles(&self) -> Vec<String> {
        self.sent().into_iter().map(|(n, _)| n.title).collect()
    }
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, notification: &Notification, destination: &str) -> Result<()> {
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.sent
            .lock()
            .unwrap()
            .push((notification.clone(), destination.to_string()));
        if self.fail.load(Ordering::SeqCst) {
            return Err(RelayError::Notification("simulated outage".to_string()));
        }
        Ok(())
    }

    async fn resolves(&self, destination: &str) -> bool {
        !self.unresolvable.load(Ordering::SeqCst) && destination == CHANNEL
    }

    async fn is_online(&self) -> bool {
        !self.offline.load(Ordering::SeqCst)
    }
}

/// Epoch-millisecond timestamp
pub fn at(ms: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(ms).unwrap()
}

pub fn start(ip: &str, location: &str, ms: i64) -> AttackEvent {
    AttackEvent::Start {
        ip: ip.to_string(),
        location: location.to_string(),
        start_time: at(ms),
    }
}

pub fn end(ip: &str, ms: i64) -> AttackEvent {
    AttackEvent::End {
        ip: ip.to_string(),
        end_time: at(ms),
    }
}

pub fn block(ip: &str, ms: i64) -> BlockEvent {
    BlockEvent {
        ip: ip.to_string(),
        timestamp: at(ms),
    }
}

pub fn engine_over(store: &MemoryStore) -> AlertEngine {
    AlertEngine::load(DurableStore::new(store.clone()))
}

pub fn relay_over(store: &MemoryStore, notifier: Arc<RecordingNotifier>) -> AlertRelay {
    AlertRelay::new(
        engine_over(store),
        notifier,
        Some(CHANNEL.to_string()),
        Duration::from_millis(200),
    )
}
