// src/storage/mod.rs
//!
//! Durable snapshots of relay state.
//!
//! Each logical key holds one JSON collection that is overwritten wholesale on
//! every mutation:
//! - `ongoingAttacks.json`: list of `{ip, location, startTime}`
//! - `blockedIPs.json`: list of IP strings
//!
//! Reads never fail towards the caller. Entries are decoded one at a time, so
//! a single bad entry is logged and skipped while the rest still load. A
//! snapshot that is not a JSON list at all is moved aside to
//! `<file>.corrupt` before anything overwrites it, and loads as empty.

use crate::error::{RelayError, Result};
use crate::logging::LogLevel;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Logical persistence keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    OngoingAttacks,
    BlockedIps,
}

impl StoreKey {
    pub fn file_name(&self) -> &'static str {
        match self {
            StoreKey::OngoingAttacks => "ongoingAttacks.json",
            StoreKey::BlockedIps => "blockedIPs.json",
        }
    }
}

/// Raw byte storage behind the snapshot keys
pub trait SnapshotStore: Send + Sync {
    /// `Ok(None)` when nothing has been written for `key` yet
    fn read(&self, key: StoreKey) -> Result<Option<Vec<u8>>>;
    /// Replace the stored bytes for `key` in one step
    fn write(&self, key: StoreKey, data: &[u8]) -> Result<()>;
    /// Move unreadable bytes for `key` out of the way of the next write
    fn set_aside(&self, key: StoreKey) -> Result<()>;
}

/// Snapshots as JSON files in a directory
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open the store, creating the directory if needed
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| {
            RelayError::ConfigError(format!(
                "Failed to create state directory {}: {}",
                dir.display(),
                e
            ))
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: StoreKey) -> PathBuf {
        self.dir.join(key.file_name())
    }

    pub fn set_aside_path_for(&self, key: StoreKey) -> PathBuf {
        self.path_for(key).with_extension("json.corrupt")
    }
}

impl SnapshotStore for JsonFileStore {
    fn read(&self, key: StoreKey) -> Result<Option<Vec<u8>>> {
        match fs::read(self.path_for(key)) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: StoreKey, data: &[u8]) -> Result<()> {
        let path = self.path_for(key);
        let temp_path = path.with_extension("json.tmp");

        fs::write(&temp_path, data)?;
        // Rename is atomic on the same filesystem, so readers never see a torn file
        if let Err(e) = fs::rename(&temp_path, &path) {
            fs::remove_file(&temp_path).ok();
            return Err(e.into());
        }

        Ok(())
    }

    fn set_aside(&self, key: StoreKey) -> Result<()> {
        fs::rename(self.path_for(key), self.set_aside_path_for(key))?;
        Ok(())
    }
}

/// Typed JSON layer over a [`SnapshotStore`]
pub struct DurableStore {
    backend: Box<dyn SnapshotStore>,
}

impl DurableStore {
    pub fn new(backend: impl SnapshotStore + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    /// Load the list stored under `key`, skipping entries that do not decode
    pub fn load<T: DeserializeOwned>(&self, key: StoreKey) -> Vec<T> {
        let data = match self.backend.read(key) {
            Ok(Some(data)) => data,
            Ok(None) => {
                store_log!(LogLevel::Debug, "No snapshot for {}, starting empty", key.file_name());
                return Vec::new();
            }
            Err(e) => {
                store_log!(
                    LogLevel::Error,
                    "Error reading snapshot {}: {}; starting empty",
                    key.file_name(),
                    e
                );
                return Vec::new();
            }
        };

        if data.iter().all(u8::is_ascii_whitespace) {
            return Vec::new();
        }

        let entries: Vec<Value> = match serde_json::from_slice(&data) {
            Ok(entries) => entries,
            Err(e) => {
                store_log!(
                    LogLevel::Error,
                    "Corrupt snapshot {}: {}; starting empty",
                    key.file_name(),
                    e
                );
                self.set_aside(key);
                return Vec::new();
            }
        };

        entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| {
                let text = entry.to_string();
                match serde_json::from_value(entry) {
                    Ok(item) => Some(item),
                    Err(e) => {
                        store_log!(
                            LogLevel::Warn,
                            "Skipping entry {} of {} ({}): {}",
                            index,
                            key.file_name(),
                            text,
                            e
                        );
                        None
                    }
                }
            })
            .collect()
    }

    fn set_aside(&self, key: StoreKey) {
        match self.backend.set_aside(key) {
            Ok(()) => store_log!(LogLevel::Warn, "Moved corrupt {} aside", key.file_name()),
            Err(e) => store_log!(
                LogLevel::Error,
                "Could not move corrupt {} aside: {}",
                key.file_name(),
                e
            ),
        }
    }

    /// Overwrite the collection stored under `key`
    pub fn save<T: Serialize + ?Sized>(&self, key: StoreKey, value: &T) -> Result<()> {
        let data = serde_json::to_vec_pretty(value)?;
        self.backend.write(key, &data).map_err(|e| {
            RelayError::Persistence(format!("Failed to write {}: {}", key.file_name(), e))
        })
    }
}
