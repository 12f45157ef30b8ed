use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;

use hanyu_core::{FileStatRecord, Settings, Tree};

use crate::store::{JsonFileStore, KeyValueStore, MemoryStore};

/// Record key for the folder/file tree.
pub const KEY_TREE: &str = "hanyu_tree";
/// Record key for user settings.
pub const KEY_SETTINGS: &str = "hanyu_settings";
/// Record key for per-file review statistics.
pub const KEY_STATS: &str = "hanyu_review_stats";

/// Per-file statistics map as persisted: file ids rendered as decimal
/// string keys (the legacy record shape).
pub type StatsMap = BTreeMap<String, FileStatRecord>;

/// Typed facade over the three persisted records.
///
/// Reads are load-or-default: a missing key, an unreadable backend, or
/// corrupted JSON all fall back to the caller's default. Writes are
/// fire-and-forget: failures are logged and swallowed, so the in-memory
/// model stays authoritative and persisted state may lag behind it.
pub struct Database {
    store: Box<dyn KeyValueStore>,
}

impl Database {
    /// Opens a file-backed database rooted at `dir`.
    #[must_use]
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        Self::with_store(Box::new(JsonFileStore::new(dir)))
    }

    /// An in-memory database for tests and prototyping.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::with_store(Box::new(MemoryStore::new()))
    }

    #[must_use]
    pub fn with_store(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn load_or<T: DeserializeOwned>(&self, key: &str, default: impl FnOnce() -> T) -> T {
        match self.store.read(key) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => value,
                Err(err) => {
                    log::warn!("corrupted record {key}, using default: {err}");
                    default()
                }
            },
            Ok(None) => default(),
            Err(err) => {
                log::warn!("failed to read {key}, using default: {err}");
                default()
            }
        }
    }

    fn save<T: Serialize>(&mut self, key: &str, value: &T) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(err) => {
                log::warn!("failed to serialize {key}: {err}");
                return;
            }
        };
        if let Err(err) = self.store.write(key, &raw) {
            log::warn!("failed to persist {key}: {err}");
        }
    }

    /// Loads the tree, seeding the starter tree when nothing usable is
    /// persisted. `now` stamps the starter files' creation time.
    #[must_use]
    pub fn load_tree(&self, now: DateTime<Utc>) -> Tree {
        self.load_or(KEY_TREE, || Tree::starter(now))
    }

    pub fn save_tree(&mut self, tree: &Tree) {
        self.save(KEY_TREE, tree);
    }

    #[must_use]
    pub fn load_settings(&self) -> Settings {
        self.load_or(KEY_SETTINGS, Settings::default)
    }

    pub fn save_settings(&mut self, settings: &Settings) {
        self.save(KEY_SETTINGS, settings);
    }

    #[must_use]
    pub fn load_stats(&self) -> StatsMap {
        self.load_or(KEY_STATS, StatsMap::new)
    }

    pub fn save_stats(&mut self, stats: &StatsMap) {
        self.save(KEY_STATS, stats);
    }

    /// Removes all three records as one logical reset. Best effort:
    /// every key is attempted even if an earlier removal fails.
    pub fn clear_all(&mut self) {
        for key in [KEY_TREE, KEY_SETTINGS, KEY_STATS] {
            if let Err(err) = self.store.remove(key) {
                log::warn!("failed to clear {key}: {err}");
            }
        }
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").finish_non_exhaustive()
    }
}
