#![forbid(unsafe_code)]

pub mod db;
pub mod store;

pub use db::{Database, KEY_SETTINGS, KEY_STATS, KEY_TREE, StatsMap};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore, StoreError};
