use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use uuid::Uuid;

/// Unique identifier for a tree node (folder or file).
///
/// Derived from the creation timestamp in epoch milliseconds, which is
/// also how persisted data from earlier versions encoded ids.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(i64);

impl NodeId {
    #[must_use]
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the underlying i64 value
    #[must_use]
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NodeId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>().map(NodeId::new)
    }
}

/// Stable identity of one vocabulary entry, independent of display order.
///
/// Entries saved before uids existed deserialize without one; see
/// [`crate::model::RowKey`] for the fallback correlation rule.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryUid(Uuid);

impl EntryUid {
    /// Mints a fresh uid for a newly created entry.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntryUid {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EntryUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntryUid({})", self.0)
    }
}

impl fmt::Display for EntryUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Issues creation-timestamp ids, bumping past the last issued value so
/// two creations within the same millisecond never collide.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues the next id for something created at `now`.
    pub fn next(&mut self, now: DateTime<Utc>) -> NodeId {
        let mut id = now.timestamp_millis();
        if id <= self.last {
            id = self.last + 1;
        }
        self.last = id;
        NodeId::new(id)
    }

    /// Records an id loaded from persisted data so future ids stay unique.
    pub fn observe(&mut self, id: NodeId) {
        self.last = self.last.max(id.value());
    }
}
