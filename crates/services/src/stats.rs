//! Per-file statistics rollup, persisted across sessions.

use chrono::{DateTime, Utc};

use hanyu_core::{FileStatRecord, NodeId};
use storage::Database;

use crate::review::SessionStats;

/// Folds one completed session into the file's persisted record. A
/// first-seen file gets a zero record initialized; every call counts as
/// one more session.
pub fn record_completion(
    db: &mut Database,
    file_id: NodeId,
    stats: &SessionStats,
    now: DateTime<Utc>,
) {
    let mut all = db.load_stats();
    all.entry(file_id.to_string())
        .or_default()
        .record(stats.correct, stats.wrong, stats.total, now);
    db.save_stats(&all);
}

/// The persisted record for one file, or `None` if it was never played.
/// Never fabricates a zero record.
#[must_use]
pub fn for_file(db: &Database, file_id: NodeId) -> Option<FileStatRecord> {
    let mut all = db.load_stats();
    all.remove(&file_id.to_string())
}
