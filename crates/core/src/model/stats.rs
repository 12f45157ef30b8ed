use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Rounded success percentage, guarding the empty-session case.
#[must_use]
pub fn percent(correct: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    ((f64::from(correct) / f64::from(total)) * 100.0).round() as u32
}

/// Historical performance rollup for one file, persisted across
/// sessions in the review-statistics record (camelCase, epoch-millis
/// `lastPlayed`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct FileStatRecord {
    pub sessions: u32,
    pub total_correct: u32,
    pub total_wrong: u32,
    pub best_percent: u32,
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    pub last_played: Option<DateTime<Utc>>,
}

impl FileStatRecord {
    /// Folds one completed session into the rollup: bumps the session
    /// count, accumulates totals, keeps the best percentage, stamps
    /// `last_played`.
    pub fn record(&mut self, correct: u32, wrong: u32, total: u32, now: DateTime<Utc>) {
        self.sessions = self.sessions.saturating_add(1);
        self.total_correct = self.total_correct.saturating_add(correct);
        self.total_wrong = self.total_wrong.saturating_add(wrong);
        let pct = percent(correct, total);
        if pct > self.best_percent {
            self.best_percent = pct;
        }
        self.last_played = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn percent_rounds_and_guards_zero() {
        assert_eq!(percent(0, 0), 0);
        assert_eq!(percent(7, 10), 70);
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(10, 10), 100);
    }

    #[test]
    fn record_accumulates_across_sessions() {
        let mut rec = FileStatRecord::default();
        rec.record(7, 3, 10, fixed_now());
        rec.record(4, 1, 5, fixed_now());

        assert_eq!(rec.sessions, 2);
        assert_eq!(rec.total_correct, 11);
        assert_eq!(rec.total_wrong, 4);
        assert_eq!(rec.best_percent, 80);
        assert_eq!(rec.last_played, Some(fixed_now()));
    }

    #[test]
    fn best_percent_never_decreases() {
        let mut rec = FileStatRecord::default();
        rec.record(9, 1, 10, fixed_now());
        assert_eq!(rec.best_percent, 90);
        rec.record(1, 9, 10, fixed_now());
        assert_eq!(rec.best_percent, 90);
        rec.record(10, 0, 10, fixed_now());
        assert_eq!(rec.best_percent, 100);
    }

    #[test]
    fn persisted_shape_uses_camel_case_millis() {
        let mut rec = FileStatRecord::default();
        rec.record(7, 3, 10, fixed_now());
        let json = serde_json::to_string(&rec).unwrap();
        assert!(json.contains("totalCorrect"));
        assert!(json.contains("bestPercent"));
        assert!(json.contains("lastPlayed"));

        let back: FileStatRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rec);
    }
}
