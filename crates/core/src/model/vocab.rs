use serde::{Deserialize, Serialize};

use crate::model::ids::EntryUid;

//
// ─── ENTRY ─────────────────────────────────────────────────────────────────────
//

/// One vocabulary row of a file: the raw term, its hanzi/pinyin/meaning
/// translation, and an optional example sentence in three renditions.
///
/// Field names serialize in the camelCase shape of the persisted record
/// (`exHan`, `exPin`, `exVi`). `uid` is absent on rows saved before uids
/// existed; `id` is the 1-based display position and is recomputed on
/// every structural change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct VocabEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<EntryUid>,
    pub id: u32,
    pub from: String,
    pub hanzi: String,
    pub pinyin: String,
    pub meaning: String,
    pub ex_han: String,
    pub ex_pin: String,
    pub ex_vi: String,
}

impl VocabEntry {
    /// A fresh entry seeded from a raw input term: `from` and `hanzi`
    /// carry the term, everything else starts empty.
    #[must_use]
    pub fn seeded(uid: EntryUid, term: &str) -> Self {
        Self {
            uid: Some(uid),
            from: term.to_owned(),
            hanzi: term.to_owned(),
            ..Self::default()
        }
    }

    /// The key presentation uses to address this row: uid when present,
    /// positional id for legacy rows.
    #[must_use]
    pub fn row_key(&self) -> RowKey {
        match self.uid {
            Some(uid) => RowKey::Uid(uid),
            None => RowKey::Position(self.id),
        }
    }

    #[must_use]
    pub fn matches_key(&self, key: &RowKey) -> bool {
        self.row_key() == *key
    }

    #[must_use]
    pub fn field(&self, field: VocabField) -> &str {
        match field {
            VocabField::From => &self.from,
            VocabField::Hanzi => &self.hanzi,
            VocabField::Pinyin => &self.pinyin,
            VocabField::Meaning => &self.meaning,
            VocabField::ExampleHanzi => &self.ex_han,
            VocabField::ExamplePinyin => &self.ex_pin,
            VocabField::ExampleTranslation => &self.ex_vi,
        }
    }

    pub fn set_field(&mut self, field: VocabField, value: impl Into<String>) {
        let value = value.into();
        match field {
            VocabField::From => self.from = value,
            VocabField::Hanzi => self.hanzi = value,
            VocabField::Pinyin => self.pinyin = value,
            VocabField::Meaning => self.meaning = value,
            VocabField::ExampleHanzi => self.ex_han = value,
            VocabField::ExamplePinyin => self.ex_pin = value,
            VocabField::ExampleTranslation => self.ex_vi = value,
        }
    }
}

/// The seven editable columns of the vocabulary table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VocabField {
    From,
    Hanzi,
    Pinyin,
    Meaning,
    ExampleHanzi,
    ExamplePinyin,
    ExampleTranslation,
}

/// Addresses one row for edit/delete: by uid when the row has one, by
/// 1-based position for rows saved before uids existed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKey {
    Uid(EntryUid),
    Position(u32),
}

//
// ─── MERGE ─────────────────────────────────────────────────────────────────────
//

/// One confirmed term from the draft phase of the editor, carrying the
/// uid of the entry it originated from (if any).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTerm {
    pub text: String,
    pub entry_uid: Option<EntryUid>,
}

impl RawTerm {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            entry_uid: None,
        }
    }

    #[must_use]
    pub fn carrying(text: impl Into<String>, uid: EntryUid) -> Self {
        Self {
            text: text.into(),
            entry_uid: Some(uid),
        }
    }
}

/// Recomputes each entry's positional id so that `id == index + 1`.
pub fn renumber(entries: &mut [VocabEntry]) {
    for (index, entry) in entries.iter_mut().enumerate() {
        entry.id = u32::try_from(index).unwrap_or(u32::MAX).saturating_add(1);
    }
}

/// Edit-preserving merge of confirmed terms against the file's current
/// entries.
///
/// A term whose uid resolves to an existing entry with unchanged raw
/// text carries that entry forward verbatim, enriched fields included.
/// A changed text keeps the uid but resets every other field; a term
/// with no prior entry gets a fresh uid. Output ids are renumbered.
#[must_use]
pub fn merge_terms(existing: &[VocabEntry], terms: &[RawTerm]) -> Vec<VocabEntry> {
    let mut merged: Vec<VocabEntry> = terms
        .iter()
        .map(|term| {
            let prior = term
                .entry_uid
                .and_then(|uid| existing.iter().find(|e| e.uid == Some(uid)));
            match (term.entry_uid, prior) {
                (Some(_), Some(entry)) if entry.from == term.text => entry.clone(),
                (Some(uid), Some(_)) => VocabEntry::seeded(uid, &term.text),
                _ => VocabEntry::seeded(EntryUid::new(), &term.text),
            }
        })
        .collect();
    renumber(&mut merged);
    merged
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn enriched(uid: EntryUid, term: &str) -> VocabEntry {
        let mut entry = VocabEntry::seeded(uid, term);
        entry.pinyin = "nǐ hǎo".into();
        entry.meaning = "xin chào".into();
        entry.ex_han = "你好吗？".into();
        entry.ex_pin = "nǐ hǎo ma?".into();
        entry.ex_vi = "Bạn khỏe không?".into();
        entry
    }

    #[test]
    fn seeded_entry_copies_term_into_from_and_hanzi() {
        let entry = VocabEntry::seeded(EntryUid::new(), "你好");
        assert_eq!(entry.from, "你好");
        assert_eq!(entry.hanzi, "你好");
        assert!(entry.pinyin.is_empty());
        assert!(entry.meaning.is_empty());
    }

    #[test]
    fn renumber_assigns_one_based_positions() {
        let mut entries = vec![
            VocabEntry::seeded(EntryUid::new(), "一"),
            VocabEntry::seeded(EntryUid::new(), "二"),
            VocabEntry::seeded(EntryUid::new(), "三"),
        ];
        renumber(&mut entries);
        assert_eq!(
            entries.iter().map(|e| e.id).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn merge_preserves_unchanged_terms_verbatim() {
        let uid = EntryUid::new();
        let existing = vec![enriched(uid, "你好")];
        let merged = merge_terms(&existing, &[RawTerm::carrying("你好", uid)]);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].pinyin, "nǐ hǎo");
        assert_eq!(merged[0].meaning, "xin chào");
        assert_eq!(merged[0].ex_han, "你好吗？");
        assert_eq!(merged[0].ex_pin, "nǐ hǎo ma?");
        assert_eq!(merged[0].ex_vi, "Bạn khỏe không?");
        assert_eq!(merged[0].id, 1);
    }

    #[test]
    fn merge_resets_fields_when_text_changes() {
        let uid = EntryUid::new();
        let existing = vec![enriched(uid, "你好")];
        let merged = merge_terms(&existing, &[RawTerm::carrying("再见", uid)]);

        assert_eq!(merged[0].uid, Some(uid));
        assert_eq!(merged[0].from, "再见");
        assert_eq!(merged[0].hanzi, "再见");
        assert!(merged[0].pinyin.is_empty());
        assert!(merged[0].meaning.is_empty());
        assert!(merged[0].ex_vi.is_empty());
    }

    #[test]
    fn merge_mints_fresh_uids_for_new_terms() {
        let merged = merge_terms(&[], &[RawTerm::new("水"), RawTerm::new("火")]);
        assert_eq!(merged.len(), 2);
        assert!(merged[0].uid.is_some());
        assert_ne!(merged[0].uid, merged[1].uid);
        assert_eq!(merged.iter().map(|e| e.id).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn merge_keeps_input_order() {
        let first = EntryUid::new();
        let second = EntryUid::new();
        let existing = vec![enriched(first, "一"), enriched(second, "二")];
        let merged = merge_terms(
            &existing,
            &[
                RawTerm::carrying("二", second),
                RawTerm::new("三"),
                RawTerm::carrying("一", first),
            ],
        );
        assert_eq!(
            merged.iter().map(|e| e.from.as_str()).collect::<Vec<_>>(),
            vec!["二", "三", "一"]
        );
        assert_eq!(merged.iter().map(|e| e.id).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn legacy_row_falls_back_to_positional_key() {
        let legacy = VocabEntry {
            id: 4,
            from: "马".into(),
            ..VocabEntry::default()
        };
        assert_eq!(legacy.row_key(), RowKey::Position(4));
        assert!(legacy.matches_key(&RowKey::Position(4)));
        assert!(!legacy.matches_key(&RowKey::Position(3)));
    }

    #[test]
    fn set_field_updates_every_column() {
        let mut entry = VocabEntry::seeded(EntryUid::new(), "马");
        entry.set_field(VocabField::Pinyin, "mǎ");
        entry.set_field(VocabField::Meaning, "con ngựa");
        entry.set_field(VocabField::ExampleTranslation, "Tôi cưỡi ngựa");
        assert_eq!(entry.field(VocabField::Pinyin), "mǎ");
        assert_eq!(entry.field(VocabField::Meaning), "con ngựa");
        assert_eq!(entry.field(VocabField::ExampleTranslation), "Tôi cưỡi ngựa");
    }

    #[test]
    fn legacy_json_without_uid_deserializes() {
        let raw = r#"{"id":2,"from":"你","hanzi":"你","pinyin":"nǐ","meaning":"bạn","exHan":"","exPin":"","exVi":""}"#;
        let entry: VocabEntry = serde_json::from_str(raw).unwrap();
        assert_eq!(entry.uid, None);
        assert_eq!(entry.id, 2);
        assert_eq!(entry.pinyin, "nǐ");
    }
}
