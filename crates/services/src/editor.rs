use hanyu_core::{EntryUid, NodeId, RawTerm, VocabEntry, merge_terms};

use crate::error::EditorError;

//
// ─── DRAFT ROWS ────────────────────────────────────────────────────────────────
//

/// One input row of the term-entry step. `entry_uid` carries the
/// identity of the vocabulary entry the row was rebuilt from, so
/// confirming an unchanged term preserves its enriched fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftRow {
    row_id: u64,
    text: String,
    entry_uid: Option<EntryUid>,
}

impl DraftRow {
    #[must_use]
    pub fn row_id(&self) -> u64 {
        self.row_id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn entry_uid(&self) -> Option<EntryUid> {
        self.entry_uid
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Phase {
    Drafting(Vec<DraftRow>),
    Enriching,
}

//
// ─── EDITOR ────────────────────────────────────────────────────────────────────
//

/// Two-phase editor for one file's vocabulary.
///
/// `Drafting` collects raw terms, one per row; `confirm` runs the
/// edit-preserving merge against the file's current entries and moves to
/// `Enriching`, where the table is edited field-by-field through the
/// tree. Editing terms again rebuilds the draft rows from the entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Editor {
    file_id: NodeId,
    phase: Phase,
    next_row_id: u64,
}

/// Number of blank rows offered when drafting starts from nothing.
const FRESH_DRAFT_ROWS: usize = 3;

impl Editor {
    /// Opens the editor for a file: straight to the table when the file
    /// already has vocabulary, otherwise the term-input step with a few
    /// blank rows.
    #[must_use]
    pub fn open(file_id: NodeId, existing: &[VocabEntry]) -> Self {
        let mut editor = Self {
            file_id,
            phase: Phase::Enriching,
            next_row_id: 0,
        };
        if existing.is_empty() {
            let rows = (0..FRESH_DRAFT_ROWS).map(|_| editor.blank_row()).collect();
            editor.phase = Phase::Drafting(rows);
        }
        editor
    }

    #[must_use]
    pub fn file_id(&self) -> NodeId {
        self.file_id
    }

    #[must_use]
    pub fn is_drafting(&self) -> bool {
        matches!(self.phase, Phase::Drafting(_))
    }

    /// The current draft rows; `None` outside the term-input step.
    #[must_use]
    pub fn draft_rows(&self) -> Option<&[DraftRow]> {
        match &self.phase {
            Phase::Drafting(rows) => Some(rows),
            Phase::Enriching => None,
        }
    }

    fn blank_row(&mut self) -> DraftRow {
        self.next_row_id += 1;
        DraftRow {
            row_id: self.next_row_id,
            text: String::new(),
            entry_uid: None,
        }
    }

    fn checked_rows_mut(&mut self) -> Result<&mut Vec<DraftRow>, EditorError> {
        match &mut self.phase {
            Phase::Drafting(rows) => Ok(rows),
            Phase::Enriching => Err(EditorError::NotDrafting),
        }
    }

    /// Inserts a blank row after `after` (or appends) and returns its id.
    ///
    /// # Errors
    ///
    /// `EditorError::NotDrafting` outside the term-input step.
    pub fn add_row(&mut self, after: Option<u64>) -> Result<u64, EditorError> {
        if !self.is_drafting() {
            return Err(EditorError::NotDrafting);
        }
        let row = self.blank_row();
        let row_id = row.row_id;
        let rows = self.checked_rows_mut()?;
        match after.and_then(|id| rows.iter().position(|r| r.row_id == id)) {
            Some(index) => rows.insert(index + 1, row),
            None => rows.push(row),
        }
        Ok(row_id)
    }

    /// Replaces one row's text.
    ///
    /// # Errors
    ///
    /// `NotDrafting` outside the term-input step, `UnknownRow` on a
    /// stale row id.
    pub fn set_text(&mut self, row_id: u64, text: impl Into<String>) -> Result<(), EditorError> {
        let rows = self.checked_rows_mut()?;
        let row = rows
            .iter_mut()
            .find(|r| r.row_id == row_id)
            .ok_or(EditorError::UnknownRow)?;
        row.text = text.into();
        Ok(())
    }

    /// Removes one draft row.
    ///
    /// # Errors
    ///
    /// `LastRow` when only one row remains; the row stays.
    pub fn delete_row(&mut self, row_id: u64) -> Result<(), EditorError> {
        let rows = self.checked_rows_mut()?;
        if rows.len() <= 1 {
            return Err(EditorError::LastRow);
        }
        let index = rows
            .iter()
            .position(|r| r.row_id == row_id)
            .ok_or(EditorError::UnknownRow)?;
        rows.remove(index);
        Ok(())
    }

    /// Returns from the table to the term-input step, rebuilding the
    /// draft rows from the file's current entries (so unchanged terms
    /// keep their identity through the next confirm).
    pub fn begin_redraft(&mut self, entries: &[VocabEntry]) {
        let mut rows: Vec<DraftRow> = entries
            .iter()
            .map(|entry| {
                self.next_row_id += 1;
                DraftRow {
                    row_id: self.next_row_id,
                    text: entry.from.clone(),
                    entry_uid: entry.uid,
                }
            })
            .collect();
        if rows.is_empty() {
            rows.extend((0..FRESH_DRAFT_ROWS).map(|_| self.blank_row()));
        }
        self.phase = Phase::Drafting(rows);
    }

    /// Confirms the draft: blank rows are dropped, the remaining terms
    /// are merged edit-preservingly against `existing`, and the editor
    /// moves to the table step. Returns the merged entries for the
    /// caller to attach to the file.
    ///
    /// # Errors
    ///
    /// `NotDrafting` outside the term-input step; `NoTerms` when every
    /// row is blank (the draft is kept as-is).
    pub fn confirm(&mut self, existing: &[VocabEntry]) -> Result<Vec<VocabEntry>, EditorError> {
        let rows = self.checked_rows_mut()?;
        let terms: Vec<RawTerm> = rows
            .iter()
            .filter(|r| !r.text.trim().is_empty())
            .map(|r| RawTerm {
                text: r.text.clone(),
                entry_uid: r.entry_uid,
            })
            .collect();
        if terms.is_empty() {
            return Err(EditorError::NoTerms);
        }
        let merged = merge_terms(existing, &terms);
        self.phase = Phase::Enriching;
        Ok(merged)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
