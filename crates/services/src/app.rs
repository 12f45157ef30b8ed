use hanyu_core::matching::MeaningMatch;
use hanyu_core::{
    Clock, FileStatRecord, IdGenerator, NodeId, RowKey, Settings, Tree, TreeError, TreeNode,
    VocabField, renumber,
};
use storage::Database;

use crate::actions::TreeAction;
use crate::editor::Editor;
use crate::error::AppError;
use crate::review::{Choice, GameMode, ReviewSession};
use crate::stats;

//
// ─── ACTIVE REVIEW ─────────────────────────────────────────────────────────────
//

/// The review session currently on screen, bound to its source file so
/// completion can be recorded against it.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveReview {
    file_id: NodeId,
    session: ReviewSession,
}

impl ActiveReview {
    #[must_use]
    pub fn file_id(&self) -> NodeId {
        self.file_id
    }

    #[must_use]
    pub fn session(&self) -> &ReviewSession {
        &self.session
    }
}

//
// ─── APP ───────────────────────────────────────────────────────────────────────
//

/// The whole application state in one struct: persisted models loaded
/// at startup, plus the ephemeral editor and review session.
/// Presentation holds one instance and calls in; every mutation that
/// touches a persisted model flushes it immediately.
pub struct App {
    db: Database,
    clock: Clock,
    ids: IdGenerator,
    tree: Tree,
    settings: Settings,
    editor: Option<Editor>,
    review: Option<ActiveReview>,
}

impl App {
    /// Loads persisted state (or defaults) from `db` using the system
    /// clock.
    #[must_use]
    pub fn load(db: Database) -> Self {
        Self::load_with_clock(db, Clock::default())
    }

    /// Loads with an explicit clock; tests pass a fixed one.
    #[must_use]
    pub fn load_with_clock(db: Database, clock: Clock) -> Self {
        let now = clock.now();
        let tree = db.load_tree(now);
        let settings = db.load_settings();
        let mut ids = IdGenerator::new();
        tree.for_each_id(|id| ids.observe(id));
        Self {
            db,
            clock,
            ids,
            tree,
            settings,
            editor: None,
            review: None,
        }
    }

    #[must_use]
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn editor(&self) -> Option<&Editor> {
        self.editor.as_ref()
    }

    #[must_use]
    pub fn review(&self) -> Option<&ActiveReview> {
        self.review.as_ref()
    }

    /// Historical statistics for one file, if it was ever played.
    #[must_use]
    pub fn file_stats(&self, file_id: NodeId) -> Option<FileStatRecord> {
        stats::for_file(&self.db, file_id)
    }

    //
    // ─── TREE ──────────────────────────────────────────────────────────────
    //

    /// Dispatches one tree action. On success the tree is flushed; on
    /// refusal nothing changed anywhere.
    ///
    /// # Errors
    ///
    /// Propagates the underlying `TreeError`.
    pub fn apply(&mut self, action: TreeAction) -> Result<(), TreeError> {
        match action {
            TreeAction::CreateFolder { parent, name } => {
                self.create_folder(parent, &name).map(|_| ())
            }
            TreeAction::CreateFile { parent, name } => {
                self.create_file(parent, &name).map(|_| ())
            }
            TreeAction::Rename { id, name } => {
                self.tree.rename(id, &name)?;
                self.db.save_tree(&self.tree);
                Ok(())
            }
            TreeAction::Delete { id } => self.delete_item(id),
            TreeAction::ToggleOpen { id } => {
                self.tree.toggle_open(id)?;
                self.db.save_tree(&self.tree);
                Ok(())
            }
        }
    }

    /// Creates a folder and returns its fresh id.
    ///
    /// # Errors
    ///
    /// `TreeError::EmptyName` on blank input.
    pub fn create_folder(
        &mut self,
        parent: Option<NodeId>,
        name: &str,
    ) -> Result<NodeId, TreeError> {
        let id = self.ids.next(self.clock.now());
        let created = self.tree.create_folder(parent, name, id)?;
        self.db.save_tree(&self.tree);
        Ok(created)
    }

    /// Creates an empty vocabulary file and returns its fresh id.
    ///
    /// # Errors
    ///
    /// `TreeError::EmptyName` on blank input.
    pub fn create_file(
        &mut self,
        parent: Option<NodeId>,
        name: &str,
    ) -> Result<NodeId, TreeError> {
        let now = self.clock.now();
        let id = self.ids.next(now);
        let created = self.tree.create_file(parent, name, id, now)?;
        self.db.save_tree(&self.tree);
        Ok(created)
    }

    fn delete_item(&mut self, id: NodeId) -> Result<(), TreeError> {
        self.tree.delete(id)?;
        // ephemeral state bound to a deleted file dies with it
        if self
            .editor
            .as_ref()
            .is_some_and(|e| self.tree.find(e.file_id()).is_none())
        {
            self.editor = None;
        }
        if self
            .review
            .as_ref()
            .is_some_and(|r| self.tree.find(r.file_id).is_none())
        {
            self.review = None;
        }
        self.db.save_tree(&self.tree);
        Ok(())
    }

    //
    // ─── EDITOR ────────────────────────────────────────────────────────────
    //

    /// Opens a file in the vocabulary editor.
    ///
    /// # Errors
    ///
    /// `TreeError::NotFound` on a stale id, `TreeError::NotAFile` on a
    /// folder.
    pub fn open_file(&mut self, id: NodeId) -> Result<(), AppError> {
        let node = self.tree.find(id).ok_or(TreeError::NotFound(id))?;
        if !node.is_file() {
            return Err(TreeError::NotAFile(id).into());
        }
        let existing = node.vocab().unwrap_or_default();
        self.editor = Some(Editor::open(id, existing));
        Ok(())
    }

    pub fn close_editor(&mut self) {
        self.editor = None;
    }

    fn open_editor_mut(&mut self) -> Result<&mut Editor, AppError> {
        self.editor.as_mut().ok_or(AppError::NoOpenFile)
    }

    /// Inserts a blank draft row (after `after`, or at the end).
    ///
    /// # Errors
    ///
    /// `AppError::NoOpenFile` or an `EditorError`.
    pub fn add_draft_row(&mut self, after: Option<u64>) -> Result<u64, AppError> {
        Ok(self.open_editor_mut()?.add_row(after)?)
    }

    /// Replaces one draft row's text.
    ///
    /// # Errors
    ///
    /// `AppError::NoOpenFile` or an `EditorError`.
    pub fn set_draft_text(&mut self, row_id: u64, text: &str) -> Result<(), AppError> {
        Ok(self.open_editor_mut()?.set_text(row_id, text)?)
    }

    /// Deletes one draft row; the last remaining row is refused.
    ///
    /// # Errors
    ///
    /// `AppError::NoOpenFile` or an `EditorError`.
    pub fn delete_draft_row(&mut self, row_id: u64) -> Result<(), AppError> {
        Ok(self.open_editor_mut()?.delete_row(row_id)?)
    }

    /// Returns from the table to the term-input step, seeding the rows
    /// from the file's current entries.
    ///
    /// # Errors
    ///
    /// `AppError::NoOpenFile` when no editor is open.
    pub fn edit_terms(&mut self) -> Result<(), AppError> {
        let editor = self.editor.as_mut().ok_or(AppError::NoOpenFile)?;
        let entries = self
            .tree
            .find(editor.file_id())
            .and_then(TreeNode::vocab)
            .unwrap_or_default()
            .to_vec();
        editor.begin_redraft(&entries);
        Ok(())
    }

    /// Confirms the drafted terms: merges them edit-preservingly into
    /// the file's vocabulary, attaches the result, and flushes. Returns
    /// the new entry count.
    ///
    /// # Errors
    ///
    /// `AppError::NoOpenFile`, an `EditorError`, or a `TreeError` if
    /// the file vanished.
    pub fn confirm_terms(&mut self) -> Result<usize, AppError> {
        let editor = self.editor.as_mut().ok_or(AppError::NoOpenFile)?;
        let file_id = editor.file_id();
        let existing = self
            .tree
            .find(file_id)
            .and_then(TreeNode::vocab)
            .unwrap_or_default()
            .to_vec();
        let merged = editor.confirm(&existing)?;
        let count = merged.len();
        self.tree.attach_vocabulary(file_id, merged)?;
        self.db.save_tree(&self.tree);
        Ok(count)
    }

    /// Edits one field of one table row, addressed by its row key. The
    /// value is trimmed, as the table cells do.
    ///
    /// # Errors
    ///
    /// `AppError::NoOpenFile` or `EditorError::UnknownRow`.
    pub fn edit_entry_field(
        &mut self,
        key: RowKey,
        field: VocabField,
        value: &str,
    ) -> Result<(), AppError> {
        let file_id = self.editor.as_ref().ok_or(AppError::NoOpenFile)?.file_id();
        let rows = self
            .tree
            .vocab_mut(file_id)
            .ok_or(crate::error::EditorError::UnknownRow)?;
        let entry = rows
            .iter_mut()
            .find(|e| e.matches_key(&key))
            .ok_or(crate::error::EditorError::UnknownRow)?;
        entry.set_field(field, value.trim());
        self.db.save_tree(&self.tree);
        Ok(())
    }

    /// Deletes one table row and renumbers the rest.
    ///
    /// # Errors
    ///
    /// `AppError::NoOpenFile` or `EditorError::UnknownRow`.
    pub fn delete_entry(&mut self, key: RowKey) -> Result<(), AppError> {
        let file_id = self.editor.as_ref().ok_or(AppError::NoOpenFile)?.file_id();
        let rows = self
            .tree
            .vocab_mut(file_id)
            .ok_or(crate::error::EditorError::UnknownRow)?;
        let index = rows
            .iter()
            .position(|e| e.matches_key(&key))
            .ok_or(crate::error::EditorError::UnknownRow)?;
        rows.remove(index);
        renumber(rows);
        self.db.save_tree(&self.tree);
        Ok(())
    }

    //
    // ─── REVIEW ────────────────────────────────────────────────────────────
    //

    /// Starts a review session over a file's vocabulary.
    ///
    /// # Errors
    ///
    /// `TreeError::NotFound` on a stale id or
    /// `SessionError::EmptyVocabulary` when the file has no words.
    pub fn start_review(&mut self, file_id: NodeId, mode: GameMode) -> Result<(), AppError> {
        let node = self.tree.find(file_id).ok_or(TreeError::NotFound(file_id))?;
        let entries = node.vocab().unwrap_or_default();
        let session = ReviewSession::start(entries, mode, self.clock.now())?;
        self.review = Some(ActiveReview { file_id, session });
        Ok(())
    }

    pub fn end_review(&mut self) {
        self.review = None;
    }

    fn active_session_mut(&mut self) -> Result<&mut ReviewSession, AppError> {
        self.review
            .as_mut()
            .map(|r| &mut r.session)
            .ok_or(AppError::NoActiveReview)
    }

    /// The choice set for the current multiple-choice question.
    ///
    /// # Errors
    ///
    /// `AppError::NoActiveReview` or a `SessionError`.
    pub fn review_choices(&self) -> Result<Vec<Choice>, AppError> {
        let review = self.review.as_ref().ok_or(AppError::NoActiveReview)?;
        Ok(review.session.choices(&mut rand::rng())?)
    }

    /// # Errors
    ///
    /// `AppError::NoActiveReview` or a `SessionError`.
    pub fn answer_choice(&mut self, selected: &str) -> Result<bool, AppError> {
        Ok(self.active_session_mut()?.answer_choice(selected)?)
    }

    /// # Errors
    ///
    /// `AppError::NoActiveReview` or a `SessionError`.
    pub fn answer_flashcard(&mut self, remembered: bool) -> Result<(), AppError> {
        Ok(self.active_session_mut()?.answer_flashcard(remembered)?)
    }

    /// # Errors
    ///
    /// `AppError::NoActiveReview` or a `SessionError`.
    pub fn answer_meaning(&mut self, input: &str) -> Result<MeaningMatch, AppError> {
        Ok(self.active_session_mut()?.answer_meaning(input)?)
    }

    /// Scores a hanzi-or-pinyin answer under the user's tone-matching
    /// preference.
    ///
    /// # Errors
    ///
    /// `AppError::NoActiveReview` or a `SessionError`.
    pub fn answer_hanzi_or_pinyin(&mut self, input: &str) -> Result<bool, AppError> {
        let fold = self.settings.pinyin_on;
        Ok(self
            .active_session_mut()?
            .answer_hanzi_or_pinyin(input, fold)?)
    }

    /// Moves to the next question. On completion the session's result
    /// is rolled into the file's persisted statistics and `true` is
    /// returned.
    ///
    /// # Errors
    ///
    /// `AppError::NoActiveReview` or a `SessionError`.
    pub fn advance_review(&mut self) -> Result<bool, AppError> {
        let now = self.clock.now();
        let review = self.review.as_mut().ok_or(AppError::NoActiveReview)?;
        let completed = review.session.advance(now)?;
        if completed {
            stats::record_completion(&mut self.db, review.file_id, review.session.stats(), now);
        }
        Ok(completed)
    }

    /// Reshuffles the current session and resets its counters.
    ///
    /// # Errors
    ///
    /// `AppError::NoActiveReview` when nothing is being reviewed.
    pub fn restart_review(&mut self) -> Result<(), AppError> {
        let now = self.clock.now();
        self.active_session_mut()?.restart(now);
        Ok(())
    }

    /// Swaps the active session for one over its wrong words.
    ///
    /// # Errors
    ///
    /// `AppError::NoActiveReview` or `SessionError::NoWrongWords`.
    pub fn review_wrong_words(&mut self) -> Result<(), AppError> {
        let now = self.clock.now();
        let review = self.review.as_mut().ok_or(AppError::NoActiveReview)?;
        review.session = review.session.review_wrong(now)?;
        Ok(())
    }

    //
    // ─── SETTINGS & RESET ──────────────────────────────────────────────────
    //

    /// Replaces the settings and flushes them.
    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
        self.db.save_settings(&self.settings);
    }

    /// Flips dark mode, flushes, returns the new state.
    pub fn toggle_dark_mode(&mut self) -> bool {
        self.settings.dark_mode = !self.settings.dark_mode;
        self.db.save_settings(&self.settings);
        self.settings.dark_mode
    }

    /// Saves a new display name. Blank input is a no-op and returns
    /// `false`.
    pub fn set_username(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        self.settings.username = name.to_owned();
        self.db.save_settings(&self.settings);
        true
    }

    /// Wipes all three persisted records and resets in-memory state to
    /// first-run defaults.
    pub fn clear_all_data(&mut self) {
        self.db.clear_all();
        let now = self.clock.now();
        self.tree = Tree::starter(now);
        self.settings = Settings::default();
        self.editor = None;
        self.review = None;
        let mut ids = IdGenerator::new();
        self.tree.for_each_id(|id| ids.observe(id));
        self.ids = ids;
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("nodes", &self.tree.node_count())
            .field("editor_open", &self.editor.is_some())
            .field("review_active", &self.review.is_some())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
