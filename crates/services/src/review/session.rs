use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::SliceRandom;

use hanyu_core::matching::{MeaningMatch, match_hanzi_or_pinyin, match_meaning};
use hanyu_core::VocabEntry;

use super::choices::{Choice, build_choices};
use crate::error::SessionError;

//
// ─── MODE & STATS ──────────────────────────────────────────────────────────────
//

/// The four review games.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    /// Pick the meaning among letter-labeled options.
    MultipleChoice,
    /// Flip the card, self-report remembered or not.
    Flashcard,
    /// See the hanzi, type the meaning.
    WriteMeaning,
    /// See the meaning, type the hanzi or the pinyin.
    WriteHanziOrPinyin,
}

/// Live counters for one session. `correct + wrong` equals the number
/// of answered questions at every point and `total` exactly at
/// completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStats {
    pub total: u32,
    pub correct: u32,
    pub wrong: u32,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    /// Words answered wrong, in answer order; duplicates stay.
    pub wrong_words: Vec<VocabEntry>,
}

impl SessionStats {
    fn fresh(total: u32, now: DateTime<Utc>) -> Self {
        Self {
            total,
            correct: 0,
            wrong: 0,
            started_at: now,
            ended_at: None,
            wrong_words: Vec::new(),
        }
    }

    #[must_use]
    pub fn answered(&self) -> u32 {
        self.correct + self.wrong
    }
}

/// Progress snapshot for rendering headers and progress bars.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    pub is_complete: bool,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One run through a shuffled copy of a file's vocabulary under one
/// game mode.
///
/// The copy is taken at start; nothing here ever touches the source
/// file. Each question accepts exactly one answer, then [`advance`]
/// moves on — there is no going back. Reaching the end stamps
/// `ended_at`; recording the result against the file's statistics is
/// the caller's job.
///
/// [`advance`]: ReviewSession::advance
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewSession {
    mode: GameMode,
    vocabulary: Vec<VocabEntry>,
    current: usize,
    answered: bool,
    stats: SessionStats,
}

impl ReviewSession {
    /// Starts a session over a shuffled copy of `entries`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyVocabulary` when there is nothing to
    /// review.
    pub fn start(
        entries: &[VocabEntry],
        mode: GameMode,
        now: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        if entries.is_empty() {
            return Err(SessionError::EmptyVocabulary);
        }
        let mut vocabulary = entries.to_vec();
        vocabulary.shuffle(&mut rand::rng());
        let total = u32::try_from(vocabulary.len()).unwrap_or(u32::MAX);
        Ok(Self {
            mode,
            vocabulary,
            current: 0,
            answered: false,
            stats: SessionStats::fresh(total, now),
        })
    }

    #[must_use]
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    #[must_use]
    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.stats.ended_at.is_some()
    }

    /// True once the current question has been answered and the session
    /// is waiting on [`ReviewSession::advance`].
    #[must_use]
    pub fn is_answered(&self) -> bool {
        self.answered
    }

    /// The word under the cursor; `None` once the session is complete.
    #[must_use]
    pub fn current(&self) -> Option<&VocabEntry> {
        if self.is_complete() {
            None
        } else {
            self.vocabulary.get(self.current)
        }
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.vocabulary.len();
        let answered = self.stats.answered() as usize;
        SessionProgress {
            total,
            answered,
            remaining: total.saturating_sub(answered),
            is_complete: self.is_complete(),
        }
    }

    /// The choice set for the current multiple-choice question. Choices
    /// are redrawn on every call; the answer check does not depend on
    /// them.
    ///
    /// # Errors
    ///
    /// `Completed` after the last question, `WrongMode` in other games.
    pub fn choices(&self, rng: &mut impl Rng) -> Result<Vec<Choice>, SessionError> {
        if self.is_complete() {
            return Err(SessionError::Completed);
        }
        if self.mode != GameMode::MultipleChoice {
            return Err(SessionError::WrongMode);
        }
        Ok(build_choices(&self.vocabulary, self.current, rng))
    }

    fn guard_answer(&self, expected: GameMode) -> Result<(), SessionError> {
        if self.is_complete() {
            return Err(SessionError::Completed);
        }
        if self.mode != expected {
            return Err(SessionError::WrongMode);
        }
        if self.answered {
            return Err(SessionError::AlreadyAnswered);
        }
        Ok(())
    }

    fn score(&mut self, correct: bool) {
        self.answered = true;
        if correct {
            self.stats.correct += 1;
        } else {
            self.stats.wrong += 1;
            self.stats.wrong_words.push(self.vocabulary[self.current].clone());
        }
    }

    /// Scores a multiple-choice pick: correct iff the selected meaning
    /// equals the prompt word's meaning.
    ///
    /// # Errors
    ///
    /// `Completed`, `WrongMode`, or `AlreadyAnswered`.
    pub fn answer_choice(&mut self, selected: &str) -> Result<bool, SessionError> {
        self.guard_answer(GameMode::MultipleChoice)?;
        let correct = selected == self.vocabulary[self.current].meaning;
        self.score(correct);
        Ok(correct)
    }

    /// Records a flashcard self-report.
    ///
    /// # Errors
    ///
    /// `Completed`, `WrongMode`, or `AlreadyAnswered`.
    pub fn answer_flashcard(&mut self, remembered: bool) -> Result<(), SessionError> {
        self.guard_answer(GameMode::Flashcard)?;
        self.score(remembered);
        Ok(())
    }

    /// Scores a typed meaning. Approximate counts as wrong; the
    /// distinction is for display only.
    ///
    /// # Errors
    ///
    /// `Completed`, `WrongMode`, or `AlreadyAnswered`.
    pub fn answer_meaning(&mut self, input: &str) -> Result<MeaningMatch, SessionError> {
        self.guard_answer(GameMode::WriteMeaning)?;
        let outcome = match_meaning(input, &self.vocabulary[self.current].meaning);
        self.score(outcome.is_correct());
        Ok(outcome)
    }

    /// Scores a typed hanzi-or-pinyin answer; `fold_tones` is the
    /// user's diacritic-insensitive matching preference.
    ///
    /// # Errors
    ///
    /// `Completed`, `WrongMode`, or `AlreadyAnswered`.
    pub fn answer_hanzi_or_pinyin(
        &mut self,
        input: &str,
        fold_tones: bool,
    ) -> Result<bool, SessionError> {
        self.guard_answer(GameMode::WriteHanziOrPinyin)?;
        let word = &self.vocabulary[self.current];
        let correct = match_hanzi_or_pinyin(input, &word.hanzi, &word.pinyin, fold_tones);
        self.score(correct);
        Ok(correct)
    }

    /// Moves past an answered question. Returns `true` when this was
    /// the last one; `ended_at` is stamped with `now` and the caller
    /// records the completed stats.
    ///
    /// # Errors
    ///
    /// `Completed` after the end, `NotAnswered` before an answer.
    pub fn advance(&mut self, now: DateTime<Utc>) -> Result<bool, SessionError> {
        if self.is_complete() {
            return Err(SessionError::Completed);
        }
        if !self.answered {
            return Err(SessionError::NotAnswered);
        }
        self.current += 1;
        self.answered = false;
        if self.current >= self.vocabulary.len() {
            self.stats.ended_at = Some(now);
            return Ok(true);
        }
        Ok(false)
    }

    /// Reshuffles this session's own vocabulary and resets the
    /// counters, keeping the mode. Usable mid-session or from the
    /// result screen.
    pub fn restart(&mut self, now: DateTime<Utc>) {
        self.vocabulary.shuffle(&mut rand::rng());
        let total = u32::try_from(self.vocabulary.len()).unwrap_or(u32::MAX);
        self.stats = SessionStats::fresh(total, now);
        self.current = 0;
        self.answered = false;
    }

    /// A fresh session over exactly the words answered wrong, shuffled,
    /// in the same mode.
    ///
    /// # Errors
    ///
    /// `SessionError::NoWrongWords` when nothing was answered wrong.
    pub fn review_wrong(&self, now: DateTime<Utc>) -> Result<Self, SessionError> {
        if self.stats.wrong_words.is_empty() {
            return Err(SessionError::NoWrongWords);
        }
        Self::start(&self.stats.wrong_words, self.mode, now)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
