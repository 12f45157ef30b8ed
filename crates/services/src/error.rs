//! Shared error types for the services crate.
//!
//! Every error here is a refusal, not a fault: the operation did not
//! happen and the models are unchanged. Nothing at this layer panics or
//! aborts.

use thiserror::Error;

use hanyu_core::TreeError;

/// Refused vocabulary-editor operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EditorError {
    #[error("the editor is not in the term-input step")]
    NotDrafting,

    #[error("at least one input row must remain")]
    LastRow,

    #[error("enter at least one term before confirming")]
    NoTerms,

    #[error("no row with that key")]
    UnknownRow,
}

/// Refused review-session operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("the file has no vocabulary to review")]
    EmptyVocabulary,

    #[error("no wrong words to review")]
    NoWrongWords,

    #[error("the current question was already answered")]
    AlreadyAnswered,

    #[error("the current question has not been answered")]
    NotAnswered,

    #[error("the session is already completed")]
    Completed,

    #[error("answer does not match the session's game mode")]
    WrongMode,
}

/// Errors surfaced by the application facade.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AppError {
    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Editor(#[from] EditorError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("no file is open in the editor")]
    NoOpenFile,

    #[error("no review session is active")]
    NoActiveReview,
}
