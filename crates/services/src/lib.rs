#![forbid(unsafe_code)]

pub mod actions;
pub mod app;
pub mod editor;
pub mod error;
pub mod review;
pub mod stats;

pub use hanyu_core::Clock;

pub use actions::TreeAction;
pub use app::{ActiveReview, App};
pub use editor::{DraftRow, Editor};
pub use error::{AppError, EditorError, SessionError};
pub use review::{Choice, GameMode, ReviewSession, SessionProgress, SessionStats};
