mod ids;
mod settings;
mod stats;
mod tree;
mod vocab;

pub use ids::{EntryUid, IdGenerator, NodeId};
pub use settings::Settings;
pub use stats::{FileStatRecord, percent};
pub use tree::{Tree, TreeError, TreeNode};
pub use vocab::{RawTerm, RowKey, VocabEntry, VocabField, merge_terms, renumber};
