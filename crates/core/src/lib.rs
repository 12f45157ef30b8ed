#![forbid(unsafe_code)]

pub mod matching;
pub mod model;
pub mod time;

pub use matching::{MeaningMatch, fold_diacritics, match_hanzi_or_pinyin, match_meaning};
pub use model::{
    EntryUid, FileStatRecord, IdGenerator, NodeId, RawTerm, RowKey, Settings, Tree, TreeError,
    TreeNode, VocabEntry, VocabField, merge_terms, percent, renumber,
};
pub use time::Clock;
