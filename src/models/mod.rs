pub mod document;
pub mod search;

pub use document::{DocumentId, DocumentMeta, Posting, PostingList};
pub use search::{MatchRecord, RankedHit, ScoredResult, ScoringMethod};
