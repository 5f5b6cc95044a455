//! Read-only access to a pre-built inverted index
//!
//! # Files
//!
//! - vocabulary: `term, offset` lines, see [`Vocabulary`]
//! - postings: one delta-encoded record per term, see [`postings`]
//! - metadata: JSON per-document statistics, see [`DocumentStore`]

mod context;
mod metadata;
pub mod postings;
mod vocabulary;

pub use context::*;
pub use metadata::*;
pub use postings::{
    decode_posting_list, decode_record, encode_posting_list, read_posting_list_at, PostingsStore,
};
pub use vocabulary::*;
