use thiserror::Error;

use crate::models::DocumentId;

/// Main error type for retrieval operations
#[derive(Error, Debug)]
pub enum RetrievalError {
    #[error("Index load error: {0}")]
    IndexLoad(String),

    #[error("Metadata load error: {0}")]
    MetadataLoad(String),

    #[error("Posting decode error at offset {offset}: {reason}")]
    PostingDecode { offset: u64, reason: String },

    #[error("Document {0} is referenced by a posting list but missing from the metadata store")]
    UnknownDocument(DocumentId),

    #[error("Degenerate vector: document {doc_id} has zero magnitude")]
    DegenerateVector { doc_id: DocumentId },

    #[error("Degenerate vector: query has no terms to weight")]
    DegenerateQuery,

    #[error("Topics load error: {0}")]
    TopicsLoad(String),

    #[error("Unknown score function '{0}' (expected okapi-tf or vector-space)")]
    UnknownScorer(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for retrieval operations
pub type Result<T> = std::result::Result<T, RetrievalError>;

impl RetrievalError {
    /// Decode failure for a record whose start offset is not known to the caller
    pub(crate) fn decode(reason: impl Into<String>) -> Self {
        RetrievalError::PostingDecode {
            offset: 0,
            reason: reason.into(),
        }
    }

    /// Re-tag a decode failure with the offset of the record being read
    pub(crate) fn at_offset(self, at: u64) -> Self {
        match self {
            RetrievalError::PostingDecode { reason, .. } => {
                RetrievalError::PostingDecode { offset: at, reason }
            }
            other => other,
        }
    }

    /// Load-time failures leave no usable index; the process should stop.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            RetrievalError::IndexLoad(_)
                | RetrievalError::MetadataLoad(_)
                | RetrievalError::TopicsLoad(_)
        )
    }
}
