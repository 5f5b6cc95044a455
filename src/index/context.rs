//! Index context
//!
//! The `IndexContext` bundles everything a query reads: document metadata,
//! the vocabulary and the postings file. It is built once at startup and then
//! shared by reference; nothing in it changes afterwards.

use std::time::Instant;

use tracing::info;

use crate::config::IndexPaths;
use crate::error::Result;
use crate::index::metadata::DocumentStore;
use crate::index::postings::PostingsStore;
use crate::index::vocabulary::Vocabulary;

/// Immutable, process-wide index state
#[derive(Clone, Debug)]
pub struct IndexContext {
    documents: DocumentStore,
    vocabulary: Vocabulary,
    postings: PostingsStore,
}

impl IndexContext {
    /// Load all three index files
    ///
    /// Any failure here is fatal: there is no partially usable index.
    pub fn load(paths: &IndexPaths) -> Result<Self> {
        let start = Instant::now();

        let documents = DocumentStore::load(&paths.metadata)?;
        let vocabulary = Vocabulary::load(&paths.vocabulary)?;
        let postings = PostingsStore::open(&paths.postings)?;

        info!(
            documents = documents.len(),
            terms = vocabulary.len(),
            postings_bytes = postings.size(),
            average_length = documents.average_length(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Index loaded"
        );

        Ok(Self::new(documents, vocabulary, postings))
    }

    /// Assemble a context from already-loaded parts
    pub fn new(documents: DocumentStore, vocabulary: Vocabulary, postings: PostingsStore) -> Self {
        Self {
            documents,
            vocabulary,
            postings,
        }
    }

    pub fn documents(&self) -> &DocumentStore {
        &self.documents
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn postings(&self) -> &PostingsStore {
        &self.postings
    }

    /// Get total number of documents
    pub fn total_docs(&self) -> usize {
        self.documents.len()
    }

    /// Get average document length
    pub fn average_length(&self) -> f64 {
        self.documents.average_length()
    }
}
