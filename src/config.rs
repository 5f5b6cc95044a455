use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default file names written by the index builder
pub const VOCABULARY_FILE: &str = "inverted_index_terms.txt";
pub const POSTINGS_FILE: &str = "inverted_index_postings.txt";
pub const METADATA_FILE: &str = "docs_meta_data.txt";

/// Locations of the three index files
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexPaths {
    pub vocabulary: PathBuf,
    pub postings: PathBuf,
    pub metadata: PathBuf,
}

impl Default for IndexPaths {
    fn default() -> Self {
        Self::in_dir(".")
    }
}

impl IndexPaths {
    /// Index files under `dir` with their default names
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            vocabulary: dir.join(VOCABULARY_FILE),
            postings: dir.join(POSTINGS_FILE),
            metadata: dir.join(METADATA_FILE),
        }
    }

    pub fn with_vocabulary(mut self, path: impl Into<PathBuf>) -> Self {
        self.vocabulary = path.into();
        self
    }

    pub fn with_postings(mut self, path: impl Into<PathBuf>) -> Self {
        self.postings = path.into();
        self
    }

    pub fn with_metadata(mut self, path: impl Into<PathBuf>) -> Self {
        self.metadata = path.into();
        self
    }
}

/// Query normalizer configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenizerConfig {
    pub lowercase: bool,
    pub remove_stopwords: bool,
    pub stem: bool,
    pub min_token_length: usize,
    pub max_token_length: usize,
    pub language: String,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            lowercase: true,
            remove_stopwords: true,
            stem: true,
            min_token_length: 1,
            max_token_length: 50,
            language: "english".to_string(),
        }
    }
}

/// Top-level retriever configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RetrieverConfig {
    pub index: IndexPaths,
    pub tokenizer: TokenizerConfig,
}

impl RetrieverConfig {
    pub fn new(index: IndexPaths) -> Self {
        Self {
            index,
            ..Default::default()
        }
    }

    pub fn with_tokenizer(mut self, tokenizer: TokenizerConfig) -> Self {
        self.tokenizer = tokenizer;
        self
    }
}
