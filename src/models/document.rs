use serde::{Deserialize, Serialize};

/// Unique document identifier
pub type DocumentId = u64;

/// Per-document statistics recorded at index build time
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DocumentMeta {
    /// Source path of the document
    pub path: String,
    /// Token count
    pub length: f64,
    /// Euclidean norm of the document's full raw term-frequency vector
    pub magnitude: f64,
}

impl DocumentMeta {
    pub fn new(path: impl Into<String>, length: f64, magnitude: f64) -> Self {
        Self {
            path: path.into(),
            length,
            magnitude,
        }
    }

    /// Display name: last path segment, cut at its first `.`
    pub fn name(&self) -> &str {
        let file = self
            .path
            .rsplit(|c| c == '/' || c == '\\')
            .next()
            .unwrap_or(&self.path);
        file.split('.').next().unwrap_or(file)
    }
}

/// One term's occurrences in one document
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub doc_id: DocumentId,
    /// Term frequency; always equal to `positions.len()`
    pub frequency: u32,
    /// Strictly increasing token positions
    pub positions: Vec<u32>,
}

impl Posting {
    pub fn new(doc_id: DocumentId, positions: Vec<u32>) -> Self {
        Self {
            doc_id,
            frequency: positions.len() as u32,
            positions,
        }
    }
}

/// All postings of a term, ascending by document id
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingList {
    pub postings: Vec<Posting>,
}

impl PostingList {
    pub fn new(postings: Vec<Posting>) -> Self {
        Self { postings }
    }

    /// Get the document frequency (number of documents containing this term)
    pub fn document_frequency(&self) -> usize {
        self.postings.len()
    }

    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Posting> {
        self.postings.iter()
    }
}

impl<'a> IntoIterator for &'a PostingList {
    type Item = &'a Posting;
    type IntoIter = std::slice::Iter<'a, Posting>;

    fn into_iter(self) -> Self::IntoIter {
        self.postings.iter()
    }
}
