//! Vocabulary: term -> byte offset of the term's posting record

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{Result, RetrievalError};

/// Term lookup table for the postings file
///
/// Loaded once from a line-oriented `term, offset` file and never mutated.
#[derive(Clone, Debug, Default)]
pub struct Vocabulary {
    offsets: HashMap<String, u64>,
}

impl Vocabulary {
    /// Load the vocabulary file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            RetrievalError::IndexLoad(format!("cannot open vocabulary file {:?}: {}", path, e))
        })?;
        Self::parse(BufReader::new(file))
    }

    /// Parse `term, offset` lines from any buffered reader
    pub fn parse<R: BufRead>(reader: R) -> Result<Self> {
        let mut offsets = HashMap::new();

        for (idx, line) in reader.lines().enumerate() {
            let line_no = idx + 1;
            let line = line.map_err(|e| {
                RetrievalError::IndexLoad(format!("vocabulary line {}: {}", line_no, e))
            })?;
            let line = line.trim_end_matches(['\r', '\n']);
            if line.trim().is_empty() {
                continue;
            }

            let (term, offset) = line.rsplit_once(", ").ok_or_else(|| {
                RetrievalError::IndexLoad(format!(
                    "vocabulary line {}: expected 'term, offset', got {:?}",
                    line_no, line
                ))
            })?;
            if term.is_empty() {
                return Err(RetrievalError::IndexLoad(format!(
                    "vocabulary line {}: empty term",
                    line_no
                )));
            }
            let offset = offset.trim().parse::<u64>().map_err(|_| {
                RetrievalError::IndexLoad(format!(
                    "vocabulary line {}: offset {:?} is not a non-negative integer",
                    line_no, offset
                ))
            })?;

            if offsets.insert(term.to_string(), offset).is_some() {
                return Err(RetrievalError::IndexLoad(format!(
                    "vocabulary line {}: duplicate term {:?}",
                    line_no, term
                )));
            }
        }

        Ok(Self { offsets })
    }

    /// Byte offset of `term`'s posting record, if the term is indexed
    pub fn lookup(&self, term: &str) -> Option<u64> {
        self.offsets.get(term).copied()
    }

    pub fn contains(&self, term: &str) -> bool {
        self.offsets.contains_key(term)
    }

    /// Get the number of terms
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.offsets.iter().map(|(term, offset)| (term.as_str(), *offset))
    }
}

impl FromIterator<(String, u64)> for Vocabulary {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        Self {
            offsets: iter.into_iter().collect(),
        }
    }
}
