//! Per-document match accumulation for one query

use std::collections::{HashMap, HashSet};
use std::io::{BufRead, Seek};

use tracing::debug;

use crate::error::Result;
use crate::index::{read_posting_list_at, Vocabulary};
use crate::models::{DocumentId, MatchRecord};

/// Documents hit by a query, in the order they were first seen
#[derive(Clone, Debug, Default)]
pub struct QueryMatches {
    slots: HashMap<DocumentId, usize>,
    entries: Vec<(DocumentId, Vec<MatchRecord>)>,
    postings_read: usize,
}

impl QueryMatches {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a match record to a document
    pub fn push(&mut self, doc_id: DocumentId, record: MatchRecord) {
        let slot = match self.slots.get(&doc_id) {
            Some(&slot) => slot,
            None => {
                let slot = self.entries.len();
                self.slots.insert(doc_id, slot);
                self.entries.push((doc_id, Vec::new()));
                slot
            }
        };
        self.entries[slot].1.push(record);
    }

    pub fn get(&self, doc_id: DocumentId) -> Option<&[MatchRecord]> {
        self.slots
            .get(&doc_id)
            .map(|&slot| self.entries[slot].1.as_slice())
    }

    /// Number of matched documents
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of postings decoded while accumulating
    pub fn postings_read(&self) -> usize {
        self.postings_read
    }

    /// Matched documents in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (DocumentId, &[MatchRecord])> {
        self.entries
            .iter()
            .map(|(doc_id, records)| (*doc_id, records.as_slice()))
    }
}

/// Collect matches for `terms` from the postings behind `reader`
///
/// Each distinct term is decoded once, in first-occurrence order. Terms the
/// vocabulary does not know contribute nothing. Returns `Ok(None)` when no
/// term matched any document.
pub fn accumulate<R, S>(terms: &[S], vocabulary: &Vocabulary, reader: &mut R) -> Result<Option<QueryMatches>>
where
    R: BufRead + Seek,
    S: AsRef<str>,
{
    let mut matches = QueryMatches::new();
    let mut seen = HashSet::with_capacity(terms.len());

    for term in terms {
        let term = term.as_ref();
        if !seen.insert(term) {
            continue;
        }

        let Some(offset) = vocabulary.lookup(term) else {
            debug!(term, "term not in vocabulary, skipping");
            continue;
        };

        let list = read_posting_list_at(reader, offset)?;
        let df = list.document_frequency() as u32;
        matches.postings_read += list.len();

        for posting in &list {
            matches.push(
                posting.doc_id,
                MatchRecord {
                    term: term.to_string(),
                    df,
                    tf: posting.frequency,
                },
            );
        }
    }

    if matches.is_empty() {
        Ok(None)
    } else {
        Ok(Some(matches))
    }
}
