//! Posting list text format with delta-encoded ids and positions
//!
//! One record per term, one line per record:
//!
//! ```text
//! count, gap_1, freq_1, pos_1_1, pos_1_2, ..., gap_2, freq_2, pos_2_1, ...
//! ```
//!
//! - docIDs: gaps against the previous id in the list (first against 0)
//! - positions: first absolute, then deltas against the previous position

use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::error::{Result, RetrievalError};
use crate::models::{DocumentId, Posting, PostingList};

/// Forward-only cursor over the comma separated integers of one record
struct TokenCursor<'a> {
    tokens: std::str::Split<'a, char>,
    consumed: usize,
}

impl<'a> TokenCursor<'a> {
    fn new(line: &'a str) -> Self {
        // A single trailing comma before the newline is tolerated.
        let line = line.trim_end();
        let line = line.strip_suffix(',').unwrap_or(line);
        Self {
            tokens: line.split(','),
            consumed: 0,
        }
    }

    fn next_u64(&mut self, what: &str) -> Result<u64> {
        let token = self.tokens.next().ok_or_else(|| {
            RetrievalError::decode(format!(
                "record ended after {} tokens, expected {}",
                self.consumed, what
            ))
        })?;
        self.consumed += 1;

        let token = token.trim();
        token.parse::<u64>().map_err(|_| {
            RetrievalError::decode(format!(
                "token {} ({}) is not a non-negative integer: {:?}",
                self.consumed, what, token
            ))
        })
    }

    fn next_u32(&mut self, what: &str) -> Result<u32> {
        let value = self.next_u64(what)?;
        u32::try_from(value)
            .map_err(|_| RetrievalError::decode(format!("{} {} does not fit in 32 bits", what, value)))
    }

    fn finish(mut self) -> Result<()> {
        match self.tokens.next() {
            None => Ok(()),
            Some(_) => {
                let trailing = 1 + self.tokens.count();
                Err(RetrievalError::decode(format!(
                    "{} trailing tokens after the last posting",
                    trailing
                )))
            }
        }
    }
}

/// Decode one posting-list record from a single line
pub fn decode_record(line: &str) -> Result<PostingList> {
    if line.trim().is_empty() {
        return Err(RetrievalError::decode("empty posting record"));
    }

    let mut cursor = TokenCursor::new(line);
    let count = cursor.next_u64("posting count")?;

    // Every posting needs at least three tokens; don't trust `count` for the allocation.
    let mut postings = Vec::with_capacity(count.min(line.len() as u64 / 6 + 1) as usize);
    let mut previous_id: DocumentId = 0;

    for index in 0..count {
        let gap = cursor.next_u64("document gap")?;
        if index > 0 && gap == 0 {
            return Err(RetrievalError::decode(format!(
                "zero gap at posting {}: document ids must strictly increase",
                index + 1
            )));
        }
        let doc_id = previous_id
            .checked_add(gap)
            .ok_or_else(|| RetrievalError::decode("document id overflow"))?;
        previous_id = doc_id;

        let frequency = cursor.next_u32("term frequency")?;
        if frequency == 0 {
            return Err(RetrievalError::decode(format!(
                "document {} has zero term frequency",
                doc_id
            )));
        }

        let mut positions = Vec::with_capacity(frequency.min(1024) as usize);
        let mut position = cursor.next_u32("first position")?;
        positions.push(position);
        for _ in 1..frequency {
            let delta = cursor.next_u32("position delta")?;
            if delta == 0 {
                return Err(RetrievalError::decode(format!(
                    "zero position delta in document {}: positions must strictly increase",
                    doc_id
                )));
            }
            position = position
                .checked_add(delta)
                .ok_or_else(|| RetrievalError::decode("position overflow"))?;
            positions.push(position);
        }

        postings.push(Posting {
            doc_id,
            frequency,
            positions,
        });
    }

    cursor.finish()?;
    Ok(PostingList::new(postings))
}

/// Decode the record starting at the reader's current position
pub fn decode_posting_list<R: BufRead>(reader: &mut R) -> Result<PostingList> {
    let mut buf = Vec::new();
    let read = reader.read_until(b'\n', &mut buf)?;
    if read == 0 {
        return Err(RetrievalError::decode("unexpected end of postings file"));
    }
    let line = std::str::from_utf8(&buf)
        .map_err(|e| RetrievalError::decode(format!("record is not valid UTF-8: {}", e)))?;
    decode_record(line)
}

/// Seek to `offset` and decode the record found there
pub fn read_posting_list_at<R: BufRead + Seek>(reader: &mut R, offset: u64) -> Result<PostingList> {
    reader.seek(SeekFrom::Start(offset))?;
    decode_posting_list(reader).map_err(|e| e.at_offset(offset))
}

/// Encode a posting list as one record line (with trailing newline)
///
/// Ids must be strictly ascending and each posting's positions strictly
/// increasing; this mirrors what the decoder accepts.
pub fn encode_posting_list(list: &PostingList) -> String {
    let mut tokens: Vec<String> = Vec::with_capacity(1 + list.len() * 3);
    tokens.push(list.len().to_string());

    let mut previous_id: DocumentId = 0;
    for posting in list {
        tokens.push((posting.doc_id - previous_id).to_string());
        previous_id = posting.doc_id;

        tokens.push(posting.positions.len().to_string());
        let mut previous_pos = None;
        for &pos in &posting.positions {
            let value = match previous_pos {
                None => pos,
                Some(prev) => pos - prev,
            };
            tokens.push(value.to_string());
            previous_pos = Some(pos);
        }
    }

    let mut line = tokens.join(",");
    line.push('\n');
    line
}

/// Read-only postings file
///
/// The store only remembers where the file lives. Every query opens its own
/// handle through [`PostingsStore::reader`], so seeks from concurrent queries
/// never interleave on a shared cursor.
#[derive(Clone, Debug)]
pub struct PostingsStore {
    path: PathBuf,
    size: u64,
}

impl PostingsStore {
    /// Check the postings file is present and readable
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|e| {
            RetrievalError::IndexLoad(format!("cannot open postings file {:?}: {}", path, e))
        })?;
        let size = file
            .metadata()
            .map_err(|e| RetrievalError::IndexLoad(format!("cannot stat {:?}: {}", path, e)))?
            .len();
        Ok(Self { path, size })
    }

    /// Open an independent buffered handle for one query
    pub fn reader(&self) -> Result<BufReader<File>> {
        Ok(BufReader::new(File::open(&self.path)?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size of the postings file when it was opened
    pub fn size(&self) -> u64 {
        self.size
    }
}
