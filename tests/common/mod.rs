//! Writes small on-disk indexes for integration tests

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use ranked_retriever::index::encode_posting_list;
use ranked_retriever::{
    IndexPaths, Posting, PostingList, Retriever, RetrieverConfig, TokenizerConfig,
};
use tempfile::TempDir;

/// A document given as its already-normalized token stream
pub struct FixtureDoc {
    pub id: u64,
    pub path: &'static str,
    pub tokens: Vec<&'static str>,
}

pub fn doc(id: u64, path: &'static str, text: &'static str) -> FixtureDoc {
    FixtureDoc {
        id,
        path,
        tokens: text.split_whitespace().collect(),
    }
}

/// Index files for `docs` written into a fresh temp dir
///
/// Magnitudes are norms of each document's full term-frequency vector.
pub fn write_index(docs: &[FixtureDoc]) -> (TempDir, IndexPaths) {
    let tmp = TempDir::new().unwrap();
    let paths = IndexPaths::in_dir(tmp.path());

    let mut postings: BTreeMap<&str, Vec<Posting>> = BTreeMap::new();
    let mut metadata = Vec::new();

    let mut sorted: Vec<&FixtureDoc> = docs.iter().collect();
    sorted.sort_by_key(|d| d.id);

    for d in sorted {
        let mut positions: BTreeMap<&str, Vec<u32>> = BTreeMap::new();
        for (pos, term) in d.tokens.iter().enumerate() {
            positions.entry(*term).or_default().push(pos as u32);
        }

        let magnitude = positions
            .values()
            .map(|p| (p.len() * p.len()) as f64)
            .sum::<f64>()
            .sqrt();
        metadata.push((d.id, d.path, d.tokens.len() as f64, magnitude));

        for (term, pos) in positions {
            postings.entry(term).or_default().push(Posting::new(d.id, pos));
        }
    }

    write_postings(
        &paths,
        postings
            .into_iter()
            .map(|(t, p)| (t.to_string(), PostingList::new(p))),
    );
    write_metadata(&paths.metadata, &metadata);

    (tmp, paths)
}

/// Write postings and a matching vocabulary
pub fn write_postings(paths: &IndexPaths, lists: impl IntoIterator<Item = (String, PostingList)>) {
    let mut data = String::new();
    let mut vocab = String::new();
    for (term, list) in lists {
        vocab.push_str(&format!("{}, {}\n", term, data.len()));
        data.push_str(&encode_posting_list(&list));
    }
    fs::write(&paths.postings, data).unwrap();
    fs::write(&paths.vocabulary, vocab).unwrap();
}

/// Write a metadata file from `(id, path, length, magnitude)` rows
pub fn write_metadata(path: &Path, docs: &[(u64, &str, f64, f64)]) {
    let map: serde_json::Map<String, serde_json::Value> = docs
        .iter()
        .map(|(id, p, len, mag)| {
            (
                id.to_string(),
                serde_json::json!({"path": p, "length": len, "magnitude": mag}),
            )
        })
        .collect();
    fs::write(path, serde_json::Value::Object(map).to_string()).unwrap();
}

/// Six documents; `rust` and `garden` appear in two each
pub fn corpus() -> Vec<FixtureDoc> {
    vec![
        doc(1, "corpus\\Rust_Lang.html", "rust rust rust program"),
        doc(2, "corpus\\Rust_Cargo.html", "rust program languag cargo"),
        doc(3, "corpus\\Python.html", "python program languag"),
        doc(4, "corpus/Garden_Tools.html", "garden tool tool shed"),
        doc(5, "corpus/Flowers.html", "garden flower"),
        doc(6, "corpus/Painting.html", "shed paint brush"),
    ]
}

pub fn terms(list: &[&str]) -> Vec<String> {
    list.iter().map(|t| t.to_string()).collect()
}

/// A retriever that stems but keeps stopwords
pub fn open(paths: &IndexPaths) -> Retriever {
    let tokenizer = TokenizerConfig {
        remove_stopwords: false,
        ..TokenizerConfig::default()
    };
    Retriever::open(&RetrieverConfig::new(paths.clone()).with_tokenizer(tokenizer)).unwrap()
}

/// Okapi-tf weight computed independently of the library
pub fn okapi(tf: f64, df: f64, n: f64, len: f64, avg: f64) -> f64 {
    let idf = ((n - df + 0.5) / (df + 0.5)).ln();
    idf * (2.0 * tf) / ((-0.5 + 1.5 * len / avg) + tf)
}

pub fn names(hits: &[ranked_retriever::RankedHit]) -> Vec<&str> {
    hits.iter().map(|h| h.name.as_str()).collect()
}
