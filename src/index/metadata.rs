//! Document metadata store and corpus statistics

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, RetrievalError};
use crate::models::{DocumentId, DocumentMeta};

/// On-disk record; fields are optional so a missing one gets a precise error.
#[derive(Deserialize)]
struct RawDocumentMeta {
    path: Option<String>,
    length: Option<f64>,
    magnitude: Option<f64>,
}

/// Per-document statistics keyed by document id
#[derive(Clone, Debug)]
pub struct DocumentStore {
    docs: HashMap<DocumentId, DocumentMeta>,
    /// Cached average document length
    average_length: f64,
}

impl DocumentStore {
    /// Load the JSON metadata file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|e| {
            RetrievalError::MetadataLoad(format!("cannot read metadata file {:?}: {}", path, e))
        })?;
        Self::from_json(&data)
    }

    /// Parse metadata from a JSON object keyed by decimal document id
    pub fn from_json(data: &str) -> Result<Self> {
        let raw: BTreeMap<String, RawDocumentMeta> = serde_json::from_str(data)
            .map_err(|e| RetrievalError::MetadataLoad(format!("invalid metadata JSON: {}", e)))?;

        let mut docs = HashMap::with_capacity(raw.len());
        for (key, entry) in raw {
            let doc_id = key.trim().parse::<DocumentId>().map_err(|_| {
                RetrievalError::MetadataLoad(format!("document key {:?} is not an integer id", key))
            })?;
            let missing = |field: &str| {
                RetrievalError::MetadataLoad(format!("document {} is missing '{}'", doc_id, field))
            };
            let meta = DocumentMeta {
                path: entry.path.ok_or_else(|| missing("path"))?,
                length: entry.length.ok_or_else(|| missing("length"))?,
                magnitude: entry.magnitude.ok_or_else(|| missing("magnitude"))?,
            };
            // serde_json keeps the last of repeated identical keys; this catches
            // distinct keys naming the same id, such as "7" and "07".
            if docs.insert(doc_id, meta).is_some() {
                return Err(RetrievalError::MetadataLoad(format!(
                    "key {:?} names document id {} already given by another key",
                    key, doc_id
                )));
            }
        }

        Self::from_documents(docs)
    }

    /// Build a store from already-parsed documents
    pub fn from_documents(docs: impl IntoIterator<Item = (DocumentId, DocumentMeta)>) -> Result<Self> {
        let docs: HashMap<DocumentId, DocumentMeta> = docs.into_iter().collect();
        if docs.is_empty() {
            return Err(RetrievalError::MetadataLoad("metadata contains no documents".to_string()));
        }

        for (doc_id, meta) in &docs {
            if !meta.length.is_finite() || meta.length <= 0.0 {
                return Err(RetrievalError::MetadataLoad(format!(
                    "document {} has invalid length {}",
                    doc_id, meta.length
                )));
            }
            if !meta.magnitude.is_finite() || meta.magnitude < 0.0 {
                return Err(RetrievalError::MetadataLoad(format!(
                    "document {} has invalid magnitude {}",
                    doc_id, meta.magnitude
                )));
            }
        }

        let average_length = mean_length(&docs);
        Ok(Self {
            docs,
            average_length,
        })
    }

    pub fn get(&self, doc_id: DocumentId) -> Option<&DocumentMeta> {
        self.docs.get(&doc_id)
    }

    /// Total number of documents (N)
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Arithmetic mean of all document lengths
    pub fn average_length(&self) -> f64 {
        self.average_length
    }

    /// Documents in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = (DocumentId, &DocumentMeta)> {
        let mut ids: Vec<DocumentId> = self.docs.keys().copied().collect();
        ids.sort_unstable();
        ids.into_iter().map(move |id| (id, &self.docs[&id]))
    }
}

/// Summed in id order so the result does not depend on hash iteration order.
fn mean_length(docs: &HashMap<DocumentId, DocumentMeta>) -> f64 {
    let mut ids: Vec<&DocumentId> = docs.keys().collect();
    ids.sort_unstable();
    let total: f64 = ids.into_iter().map(|id| docs[id].length).sum();
    total / docs.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_length() {
        let store = DocumentStore::from_documents(vec![
            (1, DocumentMeta::new("a.txt", 10.0, 1.0)),
            (2, DocumentMeta::new("b.txt", 20.0, 1.0)),
            (3, DocumentMeta::new("c.txt", 30.0, 1.0)),
        ])
        .unwrap();

        assert_eq!(store.len(), 3);
        assert_eq!(store.average_length(), 20.0);
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "1": {"path": "corpus\\Alan_Turing.html", "length": 120, "magnitude": 14.5},
            "2": {"path": "corpus\\Ada_Lovelace.html", "length": 80, "magnitude": 9.0}
        }"#;
        let store = DocumentStore::from_json(json).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.get(1).unwrap().name(), "Alan_Turing");
        assert_eq!(store.get(2).unwrap().length, 80.0);
        assert!(store.get(3).is_none());
        assert_eq!(store.average_length(), 100.0);

        let ids: Vec<DocumentId> = store.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_missing_field_is_metadata_error() {
        let json = r#"{"1": {"path": "a.txt", "length": 10}}"#;
        let err = DocumentStore::from_json(json).unwrap_err();
        assert!(matches!(err, RetrievalError::MetadataLoad(_)));
        assert!(err.to_string().contains("magnitude"));
    }

    #[test]
    fn test_aliased_document_keys_rejected() {
        let json = r#"{
            "7": {"path": "a.txt", "length": 3, "magnitude": 1},
            "07": {"path": "b.txt", "length": 4, "magnitude": 2}
        }"#;
        let err = DocumentStore::from_json(json).unwrap_err();
        assert!(matches!(err, RetrievalError::MetadataLoad(_)));
        assert!(err.to_string().contains("document id 7"));
    }

    #[test]
    fn test_rejects_bad_documents() {
        assert!(DocumentStore::from_json("{}").is_err());
        assert!(DocumentStore::from_json("not json").is_err());
        assert!(DocumentStore::from_json(r#"{"x": {"path": "a", "length": 1, "magnitude": 1}}"#).is_err());
        assert!(DocumentStore::from_json(r#"{"1": {"path": "a", "length": 0, "magnitude": 1}}"#).is_err());
        assert!(DocumentStore::from_json(r#"{"1": {"path": "a", "length": 3, "magnitude": -1}}"#).is_err());
    }

    #[test]
    fn test_zero_magnitude_is_loadable() {
        let json = r#"{"1": {"path": "empty.txt", "length": 4, "magnitude": 0}}"#;
        let store = DocumentStore::from_json(json).unwrap();
        assert_eq!(store.get(1).unwrap().magnitude, 0.0);
    }
}
