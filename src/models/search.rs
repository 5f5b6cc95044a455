use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::document::DocumentId;
use crate::error::RetrievalError;

/// One query term hitting one document
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub term: String,
    /// Document frequency of `term`
    pub df: u32,
    /// Frequency of `term` in the matched document
    pub tf: u32,
}

/// Scored document, prior to ranking
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoredResult {
    pub doc_id: DocumentId,
    pub name: String,
    pub score: f64,
}

impl ScoredResult {
    pub fn new(doc_id: DocumentId, name: impl Into<String>, score: f64) -> Self {
        Self {
            doc_id,
            name: name.into(),
            score,
        }
    }
}

/// Emitted search hit
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RankedHit {
    pub name: String,
    /// 1-based position in the ranking
    pub rank: usize,
    pub score: f64,
}

/// Scoring formula used to rank matches
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScoringMethod {
    /// Probabilistic term weighting (BM25 family)
    OkapiTf,
    /// Cosine similarity of raw term-frequency vectors
    VectorSpace,
}

impl ScoringMethod {
    pub const ALL: [ScoringMethod; 2] = [ScoringMethod::OkapiTf, ScoringMethod::VectorSpace];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoringMethod::OkapiTf => "okapi-tf",
            ScoringMethod::VectorSpace => "vector-space",
        }
    }
}

impl fmt::Display for ScoringMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScoringMethod {
    type Err = RetrievalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "okapi-tf" => Ok(ScoringMethod::OkapiTf),
            "vector-space" => Ok(ScoringMethod::VectorSpace),
            _ => Err(RetrievalError::UnknownScorer(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoring_method_parse() {
        assert_eq!("okapi-tf".parse::<ScoringMethod>().unwrap(), ScoringMethod::OkapiTf);
        assert_eq!("Vector-Space".parse::<ScoringMethod>().unwrap(), ScoringMethod::VectorSpace);
        assert!(matches!(
            "tf-idf".parse::<ScoringMethod>(),
            Err(RetrievalError::UnknownScorer(name)) if name == "tf-idf"
        ));
    }

    #[test]
    fn test_scoring_method_display_roundtrip() {
        for method in ScoringMethod::ALL {
            assert_eq!(method.to_string().parse::<ScoringMethod>().unwrap(), method);
        }
    }

    #[test]
    fn test_ranked_hit_serializes_flat() {
        let hit = RankedHit {
            name: "Alan_Turing".to_string(),
            rank: 1,
            score: 2.5,
        };
        let json = serde_json::to_value(&hit).unwrap();
        assert_eq!(json["name"], "Alan_Turing");
        assert_eq!(json["rank"], 1);
        assert_eq!(json["score"], 2.5);
    }
}
