//! Scoring functions for ranked retrieval

use std::collections::HashMap;

use tracing::warn;

use crate::error::{Result, RetrievalError};
use crate::index::IndexContext;
use crate::models::{DocumentMeta, ScoredResult, ScoringMethod};
use crate::retrieval::accumulator::QueryMatches;
use crate::retrieval::ranker::{rank, RankedList, TieBreak};

/// Okapi-tf parameters (fixed, not tunable per query)
pub const OKAPI_K1: f64 = 1.0;
pub const OKAPI_B: f64 = 1.5;

/// Okapi-tf contribution of one term in one document
///
/// # Arguments
/// * `tf` - Term frequency in document
/// * `df` - Document frequency (how many documents contain the term)
/// * `total_docs` - Total number of documents in the index
/// * `doc_len` - Length of the document (in tokens)
/// * `avg_doc_len` - Average document length across all documents
///
/// The idf factor goes negative for terms in more than half the corpus and
/// is not clamped.
pub fn okapi_tf_weight(tf: f64, df: f64, total_docs: f64, doc_len: f64, avg_doc_len: f64) -> f64 {
    let idf = ((total_docs - df + 0.5) / (df + 0.5)).ln();
    let norm = (1.0 - OKAPI_B) + OKAPI_B * (doc_len / avg_doc_len);
    idf * ((OKAPI_K1 + 1.0) * tf) / (OKAPI_K1 * norm + tf)
}

/// Raw term-frequency vector of a query over its distinct terms
pub fn query_term_frequencies<S: AsRef<str>>(terms: &[S]) -> HashMap<&str, u32> {
    let mut freq = HashMap::new();
    for term in terms {
        *freq.entry(term.as_ref()).or_insert(0) += 1;
    }
    freq
}

/// Euclidean norm of a term-frequency vector
pub fn magnitude<'a>(frequencies: impl IntoIterator<Item = &'a u32>) -> f64 {
    frequencies
        .into_iter()
        .map(|&f| (f as f64) * (f as f64))
        .sum::<f64>()
        .sqrt()
}

/// Scores produced for one query before ranking
#[derive(Debug, Default)]
pub struct ScoreSet {
    pub results: Vec<ScoredResult>,
    /// Documents that could not be scored, with the reason
    pub excluded: Vec<RetrievalError>,
}

/// Ranked output of a scorer
#[derive(Debug, Default)]
pub struct Ranking {
    pub ranked: RankedList,
    pub excluded: Vec<RetrievalError>,
    /// Postings decoded to build the matches
    pub postings_read: usize,
}

/// A ranking formula over accumulated matches
pub trait Scorer: Send + Sync {
    fn method(&self) -> ScoringMethod;

    /// Order among equal scores
    fn tie_break(&self) -> TieBreak;

    /// Score every matched document, in accumulation order
    fn score_documents(
        &self,
        query_terms: &[String],
        matches: &QueryMatches,
        ctx: &IndexContext,
    ) -> Result<ScoreSet>;

    /// Score and rank
    fn score(
        &self,
        query_terms: &[String],
        matches: &QueryMatches,
        ctx: &IndexContext,
    ) -> Result<Ranking> {
        let set = self.score_documents(query_terms, matches, ctx)?;
        Ok(Ranking {
            ranked: rank(set.results, self.tie_break()),
            excluded: set.excluded,
            postings_read: matches.postings_read(),
        })
    }
}

fn document<'a>(ctx: &'a IndexContext, doc_id: u64) -> Result<&'a DocumentMeta> {
    ctx.documents()
        .get(doc_id)
        .ok_or(RetrievalError::UnknownDocument(doc_id))
}

/// Probabilistic term weighting
#[derive(Clone, Copy, Debug, Default)]
pub struct OkapiTfScorer;

impl Scorer for OkapiTfScorer {
    fn method(&self) -> ScoringMethod {
        ScoringMethod::OkapiTf
    }

    fn tie_break(&self) -> TieBreak {
        TieBreak::Stable
    }

    fn score_documents(
        &self,
        _query_terms: &[String],
        matches: &QueryMatches,
        ctx: &IndexContext,
    ) -> Result<ScoreSet> {
        let total_docs = ctx.total_docs() as f64;
        let avg_len = ctx.average_length();

        let mut results = Vec::with_capacity(matches.len());
        for (doc_id, records) in matches.iter() {
            let doc = document(ctx, doc_id)?;
            let score = records
                .iter()
                .map(|m| okapi_tf_weight(m.tf as f64, m.df as f64, total_docs, doc.length, avg_len))
                .sum();
            results.push(ScoredResult::new(doc_id, doc.name(), score));
        }

        Ok(ScoreSet {
            results,
            excluded: Vec::new(),
        })
    }
}

/// Cosine similarity of raw term-frequency vectors
///
/// Document magnitudes come from the metadata store and must be norms of the
/// full document vector, not of the matched terms only.
#[derive(Clone, Copy, Debug, Default)]
pub struct VectorSpaceScorer;

impl Scorer for VectorSpaceScorer {
    fn method(&self) -> ScoringMethod {
        ScoringMethod::VectorSpace
    }

    fn tie_break(&self) -> TieBreak {
        TieBreak::NameDescending
    }

    fn score_documents(
        &self,
        query_terms: &[String],
        matches: &QueryMatches,
        ctx: &IndexContext,
    ) -> Result<ScoreSet> {
        let query_tfs = query_term_frequencies(query_terms);
        let query_mag = magnitude(query_tfs.values());
        if query_mag == 0.0 {
            return Err(RetrievalError::DegenerateQuery);
        }

        let mut set = ScoreSet::default();
        for (doc_id, records) in matches.iter() {
            let doc = document(ctx, doc_id)?;
            if doc.magnitude == 0.0 {
                warn!(doc_id, path = %doc.path, "zero document magnitude, excluding from ranking");
                set.excluded.push(RetrievalError::DegenerateVector { doc_id });
                continue;
            }

            let dot: f64 = records
                .iter()
                .map(|m| {
                    let q_tf = query_tfs.get(m.term.as_str()).copied().unwrap_or(0);
                    m.tf as f64 * q_tf as f64
                })
                .sum();

            let score = dot / (query_mag * doc.magnitude);
            set.results.push(ScoredResult::new(doc_id, doc.name(), score));
        }

        Ok(set)
    }
}

static OKAPI_TF: OkapiTfScorer = OkapiTfScorer;
static VECTOR_SPACE: VectorSpaceScorer = VectorSpaceScorer;

/// The scorer implementing `method`
pub fn scorer_for(method: ScoringMethod) -> &'static dyn Scorer {
    match method {
        ScoringMethod::OkapiTf => &OKAPI_TF,
        ScoringMethod::VectorSpace => &VECTOR_SPACE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_okapi_tf_weight_reference_value() {
        // N = 10, df = 2, L_d = L_avg, tf = 1:
        // idf = ln(8.5 / 2.5), norm = 1, weight = idf * 2 / 2 = idf
        let w = okapi_tf_weight(1.0, 2.0, 10.0, 50.0, 50.0);
        assert!((w - (8.5f64 / 2.5).ln()).abs() < 1e-12);
    }

    #[test]
    fn test_okapi_tf_monotone_in_tf() {
        let lengths = [30.0, 50.0, 100.0, 400.0];
        for doc_len in lengths {
            let mut prev = f64::NEG_INFINITY;
            for tf in 1..50 {
                let w = okapi_tf_weight(tf as f64, 3.0, 1000.0, doc_len, 60.0);
                assert!(w >= prev, "score dropped at tf={tf}, len={doc_len}");
                prev = w;
            }
        }
    }

    #[test]
    fn test_okapi_tf_common_terms_pull_down() {
        // df > N/2 gives a negative idf that is not clamped
        let w = okapi_tf_weight(3.0, 9.0, 10.0, 50.0, 50.0);
        assert!(w < 0.0);
    }

    #[test]
    fn test_rarer_terms_score_higher() {
        let rare = okapi_tf_weight(2.0, 2.0, 1000.0, 80.0, 80.0);
        let common = okapi_tf_weight(2.0, 200.0, 1000.0, 80.0, 80.0);
        assert!(rare > common);
    }

    #[test]
    fn test_query_vector() {
        let terms = vec!["rust", "cargo", "rust"];
        let tfs = query_term_frequencies(&terms);
        assert_eq!(tfs.get("rust"), Some(&2));
        assert_eq!(tfs.get("cargo"), Some(&1));
        assert!((magnitude(tfs.values()) - 5f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_scorer_for_method() {
        for method in ScoringMethod::ALL {
            assert_eq!(scorer_for(method).method(), method);
        }
        assert_eq!(scorer_for(ScoringMethod::OkapiTf).tie_break(), TieBreak::Stable);
        assert_eq!(
            scorer_for(ScoringMethod::VectorSpace).tie_break(),
            TieBreak::NameDescending
        );
    }
}
