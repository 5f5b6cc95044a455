//! Query entry point: normalize, accumulate, score, rank

use std::collections::BTreeMap;
use std::io::{BufRead, Seek};
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info};

use crate::config::{RetrieverConfig, TokenizerConfig};
use crate::error::Result;
use crate::index::IndexContext;
use crate::metrics::RetrievalMetrics;
use crate::models::{RankedHit, ScoringMethod};
use crate::retrieval::accumulator::accumulate;
use crate::retrieval::scoring::{scorer_for, Ranking, Scorer};
use crate::tokenizer::Tokenizer;

/// Result of one query
#[derive(Debug)]
pub enum QueryOutcome {
    /// At least one query term matched a document
    Ranked(Ranking),
    /// No query term is in the vocabulary
    NoMatch,
}

impl QueryOutcome {
    pub fn is_no_match(&self) -> bool {
        matches!(self, QueryOutcome::NoMatch)
    }

    pub fn ranking(&self) -> Option<&Ranking> {
        match self {
            QueryOutcome::Ranked(ranking) => Some(ranking),
            QueryOutcome::NoMatch => None,
        }
    }

    /// Emitted hits; empty for a no-match outcome
    pub fn hits(&self) -> Vec<RankedHit> {
        self.ranking()
            .map(|r| r.ranked.hits())
            .unwrap_or_default()
    }
}

/// Run one query over normalized terms with an explicit postings reader
pub fn retrieve<R: BufRead + Seek>(
    terms: &[String],
    scorer: &dyn Scorer,
    ctx: &IndexContext,
    reader: &mut R,
) -> Result<QueryOutcome> {
    match accumulate(terms, ctx.vocabulary(), reader)? {
        None => Ok(QueryOutcome::NoMatch),
        Some(matches) => Ok(QueryOutcome::Ranked(scorer.score(terms, &matches, ctx)?)),
    }
}

/// Ranked retrieval over a loaded index
pub struct Retriever {
    ctx: Arc<IndexContext>,
    tokenizer: Tokenizer,
    metrics: RetrievalMetrics,
}

impl Retriever {
    pub fn new(ctx: Arc<IndexContext>, tokenizer_config: &TokenizerConfig) -> Self {
        let metrics = RetrievalMetrics::default();
        metrics.set_index_size(ctx.total_docs(), ctx.vocabulary().len());
        Self {
            ctx,
            tokenizer: Tokenizer::new(tokenizer_config),
            metrics,
        }
    }

    /// Load the index named by `config` and build a retriever over it
    pub fn open(config: &RetrieverConfig) -> Result<Self> {
        let ctx = IndexContext::load(&config.index)?;
        Ok(Self::new(Arc::new(ctx), &config.tokenizer))
    }

    pub fn context(&self) -> &Arc<IndexContext> {
        &self.ctx
    }

    pub fn metrics(&self) -> &RetrievalMetrics {
        &self.metrics
    }

    /// Normalize raw query text into index terms
    pub fn normalize(&self, query: &str) -> Vec<String> {
        self.tokenizer.normalize(query)
    }

    /// Run a raw text query
    pub fn search(&self, query: &str, method: ScoringMethod) -> Result<QueryOutcome> {
        info!(query, scorer = %method, "Querying index");
        let terms = self.normalize(query);
        debug!(?terms, "normalized query");
        self.search_terms(&terms, method)
    }

    /// Run a query over already-normalized terms
    ///
    /// Opens a fresh postings handle, so concurrent calls never share a cursor.
    pub fn search_terms(&self, terms: &[String], method: ScoringMethod) -> Result<QueryOutcome> {
        let start = Instant::now();
        let scorer = scorer_for(method);

        let outcome = self
            .ctx
            .postings()
            .reader()
            .and_then(|mut reader| retrieve(terms, scorer, &self.ctx, &mut reader));

        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(e) => {
                self.metrics.record_query_error();
                return Err(e);
            }
        };

        let elapsed = start.elapsed();
        match &outcome {
            QueryOutcome::NoMatch => {
                self.metrics.record_no_match(method.as_str());
                info!("No match found");
            }
            QueryOutcome::Ranked(ranking) => {
                self.metrics
                    .record_query(method.as_str(), elapsed.as_secs_f64(), ranking.postings_read);
                self.metrics.record_excluded(ranking.excluded.len());
                info!(
                    matches = ranking.ranked.len() + ranking.excluded.len(),
                    ranked = ranking.ranked.len(),
                    excluded = ranking.excluded.len(),
                    elapsed_ms = elapsed.as_secs_f64() * 1000.0,
                    "Query complete"
                );
            }
        }

        Ok(outcome)
    }

    /// Run a batch of `{query id -> raw text}` queries
    ///
    /// A failed query is logged and left out; so is a query without matches.
    pub fn run_batch(
        &self,
        queries: &BTreeMap<String, String>,
        method: ScoringMethod,
    ) -> BTreeMap<String, Vec<RankedHit>> {
        let mut results = BTreeMap::new();
        for (id, text) in queries {
            match self.search(text, method) {
                Ok(QueryOutcome::Ranked(ranking)) => {
                    results.insert(id.clone(), ranking.ranked.hits());
                }
                Ok(QueryOutcome::NoMatch) => {}
                Err(e) => error!(query_id = %id, "Query failed: {}", e),
            }
        }
        results
    }
}
