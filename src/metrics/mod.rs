use prometheus::{
    Counter, CounterVec, Encoder, Gauge, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

/// Prometheus metrics for query processing
#[derive(Clone)]
pub struct RetrievalMetrics {
    // Counters
    pub queries_total: CounterVec,
    pub no_match_total: Counter,
    pub query_errors: Counter,
    pub excluded_documents: Counter,
    pub postings_read: Counter,

    // Gauges
    pub indexed_documents: Gauge,
    pub vocabulary_terms: Gauge,

    // Histograms
    pub query_latency: HistogramVec,

    // Registry
    registry: Arc<Registry>,
}

impl RetrievalMetrics {
    /// Create a new RetrievalMetrics instance
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        // Counters
        let queries_total = CounterVec::new(
            Opts::new("ranked_retriever_queries_total", "Total number of queries by scorer"),
            &["scorer"],
        )?;
        registry.register(Box::new(queries_total.clone()))?;

        let no_match_total = Counter::with_opts(Opts::new(
            "ranked_retriever_no_match_total",
            "Queries whose terms were all absent from the vocabulary",
        ))?;
        registry.register(Box::new(no_match_total.clone()))?;

        let query_errors = Counter::with_opts(Opts::new(
            "ranked_retriever_query_errors_total",
            "Queries aborted by an error",
        ))?;
        registry.register(Box::new(query_errors.clone()))?;

        let excluded_documents = Counter::with_opts(Opts::new(
            "ranked_retriever_excluded_documents_total",
            "Matched documents left out of a ranking because they could not be scored",
        ))?;
        registry.register(Box::new(excluded_documents.clone()))?;

        let postings_read = Counter::with_opts(Opts::new(
            "ranked_retriever_postings_read_total",
            "Postings decoded from the postings file",
        ))?;
        registry.register(Box::new(postings_read.clone()))?;

        // Gauges
        let indexed_documents = Gauge::with_opts(Opts::new(
            "ranked_retriever_indexed_documents",
            "Documents in the loaded metadata store",
        ))?;
        registry.register(Box::new(indexed_documents.clone()))?;

        let vocabulary_terms = Gauge::with_opts(Opts::new(
            "ranked_retriever_vocabulary_terms",
            "Terms in the loaded vocabulary",
        ))?;
        registry.register(Box::new(vocabulary_terms.clone()))?;

        // Histograms
        let query_latency = HistogramVec::new(
            HistogramOpts::new("ranked_retriever_query_latency_seconds", "Query latency")
                .buckets(vec![0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]),
            &["scorer"],
        )?;
        registry.register(Box::new(query_latency.clone()))?;

        Ok(Self {
            queries_total,
            no_match_total,
            query_errors,
            excluded_documents,
            postings_read,
            indexed_documents,
            vocabulary_terms,
            query_latency,
            registry: Arc::new(registry),
        })
    }

    /// Get the Prometheus registry
    pub fn registry(&self) -> Arc<Registry> {
        self.registry.clone()
    }

    /// Record index size after load
    pub fn set_index_size(&self, documents: usize, terms: usize) {
        self.indexed_documents.set(documents as f64);
        self.vocabulary_terms.set(terms as f64);
    }

    /// Record a completed query
    pub fn record_query(&self, scorer: &str, duration_secs: f64, postings_read: usize) {
        self.queries_total.with_label_values(&[scorer]).inc();
        self.query_latency
            .with_label_values(&[scorer])
            .observe(duration_secs);
        self.postings_read.inc_by(postings_read as f64);
    }

    /// Record a query that matched nothing
    pub fn record_no_match(&self, scorer: &str) {
        self.queries_total.with_label_values(&[scorer]).inc();
        self.no_match_total.inc();
    }

    /// Record a failed query
    pub fn record_query_error(&self) {
        self.query_errors.inc();
    }

    /// Record documents excluded from a ranking
    pub fn record_excluded(&self, count: usize) {
        self.excluded_documents.inc_by(count as f64);
    }

    /// Render all metrics in the Prometheus text format
    pub fn gather_text(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

impl Default for RetrievalMetrics {
    fn default() -> Self {
        Self::new().expect("Failed to create metrics")
    }
}
