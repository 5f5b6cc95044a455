pub mod config;
pub mod error;
pub mod index;
pub mod metrics;
pub mod models;
pub mod retrieval;
pub mod tokenizer;
pub mod topics;

pub use config::{IndexPaths, RetrieverConfig, TokenizerConfig};
pub use error::{Result, RetrievalError};
pub use index::IndexContext;
pub use metrics::RetrievalMetrics;
pub use models::*;
pub use retrieval::{QueryOutcome, Retriever};
pub use tokenizer::Tokenizer;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
