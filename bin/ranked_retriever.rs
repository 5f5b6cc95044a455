use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use ranked_retriever::topics::load_topics;
use ranked_retriever::{IndexPaths, RankedHit, RetrieverConfig, Retriever, ScoringMethod};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "ranked-retriever")]
#[command(about = "Ranked retrieval over a pre-built inverted index", long_about = None)]
#[command(group(ArgGroup::new("input").required(true).args(["query", "topics"])))]
struct Args {
    /// Score function (okapi-tf, vector-space)
    #[arg(long, env = "RANKED_RETRIEVER_SCORE")]
    score: String,

    /// Search query
    #[arg(long)]
    query: Option<String>,

    /// Topics XML file with a batch of queries
    #[arg(long)]
    topics: Option<PathBuf>,

    /// Directory holding the index files
    #[arg(long, env = "RANKED_RETRIEVER_INDEX_DIR", default_value = ".")]
    index_dir: PathBuf,

    /// Vocabulary file (defaults to <index-dir>/inverted_index_terms.txt)
    #[arg(long, env = "RANKED_RETRIEVER_VOCABULARY")]
    vocabulary: Option<PathBuf>,

    /// Postings file (defaults to <index-dir>/inverted_index_postings.txt)
    #[arg(long, env = "RANKED_RETRIEVER_POSTINGS")]
    postings: Option<PathBuf>,

    /// Document metadata file (defaults to <index-dir>/docs_meta_data.txt)
    #[arg(long, env = "RANKED_RETRIEVER_METADATA")]
    metadata: Option<PathBuf>,

    /// Write results here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Print Prometheus metrics to stderr when done
    #[arg(long)]
    metrics: bool,
}

impl Args {
    fn index_paths(&self) -> IndexPaths {
        let mut paths = IndexPaths::in_dir(&self.index_dir);
        if let Some(path) = &self.vocabulary {
            paths = paths.with_vocabulary(path);
        }
        if let Some(path) = &self.postings {
            paths = paths.with_postings(path);
        }
        if let Some(path) = &self.metadata {
            paths = paths.with_metadata(path);
        }
        paths
    }
}

fn write_results(results: &BTreeMap<String, Vec<RankedHit>>, output: Option<&PathBuf>) -> Result<()> {
    match output {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("cannot create {:?}", path))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer(&mut writer, results)?;
            writer.flush()?;
            info!("Results written to {:?}", path);
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            serde_json::to_writer_pretty(&mut writer, results)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the JSON results
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    let method: ScoringMethod = match args.score.parse() {
        Ok(method) => method,
        Err(_) => {
            eprintln!("Please select a valid score function (okapi-tf, vector-space)");
            std::process::exit(1);
        }
    };

    info!("Starting ranked-retriever v{}", ranked_retriever::VERSION);

    let config = RetrieverConfig::new(args.index_paths());
    info!("Index files:");
    info!("  Vocabulary: {:?}", config.index.vocabulary);
    info!("  Postings: {:?}", config.index.postings);
    info!("  Metadata: {:?}", config.index.metadata);

    let retriever = Retriever::open(&config).context("failed to load index")?;

    let queries: BTreeMap<String, String> = match (&args.query, &args.topics) {
        (Some(query), _) => BTreeMap::from([("query".to_string(), query.clone())]),
        (None, Some(path)) => load_topics(path).context("failed to load topics")?,
        (None, None) => anyhow::bail!("either --query or --topics is required"),
    };
    info!("Running {} queries with {}", queries.len(), method);

    let results = retriever.run_batch(&queries, method);
    write_results(&results, args.output.as_ref())?;

    if args.metrics {
        eprint!("{}", retriever.metrics().gather_text()?);
    }

    Ok(())
}
