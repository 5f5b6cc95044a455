use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;
use stop_words::{get, LANGUAGE};
use tracing::warn;
use unicode_segmentation::UnicodeSegmentation;

use crate::config::TokenizerConfig;

/// Query normalizer: word splitting, case folding, stopword removal, stemming
///
/// Produces terms in the same normalized form the index was built with, so
/// they can be looked up in the vocabulary directly.
pub struct Tokenizer {
    config: TokenizerConfig,
    stemmer: Option<Stemmer>,
    stopwords: HashSet<String>,
}

fn language_tables(language: &str) -> (Algorithm, LANGUAGE) {
    match language.to_lowercase().as_str() {
        "english" | "en" => (Algorithm::English, LANGUAGE::English),
        "french" | "fr" => (Algorithm::French, LANGUAGE::French),
        "german" | "de" => (Algorithm::German, LANGUAGE::German),
        "spanish" | "es" => (Algorithm::Spanish, LANGUAGE::Spanish),
        "italian" | "it" => (Algorithm::Italian, LANGUAGE::Italian),
        "portuguese" | "pt" => (Algorithm::Portuguese, LANGUAGE::Portuguese),
        "dutch" | "nl" => (Algorithm::Dutch, LANGUAGE::Dutch),
        "swedish" | "sv" => (Algorithm::Swedish, LANGUAGE::Swedish),
        other => {
            warn!("Unsupported tokenizer language '{}', using english", other);
            (Algorithm::English, LANGUAGE::English)
        }
    }
}

impl Tokenizer {
    /// Create a new tokenizer from configuration
    pub fn new(config: &TokenizerConfig) -> Self {
        let (algorithm, stopword_language) = language_tables(&config.language);

        let stemmer = if config.stem {
            Some(Stemmer::create(algorithm))
        } else {
            None
        };

        let stopwords = if config.remove_stopwords {
            get(stopword_language)
                .into_iter()
                .map(|s| s.to_lowercase())
                .collect()
        } else {
            HashSet::new()
        };

        Self {
            config: config.clone(),
            stemmer,
            stopwords,
        }
    }

    /// Normalize raw query text into index terms
    ///
    /// Order is preserved and repeated terms are kept; the vector-space
    /// scorer counts them as query term frequency.
    pub fn normalize(&self, text: &str) -> Vec<String> {
        let mut tokens: Vec<String> = text
            .unicode_words()
            .map(|word| {
                if self.config.lowercase {
                    word.to_lowercase()
                } else {
                    word.to_string()
                }
            })
            .filter(|token| {
                let len = token.chars().count();
                len >= self.config.min_token_length
                    && len <= self.config.max_token_length
                    && !self.stopwords.contains(token)
            })
            .collect();

        if let Some(stemmer) = &self.stemmer {
            tokens = tokens
                .into_iter()
                .map(|token| stemmer.stem(&token).to_string())
                .collect();
        }

        tokens
    }
}
