//! Ordering of scored results

use std::cmp::Ordering;

use crate::models::{RankedHit, ScoredResult};

/// How equal scores are ordered
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TieBreak {
    /// Keep accumulation order
    Stable,
    /// Descending document name
    NameDescending,
}

/// Scored results in final rank order
#[derive(Clone, Debug, Default)]
pub struct RankedList {
    results: Vec<ScoredResult>,
}

impl RankedList {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Results with their 1-based rank
    pub fn iter(&self) -> impl Iterator<Item = (usize, &ScoredResult)> {
        self.results.iter().enumerate().map(|(i, r)| (i + 1, r))
    }

    pub fn results(&self) -> &[ScoredResult] {
        &self.results
    }

    /// Emit the ranking as `{name, rank, score}` hits
    pub fn hits(&self) -> Vec<RankedHit> {
        self.iter()
            .map(|(rank, r)| RankedHit {
                name: r.name.clone(),
                rank,
                score: r.score,
            })
            .collect()
    }
}

/// Sort by descending score, breaking ties per `tie_break`
pub fn rank(mut results: Vec<ScoredResult>, tie_break: TieBreak) -> RankedList {
    // `sort_by` is stable, which `TieBreak::Stable` relies on.
    results.sort_by(|a, b| compare(a, b, tie_break));
    RankedList { results }
}

fn compare(a: &ScoredResult, b: &ScoredResult, tie_break: TieBreak) -> Ordering {
    let by_score = b.score.total_cmp(&a.score);
    match tie_break {
        TieBreak::Stable => by_score,
        TieBreak::NameDescending => by_score.then_with(|| b.name.cmp(&a.name)),
    }
}
