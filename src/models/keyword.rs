//! Scored keyword structures.

use serde::Serialize;

/// A keyword with one of its two scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredKeyword {
    pub term: String,
    pub score: f64,
}

/// Keywords ranked into the two disjoint buckets, best first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KeywordBuckets {
    /// Non-shopping keywords by informational score
    pub informational: Vec<ScoredKeyword>,
    /// Shopping-like keywords by shopping score
    pub shopping: Vec<ScoredKeyword>,
}

impl KeywordBuckets {
    pub fn top_informational(&self, k: usize) -> Vec<String> {
        Self::top(&self.informational, k)
    }

    pub fn top_shopping(&self, k: usize) -> Vec<String> {
        Self::top(&self.shopping, k)
    }

    fn top(ranked: &[ScoredKeyword], k: usize) -> Vec<String> {
        ranked.iter().take(k).map(|s| s.term.clone()).collect()
    }
}

/// The three keyword lists written to disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordSelection {
    pub general: Vec<String>,
    pub golden: Vec<String>,
    pub golden_shopping: Vec<String>,
}
