// src/merge/mod.rs
//! Cross-source merge: matcher + ranker.

pub mod matcher;
pub mod rank;

pub use matcher::{match_stories, MatchCandidate};
pub use rank::{rank, MergedStory};

use crate::ingest::types::Story;
use crate::similarity::DEFAULT_SIMILARITY_THRESHOLD;

pub const DEFAULT_MIN_MATCH_SCORE: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchConfig {
    /// Minimum Jaro similarity for two strings to count as the same value.
    pub threshold: f64,
    /// Minimum match score to keep a pair (2 = title+url, 3 = also author).
    pub min_score: u8,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SIMILARITY_THRESHOLD,
            min_score: DEFAULT_MIN_MATCH_SCORE,
        }
    }
}

/// Match + rank in one call. Pure: same inputs, same output.
pub fn build_merged(
    hacker_news: &[Story],
    new_york_times: &[Story],
    cfg: &MatchConfig,
) -> Vec<MergedStory> {
    let candidates = match_stories(hacker_news, new_york_times, cfg);
    rank(&candidates)
}
