// src/merge/rank.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::matcher::MatchCandidate;

/// A confirmed Hacker News / NYT pair, flattened for the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MergedStory {
    pub title_hacker_news: String,
    pub url_hacker_news: String,
    pub author_hacker_news: Option<String>,
    pub date_hacker_news: DateTime<Utc>,
    pub title_new_york_times: String,
    pub url_new_york_times: String,
    pub author_new_york_times: Option<String>,
    pub date_new_york_times: DateTime<Utc>,
    pub match_score: u8,
    pub latest_date: DateTime<Utc>,
}

impl From<&MatchCandidate<'_>> for MergedStory {
    fn from(c: &MatchCandidate<'_>) -> Self {
        let (l, r) = (c.left, c.right);
        Self {
            title_hacker_news: l.title.clone(),
            url_hacker_news: l.url.clone(),
            author_hacker_news: l.author.clone(),
            date_hacker_news: l.published_at,
            title_new_york_times: r.title.clone(),
            url_new_york_times: r.url.clone(),
            author_new_york_times: r.author.clone(),
            date_new_york_times: r.published_at,
            match_score: c.score,
            latest_date: l.published_at.max(r.published_at),
        }
    }
}

/// Score desc, then latest date desc. `sort_by` is stable, so pairs equal on
/// both keys keep their matching order.
pub fn rank(candidates: &[MatchCandidate<'_>]) -> Vec<MergedStory> {
    let mut merged: Vec<MergedStory> = candidates.iter().map(MergedStory::from).collect();
    merged.sort_by(|a, b| {
        b.match_score
            .cmp(&a.match_score)
            .then_with(|| b.latest_date.cmp(&a.latest_date))
    });
    merged
}
