// src/ingest/types.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::FetchError;

/// The two upstream providers. Hacker News is the "left" side of every
/// match, the NYT technology feed the "right" side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    HackerNews,
    NewYorkTimes,
}

impl SourceKind {
    pub const ALL: [SourceKind; 2] = [SourceKind::HackerNews, SourceKind::NewYorkTimes];

    /// Path token used by the query API (`/news/{source}`).
    pub fn key(self) -> &'static str {
        match self {
            SourceKind::HackerNews => "hackernews",
            SourceKind::NewYorkTimes => "newyorktimes",
        }
    }

    /// Exact, case-sensitive lookup by path token.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.key() == key)
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Normalized story, one per usable upstream item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    pub title: String,
    pub url: String,
    pub author: Option<String>,
    pub published_at: DateTime<Utc>,
}

/// Hacker News `item/{id}.json` payload (only the fields we read).
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct HnItem {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub by: Option<String>,
    /// Unix seconds.
    #[serde(default)]
    pub time: Option<i64>,
}

/// One entry of the NYT Top Stories `results` array.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct NytResult {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub byline: Option<String>,
    /// e.g. `2023-05-12T05:00:42-04:00`
    #[serde(default)]
    pub published_date: Option<String>,
}

/// Raw batch as returned by a fetcher, tagged by its shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawItems {
    HackerNews(Vec<HnItem>),
    NewYorkTimes(Vec<NytResult>),
}

impl RawItems {
    pub fn kind(&self) -> SourceKind {
        match self {
            RawItems::HackerNews(_) => SourceKind::HackerNews,
            RawItems::NewYorkTimes(_) => SourceKind::NewYorkTimes,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            RawItems::HackerNews(v) => v.len(),
            RawItems::NewYorkTimes(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait::async_trait]
pub trait StoryFetcher: Send + Sync {
    async fn fetch_raw(&self) -> Result<RawItems, FetchError>;
    fn kind(&self) -> SourceKind;
}
