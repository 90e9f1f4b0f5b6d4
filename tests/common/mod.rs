// tests/common/mod.rs
// Shared fixtures and mock collaborators for integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tech_news_aggregator::error::FetchError;
use tech_news_aggregator::ingest::types::{
    HnItem, NytResult, RawItems, SourceKind, Story, StoryFetcher,
};

pub enum Outcome {
    Items(RawItems),
    Fail,
    Panic,
}

/// Fetcher returning a fixed outcome and counting calls.
pub struct MockFetcher {
    kind: SourceKind,
    outcome: Outcome,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockFetcher {
    pub fn new(kind: SourceKind, outcome: Outcome) -> Self {
        Self {
            kind,
            outcome,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn hacker_news(items: Vec<HnItem>) -> Self {
        Self::new(SourceKind::HackerNews, Outcome::Items(RawItems::HackerNews(items)))
    }

    pub fn new_york_times(items: Vec<NytResult>) -> Self {
        Self::new(
            SourceKind::NewYorkTimes,
            Outcome::Items(RawItems::NewYorkTimes(items)),
        )
    }

    /// Sleep (tokio time) before answering.
    pub fn with_delay(mut self, d: Duration) -> Self {
        self.delay = Some(d);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StoryFetcher for MockFetcher {
    async fn fetch_raw(&self) -> Result<RawItems, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(d) = self.delay {
            tokio::time::sleep(d).await;
        }
        match &self.outcome {
            Outcome::Items(raw) => Ok(raw.clone()),
            Outcome::Fail => Err(FetchError::Status {
                url: "mock://upstream".into(),
                status: 500,
            }),
            Outcome::Panic => panic!("mock fetcher exploded"),
        }
    }

    fn kind(&self) -> SourceKind {
        self.kind
    }
}

pub fn hn(title: &str, url: &str, by: Option<&str>, time: i64) -> HnItem {
    HnItem {
        id: Some(time as u64),
        title: Some(title.into()),
        url: Some(url.into()),
        by: by.map(Into::into),
        time: Some(time),
    }
}

pub fn nyt(title: &str, url: &str, byline: Option<&str>, published: &str) -> NytResult {
    NytResult {
        title: Some(title.into()),
        url: Some(url.into()),
        byline: byline.map(Into::into),
        published_date: Some(published.into()),
    }
}

pub fn story(title: &str, url: &str, author: Option<&str>, ts: i64) -> Story {
    Story {
        title: title.into(),
        url: url.into(),
        author: author.map(Into::into),
        published_at: Utc.timestamp_opt(ts, 0).unwrap(),
    }
}
