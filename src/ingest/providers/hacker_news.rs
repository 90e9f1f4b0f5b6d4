// src/ingest/providers/hacker_news.rs
use async_trait::async_trait;
use metrics::histogram;
use tracing::debug;

use super::{join_url, send_json};
use crate::error::FetchError;
use crate::ingest::types::{HnItem, RawItems, SourceKind, StoryFetcher};

pub const DEFAULT_HN_BASE_URL: &str = "https://hacker-news.firebaseio.com/v0/";

/// Top stories from the Hacker News Firebase API: one request for the id
/// list, then one per item.
pub struct HackerNewsFetcher {
    client: reqwest::Client,
    base_url: String,
    max_items: usize,
}

impl HackerNewsFetcher {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, max_items: usize) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            max_items,
        }
    }

    async fn fetch_item(&self, id: u64) -> Result<Option<HnItem>, FetchError> {
        let url = join_url(&self.base_url, &format!("item/{id}.json"));
        // deleted/dead items come back as JSON `null`
        send_json::<Option<HnItem>>(self.client.get(&url), &url).await
    }
}

#[async_trait]
impl StoryFetcher for HackerNewsFetcher {
    async fn fetch_raw(&self) -> Result<RawItems, FetchError> {
        let t0 = std::time::Instant::now();

        let ids_url = join_url(&self.base_url, "topstories.json");
        let ids: Vec<u64> = send_json(self.client.get(&ids_url), &ids_url).await?;

        let mut items = Vec::with_capacity(ids.len().min(self.max_items));
        for id in ids.into_iter().take(self.max_items) {
            match self.fetch_item(id).await {
                Ok(Some(item)) => items.push(item),
                Ok(None) => debug!(target: "ingest", id, "hacker news item is null"),
                Err(e) => debug!(target: "ingest", id, error = %e, "skipping hacker news item"),
            }
        }

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("ingest_fetch_ms", "source" => SourceKind::HackerNews.key()).record(ms);

        Ok(RawItems::HackerNews(items))
    }

    fn kind(&self) -> SourceKind {
        SourceKind::HackerNews
    }
}
