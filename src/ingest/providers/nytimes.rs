// src/ingest/providers/nytimes.rs
use async_trait::async_trait;
use metrics::histogram;
use serde::Deserialize;

use super::{join_url, send_json};
use crate::error::FetchError;
use crate::ingest::types::{NytResult, RawItems, SourceKind, StoryFetcher};

pub const DEFAULT_NYT_BASE_URL: &str = "https://api.nytimes.com/svc/topstories/v2/";
pub const NYT_SECTION_PATH: &str = "technology.json";

#[derive(Debug, Deserialize)]
struct TopStories {
    #[serde(default)]
    results: Vec<NytResult>,
}

/// NYT Top Stories, technology section.
pub struct NytFetcher {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl NytFetcher {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl StoryFetcher for NytFetcher {
    async fn fetch_raw(&self) -> Result<RawItems, FetchError> {
        let t0 = std::time::Instant::now();

        let url = join_url(&self.base_url, NYT_SECTION_PATH);
        let req = self
            .client
            .get(&url)
            .query(&[("api-key", self.api_key.as_str())]);
        let body: TopStories = send_json(req, &url).await?;

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("ingest_fetch_ms", "source" => SourceKind::NewYorkTimes.key()).record(ms);

        Ok(RawItems::NewYorkTimes(body.results))
    }

    fn kind(&self) -> SourceKind {
        SourceKind::NewYorkTimes
    }
}
