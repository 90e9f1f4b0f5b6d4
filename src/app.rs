// src/app.rs
//! Startup wiring shared by the binary and end-to-end tests.

use std::sync::Arc;

use tracing::info;

use crate::api::{self, AppState};
use crate::cache::NewsCache;
use crate::config::AggregatorConfig;
use crate::ingest::pipeline::Refresher;
use crate::ingest::providers::{build_client, hacker_news::HackerNewsFetcher, nytimes::NytFetcher};
use crate::ingest::scheduler::{spawn_refresh_loop, RefreshHandle, RefreshSchedulerCfg};
use crate::ingest::store::{load_or_none, JsonFileStore, SnapshotStore};
use crate::ingest::types::StoryFetcher;

/// A running aggregator: the cache readers query and the loop feeding it.
pub struct Aggregator {
    pub cache: NewsCache,
    pub refresher: Arc<Refresher>,
    pub refresh: RefreshHandle,
}

impl Aggregator {
    pub fn router(&self) -> shuttle_axum::axum::Router {
        api::router(AppState {
            cache: self.cache.clone(),
        })
    }
}

/// Seed a cache from whatever the store holds (`Empty` when nothing usable).
pub async fn seed_cache(store: &dyn SnapshotStore) -> NewsCache {
    match load_or_none(store).await {
        Some(snapshot) => {
            info!(
                generated_at = %snapshot.generated_at,
                merged = snapshot.merged.len(),
                "seeded cache from persisted snapshot"
            );
            NewsCache::with_snapshot(snapshot)
        }
        None => NewsCache::new(),
    }
}

/// Start the aggregator with the given collaborators. The config must already
/// be validated.
pub async fn start_with(
    cfg: &AggregatorConfig,
    hacker_news: Arc<dyn StoryFetcher>,
    new_york_times: Arc<dyn StoryFetcher>,
    store: Arc<dyn SnapshotStore>,
) -> Aggregator {
    let cache = seed_cache(store.as_ref()).await;
    let refresher = Arc::new(Refresher::new(
        hacker_news,
        new_york_times,
        store,
        cache.clone(),
        cfg.match_config(),
    ));
    let refresh = spawn_refresh_loop(
        Arc::clone(&refresher),
        RefreshSchedulerCfg {
            interval: cfg.refresh_interval(),
        },
    );
    info!(
        interval_secs = cfg.refresh_interval_secs,
        threshold = cfg.similarity_threshold,
        min_match_score = cfg.min_match_score,
        "refresh loop started"
    );
    Aggregator {
        cache,
        refresher,
        refresh,
    }
}

/// Production wiring: HTTP fetchers and the JSON file store from `cfg`.
pub async fn start(cfg: &AggregatorConfig) -> anyhow::Result<Aggregator> {
    let client = build_client(cfg.fetch_timeout())?;
    let hacker_news: Arc<dyn StoryFetcher> = Arc::new(HackerNewsFetcher::new(
        client.clone(),
        cfg.hn_base_url.clone(),
        cfg.hn_max_items,
    ));
    let new_york_times: Arc<dyn StoryFetcher> = Arc::new(NytFetcher::new(
        client,
        cfg.nyt_base_url.clone(),
        cfg.nyt_api_key.clone(),
    ));
    let file_store = JsonFileStore::new(cfg.snapshot_path.clone());
    info!(path = %file_store.path().display(), "snapshot store");
    let store: Arc<dyn SnapshotStore> = Arc::new(file_store);

    Ok(start_with(cfg, hacker_news, new_york_times, store).await)
}
