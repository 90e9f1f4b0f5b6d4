// src/ingest/pipeline.rs
//! One refresh cycle: fetch → normalize → match → rank → persist → publish.

use std::sync::Arc;

use chrono::Utc;
use metrics::{counter, histogram};
use tracing::{debug, info, warn};

use crate::cache::{NewsCache, Snapshot};
use crate::ingest::store::SnapshotStore;
use crate::ingest::types::{Story, StoryFetcher};
use crate::ingest::normalize;
use crate::merge::{build_merged, MatchConfig};

pub struct Refresher {
    hacker_news: Arc<dyn StoryFetcher>,
    new_york_times: Arc<dyn StoryFetcher>,
    store: Arc<dyn SnapshotStore>,
    cache: NewsCache,
    match_cfg: MatchConfig,
}

impl Refresher {
    pub fn new(
        hacker_news: Arc<dyn StoryFetcher>,
        new_york_times: Arc<dyn StoryFetcher>,
        store: Arc<dyn SnapshotStore>,
        cache: NewsCache,
        match_cfg: MatchConfig,
    ) -> Self {
        Self {
            hacker_news,
            new_york_times,
            store,
            cache,
            match_cfg,
        }
    }

    pub fn cache(&self) -> &NewsCache {
        &self.cache
    }

    /// Run one cycle and return the snapshot it published.
    ///
    /// Source failures degrade to empty lists and a failed write is only
    /// logged, so every cycle that runs to completion publishes.
    pub async fn refresh_once(&self) -> Arc<Snapshot> {
        let _refreshing = self.cache.begin_refresh();
        let t0 = std::time::Instant::now();

        let (hacker_news, new_york_times) = tokio::join!(
            fetch_source(Arc::clone(&self.hacker_news)),
            fetch_source(Arc::clone(&self.new_york_times)),
        );

        // CPU-only from here until persistence; works on owned lists.
        let merged = build_merged(&hacker_news, &new_york_times, &self.match_cfg);
        let snapshot = Snapshot {
            hacker_news,
            new_york_times,
            merged,
            generated_at: self.cache.next_generated_at(Utc::now()),
        };

        if let Err(e) = self.store.save(&snapshot).await {
            warn!(target: "ingest", error = %e, "persisting snapshot failed; publishing anyway");
            counter!("snapshot_persist_errors_total").increment(1);
        }

        let published = self.cache.publish(snapshot);

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("refresh_duration_ms").record(ms);
        counter!("merge_matches_total").increment(published.merged.len() as u64);
        counter!("refresh_cycles_total").increment(1);

        info!(
            target: "ingest",
            hacker_news = published.hacker_news.len(),
            new_york_times = published.new_york_times.len(),
            merged = published.merged.len(),
            elapsed_ms = ms as u64,
            "refresh cycle published"
        );
        published
    }
}

/// Fetch and normalize one source. Any failure (error, wrong batch shape,
/// panic inside the fetcher) yields an empty list for this cycle.
pub async fn fetch_source(fetcher: Arc<dyn StoryFetcher>) -> Vec<Story> {
    let kind = fetcher.kind();
    let joined = tokio::spawn(async move { fetcher.fetch_raw().await }).await;

    let failure = match joined {
        Ok(Ok(raw)) if raw.kind() == kind => {
            if raw.is_empty() {
                debug!(target: "ingest", source = %kind, "source returned no items");
            }
            let stories = normalize(&raw);
            debug!(target: "ingest", source = %kind, received = raw.len(), kept = stories.len(), "source normalized");
            return stories;
        }
        Ok(Ok(raw)) => format!("fetcher returned a {} batch", raw.kind()),
        Ok(Err(e)) => e.to_string(),
        Err(join_err) => format!("fetch task aborted: {join_err}"),
    };

    warn!(target: "ingest", source = %kind, error = %failure, "source fetch failed; empty for this cycle");
    counter!("ingest_provider_errors_total", "source" => kind.key()).increment(1);
    Vec::new()
}
