// src/cache.rs
//! Scheduled snapshot cache.
//!
//! The current [`Snapshot`] lives behind an `ArcSwapOption`: readers do a
//! lock-free load of an `Arc` and keep a fully consistent view for as long
//! as they hold it. The refresh loop is the only writer and replaces the
//! whole snapshot with a single pointer swap.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use arc_swap::ArcSwapOption;
use chrono::{DateTime, Utc};
use metrics::gauge;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::error::QueryError;
use crate::ingest::sorted_newest_first;
use crate::ingest::types::{SourceKind, Story};
use crate::merge::MergedStory;

/// Immutable result of one refresh generation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub hacker_news: Vec<Story>,
    pub new_york_times: Vec<Story>,
    pub merged: Vec<MergedStory>,
    pub generated_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn stories(&self, kind: SourceKind) -> &[Story] {
        match kind {
            SourceKind::HackerNews => &self.hacker_news,
            SourceKind::NewYorkTimes => &self.new_york_times,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    Empty,
    Ready { generated_at: DateTime<Utc> },
}

struct Inner {
    current: ArcSwapOption<Snapshot>,
    refreshing: AtomicBool,
    /// Bumped after every publish; lets readers await the first snapshot.
    generation: watch::Sender<u64>,
    /// Serializes writers only. Readers never touch it.
    publish_lock: Mutex<()>,
}

/// Cheap to clone; all clones share the same snapshot.
#[derive(Clone)]
pub struct NewsCache {
    inner: Arc<Inner>,
}

impl Default for NewsCache {
    fn default() -> Self {
        Self::new()
    }
}

impl NewsCache {
    /// Cache in the `Empty` state.
    pub fn new() -> Self {
        let (generation, _) = watch::channel(0);
        Self {
            inner: Arc::new(Inner {
                current: ArcSwapOption::empty(),
                refreshing: AtomicBool::new(false),
                generation,
                publish_lock: Mutex::new(()),
            }),
        }
    }

    /// Cache already `Ready` with a previously persisted snapshot.
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        let cache = Self::new();
        cache.publish(snapshot);
        cache
    }

    /// Current snapshot, if any. Never blocks.
    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.inner.current.load_full()
    }

    /// Current snapshot or `NotInitialized`.
    pub fn ready_snapshot(&self) -> Result<Arc<Snapshot>, QueryError> {
        self.snapshot().ok_or(QueryError::NotInitialized)
    }

    pub fn state(&self) -> CacheState {
        match self.inner.current.load().as_ref() {
            Some(s) => CacheState::Ready {
                generated_at: s.generated_at,
            },
            None => CacheState::Empty,
        }
    }

    /// Number of publishes so far (0 while `Empty`).
    pub fn generation(&self) -> u64 {
        *self.inner.generation.borrow()
    }

    /// Merged list of the current snapshot; empty before the first refresh.
    pub fn merged(&self) -> Vec<MergedStory> {
        self.snapshot().map(|s| s.merged.clone()).unwrap_or_default()
    }

    /// One source's stories, newest first. Unknown keys are a caller error;
    /// an `Empty` cache yields an empty list.
    pub fn by_source(&self, key: &str) -> Result<Vec<Story>, QueryError> {
        let kind = SourceKind::from_key(key).ok_or_else(|| QueryError::invalid_source(key))?;
        Ok(self
            .snapshot()
            .map(|s| sorted_newest_first(s.stories(kind)))
            .unwrap_or_default())
    }

    pub fn is_refreshing(&self) -> bool {
        self.inner.refreshing.load(Ordering::Acquire)
    }

    /// Marks a refresh as in progress until the guard is dropped.
    pub fn begin_refresh(&self) -> RefreshGuard<'_> {
        self.inner.refreshing.store(true, Ordering::Release);
        RefreshGuard {
            flag: &self.inner.refreshing,
        }
    }

    /// Timestamp for the next snapshot: `now`, but never earlier than the
    /// one currently published.
    pub fn next_generated_at(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self.inner.current.load().as_ref() {
            Some(prev) if prev.generated_at > now => prev.generated_at,
            _ => now,
        }
    }

    /// Atomically replace the current snapshot.
    ///
    /// `generated_at` is clamped so readers never see it go backwards.
    pub fn publish(&self, mut snapshot: Snapshot) -> Arc<Snapshot> {
        let _writer = self
            .inner
            .publish_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        snapshot.generated_at = self.next_generated_at(snapshot.generated_at);
        let fresh = Arc::new(snapshot);
        self.inner.current.store(Some(Arc::clone(&fresh)));
        self.inner.generation.send_modify(|g| *g += 1);

        gauge!("snapshot_generated_ts").set(fresh.generated_at.timestamp() as f64);
        fresh
    }

    /// Wait until a snapshot has been published (returns at once when `Ready`).
    pub async fn wait_ready(&self) -> Arc<Snapshot> {
        let mut rx = self.inner.generation.subscribe();
        loop {
            if let Some(s) = self.snapshot() {
                return s;
            }
            // The sender lives in `self`, so the channel cannot close here.
            if rx.changed().await.is_err() {
                return std::future::pending().await;
            }
        }
    }
}

pub struct RefreshGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
