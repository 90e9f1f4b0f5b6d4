// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod api;
pub mod app;
pub mod cache;
pub mod config;
pub mod error;
pub mod ingest;
pub mod merge;
pub mod metrics;
pub mod similarity;

// ---- Re-exports for stable public API ----
pub use crate::api::router;
pub use crate::cache::{CacheState, NewsCache, Snapshot};
pub use crate::config::AggregatorConfig;
pub use crate::ingest::types::{SourceKind, Story};
pub use crate::merge::{MatchConfig, MergedStory};
