use chrono::{DateTime, Utc};
use shuttle_axum::axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tower_http::cors::CorsLayer;

use crate::cache::NewsCache;
use crate::error::QueryError;
use crate::ingest::sorted_newest_first;
use crate::ingest::types::{SourceKind, Story};
use crate::merge::MergedStory;

#[derive(Clone)]
pub struct AppState {
    pub cache: NewsCache,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/news", get(merged_news))
        .route("/news/{source}", get(news_by_source))
        .route("/status", get(status))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// `QueryError` as an HTTP response: 404 for an unknown source, 503 before
/// the first snapshot.
pub struct ApiError(pub QueryError);

impl From<QueryError> for ApiError {
    fn from(e: QueryError) -> Self {
        Self(e)
    }
}

#[derive(serde::Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            QueryError::InvalidSource(_) => StatusCode::NOT_FOUND,
            QueryError::NotInitialized => StatusCode::SERVICE_UNAVAILABLE,
        };
        let body = ErrorBody {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

async fn merged_news(State(state): State<AppState>) -> Result<Json<Vec<MergedStory>>, ApiError> {
    let snapshot = state.cache.ready_snapshot()?;
    Ok(Json(snapshot.merged.clone()))
}

async fn news_by_source(
    State(state): State<AppState>,
    Path(source): Path<String>,
) -> Result<Json<Vec<Story>>, ApiError> {
    tracing::debug!(%source, "news by source");
    let kind = SourceKind::from_key(&source).ok_or_else(|| QueryError::invalid_source(&source))?;
    let snapshot = state.cache.ready_snapshot()?;
    Ok(Json(sorted_newest_first(snapshot.stories(kind))))
}

#[derive(serde::Serialize, Default)]
struct Counts {
    hacker_news: usize,
    new_york_times: usize,
    merged: usize,
}

#[derive(serde::Serialize)]
struct StatusOut {
    state: &'static str,
    generated_at: Option<DateTime<Utc>>,
    refreshing: bool,
    generation: u64,
    counts: Counts,
}

/// Everything but the flags comes from one snapshot load.
async fn status(State(state): State<AppState>) -> Json<StatusOut> {
    let cache = &state.cache;
    let snapshot = cache.snapshot();
    let counts = snapshot
        .as_deref()
        .map(|s| Counts {
            hacker_news: s.hacker_news.len(),
            new_york_times: s.new_york_times.len(),
            merged: s.merged.len(),
        })
        .unwrap_or_default();
    let (label, generated_at) = match snapshot.as_deref() {
        Some(s) => ("ready", Some(s.generated_at)),
        None => ("empty", None),
    };
    Json(StatusOut {
        state: label,
        generated_at,
        refreshing: cache.is_refreshing(),
        generation: cache.generation(),
        counts,
    })
}
