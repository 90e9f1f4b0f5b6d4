// tests/api_http.rs
//
// HTTP-level tests for the public API Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot.
//
// Covered:
// - GET /health
// - GET /news            (503 before the first refresh, ranked list after)
// - GET /news/{source}   (404 for unknown keys, newest first)
// - GET /status

mod common;

use std::sync::Arc;

use common::{hn, nyt, MockFetcher};
use http::{Request, StatusCode};
use serde_json::Value as Json;
use shuttle_axum::axum::{
    body::{self, Body},
    Router,
};
use tower::ServiceExt as _; // for `oneshot`

use tech_news_aggregator::api::{self, AppState};
use tech_news_aggregator::ingest::pipeline::Refresher;
use tech_news_aggregator::ingest::store::MemoryStore;
use tech_news_aggregator::{MatchConfig, NewsCache};

const BODY_LIMIT: usize = 1024 * 1024;

fn test_router(cache: &NewsCache) -> Router {
    api::router(AppState {
        cache: cache.clone(),
    })
}

async fn refreshed_cache() -> NewsCache {
    let cache = NewsCache::new();
    let r = Refresher::new(
        Arc::new(MockFetcher::hacker_news(vec![
            hn("AI breakthrough", "http://a/1", Some("J. Doe"), 1_700_000_000),
            hn("Show HN: A tiny Lisp in Rust", "https://github.com/x/lisp", Some("pg"), 1_700_000_600),
        ])),
        Arc::new(MockFetcher::new_york_times(vec![nyt(
            "AI Breakthrough",
            "http://a/1",
            Some("Jane Doe"),
            "2023-11-14T18:13:20-05:00",
        )])),
        Arc::new(MemoryStore::new()),
        cache.clone(),
        MatchConfig::default(),
    );
    r.refresh_once().await;
    cache
}

async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let req = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("build request");
    let resp = app.oneshot(req).await.expect("oneshot");
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    (status, bytes)
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Json) {
    let (status, bytes) = get(app, uri).await;
    let json = serde_json::from_slice(&bytes).expect("json body");
    (status, json)
}

#[tokio::test]
async fn health_returns_200_and_ok_body() {
    let (status, bytes) = get(test_router(&NewsCache::new()), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(String::from_utf8(bytes).unwrap(), "ok");
}

#[tokio::test]
async fn news_is_unavailable_before_first_refresh() {
    let cache = NewsCache::new();
    let (status, body) = get_json(test_router(&cache), "/news").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].is_string());

    let (status, _) = get_json(test_router(&cache), "/news/hackernews").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn unknown_source_is_404_even_before_first_refresh() {
    let cache = NewsCache::new();
    let (status, body) = get_json(test_router(&cache), "/news/bbc").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("bbc"));

    let ready = refreshed_cache().await;
    let (status, _) = get_json(test_router(&ready), "/news/HackerNews").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn news_returns_ranked_merged_list() {
    let cache = refreshed_cache().await;
    let (status, body) = get_json(test_router(&cache), "/news").await;
    assert_eq!(status, StatusCode::OK);

    let list = body.as_array().expect("array");
    assert_eq!(list.len(), 1);
    let m = &list[0];
    assert_eq!(m["titleHackerNews"], "AI breakthrough");
    assert_eq!(m["titleNewYorkTimes"], "AI Breakthrough");
    assert_eq!(m["matchScore"], 3);
    assert_eq!(m["latestDate"], m["dateNewYorkTimes"]);
}

#[tokio::test]
async fn news_by_source_is_newest_first() {
    let cache = refreshed_cache().await;
    let (status, body) = get_json(test_router(&cache), "/news/hackernews").await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Show HN: A tiny Lisp in Rust", "AI breakthrough"]);

    let (status, body) = get_json(test_router(&cache), "/news/newyorktimes").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["author"], "Jane Doe");
    assert!(body[0]["publishedAt"].is_string());
}

#[tokio::test]
async fn status_reports_cache_state() {
    let empty = NewsCache::new();
    let (status, body) = get_json(test_router(&empty), "/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "empty");
    assert!(body["generated_at"].is_null());
    assert_eq!(body["generation"], 0);
    assert_eq!(body["counts"]["merged"], 0);

    let ready = refreshed_cache().await;
    let (_, body) = get_json(test_router(&ready), "/status").await;
    assert_eq!(body["state"], "ready");
    assert!(body["generated_at"].is_string());
    assert_eq!(body["refreshing"], false);
    assert_eq!(body["counts"]["hacker_news"], 2);
    assert_eq!(body["counts"]["new_york_times"], 1);
    assert_eq!(body["counts"]["merged"], 1);
}
