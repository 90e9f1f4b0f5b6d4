// src/ingest/providers/mod.rs
pub mod hacker_news;
pub mod nytimes;

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::error::FetchError;

/// One client shared by both fetchers; the timeout applies per request.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, FetchError> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("tech-news-aggregator/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// `base` + `path` with exactly one slash between them.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Send, require a 2xx status, decode the JSON body.
///
/// `display_url` is what ends up in errors and logs; reqwest errors are
/// stripped of their url since it may carry the API key.
pub(crate) async fn send_json<T: DeserializeOwned>(
    req: reqwest::RequestBuilder,
    display_url: &str,
) -> Result<T, FetchError> {
    let resp = req.send().await.map_err(|e| e.without_url())?;
    let status = resp.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: display_url.to_string(),
            status: status.as_u16(),
        });
    }
    let bytes = resp.bytes().await.map_err(|e| e.without_url())?;
    Ok(serde_json::from_slice(&bytes)?)
}
