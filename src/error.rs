// src/error.rs
//! Error taxonomy for the aggregator.
//!
//! Only `ConfigError` is ever fatal (at startup). Everything raised inside a
//! refresh cycle is downgraded at the boundary where it happens: a failed
//! fetch becomes an empty source, a bad item is dropped, a failed write is
//! logged. `QueryError` is what readers of the cache can get back.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("NYT API key is missing (set NYT_API_KEY or nyt_api_key in the config file)")]
    MissingApiKey,

    #[error("NYT API key is malformed")]
    InvalidApiKey,

    #[error("reading config from {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream {url} answered with status {status}")]
    Status { url: String, status: u16 },

    #[error("decoding upstream payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Why a single upstream item was dropped by the normalizer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("item has no usable title")]
    MissingTitle,

    #[error("item has no usable url")]
    MissingUrl,

    #[error("item has no publication date")]
    MissingDate,

    #[error("unparseable publication date {value:?}")]
    BadDate { value: String },
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("snapshot io at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("snapshot serialization: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("snapshot store unavailable: {0}")]
    Unavailable(String),
}

/// Errors visible to callers of the cache read path. Never fatal.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("invalid source: {0}")]
    InvalidSource(String),

    #[error("service not yet initialized")]
    NotInitialized,
}

impl QueryError {
    pub fn invalid_source(key: &str) -> Self {
        QueryError::InvalidSource(key.to_string())
    }
}

/// Failure of one whole refresh cycle (the loop logs it and carries on).
#[derive(Debug, Error)]
pub enum CycleError {
    #[error("refresh cycle task aborted: {0}")]
    Aborted(String),
}
