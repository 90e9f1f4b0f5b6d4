// src/config/aggregator.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;
use crate::ingest::providers::{hacker_news::DEFAULT_HN_BASE_URL, nytimes::DEFAULT_NYT_BASE_URL};
use crate::merge::{MatchConfig, DEFAULT_MIN_MATCH_SCORE};
use crate::similarity::DEFAULT_SIMILARITY_THRESHOLD;

pub const ENV_CONFIG_PATH: &str = "AGGREGATOR_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "config/aggregator.toml";

pub const ENV_REFRESH_SECS: &str = "AGGREGATOR_REFRESH_SECS";
pub const ENV_SIMILARITY_THRESHOLD: &str = "AGGREGATOR_SIMILARITY_THRESHOLD";
pub const ENV_MIN_MATCH_SCORE: &str = "AGGREGATOR_MIN_MATCH_SCORE";
pub const ENV_NYT_API_KEY: &str = "NYT_API_KEY";
pub const ENV_HN_BASE_URL: &str = "HN_BASE_URL";
pub const ENV_NYT_BASE_URL: &str = "NYT_BASE_URL";
pub const ENV_HN_MAX_ITEMS: &str = "HN_MAX_ITEMS";
pub const ENV_FETCH_TIMEOUT_SECS: &str = "FETCH_TIMEOUT_SECS";
pub const ENV_SNAPSHOT_PATH: &str = "SNAPSHOT_PATH";

#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AggregatorConfig {
    /// Pause between refresh cycles. Defaults to 2h.
    pub refresh_interval_secs: u64,
    pub similarity_threshold: f64,
    /// 2 = title+url, 3 = title+url+author.
    pub min_match_score: u8,
    pub nyt_api_key: String,
    pub hn_base_url: String,
    pub nyt_base_url: String,
    /// How many of the top story ids to resolve per cycle.
    pub hn_max_items: usize,
    pub fetch_timeout_secs: u64,
    pub snapshot_path: PathBuf,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 2 * 60 * 60,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            min_match_score: DEFAULT_MIN_MATCH_SCORE,
            nyt_api_key: String::new(),
            hn_base_url: DEFAULT_HN_BASE_URL.to_string(),
            nyt_base_url: DEFAULT_NYT_BASE_URL.to_string(),
            hn_max_items: 100,
            fetch_timeout_secs: 10,
            snapshot_path: PathBuf::from("data/snapshot.json"),
        }
    }
}

// Never print the key itself.
impl fmt::Debug for AggregatorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AggregatorConfig")
            .field("refresh_interval_secs", &self.refresh_interval_secs)
            .field("similarity_threshold", &self.similarity_threshold)
            .field("min_match_score", &self.min_match_score)
            .field("nyt_api_key_len", &self.nyt_api_key.len())
            .field("hn_base_url", &self.hn_base_url)
            .field("nyt_base_url", &self.nyt_base_url)
            .field("hn_max_items", &self.hn_max_items)
            .field("fetch_timeout_secs", &self.fetch_timeout_secs)
            .field("snapshot_path", &self.snapshot_path)
            .finish()
    }
}

impl AggregatorConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Resolution order:
    /// 1) $AGGREGATOR_CONFIG_PATH (must exist)
    /// 2) config/aggregator.toml (optional)
    /// 3) built-in defaults
    ///
    /// then environment overrides, then validation.
    pub fn load() -> Result<Self, ConfigError> {
        let mut cfg = match std::env::var(ENV_CONFIG_PATH) {
            Ok(p) => Self::load_from_file(Path::new(&p))?,
            Err(_) => {
                let default = Path::new(DEFAULT_CONFIG_PATH);
                if default.exists() {
                    Self::load_from_file(default)?
                } else {
                    Self::default()
                }
            }
        };
        cfg.apply_overrides(|key| std::env::var(key).ok())?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Apply overrides from any key/value lookup (env in production).
    pub fn apply_overrides<F>(&mut self, get: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = get(ENV_REFRESH_SECS) {
            self.refresh_interval_secs = parse_value(ENV_REFRESH_SECS, &v)?;
        }
        if let Some(v) = get(ENV_SIMILARITY_THRESHOLD) {
            self.similarity_threshold = parse_value(ENV_SIMILARITY_THRESHOLD, &v)?;
        }
        if let Some(v) = get(ENV_MIN_MATCH_SCORE) {
            self.min_match_score = parse_value(ENV_MIN_MATCH_SCORE, &v)?;
        }
        if let Some(v) = get(ENV_NYT_API_KEY) {
            self.nyt_api_key = v.trim().to_string();
        }
        if let Some(v) = get(ENV_HN_BASE_URL) {
            self.hn_base_url = v;
        }
        if let Some(v) = get(ENV_NYT_BASE_URL) {
            self.nyt_base_url = v;
        }
        if let Some(v) = get(ENV_HN_MAX_ITEMS) {
            self.hn_max_items = parse_value(ENV_HN_MAX_ITEMS, &v)?;
        }
        if let Some(v) = get(ENV_FETCH_TIMEOUT_SECS) {
            self.fetch_timeout_secs = parse_value(ENV_FETCH_TIMEOUT_SECS, &v)?;
        }
        if let Some(v) = get(ENV_SNAPSHOT_PATH) {
            self.snapshot_path = PathBuf::from(v);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let key = self.nyt_api_key.trim();
        if key.is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        if key.chars().any(char::is_whitespace) {
            return Err(ConfigError::InvalidApiKey);
        }
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(invalid(
                "similarity_threshold",
                format!("{} is outside [0, 1]", self.similarity_threshold),
            ));
        }
        if !(2..=3).contains(&self.min_match_score) {
            return Err(invalid(
                "min_match_score",
                format!("{} is outside 2..=3", self.min_match_score),
            ));
        }
        if self.refresh_interval_secs == 0 {
            return Err(invalid("refresh_interval_secs", "must be > 0".into()));
        }
        if self.fetch_timeout_secs == 0 {
            return Err(invalid("fetch_timeout_secs", "must be > 0".into()));
        }
        Ok(())
    }

    pub fn match_config(&self) -> MatchConfig {
        MatchConfig {
            threshold: self.similarity_threshold,
            min_score: self.min_match_score,
        }
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

fn invalid(key: &'static str, reason: String) -> ConfigError {
    ConfigError::InvalidValue { key, reason }
}

fn parse_value<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| invalid(key, format!("cannot parse {raw:?}")))
}
