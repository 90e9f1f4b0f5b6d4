// src/ingest/mod.rs
pub mod pipeline;
pub mod providers;
pub mod scheduler;
pub mod store;
pub mod types;

use crate::error::ParseError;
use crate::ingest::types::{HnItem, NytResult, RawItems, Story};
use chrono::{DateTime, NaiveDateTime, Utc};
use metrics::counter;

/// NYT `published_date` layout, e.g. `2023-05-12T05:00:42-04:00`.
pub const NYT_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

/// Decode HTML entities, collapse whitespace, trim.
pub fn normalize_text(s: &str) -> String {
    let decoded = html_escape::decode_html_entities(s);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn clean_required(s: Option<&str>, missing: ParseError) -> Result<String, ParseError> {
    let v = s.map(normalize_text).unwrap_or_default();
    if v.is_empty() {
        Err(missing)
    } else {
        Ok(v)
    }
}

fn clean_optional(s: Option<&str>) -> Option<String> {
    s.map(normalize_text).filter(|v| !v.is_empty())
}

/// Parse the NYT fixed-offset timestamp into UTC. A trailing `Z` is accepted
/// as a zero offset.
pub fn parse_nyt_date(raw: &str) -> Result<DateTime<Utc>, ParseError> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_str(raw, NYT_DATE_FORMAT) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Some(naive) = raw
        .strip_suffix('Z')
        .and_then(|s| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").ok())
    {
        return Ok(naive.and_utc());
    }
    Err(ParseError::BadDate {
        value: raw.to_string(),
    })
}

pub fn normalize_hn_item(item: &HnItem) -> Result<Story, ParseError> {
    let title = clean_required(item.title.as_deref(), ParseError::MissingTitle)?;
    let url = clean_required(item.url.as_deref(), ParseError::MissingUrl)?;
    let secs = item.time.ok_or(ParseError::MissingDate)?;
    let published_at = DateTime::from_timestamp(secs, 0).ok_or_else(|| ParseError::BadDate {
        value: secs.to_string(),
    })?;
    Ok(Story {
        title,
        url,
        author: clean_optional(item.by.as_deref()),
        published_at,
    })
}

pub fn normalize_nyt_result(res: &NytResult) -> Result<Story, ParseError> {
    let title = clean_required(res.title.as_deref(), ParseError::MissingTitle)?;
    let url = clean_required(res.url.as_deref(), ParseError::MissingUrl)?;
    let raw_date = res
        .published_date
        .as_deref()
        .ok_or(ParseError::MissingDate)?;
    let published_at = parse_nyt_date(raw_date)?;
    Ok(Story {
        title,
        url,
        author: clean_optional(res.byline.as_deref()),
        published_at,
    })
}

/// Convert one raw upstream batch into stories, dropping unusable items.
/// Input order is preserved.
pub fn normalize(raw: &RawItems) -> Vec<Story> {
    let kind = raw.kind();
    let results: Vec<Result<Story, ParseError>> = match raw {
        RawItems::HackerNews(items) => items.iter().map(normalize_hn_item).collect(),
        RawItems::NewYorkTimes(items) => items.iter().map(normalize_nyt_result).collect(),
    };

    let mut out = Vec::with_capacity(results.len());
    let mut dropped = 0u64;
    for r in results {
        match r {
            Ok(story) => out.push(story),
            Err(e) => {
                dropped += 1;
                tracing::debug!(target: "ingest", source = %kind, error = %e, "dropping item");
            }
        }
    }

    counter!("ingest_items_total", "source" => kind.key()).increment(out.len() as u64);
    counter!("ingest_dropped_total", "source" => kind.key()).increment(dropped);
    out
}

/// Stories of one source ordered newest first (stable for equal dates).
pub fn sorted_newest_first(stories: &[Story]) -> Vec<Story> {
    let mut v = stories.to_vec();
    v.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    v
}
