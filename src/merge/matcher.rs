// src/merge/matcher.rs
//! Cross-source matching: every Hacker News story against every NYT story.
//!
//! Title and url must both clear the threshold (base score 2). A similar
//! author/byline adds 1 but never disqualifies a pair on its own.

use once_cell::sync::OnceCell;
use regex::Regex;

use crate::ingest::types::Story;
use crate::similarity::{is_similar, similarity};

use super::MatchConfig;

pub const BASE_MATCH_SCORE: u8 = 2;
pub const AUTHOR_BONUS: u8 = 1;

/// One qualifying pair; lives only for the duration of a matching pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchCandidate<'a> {
    pub left: &'a Story,
    pub right: &'a Story,
    pub score: u8,
}

/// Full O(n·m) cross product in left-major order.
pub fn match_stories<'a>(
    left: &'a [Story],
    right: &'a [Story],
    cfg: &MatchConfig,
) -> Vec<MatchCandidate<'a>> {
    let mut out = Vec::new();
    for l in left {
        for r in right {
            let score = score_pair(l, r, cfg.threshold);
            if score >= BASE_MATCH_SCORE && score >= cfg.min_score {
                out.push(MatchCandidate {
                    left: l,
                    right: r,
                    score,
                });
            }
        }
    }
    out
}

/// 0 when the pair fails the mandatory title/url test, otherwise 2 or 3.
pub fn score_pair(left: &Story, right: &Story, threshold: f64) -> u8 {
    let title = is_similar(Some(&left.title), Some(&right.title), threshold);
    if !title {
        return 0;
    }
    let url = is_similar(Some(&left.url), Some(&right.url), threshold);
    if !url {
        return 0;
    }

    let mut score = BASE_MATCH_SCORE;
    if authors_similar(left.author.as_deref(), right.author.as_deref(), threshold) {
        score += AUTHOR_BONUS;
    }
    score
}

/// Author comparison tolerant of byline formatting.
///
/// The raw strings are compared first. Failing that, both sides are split
/// into person names ("By Jane Doe and John Roe" -> ["jane doe", "john roe"])
/// and any similar pair of names counts. Two multi-word names are also
/// similar when their surnames are similar and their first initials agree
/// ("J. Doe" ~ "Jane Doe").
pub fn authors_similar(a: Option<&str>, b: Option<&str>, threshold: f64) -> bool {
    let (Some(a), Some(b)) = (a, b) else {
        return false;
    };
    if similarity(a, b) >= threshold {
        return true;
    }
    let names_a = byline_names(a);
    let names_b = byline_names(b);
    names_a
        .iter()
        .any(|x| names_b.iter().any(|y| names_similar(x, y, threshold)))
}

fn names_similar(x: &str, y: &str, threshold: f64) -> bool {
    if similarity(x, y) >= threshold {
        return true;
    }
    let tx: Vec<&str> = x.split(' ').collect();
    let ty: Vec<&str> = y.split(' ').collect();
    if tx.len() < 2 || ty.len() < 2 {
        return false;
    }
    let (Some(sx), Some(sy)) = (tx.last(), ty.last()) else {
        return false;
    };
    // Only an abbreviated first name ("j doe") may stand in for a full one.
    let abbreviated = |t: &[&str]| t.first().is_some_and(|w| w.chars().count() == 1);
    if !abbreviated(&tx) && !abbreviated(&ty) {
        return false;
    }
    let initial = |t: &[&str]| t.first().and_then(|w| w.chars().next());
    similarity(sx, sy) >= threshold && initial(&tx) == initial(&ty)
}

/// Lowercased person names found in a byline, punctuation stripped.
pub fn byline_names(byline: &str) -> Vec<String> {
    static RE_BY: OnceCell<Regex> = OnceCell::new();
    static RE_SPLIT: OnceCell<Regex> = OnceCell::new();
    let re_by = RE_BY.get_or_init(|| Regex::new(r"(?i)^\s*by\s+").unwrap());
    let re_split = RE_SPLIT.get_or_init(|| Regex::new(r"(?i)\s*(?:,|;|&|\band\b)\s*").unwrap());

    let lowered = byline.to_lowercase();
    let stripped = re_by.replace(&lowered, "");
    re_split
        .split(&stripped)
        .map(|name| {
            name.replace('.', " ")
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|name| !name.is_empty())
        .collect()
}
