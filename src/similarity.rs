// src/similarity.rs
//! Jaro string similarity.
//!
//! Classic Jaro over Unicode scalar values:
//! - matching window radius is `max(|a|, |b|) / 2 - 1`, clamped at 0;
//! - each char of `a` takes the first unmarked equal char of `b` inside the window;
//! - every positional mismatch between the two matched sequences is half a transposition;
//! - score is `(m/|a| + m/|b| + (m - t)/m) / 3`.

/// Default threshold above which two strings are treated as the same value.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.8;

/// Jaro similarity in `[0.0, 1.0]`. Two empty strings are identical (1.0).
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    jaro(&a, &b)
}

/// `similarity(a, b) >= threshold`, with missing values never similar.
pub fn is_similar(a: Option<&str>, b: Option<&str>, threshold: f64) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => similarity(a, b) >= threshold,
        _ => false,
    }
}

fn jaro(a: &[char], b: &[char]) -> f64 {
    let (len_a, len_b) = (a.len(), b.len());
    if len_a == 0 && len_b == 0 {
        return 1.0;
    }
    if len_a == 0 || len_b == 0 {
        return 0.0;
    }

    let radius = (len_a.max(len_b) / 2).saturating_sub(1);
    let mut used_a = vec![false; len_a];
    let mut used_b = vec![false; len_b];
    let mut matches = 0usize;

    for (i, ca) in a.iter().enumerate() {
        let lo = i.saturating_sub(radius);
        let hi = (i + radius + 1).min(len_b);
        for j in lo..hi {
            if !used_b[j] && b[j] == *ca {
                used_a[i] = true;
                used_b[j] = true;
                matches += 1;
                break;
            }
        }
    }

    if matches == 0 {
        return 0.0;
    }

    // Walk both matched subsequences in order.
    let mut half_transpositions = 0usize;
    let mut k = 0usize;
    for (i, ca) in a.iter().enumerate() {
        if !used_a[i] {
            continue;
        }
        while !used_b[k] {
            k += 1;
        }
        if *ca != b[k] {
            half_transpositions += 1;
        }
        k += 1;
    }

    let m = matches as f64;
    let t = half_transpositions as f64 / 2.0;
    (m / len_a as f64 + m / len_b as f64 + (m - t) / m) / 3.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-3;

    #[test]
    fn empty_rules() {
        assert_eq!(similarity("", ""), 1.0);
        assert_eq!(similarity("a", ""), 0.0);
        assert_eq!(similarity("", "a"), 0.0);
    }

    #[test]
    fn single_char_identity_uses_clamped_window() {
        // radius would be -1 without clamping
        assert_eq!(similarity("a", "a"), 1.0);
        assert_eq!(similarity("a", "b"), 0.0);
    }

    #[test]
    fn reference_vectors() {
        assert!((similarity("MARTHA", "MARHTA") - 0.944).abs() < EPS);
        assert!((similarity("DWAYNE", "DUANE") - 0.822).abs() < EPS);
        assert!((similarity("DIXON", "DICKSONX") - 0.767).abs() < EPS);
    }

    #[test]
    fn no_common_chars_is_zero() {
        assert_eq!(similarity("abc", "xyz"), 0.0);
    }

    #[test]
    fn counts_chars_not_bytes() {
        assert_eq!(similarity("café", "café"), 1.0);
        let s = similarity("naïve", "naive");
        assert!(s > 0.8 && s < 1.0, "got {s}");
    }

    #[test]
    fn is_similar_treats_missing_as_dissimilar() {
        assert!(!is_similar(None, Some("x"), 0.8));
        assert!(!is_similar(Some("x"), None, 0.8));
        assert!(!is_similar(None, None, 0.0));
        assert!(is_similar(Some("MARTHA"), Some("MARHTA"), 0.8));
        assert!(!is_similar(Some("DIXON"), Some("DICKSONX"), 0.8));
    }
}
