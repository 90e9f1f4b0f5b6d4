// tests/similarity_vectors.rs
//
// Jaro reference vectors and properties.
// strsim serves as an independent oracle where no transpositions can occur.

use rand::{rngs::StdRng, Rng, SeedableRng};
use tech_news_aggregator::similarity::{is_similar, similarity, DEFAULT_SIMILARITY_THRESHOLD};

const EPS: f64 = 1e-4;

fn assert_close(a: &str, b: &str, want: f64) {
    let got = similarity(a, b);
    assert!(
        (got - want).abs() < EPS,
        "jaro({a:?}, {b:?}) = {got}, want {want}"
    );
}

fn random_word(rng: &mut StdRng, alphabet: &[char], max_len: usize) -> String {
    let len = rng.random_range(0..=max_len);
    (0..len)
        .map(|_| alphabet[rng.random_range(0..alphabet.len())])
        .collect()
}

#[test]
fn classic_reference_vectors() {
    assert_close("MARTHA", "MARHTA", 0.9444);
    assert_close("DWAYNE", "DUANE", 0.8222);
    assert_close("DIXON", "DICKSONX", 0.7667);
}

#[test]
fn degenerate_inputs() {
    assert_eq!(similarity("", ""), 1.0);
    assert_eq!(similarity("", "x"), 0.0);
    assert_eq!(similarity("x", ""), 0.0);
    assert_eq!(similarity("a", "a"), 1.0);
    assert_eq!(similarity("a", "b"), 0.0);
    assert_eq!(similarity("abc", "xyz"), 0.0);
}

#[test]
fn headline_case_change_clears_default_threshold() {
    let s = similarity("AI breakthrough", "AI Breakthrough");
    assert!(s > 0.95 && s < 1.0, "got {s}");
    assert!(is_similar(
        Some("AI breakthrough"),
        Some("AI Breakthrough"),
        DEFAULT_SIMILARITY_THRESHOLD
    ));
}

#[test]
fn missing_side_is_never_similar() {
    assert!(!is_similar(None, Some("x"), 0.0));
    assert!(!is_similar(Some("x"), None, 0.0));
    assert!(!is_similar(None, None, 0.0));
}

#[test]
fn symmetric_identity_and_bounded_on_random_words() {
    let mut rng = StdRng::seed_from_u64(0x6a61726f);
    let alphabet: Vec<char> = "abcé ".chars().collect();
    for _ in 0..5_000 {
        let a = random_word(&mut rng, &alphabet, 12);
        let b = random_word(&mut rng, &alphabet, 12);
        let ab = similarity(&a, &b);
        let ba = similarity(&b, &a);
        assert_eq!(ab, ba, "asymmetric for {a:?} / {b:?}");
        assert!((0.0..=1.0).contains(&ab), "out of range for {a:?} / {b:?}: {ab}");
        assert_eq!(similarity(&a, &a), 1.0);
    }
}

#[test]
fn agrees_with_strsim_on_prefix_extensions() {
    // A string and one of its extensions match position for position, so the
    // transposition count is zero and implementations cannot disagree on it.
    let mut rng = StdRng::seed_from_u64(42);
    let alphabet: Vec<char> = "abcdxyz".chars().collect();
    for _ in 0..2_000 {
        let head = random_word(&mut rng, &alphabet, 10);
        let tail = random_word(&mut rng, &alphabet, 10);
        if head.is_empty() {
            continue;
        }
        let full = format!("{head}{tail}");
        let ours = similarity(&head, &full);
        let theirs = strsim::jaro(&head, &full);
        assert!(
            (ours - theirs).abs() < 1e-12,
            "{head:?} / {full:?}: ours {ours}, strsim {theirs}"
        );
    }
}

#[test]
fn agrees_with_strsim_on_reference_vectors() {
    for (a, b) in [("MARTHA", "MARHTA"), ("DWAYNE", "DUANE"), ("DIXON", "DICKSONX")] {
        assert!((similarity(a, b) - strsim::jaro(a, b)).abs() < EPS);
    }
}
