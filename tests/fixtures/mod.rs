//! Shared competition tables for integration testing

use pairwise_ratings::{Competition, Outcome, RatingsList};

/// Four players seeded at `rating`
pub fn league(rating: f64) -> RatingsList {
    RatingsList::uniform(["ana", "ben", "cam", "dee"], rating)
}

/// A short season in which `ana` is strongest and `dee` weakest
pub fn season() -> Vec<Competition> {
    vec![
        Competition::with_scores("ana", "ben", 3.0, 1.0),
        Competition::with_scores("cam", "dee", 2.0, 2.0),
        Competition::with_scores("ana", "cam", 4.0, 0.0),
        Competition::with_scores("ben", "dee", 2.0, 1.0),
        Competition::with_scores("dee", "ana", 0.0, 2.0),
        Competition::with_scores("ben", "cam", 1.0, 1.0),
        Competition::with_scores("cam", "ben", 2.0, 3.0),
    ]
}

/// Outcome-only rows built from `(a, b, outcome)` triples
pub fn outcomes(rows: &[(&str, &str, Outcome)]) -> Vec<Competition> {
    rows.iter()
        .map(|(a, b, outcome)| Competition::new(*a, *b, *outcome))
        .collect()
}

pub fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {} within {} of {}",
        actual,
        tolerance,
        expected
    );
}
