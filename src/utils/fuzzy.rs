//! Fuzzy matching utilities
//!
//! Shared similarity primitives used by the scorers in `matching`.

use std::cmp::Ordering;
use strsim::jaro_winkler;

/// Jaro-Winkler similarity in `[0, 1]`
pub fn similarity(a: &str, b: &str) -> f64 {
    jaro_winkler(a, b)
}

/// Ratio of the shorter to the longer string, counted in chars.
///
/// Two empty strings are considered identical in length.
pub fn length_ratio(a: &str, b: &str) -> f64 {
    let la = a.chars().count();
    let lb = b.chars().count();
    let longest = la.max(lb);
    if longest == 0 {
        return 1.0;
    }
    la.min(lb) as f64 / longest as f64
}

/// Descending comparison on scores, treating NaN as equal
pub fn by_score_desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}
