//! Fuzzy command matching
//!
//! Scores noisy ASR candidates against registered phrases using
//! phonetic encoders, Jaro-Winkler similarity and sequence alignment.

pub mod alignment;
pub mod phonetic;
pub mod ranker;

use crate::error::SaiyError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use alignment::AlignmentScorer;
pub use phonetic::PhoneticScorer;
pub use ranker::{Candidate, CandidateRanker, MatchMethod, RankedMatch};

/// Matching algorithms available to the ranker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    DoubleMetaphone,
    Soundex,
    NeedlemanWunsch,
}

impl Algorithm {
    /// Default cascade order
    pub const DEFAULT_ORDER: [Algorithm; 3] = [
        Algorithm::DoubleMetaphone,
        Algorithm::Soundex,
        Algorithm::NeedlemanWunsch,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::DoubleMetaphone => "double_metaphone",
            Algorithm::Soundex => "soundex",
            Algorithm::NeedlemanWunsch => "needleman_wunsch",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = SaiyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "double_metaphone" | "metaphone" | "dm" => Ok(Algorithm::DoubleMetaphone),
            "soundex" => Ok(Algorithm::Soundex),
            "needleman_wunsch" | "needleman_wunch" | "nw" => Ok(Algorithm::NeedlemanWunsch),
            other => Err(SaiyError::UnknownAlgorithm(other.to_string())),
        }
    }
}

/// Per-algorithm acceptance thresholds.
///
/// Every gate is a strict inequality: a pair qualifies only when its
/// value is greater than the configured threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Minimum Jaro-Winkler similarity for the phonetic paths
    pub jaro_winkler_lower: f64,
    /// Minimum shorter/longer length ratio for the phonetic paths
    pub length_ratio_lower: f64,
    /// Minimum Soundex difference (0..=4)
    pub soundex_lower: usize,
    /// Minimum normalised Needleman-Wunsch score
    pub needleman_wunsch_upper: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            jaro_winkler_lower: 0.80,
            length_ratio_lower: 0.60,
            soundex_lower: 2,
            needleman_wunsch_upper: 0.75,
        }
    }
}

/// Anything that can be registered with the ranker as a matchable phrase
pub trait Phrase {
    fn phrase(&self) -> &str;
}

impl Phrase for String {
    fn phrase(&self) -> &str {
        self
    }
}

impl Phrase for &str {
    fn phrase(&self) -> &str {
        self
    }
}

/// Every metric for one pair, with the gate outcomes under `thresholds`
#[derive(Debug, Clone, Serialize)]
pub struct PairReport {
    pub candidate: String,
    pub phrase: String,
    pub jaro_winkler: f64,
    pub length_ratio: f64,
    pub metaphone_equal: bool,
    pub soundex: (String, String),
    pub soundex_difference: usize,
    pub needleman_wunsch: f64,
    pub double_metaphone_passes: bool,
    pub soundex_passes: bool,
    pub needleman_wunsch_passes: bool,
}

impl PairReport {
    pub fn new(candidate: &str, phrase: &str, thresholds: &Thresholds) -> Self {
        let phonetic = PhoneticScorer::new();
        let alignment = AlignmentScorer::default();
        let needleman_wunsch = alignment.similarity(candidate, phrase);

        Self {
            candidate: candidate.to_string(),
            phrase: phrase.to_string(),
            jaro_winkler: crate::utils::similarity(candidate, phrase),
            length_ratio: crate::utils::length_ratio(candidate, phrase),
            metaphone_equal: phonetic.metaphone_equal(candidate, phrase),
            soundex: (phonetic.soundex(candidate), phonetic.soundex(phrase)),
            soundex_difference: phonetic.soundex_difference(candidate, phrase),
            needleman_wunsch,
            double_metaphone_passes: phonetic
                .score_double_metaphone(candidate, phrase, thresholds)
                .is_some(),
            soundex_passes: phonetic
                .score_soundex(candidate, phrase, thresholds)
                .is_some(),
            needleman_wunsch_passes: needleman_wunsch > thresholds.needleman_wunsch_upper,
        }
    }
}
