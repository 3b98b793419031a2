//! Phonetic scoring
//!
//! Double Metaphone and Soundex gates combined with Jaro-Winkler
//! similarity. Handles misheard phrases like "fyer phasers" → "fire phasers"
//! by comparing how the words sound before comparing how they are spelt.

use super::Thresholds;
use crate::utils::{length_ratio, similarity};
use rphonetic::{DoubleMetaphone, Encoder, Soundex};

/// Highest possible Soundex difference: all four code positions agree
pub const SOUNDEX_MAX: usize = 4;

/// A pair that passed every gate of a phonetic path
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhoneticScore {
    /// Jaro-Winkler similarity of the pair
    pub similarity: f64,
    /// Soundex difference, only set on the Soundex path
    pub soundex_difference: Option<usize>,
}

/// Phonetic scorer wrapping the Double Metaphone and Soundex encoders
pub struct PhoneticScorer {
    metaphone: DoubleMetaphone,
    soundex: Soundex,
}

impl Default for PhoneticScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl PhoneticScorer {
    pub fn new() -> Self {
        Self {
            metaphone: DoubleMetaphone::default(),
            soundex: Soundex::default(),
        }
    }

    /// Check if two phrases share a Double Metaphone code.
    ///
    /// Primary codes are compared first, then alternate codes.
    pub fn metaphone_equal(&self, a: &str, b: &str) -> bool {
        let (a, b) = match (encodable(a), encodable(b)) {
            (Some(a), Some(b)) => (a, b),
            _ => return false,
        };

        let ra = self.metaphone.double_metaphone(&a);
        let rb = self.metaphone.double_metaphone(&b);

        ra.primary() == rb.primary() || ra.alternate() == rb.alternate()
    }

    /// Soundex code of a phrase (empty when it holds no ASCII letters)
    pub fn soundex(&self, value: &str) -> String {
        match encodable(value) {
            Some(value) => self.soundex.encode(&value),
            None => String::new(),
        }
    }

    /// Number of agreeing positions between two Soundex codes (0..=4)
    pub fn soundex_difference(&self, a: &str, b: &str) -> usize {
        let ea = self.soundex(a);
        let eb = self.soundex(b);

        ea.chars()
            .zip(eb.chars())
            .filter(|(ca, cb)| ca == cb)
            .count()
    }

    /// Score a pair along the Double Metaphone path.
    ///
    /// Gates, in order: phonetic equality, length ratio, Jaro-Winkler.
    pub fn score_double_metaphone(
        &self,
        candidate: &str,
        phrase: &str,
        thresholds: &Thresholds,
    ) -> Option<PhoneticScore> {
        if !self.metaphone_equal(candidate, phrase) {
            return None;
        }

        let similarity = gated_similarity(candidate, phrase, thresholds)?;
        Some(PhoneticScore {
            similarity,
            soundex_difference: None,
        })
    }

    /// Score a pair along the Soundex path.
    ///
    /// Gates, in order: Soundex difference, length ratio, Jaro-Winkler.
    pub fn score_soundex(
        &self,
        candidate: &str,
        phrase: &str,
        thresholds: &Thresholds,
    ) -> Option<PhoneticScore> {
        let difference = self.soundex_difference(candidate, phrase);
        if difference <= thresholds.soundex_lower {
            return None;
        }

        let similarity = gated_similarity(candidate, phrase, thresholds)?;
        Some(PhoneticScore {
            similarity,
            soundex_difference: Some(difference),
        })
    }
}

/// Reduce a phrase to ASCII letters and single spaces.
///
/// The encoders only understand the English alphabet and index into
/// their tables by byte, so everything else is dropped. `None` when no
/// letter survives.
fn encodable(value: &str) -> Option<String> {
    let letters: String = value
        .chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .filter(|c| c.is_ascii_alphabetic() || *c == ' ')
        .collect();

    let words: Vec<&str> = letters.split_whitespace().collect();
    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}

/// Length and Jaro-Winkler gates shared by both phonetic paths
fn gated_similarity(candidate: &str, phrase: &str, thresholds: &Thresholds) -> Option<f64> {
    if length_ratio(candidate, phrase) <= thresholds.length_ratio_lower {
        return None;
    }

    let score = similarity(candidate, phrase);
    if score > thresholds.jaro_winkler_lower {
        Some(score)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metaphone_equal() {
        let scorer = PhoneticScorer::new();

        assert!(scorer.metaphone_equal("fyer phasers", "fire phasers"));
        assert!(scorer.metaphone_equal("clipboard", "clipboard"));
        assert!(!scorer.metaphone_equal("hello", "world"));
        assert!(!scorer.metaphone_equal("", ""));
    }

    #[test]
    fn test_soundex_difference() {
        let scorer = PhoneticScorer::new();

        assert_eq!(scorer.soundex("robert"), "R163");
        assert_eq!(scorer.soundex_difference("robert", "rupert"), SOUNDEX_MAX);
        assert_eq!(scorer.soundex_difference("call mum", "cold mom"), 3);
        assert_eq!(scorer.soundex_difference("hello", "world"), 0);
        assert_eq!(scorer.soundex_difference("", "world"), 0);
    }

    #[test]
    fn test_non_ascii_input_is_encodable() {
        let scorer = PhoneticScorer::new();

        assert_eq!(encodable("café au lait").as_deref(), Some("caf au lait"));
        assert_eq!(encodable("ışık  aç").as_deref(), Some("k a"));
        assert_eq!(encodable("ığü 42"), None);

        assert_eq!(scorer.soundex("ışık aç"), scorer.soundex("k a"));
        assert_eq!(scorer.soundex("ığü"), "");
        assert_eq!(scorer.soundex_difference("ığü", "ığü"), 0);
        assert!(scorer.metaphone_equal("café", "CAFÉ"));
        assert!(!scorer.metaphone_equal("ığü", "ığü"));
    }

    #[test]
    fn test_double_metaphone_gates() {
        let scorer = PhoneticScorer::new();
        let thresholds = Thresholds::default();

        let score = scorer
            .score_double_metaphone("fyer phasers", "fire phasers", &thresholds)
            .expect("sound-alike phrase should qualify");
        assert!(score.similarity > thresholds.jaro_winkler_lower);
        assert_eq!(score.soundex_difference, None);

        // Phonetically unrelated
        assert!(scorer
            .score_double_metaphone("hello", "world", &thresholds)
            .is_none());
    }

    #[test]
    fn test_length_gate_is_strict() {
        let scorer = PhoneticScorer::new();
        // "open garage" vs "open garage door" has a length ratio of 0.6875
        let mut thresholds = Thresholds {
            length_ratio_lower: 0.6875,
            jaro_winkler_lower: 0.5,
            ..Thresholds::default()
        };
        assert!(scorer
            .score_soundex("open garage", "open garage door", &thresholds)
            .is_none());

        thresholds.length_ratio_lower = 0.68;
        assert!(scorer
            .score_soundex("open garage", "open garage door", &thresholds)
            .is_some());
    }

    #[test]
    fn test_soundex_gate_is_strict() {
        let scorer = PhoneticScorer::new();
        let mut thresholds = Thresholds {
            jaro_winkler_lower: 0.5,
            soundex_lower: 3,
            ..Thresholds::default()
        };

        // Difference of exactly 3 does not exceed a threshold of 3
        assert!(scorer
            .score_soundex("call mum", "cold mom", &thresholds)
            .is_none());

        thresholds.soundex_lower = 2;
        let score = scorer
            .score_soundex("call mum", "cold mom", &thresholds)
            .unwrap();
        assert_eq!(score.soundex_difference, Some(3));
    }
}
