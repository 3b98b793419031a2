//! Candidate ranking
//!
//! Compares every ASR candidate against every registered phrase and
//! selects the best pair for a given algorithm. Candidates are visited
//! in emission order and phrases in registration order, so the result
//! is deterministic for a given input.

use super::alignment::AlignmentScorer;
use super::phonetic::{PhoneticScorer, SOUNDEX_MAX};
use super::{Algorithm, Phrase, Thresholds};
use crate::core::text_normalizer::TextNormalizer;
use crate::utils::by_score_desc;
use serde::Serialize;
use tracing::{debug, info};

/// One ASR hypothesis with its optional confidence
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub text: String,
    pub confidence: Option<f32>,
}

impl Candidate {
    pub fn new(text: impl Into<String>, confidence: Option<f32>) -> Self {
        Self {
            text: text.into(),
            confidence,
        }
    }

    /// Pair transcriptions with a parallel confidence array.
    ///
    /// Missing entries and negative values (the ASR "unknown" marker)
    /// become `None`.
    pub fn zip(texts: &[String], confidences: &[f32]) -> Vec<Candidate> {
        texts
            .iter()
            .enumerate()
            .map(|(i, text)| {
                let confidence = confidences.get(i).copied().filter(|c| *c >= 0.0);
                Candidate::new(text.clone(), confidence)
            })
            .collect()
    }
}

/// How a ranked match was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "method", content = "algorithm")]
pub enum MatchMethod {
    /// Normalised candidate equals the phrase
    Exact,
    /// Found by a fuzzy algorithm
    Algorithm(Algorithm),
}

/// Best candidate/phrase pair found by the ranker
#[derive(Debug, Clone)]
pub struct RankedMatch<'a, T> {
    /// The registered entry that matched
    pub entry: &'a T,
    /// Normalised candidate text
    pub utterance: String,
    /// Index of the candidate in emission order
    pub candidate_index: usize,
    /// Index of the entry in registration order
    pub phrase_index: usize,
    pub confidence: Option<f32>,
    pub score: f64,
    pub method: MatchMethod,
    /// True when this pair ended the search early
    pub exact: bool,
}

/// Normalised candidate kept alongside its position
struct Prepared {
    index: usize,
    text: String,
    confidence: Option<f32>,
}

/// Ranks ASR candidates against registered phrases
pub struct CandidateRanker<'a, T> {
    entries: &'a [T],
    phrases: Vec<String>,
    normalizer: &'a TextNormalizer,
    thresholds: Thresholds,
    min_confidence: f32,
    phonetic: PhoneticScorer,
    alignment: AlignmentScorer,
}

impl<'a, T: Phrase> CandidateRanker<'a, T> {
    /// Create a ranker over `entries`, normalising each phrase once
    pub fn new(entries: &'a [T], normalizer: &'a TextNormalizer, thresholds: Thresholds) -> Self {
        let phrases = entries
            .iter()
            .map(|e| normalizer.normalize_phrase(e.phrase()))
            .collect();

        Self {
            entries,
            phrases,
            normalizer,
            thresholds,
            min_confidence: 0.0,
            phonetic: PhoneticScorer::new(),
            alignment: AlignmentScorer::default(),
        }
    }

    /// Skip candidates whose known confidence is below `min_confidence`
    pub fn with_min_confidence(mut self, min_confidence: f32) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Exact pass, then each algorithm in order until one matches
    pub fn resolve(
        &self,
        candidates: &[Candidate],
        algorithms: &[Algorithm],
    ) -> Option<RankedMatch<'a, T>> {
        let prepared = self.prepare(candidates);
        if prepared.is_empty() || self.entries.is_empty() {
            debug!("Nothing to rank");
            return None;
        }

        if let Some(found) = self.exact_pass(&prepared) {
            return Some(found);
        }

        for algorithm in algorithms {
            if let Some(found) = self.run(&prepared, *algorithm) {
                return Some(found);
            }
            debug!("{} found no match, trying next algorithm", algorithm);
        }

        None
    }

    /// Rank with a single algorithm (an exact match still wins)
    pub fn rank(&self, candidates: &[Candidate], algorithm: Algorithm) -> Option<RankedMatch<'a, T>> {
        self.resolve(candidates, &[algorithm])
    }

    fn prepare(&self, candidates: &[Candidate]) -> Vec<Prepared> {
        candidates
            .iter()
            .enumerate()
            .filter(|(_, c)| match c.confidence {
                Some(confidence) if confidence < self.min_confidence => {
                    debug!(
                        "Skipping '{}': confidence {:.2} below {:.2}",
                        c.text, confidence, self.min_confidence
                    );
                    false
                }
                _ => true,
            })
            .map(|(index, c)| Prepared {
                index,
                text: self.normalizer.normalize(&c.text),
                confidence: c.confidence,
            })
            .filter(|p| !p.text.is_empty())
            .collect()
    }

    fn exact_pass(&self, prepared: &[Prepared]) -> Option<RankedMatch<'a, T>> {
        for candidate in prepared {
            for (phrase_index, phrase) in self.phrases.iter().enumerate() {
                if !phrase.is_empty() && candidate.text == *phrase {
                    info!("🎯 Exact match: '{}'", phrase);
                    return Some(self.build(candidate, phrase_index, 1.0, MatchMethod::Exact, true));
                }
            }
        }
        None
    }

    fn run(&self, prepared: &[Prepared], algorithm: Algorithm) -> Option<RankedMatch<'a, T>> {
        let method = MatchMethod::Algorithm(algorithm);
        let mut buffered: Vec<RankedMatch<'a, T>> = Vec::new();

        for candidate in prepared {
            for (phrase_index, phrase) in self.phrases.iter().enumerate() {
                if phrase.is_empty() {
                    continue;
                }

                match algorithm {
                    Algorithm::DoubleMetaphone => {
                        if let Some(score) = self.phonetic.score_double_metaphone(
                            &candidate.text,
                            phrase,
                            &self.thresholds,
                        ) {
                            info!(
                                "🎯 Double Metaphone match: '{}' ~ '{}' ({:.3})",
                                candidate.text, phrase, score.similarity
                            );
                            return Some(self.build(candidate, phrase_index, score.similarity, method, true));
                        }
                    }
                    Algorithm::Soundex => {
                        if let Some(score) =
                            self.phonetic
                                .score_soundex(&candidate.text, phrase, &self.thresholds)
                        {
                            if score.soundex_difference == Some(SOUNDEX_MAX) {
                                info!(
                                    "🎯 Soundex match: '{}' ~ '{}' ({:.3})",
                                    candidate.text, phrase, score.similarity
                                );
                                return Some(self.build(candidate, phrase_index, score.similarity, method, true));
                            }
                            buffered.push(self.build(candidate, phrase_index, score.similarity, method, false));
                        }
                    }
                    Algorithm::NeedlemanWunsch => {
                        let score = self.alignment.similarity(&candidate.text, phrase);
                        if score > self.thresholds.needleman_wunsch_upper {
                            if score >= 1.0 {
                                info!(
                                    "🎯 Needleman-Wunsch match: '{}' ~ '{}' ({:.3})",
                                    candidate.text, phrase, score
                                );
                                return Some(self.build(candidate, phrase_index, score, method, true));
                            }
                            buffered.push(self.build(candidate, phrase_index, score, method, false));
                        }
                    }
                }
            }
        }

        if buffered.is_empty() {
            return None;
        }

        debug!("{}: {} buffered pair(s)", algorithm, buffered.len());

        // Stable sort keeps emission order among equal scores
        buffered.sort_by(|a, b| by_score_desc(a.score, b.score));
        let best = buffered.into_iter().next()?;
        info!(
            "🎯 {} match: '{}' ~ '{}' ({:.3})",
            algorithm, best.utterance, best.entry.phrase(), best.score
        );
        Some(best)
    }

    fn build(
        &self,
        candidate: &Prepared,
        phrase_index: usize,
        score: f64,
        method: MatchMethod,
        exact: bool,
    ) -> RankedMatch<'a, T> {
        let entries: &'a [T] = self.entries;
        RankedMatch {
            entry: &entries[phrase_index],
            utterance: candidate.text.clone(),
            candidate_index: candidate.index,
            phrase_index,
            confidence: candidate.confidence,
            score,
            method,
            exact,
        }
    }
}
