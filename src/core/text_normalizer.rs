//! Text Normalization
//!
//! Locale-aware lower-casing and user corrections applied to ASR
//! candidates and registered phrases before they are compared.

use regex::{NoExpand, Regex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::warn;

/// Active recognition language, e.g. `en-GB` or `tr-TR`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub struct Locale {
    language: String,
    region: Option<String>,
}

impl Default for Locale {
    fn default() -> Self {
        Self::parse("en-GB")
    }
}

impl Locale {
    /// Parse a BCP-47 style tag. Only the language and region are kept.
    pub fn parse(tag: &str) -> Self {
        let mut parts = tag.trim().split(['-', '_']);
        let language = parts
            .next()
            .filter(|l| !l.is_empty())
            .unwrap_or("en")
            .to_lowercase();
        let region = parts.next().map(|r| r.to_uppercase());

        Self { language, region }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// Lower-case following the casing rules of this locale
    pub fn lowercase(&self, text: &str) -> String {
        match self.language.as_str() {
            // Dotted and dotless I are distinct letters
            "tr" | "az" => text
                .chars()
                .flat_map(|c| match c {
                    'I' => vec!['ı'],
                    'İ' => vec!['i'],
                    other => other.to_lowercase().collect(),
                })
                .collect(),
            _ => text.to_lowercase(),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.region {
            Some(region) => write!(f, "{}-{}", self.language, region),
            None => f.write_str(&self.language),
        }
    }
}

impl From<String> for Locale {
    fn from(tag: String) -> Self {
        Locale::parse(&tag)
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.to_string()
    }
}

/// Normalizes spoken text before matching
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    locale: Locale,
    /// Manual corrections from config, longest first, matched on word boundaries
    corrections: Vec<(Regex, String)>,
}

impl TextNormalizer {
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            corrections: Vec::new(),
        }
    }

    /// Attach user corrections (misheard → intended)
    pub fn with_corrections(mut self, corrections: &HashMap<String, String>) -> Self {
        let mut pairs: Vec<(String, String)> = corrections
            .iter()
            .map(|(from, to)| (self.locale.lowercase(from.trim()), self.locale.lowercase(to.trim())))
            .filter(|(from, _)| !from.is_empty())
            .collect();

        // Longest first so "play er" is replaced before "er"
        pairs.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));
        self.corrections = pairs
            .into_iter()
            .filter_map(|(from, to)| {
                let pattern = format!(r"\b{}\b", regex::escape(&from));
                match Regex::new(&pattern) {
                    Ok(re) => Some((re, to)),
                    Err(e) => {
                        warn!("⚠️ Skipping correction '{}': {}", from, e);
                        None
                    }
                }
            })
            .collect();
        self
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Normalize a registered phrase: locale lower-case and trim
    pub fn normalize_phrase(&self, phrase: &str) -> String {
        self.locale.lowercase(phrase).trim().to_string()
    }

    /// Normalize an ASR candidate: lower-case, trim and apply corrections
    pub fn normalize(&self, text: &str) -> String {
        let mut result = self.normalize_phrase(text);

        for (from, to) in &self.corrections {
            if from.is_match(&result) {
                result = from.replace_all(&result, NoExpand(to)).into_owned();
            }
        }

        result.trim().to_string()
    }
}
