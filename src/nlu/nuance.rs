//! Nuance Mix response adapter
//!
//! Interpretations arrive ranked, so only the first one is used.

use super::{parse_payload, value_text, NluNormalizer, NluProvider, NluResult};
use crate::error::SaiyResult;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
struct MixResponse {
    #[serde(default)]
    literal: Option<String>,
    interpretations: Vec<MixInterpretation>,
}

#[derive(Debug, Deserialize)]
struct MixInterpretation {
    #[serde(default)]
    literal: Option<String>,
    action: MixAction,
    #[serde(default)]
    concepts: BTreeMap<String, Vec<MixConcept>>,
}

#[derive(Debug, Deserialize)]
struct MixAction {
    intent: MixIntent,
}

#[derive(Debug, Deserialize)]
struct MixIntent {
    value: String,
    #[serde(default)]
    confidence: f64,
}

#[derive(Debug, Deserialize)]
struct MixConcept {
    #[serde(default)]
    value: Value,
    #[serde(default)]
    literal: Option<String>,
}

impl MixConcept {
    fn text(&self) -> Option<String> {
        match &self.value {
            Value::String(_) => value_text(&self.value),
            _ => self.literal.clone(),
        }
    }
}

pub struct NuanceMixNormalizer;

impl NluNormalizer for NuanceMixNormalizer {
    fn provider(&self) -> NluProvider {
        NluProvider::NuanceMix
    }

    fn normalize(&self, payload: &Value) -> SaiyResult<Option<NluResult>> {
        let response: MixResponse = parse_payload(self.provider(), payload)?;

        let interpretation = match response.interpretations.into_iter().next() {
            Some(interpretation) => interpretation,
            None => return Ok(None),
        };

        let intent = interpretation.action.intent.value.trim();
        if intent.is_empty() || intent.eq_ignore_ascii_case("NO_MATCH") {
            return Ok(None);
        }

        let mut nlu = NluResult::new(
            self.provider(),
            intent,
            interpretation.action.intent.confidence,
        );
        nlu.query = interpretation.literal.or(response.literal);

        for (name, concepts) in &interpretation.concepts {
            if let Some(text) = concepts.iter().find_map(MixConcept::text) {
                nlu.insert_slot(name, &text);
            }
        }

        Ok(Some(nlu))
    }
}
