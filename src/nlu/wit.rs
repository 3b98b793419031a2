//! Wit.ai response adapter
//!
//! Handles both response shapes: the newer one with a top-level
//! `intents` array, and the older one where the intent is an entity.

use super::{canonical_slot_name, parse_payload, value_text, NluNormalizer, NluProvider, NluResult};
use crate::error::SaiyResult;
use crate::utils::by_score_desc;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

const INTENT_ENTITY: &str = "intent";

#[derive(Debug, Deserialize)]
struct WitResponse {
    #[serde(default, alias = "_text")]
    text: Option<String>,
    #[serde(default)]
    intents: Vec<WitIntent>,
    #[serde(default)]
    entities: BTreeMap<String, Vec<WitEntity>>,
}

#[derive(Debug, Deserialize)]
struct WitIntent {
    name: String,
    #[serde(default)]
    confidence: f64,
}

#[derive(Debug, Deserialize)]
struct WitEntity {
    #[serde(default)]
    value: Value,
    #[serde(default)]
    confidence: f64,
}

/// Highest-confidence entry that has a textual value
fn best_entity(entities: &[WitEntity]) -> Option<(String, f64)> {
    let mut ranked: Vec<(String, f64)> = entities
        .iter()
        .filter_map(|e| value_text(&e.value).map(|text| (text, e.confidence)))
        .collect();
    ranked.sort_by(|a, b| by_score_desc(a.1, b.1));
    ranked.into_iter().next()
}

pub struct WitNormalizer;

impl NluNormalizer for WitNormalizer {
    fn provider(&self) -> NluProvider {
        NluProvider::Wit
    }

    fn normalize(&self, payload: &Value) -> SaiyResult<Option<NluResult>> {
        let response: WitResponse = parse_payload(self.provider(), payload)?;

        let mut intents: Vec<(String, f64)> = response
            .intents
            .iter()
            .filter(|i| !i.name.trim().is_empty())
            .map(|i| (i.name.trim().to_string(), i.confidence))
            .collect();
        intents.sort_by(|a, b| by_score_desc(a.1, b.1));

        let intent = intents.into_iter().next().or_else(|| {
            response
                .entities
                .get(INTENT_ENTITY)
                .and_then(|entities| best_entity(entities))
        });

        let (intent, confidence) = match intent {
            Some(intent) => intent,
            None => return Ok(None),
        };

        let mut nlu = NluResult::new(self.provider(), &intent, confidence);
        nlu.query = response.text;

        // Newer responses key entities as "name:role"; several roles of one
        // entity compete for the same slot
        let mut best: BTreeMap<String, (f64, String)> = BTreeMap::new();
        for (name, entities) in &response.entities {
            let name = canonical_slot_name(name.split(':').next().unwrap_or(name));
            if name == INTENT_ENTITY {
                continue;
            }
            if let Some((value, confidence)) = best_entity(entities) {
                match best.get(&name) {
                    Some((existing, _)) if *existing >= confidence => {}
                    _ => {
                        best.insert(name, (confidence, value));
                    }
                }
            }
        }
        for (name, (_, value)) in best {
            nlu.insert_slot(&name, &value);
        }

        Ok(Some(nlu))
    }
}
