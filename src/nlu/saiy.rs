//! Saiy NLU response adapter

use super::{parse_payload, NluNormalizer, NluProvider, NluResult};
use crate::error::SaiyResult;
use crate::utils::by_score_desc;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct SaiyResponse {
    #[serde(default)]
    utterance: Option<String>,
    intents: Vec<SaiyIntent>,
}

#[derive(Debug, Deserialize)]
struct SaiyIntent {
    intent: String,
    #[serde(default)]
    score: f64,
    #[serde(default)]
    entities: Vec<SaiyEntity>,
}

#[derive(Debug, Deserialize)]
struct SaiyEntity {
    name: String,
    value: String,
}

pub struct SaiyNormalizer;

impl NluNormalizer for SaiyNormalizer {
    fn provider(&self) -> NluProvider {
        NluProvider::Saiy
    }

    fn normalize(&self, payload: &Value) -> SaiyResult<Option<NluResult>> {
        let mut response: SaiyResponse = parse_payload(self.provider(), payload)?;

        response.intents.retain(|i| !i.intent.trim().is_empty());
        response.intents.sort_by(|a, b| by_score_desc(a.score, b.score));

        let top = match response.intents.into_iter().next() {
            Some(top) => top,
            None => return Ok(None),
        };

        let mut nlu = NluResult::new(self.provider(), top.intent.trim(), top.score);
        nlu.query = response.utterance;
        for entity in &top.entities {
            nlu.insert_slot(&entity.name, &entity.value);
        }

        Ok(Some(nlu))
    }
}
