//! Microsoft LUIS response adapter

use super::{canonical_slot_name, parse_payload, NluNormalizer, NluProvider, NluResult};
use crate::error::SaiyResult;
use crate::utils::by_score_desc;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LuisResponse {
    #[serde(default)]
    query: Option<String>,
    #[serde(default)]
    top_scoring_intent: Option<LuisIntent>,
    #[serde(default)]
    intents: Vec<LuisIntent>,
    #[serde(default)]
    entities: Vec<LuisEntity>,
}

#[derive(Debug, Clone, Deserialize)]
struct LuisIntent {
    intent: String,
    #[serde(default)]
    score: f64,
}

#[derive(Debug, Deserialize)]
struct LuisEntity {
    entity: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    score: Option<f64>,
}

pub struct LuisNormalizer;

impl NluNormalizer for LuisNormalizer {
    fn provider(&self) -> NluProvider {
        NluProvider::Luis
    }

    fn normalize(&self, payload: &Value) -> SaiyResult<Option<NluResult>> {
        let response: LuisResponse = parse_payload(self.provider(), payload)?;

        let top = response.top_scoring_intent.clone().or_else(|| {
            let mut intents = response.intents.clone();
            intents.sort_by(|a, b| by_score_desc(a.score, b.score));
            intents.into_iter().next()
        });

        let top = match top {
            Some(top) if !top.intent.trim().is_empty() && top.intent != "None" => top,
            _ => return Ok(None),
        };

        let mut nlu = NluResult::new(self.provider(), top.intent.trim(), top.score);
        nlu.query = response.query;

        // Highest scoring entity per type; builtin entities carry no score
        let mut best: HashMap<String, (f64, &str)> = HashMap::new();
        for entity in &response.entities {
            let name = canonical_slot_name(&entity.kind);
            let score = entity.score.unwrap_or(1.0);
            match best.get(&name) {
                Some((existing, _)) if *existing >= score => {}
                _ => {
                    best.insert(name, (score, entity.entity.as_str()));
                }
            }
        }
        for (name, (_, value)) in best {
            nlu.insert_slot(&name, value);
        }

        Ok(Some(nlu))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_top_scoring_intent() {
        let payload = json!({
            "query": "translate hello into german",
            "topScoringIntent": {"intent": "Translate", "score": 0.93},
            "entities": [
                {"entity": "hello", "type": "Text", "startIndex": 10, "endIndex": 14, "score": 0.71},
                {"entity": "hello into", "type": "Text", "startIndex": 10, "endIndex": 19, "score": 0.22},
                {"entity": "german", "type": "builtin.language", "startIndex": 21, "endIndex": 26}
            ]
        });

        let nlu = LuisNormalizer.normalize(&payload).unwrap().unwrap();
        assert_eq!(nlu.intent, "Translate");
        assert_eq!(nlu.confidence, 0.93);
        assert_eq!(nlu.slots.get("text").map(String::as_str), Some("hello"));
        assert_eq!(nlu.slots.get("language").map(String::as_str), Some("german"));
    }

    #[test]
    fn test_falls_back_to_intents_list() {
        let payload = json!({
            "query": "who am i",
            "intents": [
                {"intent": "Cancel", "score": 0.1},
                {"intent": "VocalIdentify", "score": 0.8}
            ],
            "entities": []
        });

        let nlu = LuisNormalizer.normalize(&payload).unwrap().unwrap();
        assert_eq!(nlu.intent, "VocalIdentify");
    }

    #[test]
    fn test_none_intent_is_no_result() {
        let payload = json!({
            "query": "blah",
            "topScoringIntent": {"intent": "None", "score": 0.9},
            "entities": []
        });
        assert!(LuisNormalizer.normalize(&payload).unwrap().is_none());
        assert!(LuisNormalizer.normalize(&json!({"query": "x"})).unwrap().is_none());
    }
}
