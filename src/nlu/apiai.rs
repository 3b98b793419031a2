//! API.AI response adapter

use super::{parse_payload, value_text, NluNormalizer, NluProvider, NluResult};
use crate::error::SaiyResult;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
struct ApiAiResponse {
    result: ApiAiQueryResult,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiAiQueryResult {
    #[serde(default)]
    resolved_query: Option<String>,
    #[serde(default)]
    action: Option<String>,
    #[serde(default)]
    parameters: BTreeMap<String, Value>,
    #[serde(default)]
    score: Option<f64>,
}

pub struct ApiAiNormalizer;

impl NluNormalizer for ApiAiNormalizer {
    fn provider(&self) -> NluProvider {
        NluProvider::ApiAi
    }

    fn normalize(&self, payload: &Value) -> SaiyResult<Option<NluResult>> {
        let response: ApiAiResponse = parse_payload(self.provider(), payload)?;
        let result = response.result;

        let action = match result.action.as_deref().map(str::trim) {
            Some(action) if !action.is_empty() => action,
            _ => return Ok(None),
        };

        let mut nlu = NluResult::new(self.provider(), action, result.score.unwrap_or(0.0));
        nlu.query = result.resolved_query;
        for (name, value) in &result.parameters {
            if let Some(text) = value_text(value) {
                nlu.insert_slot(name, &text);
            }
        }

        Ok(Some(nlu))
    }
}
