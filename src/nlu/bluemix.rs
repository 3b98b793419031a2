//! IBM Bluemix natural language classifier adapter
//!
//! The classifier only labels text, so results never carry slots.

use super::{parse_payload, NluNormalizer, NluProvider, NluResult};
use crate::error::SaiyResult;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct ClassifierResponse {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    top_class: Option<String>,
    #[serde(default)]
    classes: Vec<ClassifierClass>,
}

#[derive(Debug, Deserialize)]
struct ClassifierClass {
    class_name: String,
    #[serde(default)]
    confidence: f64,
}

pub struct BluemixNormalizer;

impl NluNormalizer for BluemixNormalizer {
    fn provider(&self) -> NluProvider {
        NluProvider::Bluemix
    }

    fn normalize(&self, payload: &Value) -> SaiyResult<Option<NluResult>> {
        let response: ClassifierResponse = parse_payload(self.provider(), payload)?;

        let top_class = match response.top_class.as_deref().map(str::trim) {
            Some(top) if !top.is_empty() => top,
            _ => return Ok(None),
        };

        let confidence = response
            .classes
            .iter()
            .find(|c| c.class_name == top_class)
            .map(|c| c.confidence)
            .unwrap_or(0.0);

        let mut nlu = NluResult::new(self.provider(), top_class, confidence);
        nlu.query = response.text.clone();
        Ok(Some(nlu))
    }
}
