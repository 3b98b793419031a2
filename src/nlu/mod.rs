//! NLU Normalization
//!
//! Provides one adapter per NLU provider:
//! - API.AI: `result.action` + `result.parameters`
//! - Microsoft LUIS: top scoring intent + typed entities
//! - Nuance Mix: ranked interpretations with concepts
//! - Wit.ai: intent and entity arrays with confidences
//! - Saiy: the local grammar's intents with named entities
//! - IBM Bluemix: natural language classifier classes
//!
//! Each adapter projects its provider's response into an [`NluResult`].

pub mod apiai;
pub mod bluemix;
pub mod luis;
pub mod nuance;
pub mod saiy;
pub mod wit;

use crate::commands::Slots;
use crate::error::{SaiyError, SaiyResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Supported NLU providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NluProvider {
    ApiAi,
    Luis,
    NuanceMix,
    Wit,
    Saiy,
    Bluemix,
}

impl NluProvider {
    pub fn name(&self) -> &'static str {
        match self {
            NluProvider::ApiAi => "api_ai",
            NluProvider::Luis => "luis",
            NluProvider::NuanceMix => "nuance_mix",
            NluProvider::Wit => "wit",
            NluProvider::Saiy => "saiy",
            NluProvider::Bluemix => "bluemix",
        }
    }
}

impl fmt::Display for NluProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NluProvider {
    type Err = SaiyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(|c| c.to_lowercase())
            .collect();

        match key.as_str() {
            "apiai" | "dialogflow" => Ok(NluProvider::ApiAi),
            "luis" | "microsoft" | "microsoftluis" => Ok(NluProvider::Luis),
            "nuance" | "nuancemix" | "mix" => Ok(NluProvider::NuanceMix),
            "wit" | "witai" => Ok(NluProvider::Wit),
            "saiy" => Ok(NluProvider::Saiy),
            "bluemix" | "ibm" | "nlc" => Ok(NluProvider::Bluemix),
            _ => Err(SaiyError::UnknownProvider(s.to_string())),
        }
    }
}

/// Provider-independent NLU interpretation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NluResult {
    pub provider: NluProvider,
    /// The text the provider interpreted, when it echoes it back
    pub query: Option<String>,
    pub intent: String,
    pub confidence: f64,
    pub slots: Slots,
}

impl NluResult {
    pub fn new(provider: NluProvider, intent: &str, confidence: f64) -> Self {
        Self {
            provider,
            query: None,
            intent: intent.to_string(),
            confidence,
            slots: Slots::new(),
        }
    }

    /// Insert a slot under its canonical name, skipping empty values
    pub fn insert_slot(&mut self, name: &str, value: &str) {
        let name = canonical_slot_name(name);
        let value = value.trim();
        if !name.is_empty() && !value.is_empty() {
            self.slots.insert(name, value.to_string());
        }
    }
}

/// Trait for provider adapters
pub trait NluNormalizer: Send + Sync {
    fn provider(&self) -> NluProvider;

    /// Project a raw provider response.
    ///
    /// Returns `Ok(None)` when the response carries no intent, and an
    /// error when it does not have the provider's shape at all.
    fn normalize(&self, payload: &Value) -> SaiyResult<Option<NluResult>>;
}

/// Factory for the adapter of a given provider
pub fn normalizer_for(provider: NluProvider) -> Box<dyn NluNormalizer> {
    match provider {
        NluProvider::ApiAi => Box::new(apiai::ApiAiNormalizer),
        NluProvider::Luis => Box::new(luis::LuisNormalizer),
        NluProvider::NuanceMix => Box::new(nuance::NuanceMixNormalizer),
        NluProvider::Wit => Box::new(wit::WitNormalizer),
        NluProvider::Saiy => Box::new(saiy::SaiyNormalizer),
        NluProvider::Bluemix => Box::new(bluemix::BluemixNormalizer),
    }
}

/// Deserialize a provider payload into its typed shape
pub(crate) fn parse_payload<T>(provider: NluProvider, payload: &Value) -> SaiyResult<T>
where
    T: serde::de::DeserializeOwned,
{
    T::deserialize(payload).map_err(|e| SaiyError::nlu(provider, e.to_string()))
}

/// Lower-case a slot name and strip `builtin.` prefixes and `::role` suffixes
pub fn canonical_slot_name(name: &str) -> String {
    let name = name.trim();
    let name = name.split("::").next().unwrap_or(name);
    let name = name.strip_prefix("builtin.").unwrap_or(name);
    name.to_lowercase()
}

/// Render a JSON slot value as text.
///
/// Arrays use their first non-empty element; objects and nulls have no text.
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => items.iter().find_map(value_text),
        _ => None,
    }
}
