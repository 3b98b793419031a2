//! Command Resolver
//!
//! Turns ASR candidates, plus an optional NLU response, into a single
//! resolved command with its slots.
//!
//! **Resolution order:**
//! 1. NLU payload → provider adapter → command (when confident enough)
//! 2. Custom commands → fuzzy ranker cascade
//! 3. Built-in trigger phrases
//!
//! Nothing matching is a normal outcome and is returned as `None`.

use crate::commands::{
    CommandKind, CommandRegistry, CustomCommand, Slots, TriggerTable, SLOT_TASK, SLOT_TEXT,
};
use crate::config::Config;
use crate::core::text_normalizer::{Locale, TextNormalizer};
use crate::error::SaiyResult;
use crate::matching::ranker::MatchMethod;
use crate::matching::{Algorithm, Candidate, CandidateRanker, Thresholds};
use crate::nlu::{normalizer_for, NluProvider};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info, warn};

/// Where a resolution came from
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResolutionSource {
    /// Structured NLU response
    Nlu { provider: NluProvider, intent: String },
    /// Fuzzy match against a custom command
    Ranker { method: MatchMethod },
    /// Built-in trigger phrase
    Trigger { trigger: String },
}

/// The resolved command and everything needed to execute it
#[derive(Debug, Clone, Serialize)]
pub struct Resolved {
    pub command: CommandKind,
    pub slots: Slots,
    pub source: ResolutionSource,
    /// Utterance the command was resolved from
    pub utterance: String,
    pub score: f64,
    /// ASR confidence of the winning candidate, when known
    pub confidence: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_command: Option<CustomCommand>,
}

/// Resolves voice data into commands
pub struct Resolver {
    normalizer: TextNormalizer,
    registry: CommandRegistry,
    triggers: TriggerTable,
    thresholds: Thresholds,
    algorithms: Vec<Algorithm>,
    min_confidence: f32,
    nlu_min_confidence: f64,
    custom_commands_enabled: bool,
}

impl Resolver {
    /// Create a resolver from config and an already populated registry
    pub fn new(config: &Config, registry: CommandRegistry) -> Self {
        let normalizer = TextNormalizer::new(Locale::parse(&config.language))
            .with_corrections(&config.voice_corrections);
        let triggers = registry.trigger_table(&normalizer);
        debug!("Trigger table: {} phrase(s)", triggers.len());

        Self {
            normalizer,
            registry,
            triggers,
            thresholds: config.thresholds,
            algorithms: config.algorithm_order(),
            min_confidence: config.min_confidence,
            nlu_min_confidence: config.nlu_min_confidence,
            custom_commands_enabled: config.custom_commands_enabled,
        }
    }

    /// Create a resolver, loading custom commands from the configured file
    pub fn from_config(config: &Config) -> SaiyResult<Self> {
        let mut registry = CommandRegistry::new();
        let path = Path::new(&config.custom_commands_path);
        if config.custom_commands_enabled && path.exists() {
            registry.load_custom_commands(path)?;
        }
        Ok(Self::new(config, registry))
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Resolve candidates, consulting the NLU response first when given
    pub fn resolve(
        &self,
        candidates: &[Candidate],
        nlu: Option<(NluProvider, &Value)>,
    ) -> Option<Resolved> {
        debug!(
            "Resolving {} candidate(s) for {}",
            candidates.len(),
            self.normalizer.locale()
        );

        let resolved = nlu
            .and_then(|(provider, payload)| self.resolve_nlu(provider, payload, candidates))
            .or_else(|| self.resolve_custom(candidates))
            .or_else(|| self.resolve_trigger(candidates));

        match resolved {
            Some(mut resolved) => {
                if resolved.command == CommandKind::Tasker {
                    self.refine_tasker(&mut resolved);
                }
                info!(
                    "✅ Resolved '{}' → {} ({:.3})",
                    resolved.utterance, resolved.command, resolved.score
                );
                Some(resolved)
            }
            None => {
                debug!("No command resolved");
                None
            }
        }
    }

    fn resolve_nlu(
        &self,
        provider: NluProvider,
        payload: &Value,
        candidates: &[Candidate],
    ) -> Option<Resolved> {
        let nlu = match normalizer_for(provider).normalize(payload) {
            Ok(Some(nlu)) => nlu,
            Ok(None) => {
                debug!("{} returned no intent", provider);
                return None;
            }
            Err(e) => {
                warn!("❌ Could not read {} response: {}", provider, e);
                return None;
            }
        };

        if nlu.confidence <= self.nlu_min_confidence {
            debug!(
                "{} intent '{}' below confidence threshold ({:.2} <= {:.2})",
                provider, nlu.intent, nlu.confidence, self.nlu_min_confidence
            );
            return None;
        }

        let command = match CommandKind::from_intent(&nlu.intent) {
            Some(CommandKind::Custom) | None => {
                debug!("{} intent '{}' is not a built-in command", provider, nlu.intent);
                return None;
            }
            Some(command) => command,
        };

        info!(
            "🧠 {} intent: {} → {} (confidence: {:.2})",
            provider, nlu.intent, command, nlu.confidence
        );

        let (utterance, confidence) = match &nlu.query {
            Some(query) => (self.normalizer.normalize(query), None),
            None => candidates
                .first()
                .map(|c| (self.normalizer.normalize(&c.text), c.confidence))
                .unwrap_or_default(),
        };

        Some(Resolved {
            command,
            slots: nlu.slots,
            source: ResolutionSource::Nlu {
                provider,
                intent: nlu.intent,
            },
            utterance,
            score: nlu.confidence,
            confidence,
            custom_command: None,
        })
    }

    fn resolve_custom(&self, candidates: &[Candidate]) -> Option<Resolved> {
        if !self.custom_commands_enabled || self.registry.custom_commands().is_empty() {
            return None;
        }

        let ranker = CandidateRanker::new(
            self.registry.custom_commands(),
            &self.normalizer,
            self.thresholds,
        )
        .with_min_confidence(self.min_confidence);

        let found = ranker.resolve(candidates, &self.algorithms)?;
        Some(Resolved {
            command: CommandKind::Custom,
            slots: Slots::new(),
            source: ResolutionSource::Ranker {
                method: found.method,
            },
            utterance: found.utterance,
            score: found.score,
            confidence: found.confidence,
            custom_command: Some(found.entry.clone()),
        })
    }

    fn resolve_trigger(&self, candidates: &[Candidate]) -> Option<Resolved> {
        let usable: Vec<Candidate> = candidates
            .iter()
            .filter(|c| c.confidence.map_or(true, |conf| conf >= self.min_confidence))
            .cloned()
            .collect();

        let found = self.triggers.find(&usable, &self.normalizer)?;
        Some(Resolved {
            command: found.command,
            slots: found.slots,
            source: ResolutionSource::Trigger {
                trigger: found.trigger,
            },
            utterance: found.utterance,
            score: 1.0,
            confidence: usable[found.candidate_index].confidence,
            custom_command: None,
        })
    }

    /// Match the spoken task name against the installed Tasker tasks
    fn refine_tasker(&self, resolved: &mut Resolved) {
        let spoken = match resolved.slots.get(SLOT_TEXT) {
            Some(spoken) => spoken.clone(),
            None => return,
        };

        let tasks = self.registry.tasker_tasks();
        let ranker = CandidateRanker::new(tasks, &self.normalizer, self.thresholds);
        match ranker.resolve(&[Candidate::new(spoken.clone(), None)], &self.algorithms) {
            Some(found) => {
                info!("⚙️ Tasker task: '{}' → '{}'", spoken, found.entry.name);
                resolved
                    .slots
                    .insert(SLOT_TASK.to_string(), found.entry.name.clone());
            }
            None => debug!("No Tasker task matches '{}'", spoken),
        }
    }
}
