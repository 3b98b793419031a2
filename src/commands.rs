//! Command definitions
//!
//! The fixed set of commands Saiy can execute, their built-in trigger
//! phrases, and the user-registered custom commands and Tasker tasks.

use crate::core::text_normalizer::TextNormalizer;
use crate::error::{SaiyError, SaiyResult};
use crate::matching::{Candidate, Phrase};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

/// Slot values extracted alongside a command
pub type Slots = BTreeMap<String, String>;

/// Slot holding free text following a trigger
pub const SLOT_TEXT: &str = "text";
/// Slot holding a target language
pub const SLOT_LANGUAGE: &str = "language";
/// Slot holding a resolved Tasker task name
pub const SLOT_TASK: &str = "task";

/// Commands the assistant knows how to execute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    Cancel,
    Clipboard,
    Emotion,
    Pardon,
    Spell,
    SongRecognition,
    Tasker,
    Translate,
    Userguide,
    VocalEnrol,
    VocalIdentify,
    WolframAlpha,
    Custom,
}

impl CommandKind {
    pub const ALL: [CommandKind; 13] = [
        CommandKind::Cancel,
        CommandKind::Clipboard,
        CommandKind::Emotion,
        CommandKind::Pardon,
        CommandKind::Spell,
        CommandKind::SongRecognition,
        CommandKind::Tasker,
        CommandKind::Translate,
        CommandKind::Userguide,
        CommandKind::VocalEnrol,
        CommandKind::VocalIdentify,
        CommandKind::WolframAlpha,
        CommandKind::Custom,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CommandKind::Cancel => "cancel",
            CommandKind::Clipboard => "clipboard",
            CommandKind::Emotion => "emotion",
            CommandKind::Pardon => "pardon",
            CommandKind::Spell => "spell",
            CommandKind::SongRecognition => "song_recognition",
            CommandKind::Tasker => "tasker",
            CommandKind::Translate => "translate",
            CommandKind::Userguide => "userguide",
            CommandKind::VocalEnrol => "vocal_enrol",
            CommandKind::VocalIdentify => "vocal_identify",
            CommandKind::WolframAlpha => "wolfram_alpha",
            CommandKind::Custom => "custom",
        }
    }

    /// Map an NLU intent name onto a command.
    ///
    /// Case, spacing and punctuation are ignored, so `WolframAlpha`,
    /// `wolfram_alpha` and `wolfram.alpha` are the same intent.
    pub fn from_intent(intent: &str) -> Option<CommandKind> {
        let key: String = intent
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(|c| c.to_lowercase())
            .collect();

        let kind = match key.as_str() {
            "cancel" | "nevermind" => CommandKind::Cancel,
            "clipboard" | "readclipboard" => CommandKind::Clipboard,
            "emotion" | "emotionanalysis" | "beyondverbal" => CommandKind::Emotion,
            "pardon" | "repeat" => CommandKind::Pardon,
            "spell" | "spelling" => CommandKind::Spell,
            "songrecognition" | "songrecognise" | "songrecognize" | "recognisesong"
            | "recognizesong" => CommandKind::SongRecognition,
            "tasker" | "taskertask" | "runtask" => CommandKind::Tasker,
            "translate" | "translation" => CommandKind::Translate,
            "userguide" | "help" => CommandKind::Userguide,
            "vocalenrol" | "vocalenroll" | "enrolvoice" | "enrollvoice" => CommandKind::VocalEnrol,
            "vocalidentify" | "vocalidentification" | "identifyvoice" | "speakerid" => {
                CommandKind::VocalIdentify
            }
            "wolframalpha" | "wolfram" => CommandKind::WolframAlpha,
            "custom" | "customcommand" => CommandKind::Custom,
            _ => return None,
        };
        Some(kind)
    }

    /// Default English trigger phrases
    pub fn default_triggers(&self) -> &'static [&'static str] {
        match self {
            CommandKind::Cancel => &["cancel", "never mind"],
            CommandKind::Clipboard => &["read clipboard", "read my clipboard", "clipboard"],
            CommandKind::Emotion => &[
                "analyse my emotions",
                "analyze my emotions",
                "emotion analysis",
                "how do i sound",
            ],
            CommandKind::Pardon => &["pardon", "say that again", "repeat that"],
            CommandKind::Spell => &["spell", "how do you spell"],
            CommandKind::SongRecognition => &[
                "what song is this",
                "what's this song",
                "recognise song",
                "recognize song",
            ],
            CommandKind::Tasker => &["run task", "run tasker task", "tasker"],
            CommandKind::Translate => &["translate"],
            CommandKind::Userguide => &["user guide", "help"],
            CommandKind::VocalEnrol => &["enrol my voice", "enroll my voice"],
            CommandKind::VocalIdentify => &["identify my voice", "who am i"],
            CommandKind::WolframAlpha => &["wolfram alpha", "wolfram", "ask wolfram"],
            CommandKind::Custom => &[],
        }
    }

    /// Extract slots from the text following a trigger phrase
    pub fn extract_slots(&self, remainder: &str) -> Slots {
        let mut slots = Slots::new();
        let remainder = remainder.trim();
        if remainder.is_empty() {
            return slots;
        }

        match self {
            CommandKind::Spell | CommandKind::WolframAlpha | CommandKind::Tasker => {
                slots.insert(SLOT_TEXT.to_string(), remainder.to_string());
            }
            CommandKind::Translate => {
                let split = remainder
                    .rsplit_once(" into ")
                    .or_else(|| remainder.rsplit_once(" to "));
                match split {
                    Some((text, language)) if !text.trim().is_empty() => {
                        slots.insert(SLOT_TEXT.to_string(), text.trim().to_string());
                        if !language.trim().is_empty() {
                            slots.insert(SLOT_LANGUAGE.to_string(), language.trim().to_string());
                        }
                    }
                    _ => {
                        slots.insert(SLOT_TEXT.to_string(), remainder.to_string());
                    }
                }
            }
            _ => {}
        }

        slots
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a custom command does once resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CustomAction {
    /// Speak the success response only
    Speak,
    /// Open a URL
    Url(String),
    /// Run a named Tasker task
    Tasker(String),
    /// Fire an Android intent URI
    Intent(String),
}

/// A user-defined voice command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomCommand {
    /// Phrase the user speaks
    pub keyphrase: String,
    pub action: CustomAction,
    #[serde(default)]
    pub response_success: String,
    #[serde(default)]
    pub response_error: String,
}

impl CustomCommand {
    pub fn new(keyphrase: &str, action: CustomAction) -> Self {
        Self {
            keyphrase: keyphrase.to_string(),
            action,
            response_success: String::new(),
            response_error: String::new(),
        }
    }
}

impl Phrase for CustomCommand {
    fn phrase(&self) -> &str {
        &self.keyphrase
    }
}

/// A Tasker task installed on the device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskerTask {
    pub name: String,
    #[serde(default)]
    pub project: Option<String>,
}

impl TaskerTask {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            project: None,
        }
    }
}

impl Phrase for TaskerTask {
    fn phrase(&self) -> &str {
        &self.name
    }
}

/// On-disk layout of the command registry
#[derive(Debug, Default, Serialize, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    custom_commands: Vec<CustomCommand>,
    #[serde(default)]
    tasker_tasks: Vec<TaskerTask>,
}

/// A built-in match found by trigger phrase
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerMatch {
    pub command: CommandKind,
    pub trigger: String,
    pub utterance: String,
    pub candidate_index: usize,
    pub slots: Slots,
}

/// Registered commands, custom phrases and Tasker tasks
#[derive(Debug, Clone)]
pub struct CommandRegistry {
    triggers: Vec<(CommandKind, String)>,
    custom_commands: Vec<CustomCommand>,
    tasker_tasks: Vec<TaskerTask>,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRegistry {
    /// Registry with the default English triggers
    pub fn new() -> Self {
        let triggers = CommandKind::ALL
            .iter()
            .flat_map(|kind| {
                kind.default_triggers()
                    .iter()
                    .map(move |t| (*kind, t.to_string()))
            })
            .collect();

        Self {
            triggers,
            custom_commands: Vec::new(),
            tasker_tasks: Vec::new(),
        }
    }

    /// Registry without any built-in triggers
    pub fn empty() -> Self {
        Self {
            triggers: Vec::new(),
            custom_commands: Vec::new(),
            tasker_tasks: Vec::new(),
        }
    }

    /// Register an extra trigger phrase for a built-in command
    pub fn add_trigger(&mut self, kind: CommandKind, trigger: &str) {
        self.triggers.push((kind, trigger.to_string()));
    }

    pub fn add_custom_command(&mut self, command: CustomCommand) {
        debug!("Registered custom command: '{}'", command.keyphrase);
        self.custom_commands.push(command);
    }

    pub fn add_tasker_task(&mut self, task: TaskerTask) {
        self.tasker_tasks.push(task);
    }

    pub fn custom_commands(&self) -> &[CustomCommand] {
        &self.custom_commands
    }

    pub fn tasker_tasks(&self) -> &[TaskerTask] {
        &self.tasker_tasks
    }

    /// Load custom commands and Tasker tasks from a JSON file
    pub fn load_custom_commands(&mut self, path: &Path) -> SaiyResult<usize> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let file: RegistryFile = serde_json::from_str(&content)
            .map_err(|e| SaiyError::Registry(format!("{}: {}", path.display(), e)))?;

        let count = file.custom_commands.len() + file.tasker_tasks.len();
        self.custom_commands.extend(file.custom_commands);
        self.tasker_tasks.extend(file.tasker_tasks);

        info!("📋 Loaded {} command entries from {}", count, path.display());
        Ok(count)
    }

    /// Trigger phrases normalized for `normalizer`'s locale
    pub fn trigger_table(&self, normalizer: &TextNormalizer) -> TriggerTable {
        let triggers = self
            .triggers
            .iter()
            .map(|(kind, trigger)| (*kind, normalizer.normalize_phrase(trigger)))
            .filter(|(_, trigger)| !trigger.is_empty())
            .collect();
        TriggerTable { triggers }
    }

    /// Match candidates against the built-in trigger phrases.
    ///
    /// Builds a one-off [`TriggerTable`]; callers matching repeatedly
    /// should keep the table instead.
    pub fn match_trigger(
        &self,
        candidates: &[Candidate],
        normalizer: &TextNormalizer,
    ) -> Option<TriggerMatch> {
        self.trigger_table(normalizer).find(candidates, normalizer)
    }
}

/// Built-in trigger phrases, normalized once, in registration order
#[derive(Debug, Clone)]
pub struct TriggerTable {
    triggers: Vec<(CommandKind, String)>,
}

impl TriggerTable {
    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }

    /// The first candidate (in emission order) starting with a trigger wins.
    /// Within a candidate the longest trigger wins, and among equally long
    /// triggers the first registered one.
    pub fn find(
        &self,
        candidates: &[Candidate],
        normalizer: &TextNormalizer,
    ) -> Option<TriggerMatch> {
        for (candidate_index, candidate) in candidates.iter().enumerate() {
            let utterance = normalizer.normalize(&candidate.text);
            if utterance.is_empty() {
                continue;
            }

            let mut best: Option<(CommandKind, &str, &str)> = None;
            for (kind, trigger) in &self.triggers {
                let remainder = match strip_trigger(&utterance, trigger) {
                    Some(remainder) => remainder,
                    None => continue,
                };
                let longer = match best {
                    Some((_, current, _)) => trigger.chars().count() > current.chars().count(),
                    None => true,
                };
                if longer {
                    best = Some((*kind, trigger.as_str(), remainder));
                }
            }

            if let Some((command, trigger, remainder)) = best {
                info!("🎯 Matched command: {} (trigger: '{}')", command, trigger);
                return Some(TriggerMatch {
                    command,
                    slots: command.extract_slots(remainder),
                    trigger: trigger.to_string(),
                    utterance: utterance.clone(),
                    candidate_index,
                });
            }
        }

        debug!("No trigger matched {} candidate(s)", candidates.len());
        None
    }
}

/// Remainder of `utterance` after `trigger`, if it starts with the whole trigger
fn strip_trigger<'u>(utterance: &'u str, trigger: &str) -> Option<&'u str> {
    if trigger.is_empty() {
        return None;
    }
    let rest = utterance.strip_prefix(trigger)?;
    if rest.is_empty() || rest.starts_with(' ') {
        Some(rest.trim_start())
    } else {
        None
    }
}
