use crate::matching::{Algorithm, Thresholds};
use crate::nlu::NluProvider;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // Recognition
    pub language: String,
    pub min_confidence: f32,

    // Matching
    pub algorithms: Vec<Algorithm>,
    pub thresholds: Thresholds,
    pub custom_commands_enabled: bool,
    pub custom_commands_path: String,

    // NLU
    pub nlu_provider: Option<NluProvider>,
    pub nlu_min_confidence: f64,

    // Meta
    pub log_level: String,

    // Data
    pub voice_corrections: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: "en-GB".to_string(),
            min_confidence: 0.0,
            algorithms: Algorithm::DEFAULT_ORDER.to_vec(),
            thresholds: Thresholds::default(),
            custom_commands_enabled: true,
            custom_commands_path: dirs::data_dir()
                .unwrap_or_default()
                .join("saiy/commands.json")
                .to_string_lossy()
                .to_string(),
            nlu_provider: None,
            nlu_min_confidence: 0.5,
            log_level: "INFO".to_string(),
            voice_corrections: HashMap::new(),
        }
    }
}

impl Config {
    /// Load config from the default location, or create default
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    /// Load config from a specific file.
    ///
    /// A missing file yields defaults; a corrupt one is moved aside.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        match serde_json::from_str(&content) {
            Ok(config) => Ok(config),
            Err(e) => {
                // Graceful degradation: log warning and use defaults
                tracing::warn!("⚠️ Config file corrupted or invalid, using defaults: {}", e);
                // Backup corrupt file for debugging
                let backup_path = path.with_extension("json.corrupt");
                let _ = std::fs::rename(path, &backup_path);
                Ok(Self::default())
            }
        }
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Cascade order, falling back to the default when left empty
    pub fn algorithm_order(&self) -> Vec<Algorithm> {
        if self.algorithms.is_empty() {
            Algorithm::DEFAULT_ORDER.to_vec()
        } else {
            self.algorithms.clone()
        }
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("saiy")
        .join("config.json")
}
