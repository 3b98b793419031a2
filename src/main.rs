//! Saiy - Command resolution for voice input
//!
//! Resolves ASR candidates (and optional NLU responses) to commands
//! from the command line.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use saiy::config::Config;
use saiy::matching::{Algorithm, Candidate, PairReport};
use saiy::nlu::NluProvider;
use saiy::processor::Resolver;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to the user config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve candidate transcriptions to a command
    Resolve {
        /// Candidate transcriptions, in the order the recognizer emitted them
        #[arg(required = true)]
        candidates: Vec<String>,

        /// Confidence scores parallel to the candidates
        #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
        confidence: Vec<f32>,

        /// Recognition language (overrides config)
        #[arg(short, long)]
        language: Option<String>,

        /// NLU provider the payload came from
        #[arg(long)]
        nlu_provider: Option<NluProvider>,

        /// JSON file holding the NLU response
        #[arg(long, requires = "nlu_provider")]
        nlu_payload: Option<PathBuf>,

        /// JSON file of custom commands and Tasker tasks
        #[arg(long)]
        commands: Option<PathBuf>,

        /// Algorithm cascade (overrides config)
        #[arg(long, value_delimiter = ',')]
        algorithms: Vec<Algorithm>,
    },

    /// Show every similarity metric for one pair
    Score { candidate: String, phrase: String },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Setup logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match args.command {
        Commands::Resolve {
            candidates,
            confidence,
            language,
            nlu_provider,
            nlu_payload,
            commands,
            algorithms,
        } => {
            if let Some(language) = language {
                config.language = language;
            }
            if !algorithms.is_empty() {
                config.algorithms = algorithms;
            }
            if let Some(path) = commands {
                config.custom_commands_path = path.to_string_lossy().to_string();
            }

            let resolver = Resolver::from_config(&config)?;
            info!(
                "🗣️ Saiy v{} resolving {} candidate(s)",
                env!("CARGO_PKG_VERSION"),
                candidates.len()
            );

            let payload = match &nlu_payload {
                Some(path) => {
                    let content = std::fs::read_to_string(path)
                        .with_context(|| format!("Failed to read {}", path.display()))?;
                    Some(serde_json::from_str::<serde_json::Value>(&content)?)
                }
                None => None,
            };
            let nlu = match (nlu_provider.or(config.nlu_provider), payload.as_ref()) {
                (Some(provider), Some(payload)) => Some((provider, payload)),
                _ => None,
            };

            let candidates = Candidate::zip(&candidates, &confidence);
            match resolver.resolve(&candidates, nlu) {
                Some(resolved) => println!("{}", serde_json::to_string_pretty(&resolved)?),
                None => {
                    println!("null");
                    info!("💡 No command matched");
                }
            }
        }
        Commands::Score { candidate, phrase } => {
            let report = PairReport::new(&candidate, &phrase, &config.thresholds);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
