use saiy::commands::CommandRegistry;
use saiy::config::Config;
use saiy::matching::Candidate;
use saiy::processor::Resolver;
use std::path::PathBuf;

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn load_json(name: &str) -> serde_json::Value {
    let content = std::fs::read_to_string(fixture_path(name))
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", name, e));
    serde_json::from_str(&content).expect("Fixture is not valid JSON")
}

pub fn candidates(texts: &[&str]) -> Vec<Candidate> {
    texts.iter().map(|t| Candidate::new(*t, None)).collect()
}

/// Registry populated from the shared commands fixture
pub fn registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    registry
        .load_custom_commands(&fixture_path("commands.json"))
        .expect("Failed to load commands fixture");
    registry
}

pub fn resolver_with(config: &Config) -> Resolver {
    Resolver::new(config, registry())
}

pub fn resolver() -> Resolver {
    resolver_with(&Config::default())
}
