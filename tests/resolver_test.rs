use saiy::commands::{CommandKind, CommandRegistry, CustomAction, CustomCommand, SLOT_TASK};
use saiy::config::Config;
use saiy::matching::ranker::MatchMethod;
use saiy::matching::{Algorithm, Candidate};
use saiy::processor::{ResolutionSource, Resolver};
use std::collections::HashMap;

mod common;
use common::{candidates, resolver, resolver_with};

#[test]
fn test_exact_match_short_circuits() {
    // "fyer phasers" would match phonetically, but the later exact
    // candidate must still win
    let resolved = resolver()
        .resolve(&candidates(&["fyer phasers", "Kitchen Light"]), None)
        .unwrap();

    let custom = resolved.custom_command.expect("custom command");
    assert_eq!(custom.keyphrase, "kitchen light");
    assert_eq!(
        resolved.source,
        ResolutionSource::Ranker {
            method: MatchMethod::Exact
        }
    );
    assert_eq!(resolved.score, 1.0);
}

#[test]
fn test_phonetic_custom_command() {
    let resolved = resolver()
        .resolve(&candidates(&["fyer phasers"]), None)
        .unwrap();

    assert_eq!(resolved.command, CommandKind::Custom);
    let custom = resolved.custom_command.unwrap();
    assert_eq!(custom.action, CustomAction::Tasker("Phasers".to_string()));
    assert_eq!(custom.response_success, "Phasers fired");
}

#[test]
fn test_empty_inputs_yield_none() {
    let resolver = resolver();
    assert!(resolver.resolve(&[], None).is_none());
    assert!(resolver.resolve(&candidates(&["", "  "]), None).is_none());

    let empty = Resolver::new(&Config::default(), CommandRegistry::empty());
    assert!(empty
        .resolve(&candidates(&["fire phasers", "read clipboard"]), None)
        .is_none());
}

#[test]
fn test_configured_threshold_is_strict() {
    let mut config = Config::default();
    config.algorithms = vec![Algorithm::NeedlemanWunsch];

    // "kitchen lights" vs "kitchen light" aligns to exactly 13/14
    config.thresholds.needleman_wunsch_upper = 13.0 / 14.0;
    assert!(resolver_with(&config)
        .resolve(&candidates(&["kitchen lights"]), None)
        .is_none());

    config.thresholds.needleman_wunsch_upper = 0.92;
    let resolved = resolver_with(&config)
        .resolve(&candidates(&["kitchen lights"]), None)
        .unwrap();
    assert_eq!(
        resolved.source,
        ResolutionSource::Ranker {
            method: MatchMethod::Algorithm(Algorithm::NeedlemanWunsch)
        }
    );
    assert!((resolved.score - 13.0 / 14.0).abs() < 1e-9);
}

#[test]
fn test_low_confidence_candidates_skipped() {
    let mut config = Config::default();
    config.min_confidence = 0.6;

    let texts = vec!["fire phasers".to_string(), "kitchen light".to_string()];
    let voice_data = Candidate::zip(&texts, &[0.3, 0.9]);

    let resolved = resolver_with(&config).resolve(&voice_data, None).unwrap();
    assert_eq!(resolved.custom_command.unwrap().keyphrase, "kitchen light");
    assert_eq!(resolved.confidence, Some(0.9));
}

#[test]
fn test_voice_corrections_applied() {
    let mut config = Config::default();
    config.voice_corrections =
        HashMap::from([("phase hours".to_string(), "phasers".to_string())]);

    let resolved = resolver_with(&config)
        .resolve(&candidates(&["Fire Phase Hours"]), None)
        .unwrap();
    assert_eq!(resolved.utterance, "fire phasers");
    assert_eq!(
        resolved.source,
        ResolutionSource::Ranker {
            method: MatchMethod::Exact
        }
    );
}

#[test]
fn test_turkish_locale_casing() {
    let mut config = Config::default();
    config.language = "tr-TR".to_string();

    let mut registry = CommandRegistry::empty();
    registry.add_custom_command(CustomCommand::new("ışık aç", CustomAction::Speak));

    let resolved = Resolver::new(&config, registry)
        .resolve(&candidates(&["IŞIK AÇ"]), None)
        .unwrap();
    assert_eq!(resolved.utterance, "ışık aç");
    assert_eq!(resolved.score, 1.0);
}

#[test]
fn test_tasker_task_resolved_from_fixture() {
    let resolved = resolver()
        .resolve(&candidates(&["run task morning alarm"]), None)
        .unwrap();
    assert_eq!(resolved.command, CommandKind::Tasker);
    assert_eq!(
        resolved.slots.get(SLOT_TASK).map(String::as_str),
        Some("Morning Alarm")
    );
}

#[test]
fn test_custom_commands_can_be_disabled() {
    let mut config = Config::default();
    config.custom_commands_enabled = false;

    assert!(resolver_with(&config)
        .resolve(&candidates(&["fire phasers"]), None)
        .is_none());
}

#[test]
fn test_resolution_is_deterministic() {
    let resolver = resolver();
    let input = candidates(&["open the pod bay door", "kitchen lights", "fyer phasers"]);

    let first = serde_json::to_value(resolver.resolve(&input, None)).unwrap();
    for _ in 0..10 {
        let again = serde_json::to_value(resolver.resolve(&input, None)).unwrap();
        assert_eq!(first, again);
    }

    assert_eq!(first["command"], "custom");
    assert_eq!(first["custom_command"]["keyphrase"], "open the pod bay doors");
    assert_eq!(first["source"]["type"], "ranker");
}

#[test]
fn test_from_config_loads_commands_file() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("commands.json");
    std::fs::copy(common::fixture_path("commands.json"), &path).unwrap();

    let mut config = Config::default();
    config.custom_commands_path = path.to_string_lossy().to_string();

    let resolver = Resolver::from_config(&config).unwrap();
    assert_eq!(resolver.registry().custom_commands().len(), 3);
    assert_eq!(resolver.registry().tasker_tasks().len(), 2);
}

#[test]
fn test_from_config_rejects_bad_commands_file() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("commands.json");
    std::fs::write(&path, r#"{"custom_commands": [{"keyphrase": 3}]}"#).unwrap();

    let mut config = Config::default();
    config.custom_commands_path = path.to_string_lossy().to_string();

    assert!(Resolver::from_config(&config).is_err());
}

#[test]
fn test_non_ascii_candidates_do_not_panic() {
    let mut registry = CommandRegistry::empty();
    registry.add_custom_command(CustomCommand::new("kitchen light", CustomAction::Speak));
    let resolver = Resolver::new(&Config::default(), registry);
    assert!(resolver.resolve(&candidates(&["café"]), None).is_none());

    let mut config = Config::default();
    config.language = "tr-TR".to_string();
    let mut registry = CommandRegistry::new();
    registry.add_custom_command(CustomCommand::new("müziği aç", CustomAction::Speak));
    registry.add_custom_command(CustomCommand::new("ışıkları kapat", CustomAction::Speak));

    let resolved = Resolver::new(&config, registry)
        .resolve(&candidates(&["IŞIKLARI KAPA"]), None)
        .unwrap();
    assert_eq!(resolved.command, CommandKind::Custom);
    assert_eq!(resolved.custom_command.unwrap().keyphrase, "ışıkları kapat");
}

#[test]
fn test_corrections_do_not_rewrite_inside_words() {
    let mut config = Config::default();
    config.voice_corrections = HashMap::from([("too".to_string(), "to".to_string())]);

    let mut registry = CommandRegistry::empty();
    registry.add_custom_command(CustomCommand::new("tool shed lights", CustomAction::Speak));

    let resolved = Resolver::new(&config, registry)
        .resolve(&candidates(&["Tool Shed Lights"]), None)
        .unwrap();
    assert_eq!(resolved.utterance, "tool shed lights");
    assert_eq!(
        resolved.source,
        ResolutionSource::Ranker {
            method: MatchMethod::Exact
        }
    );
}

#[test]
fn test_confidence_equal_to_minimum_is_kept() {
    let mut config = Config::default();
    config.min_confidence = 0.6;

    let texts = vec!["kitchen light".to_string()];
    let resolved = resolver_with(&config)
        .resolve(&Candidate::zip(&texts, &[0.6]), None)
        .unwrap();
    assert_eq!(resolved.custom_command.unwrap().keyphrase, "kitchen light");
    assert_eq!(resolved.confidence, Some(0.6));
}
