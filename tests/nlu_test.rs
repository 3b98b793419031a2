use saiy::commands::{CommandKind, SLOT_LANGUAGE, SLOT_TEXT};
use saiy::nlu::{normalizer_for, NluProvider};
use saiy::processor::ResolutionSource;

mod common;
use common::{candidates, load_json, resolver};

const PROVIDERS: [(NluProvider, &str); 6] = [
    (NluProvider::ApiAi, "nlu/api_ai.json"),
    (NluProvider::Luis, "nlu/luis.json"),
    (NluProvider::NuanceMix, "nlu/nuance_mix.json"),
    (NluProvider::Wit, "nlu/wit.json"),
    (NluProvider::Saiy, "nlu/saiy.json"),
    (NluProvider::Bluemix, "nlu/bluemix.json"),
];

#[test]
fn test_every_provider_projects_to_same_command() {
    for (provider, fixture) in PROVIDERS {
        let payload = load_json(fixture);
        let nlu = normalizer_for(provider)
            .normalize(&payload)
            .unwrap_or_else(|e| panic!("{} failed: {}", provider, e))
            .unwrap_or_else(|| panic!("{} returned no intent", provider));

        assert_eq!(nlu.provider, provider);
        assert_eq!(
            CommandKind::from_intent(&nlu.intent),
            Some(CommandKind::Translate),
            "{} intent '{}'",
            provider,
            nlu.intent
        );
        assert!((nlu.confidence - 0.91).abs() < 1e-9, "{} confidence", provider);
        assert_eq!(
            nlu.query.as_deref(),
            Some("translate good morning into french"),
            "{} query",
            provider
        );
    }
}

#[test]
fn test_slot_providers_agree() {
    for (provider, fixture) in PROVIDERS {
        if provider == NluProvider::Bluemix {
            continue;
        }

        let nlu = normalizer_for(provider)
            .normalize(&load_json(fixture))
            .unwrap()
            .unwrap();
        assert_eq!(
            nlu.slots.get(SLOT_TEXT).map(String::as_str),
            Some("good morning"),
            "{} text slot",
            provider
        );
        assert_eq!(
            nlu.slots.get(SLOT_LANGUAGE).map(String::as_str),
            Some("french"),
            "{} language slot",
            provider
        );
    }
}

#[test]
fn test_resolver_uses_nlu_payload() {
    let resolver = resolver();

    for (provider, fixture) in PROVIDERS {
        let payload = load_json(fixture);
        // The recognizer heard something else entirely; NLU still wins
        let resolved = resolver
            .resolve(&candidates(&["fire phasers"]), Some((provider, &payload)))
            .unwrap();

        assert_eq!(resolved.command, CommandKind::Translate);
        assert_eq!(resolved.utterance, "translate good morning into french");
        match resolved.source {
            ResolutionSource::Nlu { provider: p, .. } => assert_eq!(p, provider),
            other => panic!("Expected NLU source, found {:?}", other),
        }
    }
}

#[test]
fn test_wrong_provider_falls_back_to_local() {
    // A LUIS response read as Nuance Mix is malformed
    let payload = load_json("nlu/luis.json");
    let resolved = resolver()
        .resolve(
            &candidates(&["translate good morning into french"]),
            Some((NluProvider::NuanceMix, &payload)),
        )
        .unwrap();

    assert_eq!(resolved.command, CommandKind::Translate);
    assert!(matches!(resolved.source, ResolutionSource::Trigger { .. }));
    assert_eq!(resolved.slots.get(SLOT_LANGUAGE).map(String::as_str), Some("french"));
}
