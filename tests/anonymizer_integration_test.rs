//! Integration tests for the anonymization round trip
//!
//! These tests run the full pipeline on an in-memory mapping store with the
//! NLP engine disabled, so detection comes from the regex recognizers alone.

use anonym::anonymizer::{Anonymizer, MemoryMappingStore};
use anonym::detection::{DetectionEngine, NullNlpEngine, PatternRegistry};
use anonym::domain::EntityType;
use std::sync::Arc;

fn anonymizer() -> Anonymizer {
    let engine = DetectionEngine::new(
        PatternRegistry::default_patterns().expect("default patterns must compile"),
        Arc::new(NullNlpEngine),
        "de".to_string(),
    );
    Anonymizer::new(engine, Arc::new(MemoryMappingStore::new()))
}

#[tokio::test]
async fn test_date_round_trip() {
    let anonymizer = anonymizer();
    let text = "Ich wurde am 15 Januar 1910 geboren.";

    let anonymized = anonymizer.anonymize("s1", text).await.unwrap();
    assert!(!anonymized.contains("15 Januar 1910"));
    assert_eq!(anonymized.matches("anno_").count(), 1);

    let restored = anonymizer.deanonymize("s1", &anonymized).await.unwrap();
    assert_eq!(restored, text);
}

#[tokio::test]
async fn test_license_plate_tokenized_once() {
    let anonymizer = anonymizer();
    let text = "Mein Auto hat das Kennzeichen M AB 123.";

    let anonymized = anonymizer.anonymize("s1", text).await.unwrap();
    assert!(!anonymized.contains("M AB 123"));

    let mappings = anonymizer.store().lookup_mappings("s1").await.unwrap();
    let plates: Vec<_> = mappings
        .iter()
        .filter(|m| m.entity_type == EntityType::LicensePlate)
        .collect();
    assert_eq!(plates.len(), 1);
    assert_eq!(plates[0].original_value, "M AB 123");
}

#[tokio::test]
async fn test_street_and_zip_are_separate_entities() {
    let anonymizer = anonymizer();
    let text = "Ich wohne in der Hauptstraße 5, 10115 Berlin.";

    let anonymized = anonymizer.anonymize("s1", text).await.unwrap();
    assert!(!anonymized.contains("Hauptstraße 5"));
    assert!(!anonymized.contains("10115"));

    let mappings = anonymizer.store().lookup_mappings("s1").await.unwrap();
    let originals: Vec<(&str, EntityType)> = mappings
        .iter()
        .map(|m| (m.original_value.as_str(), m.entity_type))
        .collect();
    assert!(originals.contains(&("Hauptstraße 5", EntityType::Street)));
    assert!(originals.contains(&("10115", EntityType::ZipCode)));

    let restored = anonymizer.deanonymize("s1", &anonymized).await.unwrap();
    assert_eq!(restored, text);
}

#[tokio::test]
async fn test_unknown_token_is_left_in_place() {
    let anonymizer = anonymizer();
    let text = "Dieser Text enthält anno_deadbeef und sonst nichts.";

    let restored = anonymizer.deanonymize("s1", text).await.unwrap();
    assert_eq!(restored, text);
}

#[tokio::test]
async fn test_tokens_are_deterministic_within_a_session() {
    let anonymizer = anonymizer();

    let first = anonymizer
        .anonymize("s1", "PLZ 10115 in Berlin")
        .await
        .unwrap();
    let second = anonymizer
        .anonymize("s1", "Nochmal die PLZ 10115")
        .await
        .unwrap();

    let token = first
        .split_whitespace()
        .find(|w| w.starts_with("anno_"))
        .unwrap();
    assert!(second.contains(token));
}

#[tokio::test]
async fn test_stop_words_are_not_anonymized() {
    let anonymizer = anonymizer();
    // "Eine" matches the first-name shape but is stop-listed
    let anonymized = anonymizer
        .anonymize("s1", "Er sagte: Eine PLZ lautet 10115")
        .await
        .unwrap();

    assert!(anonymized.contains("Er sagte"));
    assert!(anonymized.contains("Eine PLZ"));
    assert!(!anonymized.contains("10115"));
}

#[tokio::test]
async fn test_sessions_are_isolated() {
    let anonymizer = anonymizer();
    let anonymized = anonymizer.anonymize("s1", "IBAN DE44500105175407324931").await.unwrap();

    // a foreign session cannot restore the value
    let foreign = anonymizer.deanonymize("s2", &anonymized).await.unwrap();
    assert_eq!(foreign, anonymized);

    let restored = anonymizer.deanonymize("s1", &anonymized).await.unwrap();
    assert!(restored.contains("DE44500105175407324931"));
}

#[tokio::test]
async fn test_abbreviated_street_detected_after_expansion() {
    let anonymizer = anonymizer();
    let anonymized = anonymizer
        .anonymize("s1", "Besuch in der Berliner Str. 12 morgen")
        .await
        .unwrap();

    assert!(!anonymized.contains("Straße 12"));
    let mappings = anonymizer.store().lookup_mappings("s1").await.unwrap();
    assert!(mappings
        .iter()
        .any(|m| m.original_value == "Berliner Straße 12"));
}
