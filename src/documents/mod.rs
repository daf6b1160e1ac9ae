//! Document walkers for JSON, XML and plain text
//!
//! Anonymization rewrites text content only: JSON string leaves (keys and
//! non-string scalars untouched, member and list order preserved) and XML
//! text nodes (tags and attributes untouched). Deanonymization is
//! schema-agnostic: tokens are located by their pattern in the serialized
//! document, replaced globally, and the result is re-parsed to prove the
//! structure survived.

use crate::anonymizer::Anonymizer;
use crate::domain::{AnonymError, Result};
use quick_xml::events::{BytesText, Event};
use quick_xml::{Reader, Writer};
use serde_json::Value;
use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;

/// Supported document formats, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Xml,
    Text,
}

impl DocumentFormat {
    /// Everything that is not `.json` or `.xml` is treated as plain text.
    pub fn from_filename(name: &str) -> Self {
        match Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .as_deref()
        {
            Some("json") => DocumentFormat::Json,
            Some("xml") => DocumentFormat::Xml,
            _ => DocumentFormat::Text,
        }
    }
}

/// Anonymizes a document according to its format.
pub async fn anonymize_document(
    anonymizer: &Anonymizer,
    session_id: &str,
    content: &str,
    format: DocumentFormat,
) -> Result<String> {
    match format {
        DocumentFormat::Json => {
            let value: Value = serde_json::from_str(content)?;
            let rewritten = walk_json(anonymizer, session_id, &value).await?;
            Ok(serde_json::to_string_pretty(&rewritten)?)
        }
        DocumentFormat::Xml => walk_xml(anonymizer, session_id, content).await,
        DocumentFormat::Text => anonymizer.anonymize(session_id, content).await,
    }
}

/// Restores a document and validates that it still parses.
pub async fn deanonymize_document(
    anonymizer: &Anonymizer,
    session_id: &str,
    content: &str,
    format: DocumentFormat,
) -> Result<String> {
    let restored = extract_tokens_and_replace(anonymizer, session_id, content).await?;

    match format {
        DocumentFormat::Json => {
            serde_json::from_str::<Value>(&restored)?;
        }
        DocumentFormat::Xml => {
            let mut reader = Reader::from_str(&restored);
            loop {
                match reader.read_event()? {
                    Event::Eof => break,
                    _ => continue,
                }
            }
        }
        DocumentFormat::Text => {}
    }

    Ok(restored)
}

/// Rewrites every string leaf of a JSON value, preserving structure.
pub async fn walk_json(
    anonymizer: &Anonymizer,
    session_id: &str,
    value: &Value,
) -> Result<Value> {
    // Pass 1: collect distinct leaves, then anonymize each once.
    let mut leaves = Vec::new();
    collect_string_leaves(value, &mut leaves);

    let mut rewritten: HashMap<String, String> = HashMap::new();
    for leaf in leaves {
        if rewritten.contains_key(&leaf) {
            continue;
        }
        let replaced = if leaf.trim().is_empty() {
            leaf.clone()
        } else {
            anonymizer.anonymize(session_id, &leaf).await?
        };
        rewritten.insert(leaf, replaced);
    }

    // Pass 2: rebuild with the replacements.
    Ok(rebuild_json(value, &rewritten))
}

fn collect_string_leaves(value: &Value, leaves: &mut Vec<String>) {
    match value {
        Value::String(s) => leaves.push(s.clone()),
        Value::Array(items) => {
            for item in items {
                collect_string_leaves(item, leaves);
            }
        }
        Value::Object(map) => {
            for item in map.values() {
                collect_string_leaves(item, leaves);
            }
        }
        _ => {}
    }
}

fn rebuild_json(value: &Value, rewritten: &HashMap<String, String>) -> Value {
    match value {
        Value::String(s) => Value::String(rewritten.get(s).cloned().unwrap_or_else(|| s.clone())),
        Value::Array(items) => {
            Value::Array(items.iter().map(|v| rebuild_json(v, rewritten)).collect())
        }
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), rebuild_json(v, rewritten)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Rewrites every text node of an XML document, leaving markup untouched.
pub async fn walk_xml(
    anonymizer: &Anonymizer,
    session_id: &str,
    content: &str,
) -> Result<String> {
    let mut reader = Reader::from_str(content);
    let mut events: Vec<Event<'static>> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Eof => break,
            event => events.push(event.into_owned()),
        }
    }

    let mut writer = Writer::new(Cursor::new(Vec::new()));
    for event in events {
        let out = match event {
            Event::Text(text) => {
                let raw = text
                    .unescape()
                    .map_err(|e| AnonymError::Xml(e.to_string()))?
                    .into_owned();
                if raw.trim().is_empty() {
                    Event::Text(BytesText::new(&raw).into_owned())
                } else {
                    let replaced = anonymizer.anonymize(session_id, &raw).await?;
                    Event::Text(BytesText::new(&replaced).into_owned())
                }
            }
            other => other,
        };
        writer.write_event(out)?;
    }

    String::from_utf8(writer.into_inner().into_inner())
        .map_err(|e| AnonymError::Xml(format!("Rewritten XML is not UTF-8: {e}")))
}

/// Locates every token in the serialized document and replaces it with its
/// original value; unknown tokens stay in place.
pub async fn extract_tokens_and_replace(
    anonymizer: &Anonymizer,
    session_id: &str,
    content: &str,
) -> Result<String> {
    anonymizer.deanonymize(session_id, content).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymizer::MemoryMappingStore;
    use crate::detection::{DetectionEngine, NullNlpEngine, PatternRegistry};
    use std::sync::Arc;

    fn anonymizer() -> Anonymizer {
        let engine = DetectionEngine::new(
            PatternRegistry::default_patterns().unwrap(),
            Arc::new(NullNlpEngine),
            "de".to_string(),
        );
        Anonymizer::new(engine, Arc::new(MemoryMappingStore::new()))
    }

    #[test]
    fn test_format_from_filename() {
        assert_eq!(DocumentFormat::from_filename("a.json"), DocumentFormat::Json);
        assert_eq!(DocumentFormat::from_filename("a.XML"), DocumentFormat::Xml);
        assert_eq!(DocumentFormat::from_filename("a.txt"), DocumentFormat::Text);
        assert_eq!(DocumentFormat::from_filename("noext"), DocumentFormat::Text);
    }

    #[tokio::test]
    async fn test_json_walk_rewrites_only_string_leaves() {
        let anonymizer = anonymizer();
        let content = r#"{"name": "Emma", "age": 42, "address": {"street": "Hauptstraße 5"}, "tags": ["10115", true]}"#;

        let anonymized = anonymize_document(&anonymizer, "s1", content, DocumentFormat::Json)
            .await
            .unwrap();

        let value: Value = serde_json::from_str(&anonymized).unwrap();
        assert_eq!(value["age"], 42);
        assert_eq!(value["tags"][1], true);
        assert!(!anonymized.contains("Emma"));
        assert!(!anonymized.contains("Hauptstraße 5"));
        // keys survive
        assert!(anonymized.contains("\"street\""));
    }

    #[tokio::test]
    async fn test_json_round_trip() {
        let anonymizer = anonymizer();
        let content = r#"{"patient": "Emma", "plz": "10115"}"#;

        let anonymized = anonymize_document(&anonymizer, "s1", content, DocumentFormat::Json)
            .await
            .unwrap();
        let restored = deanonymize_document(&anonymizer, "s1", &anonymized, DocumentFormat::Json)
            .await
            .unwrap();

        let value: Value = serde_json::from_str(&restored).unwrap();
        assert_eq!(value["patient"], "Emma");
        assert_eq!(value["plz"], "10115");
    }

    #[tokio::test]
    async fn test_xml_walk_keeps_markup() {
        let anonymizer = anonymizer();
        let content = "<brief><empfaenger>Emma</empfaenger><plz>10115</plz></brief>";

        let anonymized = walk_xml(&anonymizer, "s1", content).await.unwrap();
        assert!(anonymized.contains("<empfaenger>"));
        assert!(anonymized.contains("<plz>"));
        assert!(!anonymized.contains("Emma"));
        assert!(!anonymized.contains("10115"));

        let restored = deanonymize_document(&anonymizer, "s1", &anonymized, DocumentFormat::Xml)
            .await
            .unwrap();
        assert!(restored.contains(">Emma<"));
        assert!(restored.contains(">10115<"));
    }

    #[tokio::test]
    async fn test_unknown_tokens_survive_extract_and_replace() {
        let anonymizer = anonymizer();
        let content = "bekannt: anno_ffffffff";
        let restored = extract_tokens_and_replace(&anonymizer, "s1", content)
            .await
            .unwrap();
        assert_eq!(restored, content);
    }
}
