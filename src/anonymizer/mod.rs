//! Reversible anonymization core
//!
//! [`Anonymizer`] ties the detection pipeline to the mapping store:
//! normalize, detect, resolve, mint tokens, persist mappings, substitute.
//! Deanonymization is the inverse lookup plus whole-word token replacement.

pub mod fingerprint;
pub mod postgres;
pub mod store;
pub mod token;

pub use fingerprint::{recover_session, SessionIndex};
pub use postgres::PostgresMappingStore;
pub use store::{MappingStore, MemoryMappingStore};

use crate::detection::{normalize, DetectionEngine};
use crate::domain::{AnonymError, EntityType, MappingEntry, Result};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::info;

pub struct Anonymizer {
    engine: DetectionEngine,
    store: Arc<dyn MappingStore>,
    sessions: SessionIndex,
}

impl Anonymizer {
    pub fn new(engine: DetectionEngine, store: Arc<dyn MappingStore>) -> Self {
        Self {
            engine,
            store,
            sessions: SessionIndex::default(),
        }
    }

    pub fn store(&self) -> Arc<dyn MappingStore> {
        Arc::clone(&self.store)
    }

    /// Fingerprint cache used for session recovery.
    pub fn session_index(&self) -> &SessionIndex {
        &self.sessions
    }

    /// Anonymizes the text within a session.
    ///
    /// Each distinct `(extracted_text, entity_type)` pair mints one token
    /// and persists one mapping before substitution. Substitution replaces
    /// every occurrence, longest original first, so shorter values never
    /// clobber parts of longer ones.
    pub async fn anonymize(&self, session_id: &str, text: &str) -> Result<String> {
        let session_id = valid_session_id(session_id)?;
        if text.trim().is_empty() {
            return Err(AnonymError::Input("Text must not be empty".to_string()));
        }

        // Detection and substitution both run on the normalized copy.
        let working = normalize::expand_street_abbreviations(text);
        let resolved = self.engine.analyze(&working).await;

        let mut seen: HashSet<(String, EntityType)> = HashSet::new();
        let mut replacements: Vec<(String, String)> = Vec::new();

        for span in &resolved {
            if !seen.insert((span.extracted_text.clone(), span.entity_type)) {
                continue;
            }

            let minted = token::mint_token(&span.extracted_text, span.entity_type.label());
            let entry = MappingEntry::new(
                session_id,
                minted.clone(),
                span.extracted_text.clone(),
                span.entity_type,
            );
            self.store.insert_mapping(&entry).await?;

            info!(
                entity = %span.entity_type,
                token = %minted,
                "Anonymized entity"
            );
            replacements.push((span.extracted_text.clone(), minted));
        }

        replacements.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        let mut output = working;
        for (original, minted) in &replacements {
            output = replace_outside_tokens(&output, original, minted);
        }

        self.sessions
            .record(fingerprint::fingerprint(&output), session_id.to_string());

        Ok(output)
    }

    /// Restores original values for every known token in the text.
    ///
    /// Unknown tokens are left unchanged; a store failure surfaces as an
    /// error instead of returning partially restored text.
    pub async fn deanonymize(&self, session_id: &str, text: &str) -> Result<String> {
        let session_id = valid_session_id(session_id)?;

        let mappings = self.store.lookup_mappings(session_id).await?;
        let mut originals: HashMap<String, String> = HashMap::new();
        for entry in mappings {
            // first mapping for a token wins; later duplicates are identical
            originals.entry(entry.anon_id).or_insert(entry.original_value);
        }

        let restored = token::token_pattern()
            .replace_all(text, |caps: &regex::Captures<'_>| {
                let matched = &caps[0];
                originals
                    .get(matched)
                    .cloned()
                    .unwrap_or_else(|| matched.to_string())
            })
            .into_owned();

        Ok(restored)
    }
}

/// Replaces every occurrence of `needle` that does not fall inside an
/// already-minted token. A short numeric original could otherwise rewrite
/// the hex suffix of a token substituted in an earlier pass.
fn replace_outside_tokens(text: &str, needle: &str, replacement: &str) -> String {
    let protected: Vec<(usize, usize)> = token::token_pattern()
        .find_iter(text)
        .map(|m| (m.start(), m.end()))
        .collect();

    let mut output = String::with_capacity(text.len());
    let mut pos = 0;
    while let Some(found) = text[pos..].find(needle) {
        let start = pos + found;
        let end = start + needle.len();
        if protected.iter().any(|&(ps, pe)| start < pe && ps < end) {
            output.push_str(&text[pos..end]);
        } else {
            output.push_str(&text[pos..start]);
            output.push_str(replacement);
        }
        pos = end;
    }
    output.push_str(&text[pos..]);
    output
}

fn valid_session_id(session_id: &str) -> Result<&str> {
    let trimmed = session_id.trim();
    if trimmed.is_empty() {
        return Err(AnonymError::Input(
            "Session id must not be empty".to_string(),
        ));
    }
    Ok(trimmed)
}
