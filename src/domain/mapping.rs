//! Mapping entries persisted by the anonymizer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::EntityType;

/// One reversible token mapping inside a session.
///
/// Entries are insert-only; re-anonymizing identical content produces the
/// same `anon_id` and is deduplicated before insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingEntry {
    pub session_id: String,
    /// Token of the form `anno_` + 8 lowercase hex chars.
    pub anon_id: String,
    pub original_value: String,
    pub entity_type: EntityType,
    pub created_at: DateTime<Utc>,
}

impl MappingEntry {
    pub fn new(
        session_id: impl Into<String>,
        anon_id: impl Into<String>,
        original_value: impl Into<String>,
        entity_type: EntityType,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            anon_id: anon_id.into(),
            original_value: original_value.into(),
            entity_type,
            created_at: Utc::now(),
        }
    }
}
