//! Mapping store trait and in-memory implementation
//!
//! The store persists one row per distinct token within a session. The
//! in-memory implementation backs tests and one-shot CLI runs; PostgreSQL is
//! the production store.

use crate::domain::{MappingEntry, Result};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Persistence surface the anonymizer depends on.
#[async_trait]
pub trait MappingStore: Send + Sync {
    /// Inserts one mapping, committed immediately.
    async fn insert_mapping(&self, entry: &MappingEntry) -> Result<()>;

    /// Returns every mapping of the session, oldest first.
    async fn lookup_mappings(&self, session_id: &str) -> Result<Vec<MappingEntry>>;

    /// True when the session has at least one mapping.
    async fn session_exists(&self, session_id: &str) -> Result<bool>;

    /// Deletes mappings older than `days` days. With `dry_run` the rows are
    /// only counted. Returns the number of affected rows.
    async fn purge_expired(&self, days: u32, dry_run: bool) -> Result<u64>;
}

/// In-memory mapping store.
#[derive(Default)]
pub struct MemoryMappingStore {
    sessions: RwLock<HashMap<String, Vec<MappingEntry>>>,
}

impl MemoryMappingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MappingStore for MemoryMappingStore {
    async fn insert_mapping(&self, entry: &MappingEntry) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        sessions
            .entry(entry.session_id.clone())
            .or_default()
            .push(entry.clone());
        Ok(())
    }

    async fn lookup_mappings(&self, session_id: &str) -> Result<Vec<MappingEntry>> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(session_id).cloned().unwrap_or_default())
    }

    async fn session_exists(&self, session_id: &str) -> Result<bool> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(session_id).is_some_and(|v| !v.is_empty()))
    }

    async fn purge_expired(&self, days: u32, dry_run: bool) -> Result<u64> {
        let cutoff = Utc::now() - Duration::days(i64::from(days));
        let mut sessions = self.sessions.write().await;

        let mut affected = 0u64;
        for entries in sessions.values() {
            affected += entries.iter().filter(|e| e.created_at < cutoff).count() as u64;
        }

        if !dry_run {
            for entries in sessions.values_mut() {
                entries.retain(|e| e.created_at >= cutoff);
            }
            sessions.retain(|_, entries| !entries.is_empty());
        }

        Ok(affected)
    }
}
