//! PostgreSQL mapping store
//!
//! Production implementation of [`MappingStore`] on a deadpool connection
//! pool. Each insert commits on its own, so a later failure in the same
//! anonymization pass never rolls back already-minted mappings.

use crate::config::DatabaseConfig;
use crate::domain::{AnonymError, EntityType, MappingEntry, Result};
use async_trait::async_trait;
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use secrecy::ExposeSecret;
use std::time::Duration;
use tokio_postgres::NoTls;

use super::store::MappingStore;

pub struct PostgresMappingStore {
    pool: Pool,
}

impl PostgresMappingStore {
    /// Creates the store and applies the embedded schema migration.
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let pg_config: tokio_postgres::Config = config
            .connection_string
            .expose_secret()
            .as_ref()
            .parse()
            .map_err(|e| {
                AnonymError::Configuration(format!("Invalid PostgreSQL connection string: {}", e))
            })?;

        let manager = Manager::from_config(
            pg_config,
            NoTls,
            ManagerConfig {
                recycling_method: RecyclingMethod::Fast,
            },
        );

        let timeout = Duration::from_secs(config.connection_timeout_seconds);
        let pool = Pool::builder(manager)
            .max_size(config.max_connections)
            .wait_timeout(Some(timeout))
            .create_timeout(Some(timeout))
            .recycle_timeout(Some(timeout))
            .build()
            .map_err(|e| AnonymError::Store(format!("Failed to create connection pool: {}", e)))?;

        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    async fn connection(&self) -> Result<deadpool_postgres::Object> {
        self.pool
            .get()
            .await
            .map_err(|e| AnonymError::Store(format!("Failed to get connection from pool: {}", e)))
    }

    /// Runs the migration SQL to create the table and indexes if missing.
    async fn ensure_schema(&self) -> Result<()> {
        let client = self.connection().await?;
        let migration_sql = include_str!("../../migrations/001_initial_schema.sql");

        client
            .batch_execute(migration_sql)
            .await
            .map_err(|e| AnonymError::Store(format!("Failed to execute migration: {}", e)))?;

        tracing::info!("PostgreSQL schema initialized");
        Ok(())
    }
}

#[async_trait]
impl MappingStore for PostgresMappingStore {
    async fn insert_mapping(&self, entry: &MappingEntry) -> Result<()> {
        let client = self.connection().await?;
        client
            .execute(
                "INSERT INTO anonymization (session_id, anon_id, original_value, entity_type, created_at) \
                 VALUES ($1, $2, $3, $4, $5)",
                &[
                    &entry.session_id,
                    &entry.anon_id,
                    &entry.original_value,
                    &entry.entity_type.label(),
                    &entry.created_at,
                ],
            )
            .await
            .map_err(|e| AnonymError::Store(format!("Failed to insert mapping: {}", e)))?;
        Ok(())
    }

    async fn lookup_mappings(&self, session_id: &str) -> Result<Vec<MappingEntry>> {
        let client = self.connection().await?;
        let rows = client
            .query(
                "SELECT session_id, anon_id, original_value, entity_type, created_at \
                 FROM anonymization WHERE session_id = $1 ORDER BY id",
                &[&session_id],
            )
            .await
            .map_err(|e| AnonymError::Store(format!("Failed to look up mappings: {}", e)))?;

        Ok(rows
            .into_iter()
            .map(|row| MappingEntry {
                session_id: row.get(0),
                anon_id: row.get(1),
                original_value: row.get(2),
                entity_type: EntityType::parse_label(row.get(3)),
                created_at: row.get(4),
            })
            .collect())
    }

    async fn session_exists(&self, session_id: &str) -> Result<bool> {
        let client = self.connection().await?;
        let row = client
            .query_one(
                "SELECT EXISTS(SELECT 1 FROM anonymization WHERE session_id = $1)",
                &[&session_id],
            )
            .await
            .map_err(|e| AnonymError::Store(format!("Failed to check session: {}", e)))?;
        Ok(row.get(0))
    }

    async fn purge_expired(&self, days: u32, dry_run: bool) -> Result<u64> {
        let client = self.connection().await?;
        let interval = format!("{days} days");

        if dry_run {
            let row = client
                .query_one(
                    "SELECT COUNT(*) FROM anonymization \
                     WHERE created_at < NOW() - $1::interval",
                    &[&interval],
                )
                .await
                .map_err(|e| AnonymError::Store(format!("Failed to count expired rows: {}", e)))?;
            let count: i64 = row.get(0);
            Ok(count as u64)
        } else {
            client
                .execute(
                    "DELETE FROM anonymization WHERE created_at < NOW() - $1::interval",
                    &[&interval],
                )
                .await
                .map_err(|e| AnonymError::Store(format!("Failed to purge expired rows: {}", e)))
        }
    }
}
