//! Command implementations

pub mod anonymize;
pub mod cleanup;
pub mod deanonymize;
pub mod process;
pub mod validate;

use crate::anonymizer::{Anonymizer, MappingStore, MemoryMappingStore, PostgresMappingStore};
use crate::config::{load_config, AnonymConfig};
use crate::detection::DetectionEngine;
use std::path::Path;
use std::sync::Arc;

/// Loads the configuration, falling back to defaults when the file is
/// absent. A file that exists but fails to parse is still an error.
pub fn load_or_default(config_path: &str) -> anyhow::Result<AnonymConfig> {
    if Path::new(config_path).exists() {
        Ok(load_config(config_path)?)
    } else {
        tracing::warn!(
            config_path = %config_path,
            "Configuration file not found, using defaults (in-memory store)"
        );
        Ok(AnonymConfig::default())
    }
}

/// Builds the mapping store selected by the configuration.
pub async fn build_store(config: &AnonymConfig) -> anyhow::Result<Arc<dyn MappingStore>> {
    match &config.database {
        Some(database) => Ok(Arc::new(PostgresMappingStore::new(database).await?)),
        None => Ok(Arc::new(MemoryMappingStore::new())),
    }
}

/// Builds a fully wired anonymizer from the configuration.
pub async fn build_anonymizer(config: &AnonymConfig) -> anyhow::Result<Anonymizer> {
    let engine = DetectionEngine::from_config(&config.nlp)?;
    let store = build_store(config).await?;
    Ok(Anonymizer::new(engine, store))
}
