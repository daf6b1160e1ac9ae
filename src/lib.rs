// Anonym - Reversible PII Anonymization for German Documents
// Copyright (c) 2025 Anonym Contributors
// Licensed under the MIT License

//! # Anonym - Reversible PII Anonymization
//!
//! Anonym detects personally identifiable information in German-language
//! text, JSON and XML documents and replaces it with deterministic,
//! reversible tokens. The token-to-original mappings are persisted per
//! session so documents can later be restored verbatim.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Detecting** PII with ordered regex recognizers and an optional
//!   remote NLP engine
//! - **Anonymizing** text and documents with deterministic `anno_` tokens
//! - **Deanonymizing** documents from stored mappings, structure intact
//! - **Queueing** file jobs through a single-worker FIFO queue with retries
//!
//! ## Architecture
//!
//! Anonym follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`detection`] - Regex recognizers, NLP client and conflict resolution
//! - [`anonymizer`] - Token minting, mapping stores and session recovery
//! - [`documents`] - JSON/XML/plain-text walkers
//! - [`queue`] - Single-worker FIFO file queue
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use anonym::anonymizer::{Anonymizer, MemoryMappingStore};
//! use anonym::config::NlpConfig;
//! use anonym::detection::DetectionEngine;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = DetectionEngine::from_config(&NlpConfig::default())?;
//!     let anonymizer = Anonymizer::new(engine, Arc::new(MemoryMappingStore::new()));
//!
//!     let anonymized = anonymizer
//!         .anonymize("session-1", "Emma wohnt in der Hauptstraße 5")
//!         .await?;
//!     let restored = anonymizer.deanonymize("session-1", &anonymized).await?;
//!
//!     assert_eq!(restored, "Emma wohnt in der Hauptstraße 5");
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Anonym uses the [`domain::AnonymError`] type for all errors:
//!
//! ```rust,no_run
//! use anonym::domain::AnonymError;
//!
//! fn example() -> Result<(), AnonymError> {
//!     let config = anonym::config::load_config("anonym.toml")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! Anonym uses structured logging with the `tracing` crate. Log lines carry
//! entity labels, counts and token ids, never original PII values.

pub mod anonymizer;
pub mod cli;
pub mod config;
pub mod detection;
pub mod documents;
pub mod domain;
pub mod logging;
pub mod queue;
