//! Entity detection pipeline
//!
//! Detection combines two sources:
//! - the ordered regex recognizer set ([`PatternRegistry`])
//! - a black-box statistical engine behind [`NlpEngine`]
//!
//! [`DetectionEngine::analyze`] runs both, filters stop-listed candidates
//! and resolves overlaps into a non-overlapping, start-sorted span set.
//! An NLP failure degrades to regex-only detection with a warning.

pub mod nlp;
pub mod normalize;
pub mod patterns;
pub mod resolver;
pub mod stoplist;

pub use nlp::{NlpEngine, NullNlpEngine, RemoteNlpEngine};
pub use patterns::PatternRegistry;

use crate::config::NlpConfig;
use crate::domain::{ResolvedSpan, Result};
use std::sync::Arc;
use tracing::{debug, warn};

/// Combined regex + NLP detection front end.
pub struct DetectionEngine {
    registry: PatternRegistry,
    nlp: Arc<dyn NlpEngine>,
    language: String,
}

impl DetectionEngine {
    pub fn new(registry: PatternRegistry, nlp: Arc<dyn NlpEngine>, language: String) -> Self {
        Self {
            registry,
            nlp,
            language,
        }
    }

    /// Builds the engine from configuration: default patterns plus the
    /// remote NLP adapter when enabled, the null adapter otherwise.
    pub fn from_config(config: &NlpConfig) -> Result<Self> {
        let registry = PatternRegistry::default_patterns()?;
        let nlp: Arc<dyn NlpEngine> = if config.enabled {
            Arc::new(RemoteNlpEngine::new(config)?)
        } else {
            Arc::new(NullNlpEngine)
        };
        Ok(Self::new(registry, nlp, config.language.clone()))
    }

    /// Detects and resolves entity spans in the text.
    pub async fn analyze(&self, text: &str) -> Vec<ResolvedSpan> {
        let regex_spans = self.registry.detect(text);

        let nlp_spans = match self.nlp.detect(text, &self.language).await {
            Ok(spans) => spans,
            Err(e) => {
                warn!(error = %e, "NLP engine unavailable, continuing with regex spans only");
                Vec::new()
            }
        };

        let resolved = resolver::resolve(text, regex_spans, nlp_spans);
        debug!(spans = resolved.len(), "Detection pass complete");
        resolved
    }
}
