//! NLP engine adapters
//!
//! The statistical model is a black box behind [`NlpEngine`]; the pipeline
//! only sees spans. Failures of the remote service degrade to zero spans at
//! the call site, so regex detection keeps working without it.

use crate::domain::{EntityType, Span};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

use crate::config::NlpConfig;

/// Black-box statistical span detector.
#[async_trait]
pub trait NlpEngine: Send + Sync {
    async fn detect(&self, text: &str, language: &str) -> Result<Vec<Span>>;
}

#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    text: &'a str,
    language: &'a str,
}

#[derive(Debug, Deserialize)]
struct AnalyzeSpan {
    entity_type: String,
    start: usize,
    end: usize,
    #[serde(default)]
    score: f32,
}

/// HTTP adapter for a remote NLP analyzer service.
pub struct RemoteNlpEngine {
    client: reqwest::Client,
    base_url: String,
}

impl RemoteNlpEngine {
    pub fn new(config: &NlpConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to build NLP HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl NlpEngine for RemoteNlpEngine {
    async fn detect(&self, text: &str, language: &str) -> Result<Vec<Span>> {
        let url = format!("{}/analyze", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&AnalyzeRequest { text, language })
            .send()
            .await
            .context("NLP request failed")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("NLP service returned status {status}");
        }

        let raw: Vec<AnalyzeSpan> = response
            .json()
            .await
            .context("Failed to decode NLP response")?;

        let mut spans = Vec::with_capacity(raw.len());
        for item in raw {
            // Reject spans the service mis-reported; one bad span must not
            // poison the rest of the detection pass.
            let valid = item.start < item.end
                && item.end <= text.len()
                && text.is_char_boundary(item.start)
                && text.is_char_boundary(item.end);
            if !valid {
                warn!(
                    start = item.start,
                    end = item.end,
                    entity = %item.entity_type,
                    "Dropping NLP span with invalid offsets"
                );
                continue;
            }
            spans.push(Span::new(
                item.start,
                item.end,
                EntityType::parse_label(&item.entity_type),
                item.score,
            ));
        }

        Ok(spans)
    }
}

/// Engine used when the NLP service is disabled.
pub struct NullNlpEngine;

#[async_trait]
impl NlpEngine for NullNlpEngine {
    async fn detect(&self, _text: &str, _language: &str) -> Result<Vec<Span>> {
        Ok(Vec::new())
    }
}
