//! Anonymize command implementation

use crate::documents::{anonymize_document, DocumentFormat};
use clap::Args;
use std::path::PathBuf;
use uuid::Uuid;

/// Arguments for the anonymize command
#[derive(Args, Debug)]
pub struct AnonymizeArgs {
    /// Input file (.json, .xml, anything else is plain text)
    #[arg(conflicts_with = "text", required_unless_present = "text")]
    pub input: Option<PathBuf>,

    /// Anonymize a literal text instead of a file
    #[arg(long)]
    pub text: Option<String>,

    /// Session id; generated when omitted
    #[arg(short, long)]
    pub session: Option<String>,

    /// Write the result to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl AnonymizeArgs {
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = super::load_or_default(config_path)?;
        let anonymizer = super::build_anonymizer(&config).await?;

        let session_id = self
            .session
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let (content, format) = match (&self.input, &self.text) {
            (Some(path), _) => {
                let content = std::fs::read_to_string(path)?;
                let format = DocumentFormat::from_filename(&path.to_string_lossy());
                (content, format)
            }
            (None, Some(text)) => (text.clone(), DocumentFormat::Text),
            (None, None) => unreachable!("clap enforces input or text"),
        };

        tracing::info!(session_id = %session_id, ?format, "Anonymizing");
        let anonymized = anonymize_document(&anonymizer, &session_id, &content, format).await?;

        match &self.output {
            Some(path) => {
                std::fs::write(path, &anonymized)?;
                println!("✅ Anonymized output written to {}", path.display());
            }
            None => println!("{anonymized}"),
        }
        eprintln!("Session: {session_id}");

        Ok(0)
    }
}
