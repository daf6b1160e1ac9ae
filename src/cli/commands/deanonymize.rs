//! Deanonymize command implementation
//!
//! The session id may be given explicitly, embedded in the filename as a
//! UUID, or embedded in the document body. Without any of those the command
//! fails; the in-process fingerprint cache cannot help a one-shot CLI run.

use crate::anonymizer::recover_session;
use crate::documents::{deanonymize_document, DocumentFormat};
use clap::Args;
use std::path::PathBuf;

/// Arguments for the deanonymize command
#[derive(Args, Debug)]
pub struct DeanonymizeArgs {
    /// Anonymized input file
    #[arg(conflicts_with = "text", required_unless_present = "text")]
    pub input: Option<PathBuf>,

    /// Deanonymize a literal text instead of a file
    #[arg(long)]
    pub text: Option<String>,

    /// Session id used during anonymization
    #[arg(short, long)]
    pub session: Option<String>,

    /// Write the result to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl DeanonymizeArgs {
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = super::load_or_default(config_path)?;
        let anonymizer = super::build_anonymizer(&config).await?;

        let (content, format, filename) = match (&self.input, &self.text) {
            (Some(path), _) => {
                let content = std::fs::read_to_string(path)?;
                let name = path.to_string_lossy().into_owned();
                let format = DocumentFormat::from_filename(&name);
                (content, format, Some(name))
            }
            (None, Some(text)) => (text.clone(), DocumentFormat::Text, None),
            (None, None) => unreachable!("clap enforces input or text"),
        };

        let session_id = match recover_session(
            self.session.as_deref(),
            filename.as_deref(),
            &content,
            anonymizer.session_index(),
        ) {
            Some(session_id) => session_id,
            None => {
                eprintln!("❌ No session id given and none recoverable from the input");
                return Ok(2);
            }
        };

        if !anonymizer.store().session_exists(&session_id).await? {
            tracing::warn!(session_id = %session_id, "Session has no stored mappings");
            eprintln!("⚠️  No mappings stored for session {session_id}; tokens will stay in place");
        }

        tracing::info!(session_id = %session_id, ?format, "Deanonymizing");
        let restored = deanonymize_document(&anonymizer, &session_id, &content, format).await?;

        match &self.output {
            Some(path) => {
                std::fs::write(path, &restored)?;
                println!("✅ Restored output written to {}", path.display());
            }
            None => println!("{restored}"),
        }

        Ok(0)
    }
}
