//! Batch processing command implementation
//!
//! Files are pushed through the single-worker queue in the order given on
//! the command line and the command waits for every result. Malformed
//! documents fail a file immediately; store or network failures are retried
//! by the queue.

use crate::documents::{anonymize_document, DocumentFormat};
use crate::domain::AnonymError;
use crate::queue::{FileQueueManager, JobFn, JobOutcome};
use clap::Args;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

/// Arguments for the process command
#[derive(Args, Debug)]
pub struct ProcessArgs {
    /// Files to anonymize, processed in order
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Session id shared by all files; generated when omitted
    #[arg(short, long)]
    pub session: Option<String>,

    /// Directory for the anonymized copies; defaults to each input's directory
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
}

impl ProcessArgs {
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = super::load_or_default(config_path)?;
        let anonymizer = Arc::new(super::build_anonymizer(&config).await?);
        let queue = FileQueueManager::new(config.queue.clone());

        let session_id = self
            .session
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        eprintln!("Session: {session_id}");

        for path in &self.files {
            let file_id = path.to_string_lossy().into_owned();
            let job = anonymize_job(Arc::clone(&anonymizer), session_id.clone(), path.clone());
            queue.enqueue(file_id, job).await?;
        }

        let mut failures = 0usize;
        for path in &self.files {
            let file_id = path.to_string_lossy();
            match queue.get_result(&file_id).await {
                Ok(result) => {
                    let anonymized = result
                        .as_str()
                        .map(str::to_owned)
                        .unwrap_or_else(|| result.to_string());
                    let target = output_path(path, self.output_dir.as_deref());
                    std::fs::write(&target, anonymized)?;
                    println!("✅ {} -> {}", path.display(), target.display());
                }
                Err(e) => {
                    failures += 1;
                    eprintln!("❌ {}: {e}", path.display());
                }
            }
        }

        if failures > 0 {
            eprintln!("{failures} of {} files failed", self.files.len());
            Ok(1)
        } else {
            Ok(0)
        }
    }
}

/// One queue attempt: read, anonymize, return the output as a JSON string.
fn anonymize_job(
    anonymizer: Arc<crate::anonymizer::Anonymizer>,
    session_id: String,
    path: PathBuf,
) -> JobFn {
    Arc::new(move || {
        let anonymizer = Arc::clone(&anonymizer);
        let session_id = session_id.clone();
        let path = path.clone();
        Box::pin(async move {
            let content = match tokio::fs::read_to_string(&path).await {
                Ok(content) => content,
                Err(e) => return JobOutcome::Fatal(format!("Cannot read {}: {e}", path.display())),
            };
            let format = DocumentFormat::from_filename(&path.to_string_lossy());

            match anonymize_document(&anonymizer, &session_id, &content, format).await {
                Ok(anonymized) => JobOutcome::Success(serde_json::Value::String(anonymized)),
                // bad input will not improve on retry
                Err(e @ (AnonymError::Input(_) | AnonymError::Serialization(_) | AnonymError::Xml(_))) => {
                    JobOutcome::Fatal(e.to_string())
                }
                Err(e) => JobOutcome::Retryable(e.to_string()),
            }
        })
    })
}

/// `report.json` becomes `report_anonymized.json` next to the input or in
/// the chosen output directory.
fn output_path(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    let name = match input.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{stem}_anonymized.{ext}"),
        None => format!("{stem}_anonymized"),
    };

    match output_dir {
        Some(dir) => dir.join(name),
        None => input.with_file_name(name),
    }
}
