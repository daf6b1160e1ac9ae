//! Session cleanup command implementation
//!
//! Deletes mapping rows older than the retention window. Purged sessions can
//! no longer be deanonymized.

use clap::Args;

/// Arguments for the cleanup-sessions command
#[derive(Args, Debug)]
pub struct CleanupArgs {
    /// Retention in days; overrides the configured value
    #[arg(short, long)]
    pub days: Option<u32>,

    /// Count matching mappings without deleting anything
    #[arg(long)]
    pub dry_run: bool,
}

impl CleanupArgs {
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = super::load_or_default(config_path)?;
        let store = super::build_store(&config).await?;

        let days = self.days.unwrap_or(config.retention.days);
        if days == 0 {
            eprintln!("❌ Retention must be at least one day");
            return Ok(2);
        }

        let purged = store.purge_expired(days, self.dry_run).await?;
        if self.dry_run {
            println!("Would purge {purged} mappings older than {days} days");
        } else {
            println!("✅ Purged {purged} mappings older than {days} days");
        }

        Ok(0)
    }
}
