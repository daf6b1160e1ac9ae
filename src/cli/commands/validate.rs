//! Validate configuration command implementation

use crate::config::load_config;
use clap::Args;
use std::path::Path;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Show the effective configuration (secrets redacted)
    #[arg(short, long)]
    pub verbose: bool,
}

impl ValidateArgs {
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        if !Path::new(config_path).exists() {
            eprintln!("❌ Configuration file not found: {config_path}");
            return Ok(2);
        }

        let config = match load_config(config_path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ Configuration is invalid: {e}");
                return Ok(2);
            }
        };

        println!("✅ Configuration is valid: {config_path}");

        if self.verbose {
            println!();
            println!("Application:");
            println!("  log_level: {}", config.application.log_level);

            println!("NLP engine:");
            println!("  enabled: {}", config.nlp.enabled);
            if config.nlp.enabled {
                println!("  base_url: {}", config.nlp.base_url);
                println!("  language: {}", config.nlp.language);
                println!("  timeout_seconds: {}", config.nlp.timeout_seconds);
            }

            println!("Mapping store:");
            match &config.database {
                Some(database) => {
                    println!("  backend: postgresql");
                    println!("  connection_string: ***redacted***");
                    println!("  max_connections: {}", database.max_connections);
                }
                None => println!("  backend: in-memory"),
            }

            println!("Queue:");
            println!("  max_attempts: {}", config.queue.max_attempts);
            println!("  job_timeout_seconds: {}", config.queue.job_timeout_seconds);
            println!(
                "  retry_base_delay_seconds: {}",
                config.queue.retry_base_delay_seconds
            );

            println!("Retention:");
            println!("  days: {}", config.retention.days);

            println!("Logging:");
            println!("  local_enabled: {}", config.logging.local_enabled);
            if config.logging.local_enabled {
                println!("  local_path: {}", config.logging.local_path);
                println!("  local_rotation: {}", config.logging.local_rotation);
            }
        }

        Ok(0)
    }
}
