//! Implementation of the `deflector init` command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use tokio::fs;

use crate::adapters::sqlite::initialize_from_config;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;
use crate::infrastructure::config::{ConfigLoader, CONFIG_DIR};

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing .deflector/config.yaml with the defaults
    #[arg(long, short)]
    pub force: bool,
}

#[derive(Debug, Serialize)]
pub struct InitOutput {
    pub success: bool,
    pub message: String,
    pub config_path: PathBuf,
    pub config_written: bool,
    pub database_path: String,
}

impl CommandOutput for InitOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![self.message.clone()];
        if self.config_written {
            lines.push(format!("\nWrote default configuration to {}", self.config_path.display()));
        }
        if self.success {
            lines.push(format!("Database ready at {}", self.database_path));
        }
        lines.join("\n")
    }
}

pub async fn execute(args: InitArgs, config: Config, json_mode: bool) -> Result<()> {
    let result = run(&args, &config, Path::new(CONFIG_DIR)).await?;
    output(&result, json_mode);
    Ok(())
}

async fn run(args: &InitArgs, config: &Config, config_dir: &Path) -> Result<InitOutput> {
    let config_path = config_dir.join("config.yaml");

    if config_path.exists() && !args.force {
        return Ok(InitOutput {
            success: false,
            message: "Project already initialized. Use --force to reinitialize.".to_string(),
            config_path,
            config_written: false,
            database_path: config.database.path.clone(),
        });
    }

    fs::create_dir_all(config_dir)
        .await
        .with_context(|| format!("Failed to create {}", config_dir.display()))?;

    let yaml = ConfigLoader::default_yaml()?;
    fs::write(&config_path, yaml)
        .await
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    let pool = initialize_from_config(&config.database)
        .await
        .context("Failed to initialize database")?;
    pool.close().await;

    tracing::info!(config = %config_path.display(), database = %config.database.path, "project initialized");

    Ok(InitOutput {
        success: true,
        message: if args.force {
            "Project reinitialized successfully.".to_string()
        } else {
            "Project initialized successfully.".to_string()
        },
        config_path,
        config_written: true,
        database_path: config.database.path.clone(),
    })
}
