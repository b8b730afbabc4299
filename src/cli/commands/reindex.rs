//! Implementation of the `deflector reindex` command.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use crate::cli::context::AppContext;
use crate::cli::output::progress::{create_progress_bar, ProgressBarExt};
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;
use crate::services::ReembedReport;

#[derive(Args, Debug)]
pub struct ReindexArgs {}

#[derive(Debug, Serialize)]
pub struct ReindexOutput {
    pub provider: String,
    pub model: String,
    #[serde(flatten)]
    pub report: ReembedReport,
}

impl CommandOutput for ReindexOutput {
    fn to_human(&self) -> String {
        format!(
            "Re-embedded {}/{} passage(s) with {} ({}); {} error(s)",
            self.report.updated, self.report.total, self.provider, self.model, self.report.errors
        )
    }
}

pub async fn execute(_args: ReindexArgs, config: Config, json_mode: bool) -> Result<()> {
    let context = AppContext::open(config).await?;
    let embeddings = context.embedding_service();
    let provider = embeddings.provider_name().to_string();
    let model = embeddings.model().to_string();

    let progress = create_progress_bar(0, json_mode);
    let bar = progress.clone();
    let report = context
        .sync_service()?
        .reembed_all(move |done, total| {
            bar.set_length(total as u64);
            bar.set_position(done as u64);
        })
        .await
        .context("Failed to re-embed passages")?;

    if report.errors == 0 {
        progress.finish_success("re-embed complete");
    } else {
        progress.finish_warning(format!("{} passage(s) failed", report.errors));
    }

    output(
        &ReindexOutput {
            provider,
            model,
            report,
        },
        json_mode,
    );
    Ok(())
}
