//! Implementation of the `deflector ask` command.

use anyhow::{bail, Result};
use clap::Args;
use console::style;
use serde::Serialize;

use crate::cli::context::AppContext;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{AnswerMessage, Config, ResolutionResult};

pub const MIN_QUESTION_CHARS: usize = 3;
pub const MAX_QUESTION_CHARS: usize = 500;

#[derive(Args, Debug)]
pub struct AskArgs {
    /// The customer's question
    pub question: String,
}

/// Trim and bound-check a question before it reaches the resolver.
pub fn validate_question(question: &str) -> Result<&str> {
    let trimmed = question.trim();
    let chars = trimmed.chars().count();

    if chars < MIN_QUESTION_CHARS {
        bail!("Question must be at least {MIN_QUESTION_CHARS} characters");
    }
    if chars > MAX_QUESTION_CHARS {
        bail!("Question must be at most {MAX_QUESTION_CHARS} characters (got {chars})");
    }
    Ok(trimmed)
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct AskOutput {
    pub result: ResolutionResult,
}

impl CommandOutput for AskOutput {
    fn to_human(&self) -> String {
        match &self.result {
            ResolutionResult::Answer {
                message,
                article_id,
                article_slug,
                confidence_score,
            } => {
                let body = match message {
                    AnswerMessage::Text(text) => text.clone(),
                    AnswerMessage::Structured(structured) => structured.render(),
                };
                let source = article_slug.as_deref().unwrap_or(article_id);
                format!(
                    "{} {}\n\n{body}",
                    style("Answer").green().bold(),
                    style(format!("(article {source}, confidence {confidence_score:.2})")).dim(),
                )
            }
            ResolutionResult::Fallback {
                message,
                confidence_score,
            } => format!(
                "{} {}\n\n{message}",
                style("No answer").yellow().bold(),
                style(format!("(best score {confidence_score:.2})")).dim(),
            ),
        }
    }
}

pub async fn execute(args: AskArgs, config: Config, json_mode: bool) -> Result<()> {
    let question = validate_question(&args.question)?;
    let context = AppContext::open(config).await?;

    let result = context.orchestrator().resolve(question).await;
    output(&AskOutput { result }, json_mode);
    Ok(())
}
