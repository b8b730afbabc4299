//! Resolution outcome models.
//!
//! Every query ends in exactly one [`ResolutionResult`]: an answer grounded
//! in a knowledge-base article, or a fallback offering a support ticket.

use serde::{Deserialize, Serialize};

/// Shown when the question is empty after normalization.
pub const EMPTY_QUESTION_MESSAGE: &str = "I am sorry, I could not find a relevant section to answer your question. Would you like to raise a support ticket?";

/// Shown when no passage reaches the confidence threshold.
pub const NO_MATCH_MESSAGE: &str = "I am sorry, I could not find a relevant section to answer your question in our articles. Would you like to raise a support ticket?";

/// Shown when a matched passage cannot be structured into sections.
pub const UNPRESENTABLE_MESSAGE: &str = "I am sorry, I could not find a clear way to present the answer. Would you like to raise a support ticket?";

/// Shown when resolution hits an unexpected error.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "I am sorry, something went wrong while looking for an answer. Would you like to raise a support ticket?";

/// Final outcome of resolving one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ResolutionResult {
    #[serde(rename_all = "camelCase")]
    Answer {
        message: AnswerMessage,
        article_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        article_slug: Option<String>,
        confidence_score: f32,
    },
    #[serde(rename_all = "camelCase")]
    Fallback {
        message: String,
        confidence_score: f32,
    },
}

impl ResolutionResult {
    pub fn fallback(message: impl Into<String>, confidence_score: f32) -> Self {
        Self::Fallback {
            message: message.into(),
            confidence_score,
        }
    }

    /// Generic fallback used when resolution fails unexpectedly.
    pub fn unexpected_error() -> Self {
        Self::fallback(UNEXPECTED_ERROR_MESSAGE, 0.0)
    }

    pub const fn is_answer(&self) -> bool {
        matches!(self, Self::Answer { .. })
    }

    pub const fn confidence_score(&self) -> f32 {
        match self {
            Self::Answer {
                confidence_score, ..
            }
            | Self::Fallback {
                confidence_score, ..
            } => *confidence_score,
        }
    }

    pub fn article_id(&self) -> Option<&str> {
        match self {
            Self::Answer { article_id, .. } => Some(article_id),
            Self::Fallback { .. } => None,
        }
    }
}

/// Body of an answer: generated text, or a structured digest of the matched passage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerMessage {
    Text(String),
    Structured(StructuredAnswer),
}

/// Chat-friendly digest of a matched passage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredAnswer {
    pub intro: String,
    pub sections: Vec<AnswerSection>,
    pub outro: String,
}

impl StructuredAnswer {
    /// Plain-text rendering for terminals.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.intro);
        for section in &self.sections {
            out.push_str("\n\n");
            out.push_str(&section.title);
            for point in &section.points {
                out.push_str("\n  • ");
                out.push_str(point);
            }
        }
        out.push_str("\n\n");
        out.push_str(&self.outro);
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerSection {
    pub title: String,
    pub points: Vec<String>,
}
