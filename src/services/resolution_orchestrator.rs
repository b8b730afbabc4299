//! Per-question resolution.
//!
//! A question is routed either to the semantic path (vector ranking plus a
//! generated answer) or to the legacy path (lexical matching plus a
//! structured digest of the matched passage). The semantic path degrades to
//! the legacy one whenever it cannot produce a confident answer. Whatever
//! happens, exactly one [`ResolutionResult`] comes back.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use serde::Serialize;

use crate::domain::errors::DomainResult;
use crate::domain::models::{
    AnswerMessage, PassageWithArticle, RankedPassage, ResolutionConfig, ResolutionResult,
    EMPTY_QUESTION_MESSAGE, UNPRESENTABLE_MESSAGE,
};
use crate::domain::ports::completion::ChatMessage;
use crate::domain::ports::PassageStore;
use crate::services::completion_chain::CompletionChain;
use crate::services::embedding_service::EmbeddingService;
use crate::services::lexical_matcher::{normalize, LexicalMatcher, LexicalOutcome};
use crate::services::response_formatter;
use crate::services::vector_ranker::VectorRanker;

pub const SYSTEM_PROMPT: &str = "You are a support assistant. Answer using ONLY context. If unsure, say \"I don't know\". Format: Markdown.";

const CONTEXT_SEPARATOR: &str = "\n---\n";

/// Why a question went down the legacy path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LegacyReason {
    EmptyQuestion,
    EmbeddingUnavailable,
    BelowThreshold,
    NoRankedPassages,
    GenerationFailed,
}

impl LegacyReason {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::EmptyQuestion => "empty_question",
            Self::EmbeddingUnavailable => "embedding_unavailable",
            Self::BelowThreshold => "below_threshold",
            Self::NoRankedPassages => "no_ranked_passages",
            Self::GenerationFailed => "generation_failed",
        }
    }
}

/// Initial routing decision for a question.
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    Semantic { query_vector: Vec<f32> },
    Legacy { reason: LegacyReason },
}

/// Scores from both rankers, for diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct Inspection {
    pub embedding_available: bool,
    pub vector: Vec<RankedPassage>,
    pub lexical: Vec<RankedPassage>,
}

pub struct ResolutionOrchestrator {
    passages: Arc<dyn PassageStore>,
    embeddings: Arc<EmbeddingService>,
    completions: CompletionChain,
    matcher: LexicalMatcher,
    ranker: VectorRanker,
    config: ResolutionConfig,
}

impl ResolutionOrchestrator {
    pub fn new(
        passages: Arc<dyn PassageStore>,
        embeddings: Arc<EmbeddingService>,
        completions: CompletionChain,
        config: ResolutionConfig,
    ) -> Self {
        Self {
            passages,
            embeddings,
            completions,
            matcher: LexicalMatcher::new(&config),
            ranker: VectorRanker::new(),
            config,
        }
    }

    /// Resolve one question.
    ///
    /// Never fails: store errors and panics inside the pipeline become the
    /// generic support-ticket fallback.
    pub async fn resolve(&self, question: &str) -> ResolutionResult {
        match AssertUnwindSafe(self.try_resolve(question)).catch_unwind().await {
            Ok(Ok(result)) => result,
            Ok(Err(err)) => {
                tracing::error!(error = %err, "resolution failed");
                ResolutionResult::unexpected_error()
            }
            Err(_) => {
                tracing::error!("resolution panicked");
                ResolutionResult::unexpected_error()
            }
        }
    }

    /// Decide which path a question starts on.
    pub async fn route(&self, question: &str) -> Route {
        if normalize(question).is_empty() {
            return Route::Legacy {
                reason: LegacyReason::EmptyQuestion,
            };
        }

        match self.embeddings.embed_query(question).await {
            Some(query_vector) => Route::Semantic { query_vector },
            None => Route::Legacy {
                reason: LegacyReason::EmbeddingUnavailable,
            },
        }
    }

    /// Rank a question with both scorers without producing an answer.
    pub async fn inspect(&self, question: &str, top_k: usize) -> DomainResult<Inspection> {
        let passages = self.passages.get_published().await?;
        let query_vector = self.embeddings.embed_query(question).await;

        let vector = query_vector
            .as_deref()
            .map(|qv| self.ranker.rank(qv, &passages, top_k))
            .unwrap_or_default();
        let mut lexical = self.matcher.rank(question, &passages);
        lexical.truncate(top_k);

        Ok(Inspection {
            embedding_available: query_vector.is_some(),
            vector,
            lexical,
        })
    }

    async fn try_resolve(&self, question: &str) -> DomainResult<ResolutionResult> {
        let route = self.route(question).await;

        if matches!(
            route,
            Route::Legacy {
                reason: LegacyReason::EmptyQuestion
            }
        ) {
            tracing::info!(reason = LegacyReason::EmptyQuestion.as_str(), "question is empty");
            return Ok(ResolutionResult::fallback(EMPTY_QUESTION_MESSAGE, 0.0));
        }

        let passages = self.passages.get_published().await?;
        tracing::debug!(passages = passages.len(), "loaded published passages");

        Ok(match route {
            Route::Semantic { query_vector } => {
                self.resolve_semantic(question, &query_vector, &passages).await
            }
            Route::Legacy { reason } => self.resolve_legacy(question, reason, &passages),
        })
    }

    async fn resolve_semantic(
        &self,
        question: &str,
        query_vector: &[f32],
        passages: &[PassageWithArticle],
    ) -> ResolutionResult {
        let ranked = self.ranker.rank(query_vector, passages, self.config.vector_top_k);

        let Some(top) = ranked.first() else {
            return self.resolve_legacy(question, LegacyReason::NoRankedPassages, passages);
        };

        tracing::debug!(top_score = top.score, threshold = self.config.vector_threshold, "vector ranking");
        if top.score < self.config.vector_threshold {
            return self.resolve_legacy(question, LegacyReason::BelowThreshold, passages);
        }

        let messages = build_messages(question, &ranked);
        match self.completions.complete(&messages).await {
            Ok(answer) => {
                tracing::info!(
                    article_id = %top.passage.article.id,
                    score = top.score,
                    "answered from semantic path"
                );
                ResolutionResult::Answer {
                    message: AnswerMessage::Text(answer),
                    article_id: top.passage.article.id.clone(),
                    article_slug: non_empty(&top.passage.article.slug),
                    confidence_score: top.score,
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "generation unavailable");
                self.resolve_legacy(question, LegacyReason::GenerationFailed, passages)
            }
        }
    }

    fn resolve_legacy(
        &self,
        question: &str,
        reason: LegacyReason,
        passages: &[PassageWithArticle],
    ) -> ResolutionResult {
        tracing::info!(reason = reason.as_str(), "using lexical path");

        match self.matcher.resolve(question, passages) {
            LexicalOutcome::Match(ranked) => {
                let article = &ranked.passage.article;
                match response_formatter::structure(&article.title, &ranked.passage.passage.text) {
                    Some(structured) => ResolutionResult::Answer {
                        message: AnswerMessage::Structured(structured),
                        article_id: article.id.clone(),
                        article_slug: non_empty(&article.slug),
                        confidence_score: ranked.score,
                    },
                    None => {
                        tracing::info!(article_id = %article.id, "matched passage could not be structured");
                        ResolutionResult::fallback(UNPRESENTABLE_MESSAGE, ranked.score)
                    }
                }
            }
            LexicalOutcome::NoMatch {
                message,
                best_score,
            } => ResolutionResult::fallback(message, best_score),
        }
    }
}

/// System prompt plus the question wrapped in the retrieved context.
pub fn build_messages(question: &str, ranked: &[RankedPassage]) -> Vec<ChatMessage> {
    let context = ranked
        .iter()
        .map(|r| r.passage.passage.text.as_str())
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR);

    vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(format!("Context:\n{context}\n\nQuestion: {question}")),
    ]
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
