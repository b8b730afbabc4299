//! Deterministic keyword-overlap matcher.
//!
//! Scores published passages by how many query words appear in the passage
//! text or its parent article's title and tags. Needs no embeddings, so it
//! backs the resolution path whenever the semantic route is unavailable or
//! inconclusive.

use std::collections::HashSet;

use crate::domain::models::{
    AnswerMessage, PassageWithArticle, RankedPassage, ResolutionConfig, ResolutionResult,
    EMPTY_QUESTION_MESSAGE, NO_MATCH_MESSAGE,
};

/// Lowercase, trim, and strip everything except ASCII word characters and
/// whitespace.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Result of running the matcher over a passage set.
#[derive(Debug, Clone, PartialEq)]
pub enum LexicalOutcome {
    /// Best passage cleared the threshold
    Match(RankedPassage),
    /// Nothing cleared the threshold
    NoMatch {
        message: &'static str,
        best_score: f32,
    },
}

impl LexicalOutcome {
    /// Raw resolution: the matched passage text as-is.
    pub fn into_resolution(self) -> ResolutionResult {
        match self {
            Self::Match(ranked) => ResolutionResult::Answer {
                message: AnswerMessage::Text(ranked.passage.passage.text),
                article_id: ranked.passage.article.id,
                article_slug: Some(ranked.passage.article.slug).filter(|s| !s.is_empty()),
                confidence_score: ranked.score,
            },
            Self::NoMatch {
                message,
                best_score,
            } => ResolutionResult::fallback(message, best_score),
        }
    }

    pub const fn score(&self) -> f32 {
        match self {
            Self::Match(ranked) => ranked.score,
            Self::NoMatch { best_score, .. } => *best_score,
        }
    }
}

/// Keyword-overlap scorer with title/text boosts.
#[derive(Debug, Clone)]
pub struct LexicalMatcher {
    threshold: f32,
    title_boost: f32,
    text_boost: f32,
}

impl Default for LexicalMatcher {
    fn default() -> Self {
        Self::new(&ResolutionConfig::default())
    }
}

impl LexicalMatcher {
    pub const fn new(config: &ResolutionConfig) -> Self {
        Self {
            threshold: config.lexical_threshold,
            title_boost: config.title_boost,
            text_boost: config.text_boost,
        }
    }

    pub const fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Score and sort every published passage.
    ///
    /// Highest score first; equal scores prefer the more recently updated
    /// article, then input order. Drafts are dropped before scoring.
    pub fn rank(&self, query: &str, passages: &[PassageWithArticle]) -> Vec<RankedPassage> {
        let normalized_query = normalize(query);
        if normalized_query.is_empty() {
            return Vec::new();
        }
        let query_words: Vec<&str> = normalized_query.split_whitespace().collect();

        let mut ranked: Vec<RankedPassage> = passages
            .iter()
            .filter(|candidate| candidate.is_published())
            .map(|candidate| RankedPassage {
                score: self.score(&normalized_query, &query_words, candidate),
                passage: candidate.clone(),
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| b.passage.article.updated_at.cmp(&a.passage.article.updated_at))
        });

        ranked
    }

    /// Pick the best passage for `query`, or explain why none qualifies.
    pub fn resolve(&self, query: &str, passages: &[PassageWithArticle]) -> LexicalOutcome {
        if normalize(query).is_empty() {
            return LexicalOutcome::NoMatch {
                message: EMPTY_QUESTION_MESSAGE,
                best_score: 0.0,
            };
        }

        let mut ranked = self.rank(query, passages).into_iter();
        match ranked.next() {
            Some(best) if best.score >= self.threshold => {
                tracing::debug!(
                    article_id = %best.passage.article.id,
                    passage_id = %best.passage.passage.id,
                    score = best.score,
                    "lexical match above threshold"
                );
                LexicalOutcome::Match(best)
            }
            best => {
                let best_score = best.map_or(0.0, |b| b.score);
                tracing::debug!(best_score, threshold = self.threshold, "no lexical match");
                LexicalOutcome::NoMatch {
                    message: NO_MATCH_MESSAGE,
                    best_score,
                }
            }
        }
    }

    fn score(&self, normalized_query: &str, query_words: &[&str], candidate: &PassageWithArticle) -> f32 {
        let title = normalize(&candidate.article.title);
        let tags = candidate
            .article
            .tags
            .iter()
            .map(|tag| normalize(tag))
            .collect::<Vec<_>>()
            .join(" ");
        let text = normalize(&candidate.passage.text);

        let context = format!("{title} {tags} {text}");
        let context_words: HashSet<&str> = context.split_whitespace().collect();

        let matches = query_words
            .iter()
            .filter(|word| context_words.contains(*word))
            .count();

        #[allow(clippy::cast_precision_loss)]
        let mut score = matches as f32 / query_words.len().max(1) as f32;

        if title.contains(normalized_query) {
            score += self.title_boost;
        }
        if text.contains(normalized_query) {
            score += self.text_boost;
        }

        score.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Article, ArticleStatus, Passage};
    use chrono::{TimeZone, Utc};

    fn candidate(id: &str, title: &str, text: &str, status: ArticleStatus, day: u32) -> PassageWithArticle {
        let article = Article::new(title, text)
            .with_id(id)
            .with_status(status)
            .with_updated_at(Utc.with_ymd_and_hms(2026, 1, day, 0, 0, 0).unwrap());
        PassageWithArticle {
            passage: Passage::new(id, 0, text).with_status(status),
            article: article.summary(),
        }
    }

    fn corpus() -> Vec<PassageWithArticle> {
        vec![
            candidate(
                "1",
                "Refund Policy",
                "All sales are final. We do not offer refunds.",
                ArticleStatus::Published,
                1,
            ),
            candidate(
                "2",
                "How to create a ticket",
                "To create a support ticket, click on the \"Raise Support Ticket\" button.",
                ArticleStatus::Published,
                5,
            ),
            candidate(
                "3",
                "Newer Ticket Guide",
                "To create a support ticket, click on the \"Raise Support Ticket\" button.",
                ArticleStatus::Published,
                10,
            ),
            candidate("4", "Draft Article", "This should be ignored.", ArticleStatus::Draft, 15),
        ]
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Refund Policy?! "), "refund policy");
        assert_eq!(normalize("snake_case-word"), "snake_caseword");
        assert_eq!(normalize("!!!"), "");
    }

    #[test]
    fn test_exact_title_match_answers() {
        let outcome = LexicalMatcher::default().resolve("Refund Policy", &corpus());
        let LexicalOutcome::Match(best) = outcome else {
            panic!("expected a match");
        };
        assert_eq!(best.passage.article.id, "1");
        assert!(best.score >= 0.5);
    }

    #[test]
    fn test_unrelated_query_falls_back() {
        let outcome = LexicalMatcher::default().resolve("something unrelated about weather", &corpus());
        let result = outcome.into_resolution();
        assert!(!result.is_answer());
        match result {
            ResolutionResult::Fallback { message, .. } => {
                assert!(message.contains("Would you like to raise a support ticket?"));
            }
            ResolutionResult::Answer { .. } => unreachable!(),
        }
    }

    #[test]
    fn test_no_passages_falls_back_with_zero() {
        let outcome = LexicalMatcher::default().resolve("any query", &[]);
        assert_eq!(
            outcome,
            LexicalOutcome::NoMatch {
                message: NO_MATCH_MESSAGE,
                best_score: 0.0
            }
        );
    }

    #[test]
    fn test_highest_score_wins() {
        let outcome = LexicalMatcher::default().resolve("Refund", &corpus());
        assert_eq!(outcome.into_resolution().article_id(), Some("1"));
    }

    #[test]
    fn test_newer_article_preferred_on_tie() {
        let outcome = LexicalMatcher::default().resolve("create a support ticket", &corpus());
        assert_eq!(outcome.into_resolution().article_id(), Some("3"));
    }

    #[test]
    fn test_empty_question() {
        let outcome = LexicalMatcher::default().resolve("", &corpus());
        assert_eq!(outcome.score(), 0.0);
        assert_eq!(
            outcome.into_resolution(),
            ResolutionResult::fallback(EMPTY_QUESTION_MESSAGE, 0.0)
        );
    }

    #[test]
    fn test_punctuation_only_question_is_empty() {
        let outcome = LexicalMatcher::default().resolve("?!.", &corpus());
        assert!(matches!(
            outcome,
            LexicalOutcome::NoMatch {
                message: EMPTY_QUESTION_MESSAGE,
                ..
            }
        ));
    }

    #[test]
    fn test_draft_never_matches() {
        let outcome = LexicalMatcher::default().resolve("Draft Article", &corpus());
        assert!(matches!(outcome, LexicalOutcome::NoMatch { .. }));
    }

    #[test]
    fn test_rank_skips_drafts() {
        let ranked = LexicalMatcher::default().rank("ignored", &corpus());
        assert_eq!(ranked.len(), 3);
        assert!(ranked.iter().all(|r| r.passage.is_published()));
    }

    #[test]
    fn test_tags_contribute_to_context() {
        let mut tagged = candidate("5", "Billing", "Invoices are emailed monthly.", ArticleStatus::Published, 2);
        tagged.article.tags = vec!["Payments".to_string()];

        let ranked = LexicalMatcher::default().rank("payments", &[tagged]);
        assert!((ranked[0].score - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_partial_overlap_score() {
        let only = candidate("6", "Shipping", "Orders ship in two days.", ArticleStatus::Published, 3);
        let ranked = LexicalMatcher::default().rank("orders weather", &[only]);
        assert!((ranked[0].score - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_custom_threshold() {
        let config = ResolutionConfig {
            lexical_threshold: 0.9,
            ..ResolutionConfig::default()
        };
        let only = candidate("6", "Shipping", "Orders ship in two days.", ArticleStatus::Published, 3);
        let outcome = LexicalMatcher::new(&config).resolve("orders weather", &[only]);
        assert!(matches!(outcome, LexicalOutcome::NoMatch { .. }));
    }
}
