//! Cosine-similarity ranking of embedded passages.

use thiserror::Error;

use crate::domain::models::{PassageWithArticle, RankedPassage};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VectorError {
    #[error("Dimension mismatch: query has {query}, passage has {passage}")]
    DimensionMismatch { query: usize, passage: usize },

    #[error("Empty vector")]
    Empty,

    #[error("Vector holds a non-finite component")]
    NonFinite,
}

/// Cosine similarity between two embedding vectors.
///
/// Accumulates in f64. Returns 0 when either vector has zero magnitude.
/// NaN or infinite components are an error, never a score.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32, VectorError> {
    if a.is_empty() || b.is_empty() {
        return Err(VectorError::Empty);
    }
    if a.len() != b.len() {
        return Err(VectorError::DimensionMismatch {
            query: a.len(),
            passage: b.len(),
        });
    }
    if !a.iter().chain(b).all(|x| x.is_finite()) {
        return Err(VectorError::NonFinite);
    }

    let dot: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| f64::from(*x) * f64::from(*y))
        .sum();
    let norm_a: f64 = a.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    #[allow(clippy::cast_possible_truncation)]
    let score = (dot / (norm_a * norm_b)) as f32;
    if score.is_finite() {
        Ok(score)
    } else {
        Err(VectorError::NonFinite)
    }
}

/// Scores passages against a query embedding and keeps the best `top_k`.
#[derive(Debug, Clone, Copy, Default)]
pub struct VectorRanker;

impl VectorRanker {
    pub const fn new() -> Self {
        Self
    }

    /// Rank published, embedded passages by cosine similarity.
    ///
    /// Passages whose embedding dimension differs from the query's, or that
    /// hold NaN or infinite components, are left out. Sorting is stable, so equal scores keep input order.
    pub fn rank(
        &self,
        query_vector: &[f32],
        passages: &[PassageWithArticle],
        top_k: usize,
    ) -> Vec<RankedPassage> {
        if query_vector.is_empty() || top_k == 0 {
            return Vec::new();
        }

        let mut ranked: Vec<RankedPassage> = passages
            .iter()
            .filter(|candidate| candidate.is_published())
            .filter_map(|candidate| {
                let embedding = candidate.passage.embedding.as_deref()?;
                if embedding.is_empty() {
                    return None;
                }
                match cosine_similarity(query_vector, embedding) {
                    Ok(score) => Some(RankedPassage {
                        passage: candidate.clone(),
                        score,
                    }),
                    Err(err) => {
                        tracing::debug!(
                            passage_id = %candidate.passage.id,
                            error = %err,
                            "passage excluded from vector ranking"
                        );
                        None
                    }
                }
            })
            .collect();

        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked.truncate(top_k);
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Article, ArticleStatus, Passage};

    fn embedded(id: &str, embedding: Option<Vec<f32>>, status: ArticleStatus) -> PassageWithArticle {
        let article = Article::new(format!("Article {id}"), "body")
            .with_id(id)
            .with_status(status);
        let mut passage = Passage::new(id, 0, "body").with_status(status);
        passage.embedding = embedding;
        PassageWithArticle {
            passage,
            article: article.summary(),
        }
    }

    #[test]
    fn test_cosine_identical_is_one() {
        let v = [0.3, -0.2, 0.9];
        let score = cosine_similarity(&v, &v).unwrap();
        assert!((score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_orthogonal_is_zero() {
        let score = cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).unwrap();
        assert!(score.abs() < 1e-6);
    }

    #[test]
    fn test_cosine_zero_vector() {
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[0.0, 0.0]), Ok(0.0));
    }

    #[test]
    fn test_cosine_errors() {
        assert_eq!(cosine_similarity(&[], &[1.0]), Err(VectorError::Empty));
        assert_eq!(
            cosine_similarity(&[1.0, 2.0], &[1.0]),
            Err(VectorError::DimensionMismatch {
                query: 2,
                passage: 1
            })
        );
    }

    #[test]
    fn test_cosine_rejects_non_finite() {
        assert_eq!(cosine_similarity(&[f32::NAN, 1.0], &[1.0, 1.0]), Err(VectorError::NonFinite));
        assert_eq!(
            cosine_similarity(&[1.0, 1.0], &[f32::INFINITY, 0.0]),
            Err(VectorError::NonFinite)
        );
        assert_eq!(cosine_similarity(&[f32::MAX, f32::MAX], &[f32::MAX, f32::MAX]).map(|s| s > 0.99), Ok(true));
    }

    #[test]
    fn test_rank_excludes_non_finite_embeddings() {
        let passages = vec![
            embedded("nan", Some(vec![f32::NAN, 1.0]), ArticleStatus::Published),
            embedded("ok", Some(vec![0.0, 1.0]), ArticleStatus::Published),
        ];

        let ranked = VectorRanker::new().rank(&[1.0, 1.0], &passages, 2);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].passage.article.id, "ok");
        assert!(ranked[0].score.is_finite());

        assert!(VectorRanker::new().rank(&[f32::NAN, 1.0], &passages, 2).is_empty());
    }

    #[test]
    fn test_rank_orders_and_truncates() {
        let passages = vec![
            embedded("far", Some(vec![0.0, 1.0]), ArticleStatus::Published),
            embedded("near", Some(vec![1.0, 0.1]), ArticleStatus::Published),
            embedded("mid", Some(vec![1.0, 1.0]), ArticleStatus::Published),
        ];

        let ranked = VectorRanker::new().rank(&[1.0, 0.0], &passages, 2);
        let ids: Vec<_> = ranked.iter().map(|r| r.passage.article.id.as_str()).collect();
        assert_eq!(ids, vec!["near", "mid"]);
    }

    #[test]
    fn test_rank_skips_missing_mismatched_and_drafts() {
        let passages = vec![
            embedded("none", None, ArticleStatus::Published),
            embedded("empty", Some(Vec::new()), ArticleStatus::Published),
            embedded("short", Some(vec![1.0]), ArticleStatus::Published),
            embedded("draft", Some(vec![1.0, 0.0]), ArticleStatus::Draft),
            embedded("ok", Some(vec![0.5, 0.5]), ArticleStatus::Published),
        ];

        let ranked = VectorRanker::new().rank(&[1.0, 0.0], &passages, 10);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].passage.article.id, "ok");
    }

    #[test]
    fn test_rank_ties_keep_input_order() {
        let passages = vec![
            embedded("first", Some(vec![1.0, 0.0]), ArticleStatus::Published),
            embedded("second", Some(vec![2.0, 0.0]), ArticleStatus::Published),
        ];

        let ranked = VectorRanker::new().rank(&[1.0, 0.0], &passages, 2);
        assert_eq!(ranked[0].passage.article.id, "first");
        assert_eq!(ranked[1].passage.article.id, "second");
    }

    #[test]
    fn test_zero_embedding_included_with_zero_score() {
        let passages = vec![embedded("zero", Some(vec![0.0, 0.0]), ArticleStatus::Published)];
        let ranked = VectorRanker::new().rank(&[1.0, 0.0], &passages, 2);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].score, 0.0);
    }

    #[test]
    fn test_empty_query_vector() {
        let passages = vec![embedded("a", Some(vec![1.0]), ArticleStatus::Published)];
        assert!(VectorRanker::new().rank(&[], &passages, 2).is_empty());
    }
}
