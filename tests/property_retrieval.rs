//! Property tests for chunking and ranking.

mod common;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use proptest::prelude::*;

use deflector::domain::errors::DomainResult;
use deflector::domain::models::{
    Article, ArticleStatus, ChunkingConfig, Passage, PassageDraft, PassageWithArticle, ResolutionConfig,
};
use deflector::domain::ports::PassageStore;
use deflector::services::chunker::word_count;
use deflector::services::{
    cosine_similarity, Chunker, EmbeddingService, ResolutionOrchestrator, VectorRanker,
};

use common::{chain_of, keyword_vector, FixedCompletion, KeywordEmbedder};

const WORDS: &[&str] = &[
    "refund", "policy", "password", "reset", "shipping", "order", "account", "final", "sales", "email",
];

fn word() -> impl Strategy<Value = &'static str> {
    proptest::sample::select(WORDS)
}

fn paragraph() -> impl Strategy<Value = String> {
    prop::collection::vec(word(), 1..40).prop_map(|words| words.join(" "))
}

fn candidate(index: usize, text: String, published: bool, day: u32) -> PassageWithArticle {
    let status = if published {
        ArticleStatus::Published
    } else {
        ArticleStatus::Draft
    };
    let id = format!("article-{index}");
    let article = Article::new(format!("Article {index}"), text.clone())
        .with_id(id.clone())
        .with_status(status)
        .with_updated_at(Utc.with_ymd_and_hms(2026, 1, day, 0, 0, 0).unwrap());

    let mut passage = Passage::new(id, 0, text.clone()).with_status(status);
    passage.embedding = Some(keyword_vector(&text));

    PassageWithArticle {
        passage,
        article: article.summary(),
    }
}

fn candidates() -> impl Strategy<Value = Vec<PassageWithArticle>> {
    prop::collection::vec((paragraph(), any::<bool>(), 1u32..28), 0..8).prop_map(|entries| {
        entries
            .into_iter()
            .enumerate()
            .map(|(i, (text, published, day))| candidate(i, text, published, day))
            .collect()
    })
}

fn embedded(index: usize, embedding: Vec<f32>) -> PassageWithArticle {
    let id = format!("article-{index}");
    let article = Article::new(format!("Article {index}"), "body").with_id(id.clone()).published();
    let mut passage = Passage::new(id, 0, "body").with_status(ArticleStatus::Published);
    passage.embedding = Some(embedding);

    PassageWithArticle {
        passage,
        article: article.summary(),
    }
}

const COMPONENTS: &[f32] = &[-1.0, 0.0, 0.5, 1.0];

/// Three-dimensional vectors over a small value set, so duplicates and
/// score ties are common.
fn small_vector() -> impl Strategy<Value = Vec<f32>> {
    prop::collection::vec(proptest::sample::select(COMPONENTS), 3)
}

/// Store serving a fixed passage set, drafts included; writes are ignored.
struct FixedStore(Vec<PassageWithArticle>);

#[async_trait]
impl PassageStore for FixedStore {
    async fn get_published(&self) -> DomainResult<Vec<PassageWithArticle>> {
        Ok(self.0.clone())
    }

    async fn sync_for_article(&self, _: &str, _: Vec<PassageDraft>, _: ArticleStatus) -> DomainResult<usize> {
        Ok(0)
    }

    async fn save_with_article(&self, _: &Article, _: Vec<PassageDraft>) -> DomainResult<usize> {
        Ok(0)
    }

    async fn update_status(&self, _: &str, _: ArticleStatus) -> DomainResult<u64> {
        Ok(0)
    }

    async fn delete_for_article(&self, _: &str) -> DomainResult<u64> {
        Ok(0)
    }

    async fn list_all(&self) -> DomainResult<Vec<Passage>> {
        Ok(self.0.iter().map(|p| p.passage.clone()).collect())
    }

    async fn set_embedding(&self, _: &str, _: &[f32]) -> DomainResult<()> {
        Ok(())
    }
}

proptest! {
    /// Property: chunk output, re-joined, holds exactly the input words
    #[test]
    fn prop_chunks_reconstruct_content(
        paragraphs in prop::collection::vec(paragraph(), 0..12),
        max_words in 5usize..60,
    ) {
        let content = paragraphs.join("\n\n");
        let chunker = Chunker::with_config(ChunkingConfig::new(1, max_words)).unwrap();

        let rebuilt = chunker.chunk(&content).join("\n\n");
        let original: Vec<&str> = content.split_whitespace().collect();
        let chunked: Vec<&str> = rebuilt.split_whitespace().collect();
        prop_assert_eq!(original, chunked);
    }

    /// Property: only a lone oversized paragraph may exceed max_words
    #[test]
    fn prop_chunks_respect_word_budget(
        paragraphs in prop::collection::vec(paragraph(), 1..12),
        max_words in 5usize..60,
    ) {
        let content = paragraphs.join("\n\n");
        let chunker = Chunker::with_config(ChunkingConfig::new(1, max_words)).unwrap();

        for chunk in chunker.chunk(&content) {
            prop_assert!(
                word_count(&chunk) <= max_words || !chunk.contains("\n\n"),
                "chunk of {} words holds several paragraphs", word_count(&chunk)
            );
        }
    }

    /// Property: vector ranking is idempotent and stable under ties
    #[test]
    fn prop_vector_rank_is_idempotent(
        embeddings in prop::collection::vec(small_vector(), 0..12),
        query in small_vector(),
        top_k in 1usize..8,
    ) {
        let passages: Vec<_> = embeddings.into_iter().enumerate().map(|(i, e)| embedded(i, e)).collect();
        let ranker = VectorRanker::new();

        let ids = |ranked: Vec<deflector::domain::models::RankedPassage>| {
            ranked.into_iter().map(|r| (r.passage.passage.id, r.score.to_bits())).collect::<Vec<_>>()
        };
        let first = ids(ranker.rank(&query, &passages, top_k));
        prop_assert_eq!(&first, &ids(ranker.rank(&query, &passages, top_k)));
        prop_assert!(first.len() <= top_k);

        let position = |id: &str| passages.iter().position(|p| p.passage.id == id);
        for pair in first.windows(2) {
            let (a, b) = (f32::from_bits(pair[0].1), f32::from_bits(pair[1].1));
            prop_assert!(a >= b, "scores out of order: {} then {}", a, b);
            if pair[0].1 == pair[1].1 {
                prop_assert!(position(&pair[0].0) < position(&pair[1].0), "tie broke input order");
            }
        }
    }

    /// Property: a vector is maximally similar to itself and unrelated to zero
    #[test]
    fn prop_cosine_self_and_zero(v in prop::collection::vec(-100.0f32..100.0, 1..64)) {
        prop_assume!(v.iter().any(|x| x.abs() > 1e-3));

        let own = cosine_similarity(&v, &v).unwrap();
        prop_assert!((own - 1.0).abs() < 1e-5, "cosine(v, v) = {}", own);

        let zero = vec![0.0; v.len()];
        prop_assert_eq!(cosine_similarity(&v, &zero).unwrap(), 0.0);
    }

    /// Property: whatever the question and route, drafts are never the answer
    #[test]
    fn prop_drafts_never_answered(
        passages in candidates(),
        query in prop::collection::vec(word(), 0..5),
    ) {
        let published: Vec<String> = passages
            .iter()
            .filter(|p| p.is_published())
            .map(|p| p.article.id.clone())
            .collect();

        let orchestrator = ResolutionOrchestrator::new(
            Arc::new(FixedStore(passages)),
            Arc::new(EmbeddingService::new(Arc::new(KeywordEmbedder::default()), Duration::from_secs(1))),
            chain_of(vec![Arc::new(FixedCompletion::new("grounded answer"))]),
            ResolutionConfig::default(),
        );

        let result = tokio_test::block_on(orchestrator.resolve(&query.join(" ")));
        if let Some(article_id) = result.article_id() {
            prop_assert!(published.iter().any(|id| id == article_id));
        }
        prop_assert!((0.0..=1.0).contains(&result.confidence_score()));
    }
}
