use super::pipeline::{apply_similarity_threshold, rank_movements};
use super::*;
use crate::embedding::MockEmbeddingProvider;
use crate::rerank::MockReranker;
use crate::vectordb::{ChapterCandidate, MockVectorIndex};

fn candidate(score: f32, text: &str) -> ChapterCandidate {
    ChapterCandidate {
        score,
        video_name: "video".to_string(),
        chapter_name: "chapter".to_string(),
        text: text.to_string(),
        start_time: "0:00".to_string(),
        end_time: "1:00".to_string(),
        timestamp_url: "https://youtu.be/abc".to_string(),
    }
}

fn pipeline(
    candidates: Vec<ChapterCandidate>,
    rerank_scores: Vec<f32>,
) -> SearchPipeline<MockEmbeddingProvider, MockVectorIndex, MockReranker> {
    SearchPipeline::new(
        MockEmbeddingProvider::new(1536),
        MockVectorIndex::with_candidates(candidates),
        MockReranker::with_scores(rerank_scores),
        PipelineConfig::default(),
    )
}

#[test]
fn test_similarity_threshold_is_a_hard_cut() {
    let candidates = vec![
        candidate(0.95, "a"),
        candidate(0.82, "b"),
        candidate(0.79, "c"),
        candidate(0.5, "d"),
    ];

    let survivors = apply_similarity_threshold(candidates, 0.8);

    assert_eq!(survivors.len(), 2);
    assert_eq!(survivors[0].text, "a");
    assert_eq!(survivors[1].text, "b");
}

#[test]
fn test_similarity_threshold_keeps_exact_boundary() {
    let survivors = apply_similarity_threshold(vec![candidate(0.8, "edge")], 0.8);
    assert_eq!(survivors.len(), 1);
}

#[test]
fn test_rank_movements_distinguishes_chapters_with_identical_text() {
    let chapter = |name: &str, score: f32| ChapterCandidate {
        chapter_name: name.to_string(),
        ..candidate(score, "do things that don't scale")
    };

    let before = vec![chapter("Launching", 0.9), chapter("Growth", 0.85)];
    let after = vec![chapter("Growth", 0.95), chapter("Launching", 0.4)];

    assert_eq!(rank_movements(&before, &after), vec![(1, 0), (0, 1)]);
}

#[tokio::test]
async fn test_search_before_initialize_fails_without_corrupting_caches() {
    let pipeline = pipeline(vec![candidate(0.9, "a")], vec![0.9]);

    let err = pipeline.search("q").await.unwrap_err();
    assert!(err.is_not_initialized());

    // The embedding was computed and cached before the index refused the
    // query; no result was cached.
    assert_eq!(pipeline.embedding_cache().len(), 1);
    assert!(pipeline.result_cache().is_empty());

    pipeline.initialize().await.unwrap();
    let results = pipeline.search("q").await.unwrap();
    assert_eq!(results.len(), 1);
}

#[tokio::test]
async fn test_initialize_is_idempotent() {
    let pipeline = pipeline(vec![], vec![]);

    pipeline.initialize().await.unwrap();
    pipeline.initialize().await.unwrap();

    assert!(pipeline.search("q").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_sources_skips_rerank_and_caches_nothing() {
    let pipeline = pipeline(
        vec![candidate(0.91, "a"), candidate(0.72, "b")],
        vec![0.9, 0.8],
    );
    pipeline.initialize().await.unwrap();

    let sources = pipeline.sources("q").await.unwrap();

    assert_eq!(sources.len(), 1);
    // Index score preserved, not a rerank relevance score.
    assert_eq!(sources[0].score, 0.91);
    assert_eq!(pipeline.reranker().call_count(), 0);
    assert!(pipeline.result_cache().is_empty());
    assert!(pipeline.embedding_cache().is_empty());
}
