use std::time::Duration;
use tracing::{debug, info, instrument};

use super::error::SearchError;
use crate::cache::QueryCache;
use crate::config::Config;
use crate::constants::{
    DEFAULT_SIMILARITY_THRESHOLD, DEFAULT_TOP_K, EMBEDDING_CACHE_MAX_SIZE, EMBEDDING_CACHE_TTL,
    RESULT_CACHE_MAX_SIZE, RESULT_CACHE_TTL,
};
use crate::embedding::{EmbeddingProvider, OpenAiEmbedder};
use crate::rerank::{CohereReranker, RerankProvider};
use crate::vectordb::{ChapterCandidate, QdrantIndex, VectorIndex};

/// Orchestrator settings (thresholds, fan-out, cache shape).
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Nearest neighbors requested from the index per query.
    pub top_k: u64,
    /// Hard minimum index similarity score for a candidate to reach the
    /// reranker.
    pub similarity_threshold: f32,
    /// Result cache capacity.
    pub result_cache_size: usize,
    /// Result cache TTL.
    pub result_cache_ttl: Duration,
    /// Embedding cache capacity.
    pub embedding_cache_size: usize,
    /// Embedding cache TTL.
    pub embedding_cache_ttl: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            result_cache_size: RESULT_CACHE_MAX_SIZE,
            result_cache_ttl: RESULT_CACHE_TTL,
            embedding_cache_size: EMBEDDING_CACHE_MAX_SIZE,
            embedding_cache_ttl: EMBEDDING_CACHE_TTL,
        }
    }
}

impl From<&Config> for PipelineConfig {
    fn from(config: &Config) -> Self {
        Self {
            top_k: config.top_k,
            similarity_threshold: config.similarity_threshold,
            result_cache_size: config.result_cache_size,
            result_cache_ttl: config.result_cache_ttl,
            embedding_cache_size: config.embedding_cache_size,
            embedding_cache_ttl: config.embedding_cache_ttl,
        }
    }
}

/// Composes embedding, vector search, and reranking into
/// `search(question) -> ranked chapters`, memoized by two independent
/// caches.
///
/// Per call, `search` is a straight line: result-cache probe, embedding
/// (cached or fresh), index query, similarity cut, rerank, store. The two
/// caches are populated independently, so an evicted result set can still
/// reuse a cached embedding and vice versa. Any component error aborts the
/// call; a result is cached only after the full pipeline succeeded.
pub struct SearchPipeline<E, V, R> {
    embedder: E,
    index: V,
    reranker: R,
    result_cache: QueryCache<Vec<ChapterCandidate>>,
    embedding_cache: QueryCache<Vec<f32>>,
    top_k: u64,
    similarity_threshold: f32,
}

impl<E, V, R> SearchPipeline<E, V, R>
where
    E: EmbeddingProvider,
    V: VectorIndex,
    R: RerankProvider,
{
    /// Creates a pipeline over host-constructed components.
    pub fn new(embedder: E, index: V, reranker: R, config: PipelineConfig) -> Self {
        Self {
            embedder,
            index,
            reranker,
            result_cache: QueryCache::new(config.result_cache_size, config.result_cache_ttl),
            embedding_cache: QueryCache::new(
                config.embedding_cache_size,
                config.embedding_cache_ttl,
            ),
            top_k: config.top_k,
            similarity_threshold: config.similarity_threshold,
        }
    }

    /// Establishes the vector index handle. Must complete once before the
    /// first `search`; idempotent afterwards.
    pub async fn initialize(&self) -> Result<(), SearchError> {
        self.index.initialize().await?;
        Ok(())
    }

    /// Answers `question` with reranked transcript chapters.
    #[instrument(skip(self, question), fields(question_len = question.len()))]
    pub async fn search(&self, question: &str) -> Result<Vec<ChapterCandidate>, SearchError> {
        if let Some(results) = self.result_cache.get(question) {
            info!(results = results.len(), "result cache hit");
            return Ok(results);
        }
        debug!("result cache miss");

        let embedding = self.question_embedding(question).await?;

        let candidates = self.index.query(embedding, self.top_k).await?;
        let total = candidates.len();
        let survivors = apply_similarity_threshold(candidates, self.similarity_threshold);
        debug!(
            total,
            kept = survivors.len(),
            threshold = self.similarity_threshold,
            "applied similarity threshold"
        );

        let ranked = if survivors.is_empty() {
            debug!("no candidates above similarity threshold, skipping rerank");
            Vec::new()
        } else {
            let ranked = self.reranker.rerank(question, survivors.clone()).await?;
            log_rank_changes(&survivors, &ranked);
            ranked
        };

        self.result_cache.insert(question, ranked.clone());
        info!(results = ranked.len(), "search complete");
        Ok(ranked)
    }

    /// Uncached variant: embedding plus similarity-filtered index search,
    /// no reranking. Used by QA-style consumers that inspect raw index
    /// scores.
    pub async fn sources(&self, question: &str) -> Result<Vec<ChapterCandidate>, SearchError> {
        let embedding = self.embedder.embed(question).await?;
        let candidates = self.index.query(embedding, self.top_k).await?;
        Ok(apply_similarity_threshold(
            candidates,
            self.similarity_threshold,
        ))
    }

    /// Returns the question embedding, from cache when warm.
    async fn question_embedding(&self, question: &str) -> Result<Vec<f32>, SearchError> {
        if let Some(vector) = self.embedding_cache.get(question) {
            debug!("embedding cache hit");
            return Ok(vector);
        }
        debug!("embedding cache miss");

        let vector = self.embedder.embed(question).await?;
        self.embedding_cache.insert(question, vector.clone());
        Ok(vector)
    }

    /// The final-result cache (ranked chapter lists).
    pub fn result_cache(&self) -> &QueryCache<Vec<ChapterCandidate>> {
        &self.result_cache
    }

    /// The question-embedding cache.
    pub fn embedding_cache(&self) -> &QueryCache<Vec<f32>> {
        &self.embedding_cache
    }

    /// The injected embedding provider.
    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    /// The injected vector index.
    pub fn index(&self) -> &V {
        &self.index
    }

    /// The injected reranker.
    pub fn reranker(&self) -> &R {
        &self.reranker
    }
}

impl SearchPipeline<OpenAiEmbedder, QdrantIndex, CohereReranker> {
    /// Builds the production pipeline (OpenAI embeddings, Qdrant index,
    /// Cohere reranker) from a validated [`Config`].
    pub fn from_config(config: &Config) -> Result<Self, SearchError> {
        let retry = config.retry_policy();

        let embedder = OpenAiEmbedder::new(
            &config.openai_api_key,
            &config.embedding_model,
            config.embedding_dim,
        )
        .with_base_url(&config.openai_base_url)
        .with_retry_policy(retry);

        let index = QdrantIndex::connect(&config.qdrant_url, &config.collection)?;

        let reranker = CohereReranker::new(
            &config.cohere_api_key,
            &config.rerank_model,
            config.rerank_top_n,
            config.relevance_threshold,
        )
        .with_base_url(&config.cohere_base_url)
        .with_retry_policy(retry);

        Ok(Self::new(
            embedder,
            index,
            reranker,
            PipelineConfig::from(config),
        ))
    }
}

impl<E, V, R> std::fmt::Debug for SearchPipeline<E, V, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchPipeline")
            .field("result_cache", &self.result_cache)
            .field("embedding_cache", &self.embedding_cache)
            .field("top_k", &self.top_k)
            .field("similarity_threshold", &self.similarity_threshold)
            .finish()
    }
}

/// Drops candidates below `threshold`. A hard cut: low-relevance noise
/// never reaches the reranker.
pub(super) fn apply_similarity_threshold(
    candidates: Vec<ChapterCandidate>,
    threshold: f32,
) -> Vec<ChapterCandidate> {
    candidates
        .into_iter()
        .filter(|c| c.score >= threshold)
        .collect()
}

/// Logs how reranking moved each surviving candidate relative to the
/// index ordering.
fn log_rank_changes(before: &[ChapterCandidate], after: &[ChapterCandidate]) {
    for (old_pos, new_pos) in rank_movements(before, after) {
        debug!(
            from = old_pos + 1,
            to = new_pos + 1,
            vector_score = before[old_pos].score,
            relevance_score = after[new_pos].score,
            "rerank moved candidate"
        );
    }
}

/// Pairs each reranked candidate's position with its pre-rerank position.
/// Chapters are identified by video, chapter name, and start time, since
/// transcript text can repeat across chapters.
pub(super) fn rank_movements(
    before: &[ChapterCandidate],
    after: &[ChapterCandidate],
) -> Vec<(usize, usize)> {
    after
        .iter()
        .enumerate()
        .filter_map(|(new_pos, ranked)| {
            before
                .iter()
                .position(|c| {
                    c.video_name == ranked.video_name
                        && c.chapter_name == ranked.chapter_name
                        && c.start_time == ranked.start_time
                })
                .map(|old_pos| (old_pos, new_pos))
        })
        .collect()
}
