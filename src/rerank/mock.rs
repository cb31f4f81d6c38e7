use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use super::{RerankError, RerankProvider};
use crate::constants::{DEFAULT_RELEVANCE_THRESHOLD, DEFAULT_RERANK_TOP_N};
use crate::vectordb::ChapterCandidate;

/// In-memory rerank provider for tests.
///
/// Assigns relevance scores positionally from a configured list, then
/// applies the same threshold/cap/ordering contract as the production
/// implementation. Counts calls so tests can assert the empty-candidate
/// short-circuit and cache hits never reach the collaborator.
pub struct MockReranker {
    scores: Mutex<Vec<f32>>,
    relevance_threshold: f32,
    top_n: usize,
    fail: AtomicBool,
    calls: AtomicUsize,
    last_candidate_count: AtomicUsize,
}

impl MockReranker {
    /// A reranker assigning `scores[i]` to the i-th submitted candidate
    /// (0.0 for candidates beyond the list).
    pub fn with_scores(scores: Vec<f32>) -> Self {
        Self {
            scores: Mutex::new(scores),
            relevance_threshold: DEFAULT_RELEVANCE_THRESHOLD,
            top_n: DEFAULT_RERANK_TOP_N,
            fail: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
            last_candidate_count: AtomicUsize::new(0),
        }
    }

    /// Replaces the positional score list.
    pub fn set_scores(&self, scores: Vec<f32>) {
        *self.scores.lock() = scores;
    }

    /// Makes subsequent calls fail (or stop failing).
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Number of `rerank` calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Candidate count of the most recent call.
    pub fn last_candidate_count(&self) -> usize {
        self.last_candidate_count.load(Ordering::SeqCst)
    }
}

impl RerankProvider for MockReranker {
    async fn rerank(
        &self,
        _query: &str,
        candidates: Vec<ChapterCandidate>,
    ) -> Result<Vec<ChapterCandidate>, RerankError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.last_candidate_count
            .store(candidates.len(), Ordering::SeqCst);

        if self.fail.load(Ordering::SeqCst) {
            return Err(RerankError::ApiStatus {
                status: 500,
                message: "mock rerank failure".to_string(),
            });
        }

        let scores = self.scores.lock().clone();
        let mut ranked: Vec<ChapterCandidate> = candidates
            .into_iter()
            .enumerate()
            .map(|(i, candidate)| ChapterCandidate {
                score: scores.get(i).copied().unwrap_or(0.0),
                ..candidate
            })
            .filter(|c| c.score >= self.relevance_threshold)
            .collect();

        ranked.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked.truncate(self.top_n);
        Ok(ranked)
    }
}
