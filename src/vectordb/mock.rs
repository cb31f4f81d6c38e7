use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use super::{ChapterCandidate, VectorDbError, VectorIndex};

/// In-memory vector index for tests.
///
/// Serves a fixed candidate list ordered by descending score, enforcing the
/// same initialize-before-query contract as [`super::QdrantIndex`] and
/// counting queries for zero-external-call assertions.
#[derive(Default)]
pub struct MockVectorIndex {
    candidates: Mutex<Vec<ChapterCandidate>>,
    initialized: AtomicBool,
    query_calls: AtomicUsize,
    fail: AtomicBool,
}

impl MockVectorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// An index pre-populated with `candidates`.
    pub fn with_candidates(candidates: Vec<ChapterCandidate>) -> Self {
        Self {
            candidates: Mutex::new(candidates),
            ..Self::default()
        }
    }

    /// Replaces the served candidate list.
    pub fn set_candidates(&self, candidates: Vec<ChapterCandidate>) {
        *self.candidates.lock() = candidates;
    }

    /// Makes subsequent queries fail (or stop failing).
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Number of `query` calls made so far.
    pub fn query_count(&self) -> usize {
        self.query_calls.load(Ordering::SeqCst)
    }
}

impl VectorIndex for MockVectorIndex {
    async fn initialize(&self) -> Result<(), VectorDbError> {
        self.initialized.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn query(
        &self,
        _vector: Vec<f32>,
        top_k: u64,
    ) -> Result<Vec<ChapterCandidate>, VectorDbError> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);

        if !self.initialized.load(Ordering::SeqCst) {
            return Err(VectorDbError::NotInitialized {
                collection: "mock".to_string(),
            });
        }

        if self.fail.load(Ordering::SeqCst) {
            return Err(VectorDbError::SearchFailed {
                collection: "mock".to_string(),
                message: "mock search failure".to_string(),
            });
        }

        let mut results = self.candidates.lock().clone();
        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(top_k as usize);
        Ok(results)
    }
}
