use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use super::{EmbeddingError, EmbeddingProvider};
use crate::hashing::hash_question;

/// In-memory embedding provider for tests.
///
/// Produces a deterministic vector derived from the question hash (so
/// distinct questions get distinct vectors), or a fixed vector when one is
/// supplied. Counts calls so tests can assert that cache hits make zero
/// external calls.
pub struct MockEmbeddingProvider {
    dimension: usize,
    fixed: Option<Vec<f32>>,
    fail: AtomicBool,
    calls: AtomicUsize,
}

impl MockEmbeddingProvider {
    /// Deterministic vectors of `dimension` length.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            fixed: None,
            fail: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    /// Always returns `vector`, regardless of input text.
    pub fn with_vector(vector: Vec<f32>) -> Self {
        Self {
            dimension: vector.len(),
            fixed: Some(vector),
            fail: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    /// Makes subsequent calls fail with a provider error (or stop failing).
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Number of `embed` calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.fail.load(Ordering::SeqCst) {
            return Err(EmbeddingError::ApiStatus {
                status: 500,
                message: "mock embedding failure".to_string(),
            });
        }

        if let Some(ref vector) = self.fixed {
            return Ok(vector.clone());
        }

        let seed = hash_question(text);
        Ok((0..self.dimension)
            .map(|i| {
                let byte = seed[i % seed.len()];
                (byte as f32 / 255.0) - 0.5
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_deterministic_per_question() {
        let provider = MockEmbeddingProvider::new(1536);

        let a = provider.embed("How do I find a co-founder?").await.unwrap();
        let b = provider.embed("How do I find a co-founder?").await.unwrap();
        let c = provider.embed("How do I raise money?").await.unwrap();

        assert_eq!(a.len(), 1536);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn test_failure_toggle() {
        let provider = MockEmbeddingProvider::new(8);
        provider.set_fail(true);

        assert!(provider.embed("q").await.is_err());

        provider.set_fail(false);
        assert!(provider.embed("q").await.is_ok());
    }
}
