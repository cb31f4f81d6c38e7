use qdrant_client::Qdrant;
use qdrant_client::qdrant::SearchPointsBuilder;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

use super::error::VectorDbError;
use super::model::ChapterCandidate;

/// Minimal async interface the pipeline depends on.
pub trait VectorIndex: Send + Sync {
    /// Establishes the handle to the named index. Idempotent; must complete
    /// before the first `query`.
    fn initialize(&self) -> impl Future<Output = Result<(), VectorDbError>> + Send;

    /// Returns up to `top_k` nearest candidates, ordered by descending
    /// index similarity score.
    fn query(
        &self,
        vector: Vec<f32>,
        top_k: u64,
    ) -> impl Future<Output = Result<Vec<ChapterCandidate>, VectorDbError>> + Send;
}

/// Qdrant-backed chapter index.
pub struct QdrantIndex {
    client: Qdrant,
    url: String,
    collection: String,
    ready: AtomicBool,
}

impl QdrantIndex {
    /// Creates a client for `url` over the collection `collection`.
    ///
    /// The handle is not usable for queries until [`VectorIndex::initialize`]
    /// has verified the collection exists.
    pub fn connect(url: &str, collection: &str) -> Result<Self, VectorDbError> {
        let client = Qdrant::from_url(url)
            .build()
            .map_err(|e| VectorDbError::ConnectionFailed {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            url: url.to_string(),
            collection: collection.to_string(),
            ready: AtomicBool::new(false),
        })
    }

    /// Returns the configured collection name.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Returns the configured endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns `true` once `initialize` has completed.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }
}

impl std::fmt::Debug for QdrantIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QdrantIndex")
            .field("url", &self.url)
            .field("collection", &self.collection)
            .field("ready", &self.is_ready())
            .finish()
    }
}

impl VectorIndex for QdrantIndex {
    async fn initialize(&self) -> Result<(), VectorDbError> {
        if self.is_ready() {
            return Ok(());
        }

        let exists = self
            .client
            .collection_exists(&self.collection)
            .await
            .map_err(|e| VectorDbError::ConnectionFailed {
                url: self.url.clone(),
                message: e.to_string(),
            })?;

        if !exists {
            return Err(VectorDbError::CollectionNotFound {
                collection: self.collection.clone(),
            });
        }

        self.ready.store(true, Ordering::Release);
        info!(collection = %self.collection, "vector index initialized");
        Ok(())
    }

    async fn query(
        &self,
        vector: Vec<f32>,
        top_k: u64,
    ) -> Result<Vec<ChapterCandidate>, VectorDbError> {
        if !self.is_ready() {
            return Err(VectorDbError::NotInitialized {
                collection: self.collection.clone(),
            });
        }

        let search = SearchPointsBuilder::new(&self.collection, vector, top_k).with_payload(true);

        let response = self
            .client
            .search_points(search)
            .await
            .map_err(|e| VectorDbError::SearchFailed {
                collection: self.collection.clone(),
                message: e.to_string(),
            })?;

        let candidates: Vec<ChapterCandidate> = response
            .result
            .into_iter()
            .filter_map(ChapterCandidate::from_scored_point)
            .collect();

        debug!(
            collection = %self.collection,
            candidates = candidates.len(),
            "vector search complete"
        );

        Ok(candidates)
    }
}
