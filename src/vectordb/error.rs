use thiserror::Error;

/// Errors returned by vector index operations.
#[derive(Debug, Error)]
pub enum VectorDbError {
    /// Could not connect to the Qdrant endpoint.
    #[error("failed to connect to Qdrant at '{url}': {message}")]
    ConnectionFailed {
        /// Endpoint URL.
        url: String,
        /// Error message.
        message: String,
    },

    /// The named collection does not exist on the server.
    #[error("collection not found: {collection}")]
    CollectionNotFound {
        /// Collection name.
        collection: String,
    },

    /// `query` was called before `initialize` completed.
    #[error("vector index '{collection}' not initialized; call initialize() first")]
    NotInitialized {
        /// Collection name.
        collection: String,
    },

    /// Search request failed.
    #[error("failed to search in '{collection}': {message}")]
    SearchFailed {
        /// Collection name.
        collection: String,
        /// Error message.
        message: String,
    },
}
