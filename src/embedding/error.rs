use thiserror::Error;

/// Errors returned by embedding providers.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// The HTTP request itself failed (connect, DNS, timeout).
    #[error("embedding request to '{url}' failed: {source}")]
    RequestFailed {
        /// Endpoint URL.
        url: String,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The endpoint answered with a non-success status.
    #[error("embedding endpoint returned status {status}: {message}")]
    ApiStatus {
        /// HTTP status code.
        status: u16,
        /// Response body (or reason phrase) for diagnostics.
        message: String,
    },

    /// The response body could not be interpreted.
    #[error("malformed embedding response: {reason}")]
    MalformedResponse {
        /// What was wrong with the body.
        reason: String,
    },

    /// The returned vector has the wrong dimensionality.
    #[error("invalid embedding dimension: expected {expected}, got {actual}")]
    InvalidDimension {
        /// Expected dimension.
        expected: usize,
        /// Actual dimension.
        actual: usize,
    },
}

impl EmbeddingError {
    /// Returns `true` for quota/rate-limit responses, the only class of
    /// embedding failure a [`crate::retry::RetryPolicy`] will retry.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::ApiStatus { status: 429, .. })
    }
}
