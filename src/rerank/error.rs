use thiserror::Error;

/// Errors returned by rerank providers.
#[derive(Debug, Error)]
pub enum RerankError {
    /// The HTTP request itself failed (connect, DNS, timeout).
    #[error("rerank request to '{url}' failed: {source}")]
    RequestFailed {
        /// Endpoint URL.
        url: String,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The endpoint answered with a non-success status.
    #[error("rerank endpoint returned status {status}: {message}")]
    ApiStatus {
        /// HTTP status code.
        status: u16,
        /// Response body (or reason phrase) for diagnostics.
        message: String,
    },

    /// The response body could not be interpreted.
    #[error("malformed rerank response: {reason}")]
    MalformedResponse {
        /// What was wrong with the body.
        reason: String,
    },

    /// A result referenced a candidate index outside the submitted list.
    #[error("rerank result index {index} out of range for {len} candidates")]
    IndexOutOfRange {
        /// Returned index.
        index: usize,
        /// Number of candidates submitted.
        len: usize,
    },
}

impl RerankError {
    /// Returns `true` for quota/rate-limit responses, the only class of
    /// rerank failure a [`crate::retry::RetryPolicy`] will retry.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::ApiStatus { status: 429, .. })
    }
}
