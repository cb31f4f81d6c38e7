use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{RerankError, RerankProvider};
use crate::retry::RetryPolicy;
use crate::vectordb::ChapterCandidate;

/// Default Cohere API endpoint.
pub const DEFAULT_COHERE_BASE_URL: &str = "https://api.cohere.com";

/// Rerank provider backed by the Cohere `/v2/rerank` endpoint.
pub struct CohereReranker {
    http: reqwest::Client,
    auth_header: String,
    base_url: String,
    model: String,
    top_n: usize,
    relevance_threshold: f32,
    retry: RetryPolicy,
}

impl std::fmt::Debug for CohereReranker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CohereReranker")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("top_n", &self.top_n)
            .field("relevance_threshold", &self.relevance_threshold)
            .finish()
    }
}

impl CohereReranker {
    /// Creates a reranker for `model`, keeping at most `top_n` results at
    /// or above `relevance_threshold`.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        top_n: usize,
        relevance_threshold: f32,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            auth_header: format!("Bearer {}", api_key.into()),
            base_url: DEFAULT_COHERE_BASE_URL.to_string(),
            model: model.into(),
            top_n,
            relevance_threshold,
            retry: RetryPolicy::disabled(),
        }
    }

    /// Overrides the API endpoint (gateways, test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Enables retry with backoff for rate-limited responses. The search
    /// path leaves this disabled.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Returns the configured relevance threshold.
    pub fn relevance_threshold(&self) -> f32 {
        self.relevance_threshold
    }

    fn rerank_url(&self) -> String {
        format!("{}/v2/rerank", self.base_url)
    }

    async fn request_rerank(
        &self,
        query: &str,
        candidates: &[ChapterCandidate],
    ) -> Result<Vec<RerankHit>, RerankError> {
        let url = self.rerank_url();
        let body = RerankRequest {
            model: &self.model,
            query,
            documents: candidates.iter().map(|c| c.text.as_str()).collect(),
            top_n: self.top_n,
        };

        let response = self
            .http
            .post(&url)
            .header("Authorization", &self.auth_header)
            .json(&body)
            .send()
            .await
            .map_err(|e| RerankError::RequestFailed {
                url: url.clone(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| status.to_string());
            return Err(RerankError::ApiStatus {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: RerankResponse =
            response
                .json()
                .await
                .map_err(|e| RerankError::MalformedResponse {
                    reason: e.to_string(),
                })?;

        Ok(parsed.results)
    }
}

impl RerankProvider for CohereReranker {
    async fn rerank(
        &self,
        query: &str,
        candidates: Vec<ChapterCandidate>,
    ) -> Result<Vec<ChapterCandidate>, RerankError> {
        // Contract: empty input short-circuits without an external call.
        if candidates.is_empty() {
            return Ok(candidates);
        }

        debug!(
            query_len = query.len(),
            candidates = candidates.len(),
            model = %self.model,
            "requesting rerank"
        );

        let hits = self
            .retry
            .run(RerankError::is_rate_limited, || {
                self.request_rerank(query, &candidates)
            })
            .await?;

        apply_hits(candidates, hits, self.relevance_threshold, self.top_n)
    }
}

/// Maps rerank hits back onto their source candidates: overwrites `score`
/// with the relevance score, drops hits below `threshold`, caps at `top_n`,
/// and orders descending (stable, so the endpoint's tie order survives).
fn apply_hits(
    candidates: Vec<ChapterCandidate>,
    mut hits: Vec<RerankHit>,
    threshold: f32,
    top_n: usize,
) -> Result<Vec<ChapterCandidate>, RerankError> {
    hits.sort_by(|a, b| {
        b.relevance_score
            .partial_cmp(&a.relevance_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut ranked = Vec::with_capacity(hits.len().min(top_n));
    for hit in hits {
        if hit.relevance_score < threshold {
            continue;
        }
        if ranked.len() == top_n {
            break;
        }

        let source =
            candidates
                .get(hit.index)
                .cloned()
                .ok_or(RerankError::IndexOutOfRange {
                    index: hit.index,
                    len: candidates.len(),
                })?;

        ranked.push(ChapterCandidate {
            score: hit.relevance_score,
            ..source
        });
    }

    Ok(ranked)
}

#[derive(Serialize)]
struct RerankRequest<'a> {
    model: &'a str,
    query: &'a str,
    documents: Vec<&'a str>,
    top_n: usize,
}

#[derive(Deserialize)]
struct RerankResponse {
    results: Vec<RerankHit>,
}

#[derive(Debug, Deserialize)]
struct RerankHit {
    index: usize,
    relevance_score: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

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

    fn hit(index: usize, relevance_score: f32) -> RerankHit {
        RerankHit {
            index,
            relevance_score,
        }
    }

    #[test]
    fn test_apply_hits_overwrites_score_and_reorders() {
        let candidates = vec![candidate(0.91, "a"), candidate(0.87, "b")];
        let hits = vec![hit(1, 0.95), hit(0, 0.60)];

        let ranked = apply_hits(candidates, hits, 0.3, 6).unwrap();

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].text, "b");
        assert_eq!(ranked[0].score, 0.95);
        assert_eq!(ranked[1].text, "a");
        assert_eq!(ranked[1].score, 0.60);
    }

    #[test]
    fn test_apply_hits_threshold_and_cap() {
        let candidates: Vec<_> = (0..8)
            .map(|i| candidate(0.9, &format!("doc{i}")))
            .collect();
        // Relevance scores spanning 0.9 down to 0.1 - two fall below the
        // 0.3 threshold, and the cap trims the survivors to six.
        let hits: Vec<_> = (0..8)
            .map(|i| hit(i, 0.9 - 0.1 * i as f32))
            .collect();

        let ranked = apply_hits(candidates, hits, 0.3, 6).unwrap();

        assert!(ranked.len() <= 6);
        assert!(ranked.iter().all(|c| c.score >= 0.3));
        for pair in ranked.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_apply_hits_stable_tie_order() {
        let candidates = vec![candidate(0.9, "first"), candidate(0.8, "second")];
        let hits = vec![hit(0, 0.5), hit(1, 0.5)];

        let ranked = apply_hits(candidates, hits, 0.3, 6).unwrap();

        assert_eq!(ranked[0].text, "first");
        assert_eq!(ranked[1].text, "second");
    }

    #[test]
    fn test_apply_hits_rejects_out_of_range_index() {
        let candidates = vec![candidate(0.9, "only")];
        let hits = vec![hit(3, 0.8)];

        let err = apply_hits(candidates, hits, 0.3, 6).unwrap_err();
        assert!(matches!(
            err,
            RerankError::IndexOutOfRange { index: 3, len: 1 }
        ));
    }

    #[test]
    fn test_response_parsing() {
        let body = r#"{
            "id": "rr-1",
            "results": [
                {"index": 2, "relevance_score": 0.92},
                {"index": 0, "relevance_score": 0.41}
            ],
            "meta": {"api_version": {"version": "2"}}
        }"#;

        let parsed: RerankResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.results.len(), 2);
        assert_eq!(parsed.results[0].index, 2);
        assert_eq!(parsed.results[0].relevance_score, 0.92);
    }

    #[test]
    fn test_request_serialization() {
        let candidates = vec![candidate(0.9, "alpha"), candidate(0.8, "beta")];
        let request = RerankRequest {
            model: "rerank-v3.5",
            query: "How do I find a co-founder?",
            documents: candidates.iter().map(|c| c.text.as_str()).collect(),
            top_n: 6,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "rerank-v3.5");
        assert_eq!(json["documents"][0], "alpha");
        assert_eq!(json["top_n"], 6);
    }

    #[test]
    fn test_rate_limit_classification() {
        let rate_limited = RerankError::ApiStatus {
            status: 429,
            message: "too many requests".to_string(),
        };

        assert!(rate_limited.is_rate_limited());
    }
}
