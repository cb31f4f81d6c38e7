use qdrant_client::qdrant::ScoredPoint;
use serde::{Deserialize, Serialize};

use crate::text::decode_entities;

/// One retrievable transcript chapter with its similarity (or, after
/// reranking, relevance) score.
///
/// The pipeline reuses this shape end to end: the vector index produces it
/// with the index's similarity score, and the reranker overwrites `score`
/// with its relevance score before results are returned or cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterCandidate {
    /// Similarity score from the index, later replaced by the reranker's
    /// relevance score.
    pub score: f32,
    /// Source video title.
    pub video_name: String,
    /// Chapter title within the video.
    pub chapter_name: String,
    /// Transcript text of the chapter segment.
    pub text: String,
    /// Chapter start timestamp, as stored (`"12:34"`).
    pub start_time: String,
    /// Chapter end timestamp, or `"end"` for the final chapter.
    pub end_time: String,
    /// Deep link into the video at the chapter start.
    pub timestamp_url: String,
}

impl ChapterCandidate {
    /// Builds a candidate from a Qdrant scored point.
    ///
    /// Returns `None` when required payload fields are missing, so callers
    /// can skip malformed points. Text fields are entity-decoded here, on
    /// the read path, because the corpus was stored with HTML-entity
    /// encoding.
    pub fn from_scored_point(point: ScoredPoint) -> Option<Self> {
        let payload = point.payload;
        let field = |key: &str| {
            payload
                .get(key)
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
        };
        let decoded_field =
            |key: &str| field(key).map(|s| decode_entities(&s).into_owned());

        Some(Self {
            score: point.score,
            video_name: decoded_field("videoName")?,
            chapter_name: decoded_field("chapterName")?,
            text: decoded_field("text")?,
            start_time: field("startTime")?,
            end_time: field("endTime")?,
            timestamp_url: field("timestampUrl")?,
        })
    }
}
