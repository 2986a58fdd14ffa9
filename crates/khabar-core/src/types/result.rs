use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::record::{ArticleMetadata, VectorRecord};

/// A record matched by the cosine stage.
///
/// Carries the record's fields without its embedding. `score` is the raw
/// cosine similarity; floating error can push it slightly outside `[-1, 1]`,
/// so consumers clamp before use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: String,
    pub url: String,
    pub language: String,
    pub text: String,
    pub created_at: Option<DateTime<Utc>>,

    /// Raw cosine similarity against the query embedding.
    pub score: f32,

    /// Article fields joined by URL, when an article store is configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article: Option<ArticleMetadata>,
}

impl SearchResult {
    /// Builds a result from a scored record, dropping the embedding.
    #[must_use]
    pub fn from_record(record: &VectorRecord, score: f32) -> Self {
        Self {
            id: record.id.clone(),
            url: record.url.clone(),
            language: record.language.clone(),
            text: record.text.clone(),
            created_at: record.created_at,
            score,
            article: None,
        }
    }
}

/// A search result after hybrid re-ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    #[serde(flatten)]
    pub result: SearchResult,

    /// Final hybrid score in `[0.0, 1.0]`.
    pub score_final: f32,

    /// Raw cosine similarity, unclamped, kept for diagnostics.
    pub score_cosine: f32,

    /// Weighted entity overlap in `[0.0, 1.0]`.
    pub score_entity: f32,

    /// Keyword overlap in `[0.0, 1.0]`.
    pub score_keyword: f32,
}

impl std::fmt::Display for RankedResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "RankedResult(id={:?}, final={:.4}, cosine={:.4}, entity={:.4}, keyword={:.4})",
            self.result.id, self.score_final, self.score_cosine, self.score_entity, self.score_keyword
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_record_drops_embedding() {
        let record = VectorRecord::new("7", "https://x/7", "en", "Wydad win derby", vec![1.0; 4]);
        let result = SearchResult::from_record(&record, 0.42);
        assert_eq!(result.id, "7");
        assert_eq!(result.url, "https://x/7");
        assert_eq!(result.text, "Wydad win derby");
        assert_eq!(result.score, 0.42);
        assert!(result.article.is_none());
    }

    #[test]
    fn ranked_result_flattens_fields() {
        let record = VectorRecord::new("1", "u", "fr", "t", vec![1.0]);
        let ranked = RankedResult {
            result: SearchResult::from_record(&record, 0.9),
            score_final: 0.8,
            score_cosine: 0.9,
            score_entity: 0.5,
            score_keyword: 0.25,
        };

        let json = serde_json::to_value(&ranked).unwrap();
        assert_eq!(json["id"], "1");
        assert_eq!(json["url"], "u");
        assert!(json.get("article").is_none());
        assert!(json.get("result").is_none());

        let display = ranked.to_string();
        assert!(display.contains("final=0.8000"));
    }
}
