use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A vector embedding. All records compared in one search share a dimension.
pub type Embedding = Vec<f32>;

/// A stored `(text, embedding)` pair, one per article title and language.
///
/// A record whose `embedding` field is missing deserializes with an empty
/// embedding; the cosine search skips it like any other dimension mismatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorRecord {
    /// Store identifier.
    pub id: String,

    /// Source article URL, the join key for [`ArticleMetadata`].
    pub url: String,

    /// Language tag of `text` (`"fr"` or `"en"` in the production corpus).
    pub language: String,

    /// The embedded text.
    pub text: String,

    /// Embedding of `text`, as produced at indexing time.
    #[serde(default)]
    pub embedding: Embedding,

    /// When the record was indexed.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl VectorRecord {
    /// Creates a record without an indexing timestamp.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        url: impl Into<String>,
        language: impl Into<String>,
        text: impl Into<String>,
        embedding: Embedding,
    ) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            language: language.into(),
            text: text.into(),
            embedding,
            created_at: None,
        }
    }

    /// Returns the embedding dimension.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.embedding.len()
    }
}

/// Article fields joined onto the final result by URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleMetadata {
    pub title_fr: Option<String>,
    pub title_en: Option<String>,
    pub title_ar: Option<String>,
    pub image: Option<String>,
}

impl ArticleMetadata {
    /// Returns the title in the given language, falling back to any title.
    #[must_use]
    pub fn title(&self, language: &str) -> Option<&str> {
        let preferred = match language {
            "en" => self.title_en.as_deref(),
            "ar" => self.title_ar.as_deref(),
            _ => self.title_fr.as_deref(),
        };
        preferred
            .or(self.title_fr.as_deref())
            .or(self.title_en.as_deref())
            .or(self.title_ar.as_deref())
    }
}
