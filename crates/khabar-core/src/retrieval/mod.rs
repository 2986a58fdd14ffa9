//! # Retrieval
//!
//! The collaborator interfaces the engine consumes, the shared context that
//! holds them, and the [`Retriever`] that runs the two-stage pipeline.
//!
//! ```text
//! query -> Embedder ----------------+
//!       -> LanguageDetector -> VectorStore::fetch_all(lang) -> CosineSearch (top-K)
//!                                  |  empty? fetch_all(None)         |
//!                                  v                                  v
//!                         EntityExtractor(query) ------> HybridReRanker -> top result
//!                                                                     |
//!                                                     ArticleStore::lookup(url)
//! ```

pub mod context;
pub mod coordinator;
pub mod lazy;

pub use context::RetrievalContext;
pub use coordinator::{Ranking, Retrieval, Retriever};
pub use lazy::LazyEmbedder;

use crate::error::Result;
use crate::types::{ArticleMetadata, Embedding, VectorRecord};

/// Text embedding model.
///
/// Must produce vectors of the same dimension as the stored records.
/// Output is used as is; no unit norm is assumed.
pub trait Embedder: Send + Sync {
    /// Embed one text.
    fn embed(&self, text: &str) -> Result<Embedding>;
}

/// Language identification for query text.
pub trait LanguageDetector: Send + Sync {
    /// Returns a language tag, `"fr"` or `"en"` for the production corpus.
    /// Other tags are treated as opaque and fall back to French keyword tables.
    fn detect(&self, text: &str) -> String;
}

/// Read access to the stored records.
pub trait VectorStore: Send + Sync {
    /// Returns every record, or only those tagged `language`.
    ///
    /// One bulk read per call; the returned snapshot is owned by the caller.
    fn fetch_all(&self, language: Option<&str>) -> Result<Vec<VectorRecord>>;
}

/// Article metadata keyed by source URL.
pub trait ArticleStore: Send + Sync {
    /// Returns the article stored for `url`, if any.
    fn lookup(&self, url: &str) -> Result<Option<ArticleMetadata>>;
}

impl<T: Embedder + ?Sized> Embedder for std::sync::Arc<T> {
    fn embed(&self, text: &str) -> Result<Embedding> {
        (**self).embed(text)
    }
}

impl<T: VectorStore + ?Sized> VectorStore for std::sync::Arc<T> {
    fn fetch_all(&self, language: Option<&str>) -> Result<Vec<VectorRecord>> {
        (**self).fetch_all(language)
    }
}

impl<T: ArticleStore + ?Sized> ArticleStore for std::sync::Arc<T> {
    fn lookup(&self, url: &str) -> Result<Option<ArticleMetadata>> {
        (**self).lookup(url)
    }
}
