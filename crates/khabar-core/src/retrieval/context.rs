use std::sync::Arc;

use crate::error::Result;
use crate::language::HeuristicLanguageDetector;
use crate::retrieval::{ArticleStore, Embedder, LanguageDetector, VectorStore};

/// Shared handles to the retrieval collaborators.
///
/// Built once at startup and shared by every retrieval call. Cloning is
/// cheap and shares the same underlying model and store.
#[derive(Clone)]
pub struct RetrievalContext {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
    detector: Arc<dyn LanguageDetector>,
    articles: Option<Arc<dyn ArticleStore>>,
}

impl RetrievalContext {
    /// Creates a context with the built-in heuristic language detector and
    /// no article enrichment.
    ///
    /// # Errors
    ///
    /// Returns `KhabarError::RegexError` if the detector fails to build.
    pub fn new(embedder: Arc<dyn Embedder>, store: Arc<dyn VectorStore>) -> Result<Self> {
        Ok(Self {
            embedder,
            store,
            detector: Arc::new(HeuristicLanguageDetector::new()?),
            articles: None,
        })
    }

    /// Replaces the language detector.
    #[must_use]
    pub fn with_detector(mut self, detector: Arc<dyn LanguageDetector>) -> Self {
        self.detector = detector;
        self
    }

    /// Enables enrichment of the final result from an article store.
    #[must_use]
    pub fn with_articles(mut self, articles: Arc<dyn ArticleStore>) -> Self {
        self.articles = Some(articles);
        self
    }

    pub fn embedder(&self) -> &dyn Embedder {
        self.embedder.as_ref()
    }

    pub fn store(&self) -> &dyn VectorStore {
        self.store.as_ref()
    }

    pub fn detector(&self) -> &dyn LanguageDetector {
        self.detector.as_ref()
    }

    pub fn articles(&self) -> Option<&dyn ArticleStore> {
        self.articles.as_deref()
    }
}
