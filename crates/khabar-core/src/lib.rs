//! # Khabar Core
//!
//! Hybrid semantic retrieval over a bilingual football news corpus.
//! A query is matched against pre-computed `(text, embedding)` records in
//! two stages: an exhaustive cosine search narrows the store to a top-K,
//! then a hybrid re-ranker blends cosine similarity with entity overlap
//! (players, clubs, actions) and keyword overlap into one final score.
//!
//! ## Quick Start
//!
//! ```rust
//! use khabar_core::extract::{EntityExtractor, Lexicon};
//!
//! let extractor = EntityExtractor::new(&Lexicon::default()).unwrap();
//! let entities = extractor.extract("Ziyech a signé au Wydad", "fr");
//!
//! assert!(entities.players.contains("ziyech"));
//! assert!(entities.clubs.contains("wydad"));
//! assert!(entities.actions.contains("signé"));
//! ```
pub mod config;
pub mod error;
pub mod extract;
pub mod language;
pub mod rerank;
pub mod retrieval;
pub mod search;
pub mod types;
pub mod verdict;

// Re-export primary API
pub use config::RetrievalConfig;
pub use error::{KhabarError, Result};
pub use extract::{EntityExtractor, Lexicon};
pub use language::HeuristicLanguageDetector;
pub use rerank::{HybridReRanker, KeywordScorer};
pub use retrieval::{
    ArticleStore, Embedder, LanguageDetector, LazyEmbedder, Ranking, Retrieval,
    RetrievalContext, Retriever, VectorStore,
};
pub use search::CosineSearch;
pub use types::{
    ArticleMetadata, Embedding, EntityCategory, EntitySet, RankedResult, SearchResult,
    VectorRecord,
};
pub use verdict::Verdict;
