//! # Khabar Embed
//!
//! Text embedding for the Khabar retrieval engine, using candle for
//! inference and Hugging Face tokenizers.
//!
//! The model is typically wrapped in a [`khabar_core::LazyEmbedder`] so it
//! is loaded once, on first use or at startup:
//!
//! ```rust,no_run
//! use khabar_core::{Embedder, LazyEmbedder};
//! use khabar_embed::BertEmbedder;
//!
//! let embedder = LazyEmbedder::new(|| Ok(BertEmbedder::load("models/all-MiniLM-L6-v2")?));
//! embedder.warm_up().unwrap();
//! let vector = embedder.embed("Ziyech arrive au Wydad").unwrap();
//! assert_eq!(vector.len(), 384);
//! ```

pub mod bert;
pub mod error;

pub use bert::{mean_pool, BertEmbedder};
pub use error::{EmbedError, Result};
