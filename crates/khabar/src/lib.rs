//! # Khabar
//!
//! Hybrid semantic retrieval over a French/English football news corpus.
//! This crate bundles the engine ([`khabar_core`]), the stores
//! ([`khabar_store`]) and the BERT embedder ([`khabar_embed`]).

pub use khabar_core::*;

pub mod store {
    pub use khabar_store::*;
}

pub mod embed {
    pub use khabar_embed::*;
}
