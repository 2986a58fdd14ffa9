//! # Khabar Store
//!
//! [`VectorStore`](khabar_core::VectorStore) and
//! [`ArticleStore`](khabar_core::ArticleStore) implementations:
//!
//! - [`MemoryStore`]: records and articles in memory, loadable from JSON Lines.
//! - [`SqliteStore`]: a SQLite database with `vectors` and `articles` tables.

pub mod error;
pub mod memory;
pub mod sqlite;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
