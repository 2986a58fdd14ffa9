pub mod entities;
pub mod record;
pub mod result;

pub use entities::{EntityCategory, EntitySet};
pub use record::{ArticleMetadata, Embedding, VectorRecord};
pub use result::{RankedResult, SearchResult};
