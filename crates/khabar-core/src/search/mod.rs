pub mod cosine;

pub use cosine::{cosine_similarity, l2_norm, CosineSearch, SkipCounts};
