pub mod hybrid;
pub mod keyword;

pub use hybrid::{entity_match_score, HybridReRanker, WEIGHT_COSINE, WEIGHT_ENTITY, WEIGHT_KEYWORD};
pub use keyword::KeywordScorer;
