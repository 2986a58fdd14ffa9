//! Retrieval pipeline configuration.

use serde::{Deserialize, Serialize};

/// Number of candidates kept by the coarse cosine stage.
pub const DEFAULT_TOP_K: usize = 20;

/// Minimum cosine score for the coarse stage. `-1.0` keeps everything.
pub const DEFAULT_MIN_SCORE: f32 = -1.0;

/// Configuration for the two-stage retrieval pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// How many cosine matches are handed to the re-ranker.
    pub top_k: usize,
    /// Cosine matches scoring below this are discarded before re-ranking.
    pub min_score: f32,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            min_score: DEFAULT_MIN_SCORE,
        }
    }
}

impl RetrievalConfig {
    /// Create a new retrieval configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the coarse stage size. Never below one.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.max(1);
        self
    }

    /// Set the coarse stage score floor, clamped to the cosine range.
    pub fn with_min_score(mut self, min_score: f32) -> Self {
        self.min_score = min_score.clamp(-1.0, 1.0);
        self
    }
}
