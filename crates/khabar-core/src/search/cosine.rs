//! # Exhaustive Cosine Search
//!
//! First retrieval stage: scores every candidate against the query vector
//! and keeps the best `limit`. Embeddings are compared exactly as stored,
//! never re-normalized, so scores stay consistent with how the corpus was
//! indexed.

use std::cmp::Ordering;

use tracing::debug;

use crate::types::{SearchResult, VectorRecord};

/// Euclidean (L2) norm of a vector.
#[must_use]
pub fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Cosine similarity between two vectors.
///
/// Returns `None` when the lengths differ or either vector has zero norm.
/// The result is nominally in `[-1, 1]` but is not clamped.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f32> {
    if a.len() != b.len() {
        return None;
    }
    let norm_a = l2_norm(a);
    let norm_b = l2_norm(b);
    if norm_a == 0.0 || norm_b == 0.0 {
        return None;
    }
    Some(dot(a, b) / (norm_a * norm_b))
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Candidates excluded from one search, by reason.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkipCounts {
    /// Embedding length differs from the query's (includes missing embeddings).
    pub dimension_mismatch: usize,
    /// Candidate embedding has zero norm.
    pub zero_norm: usize,
    /// Score came out NaN or infinite.
    pub non_finite: usize,
    /// Score fell below `min_score`.
    pub below_min_score: usize,
}

impl SkipCounts {
    /// Total number of skipped candidates.
    #[must_use]
    pub fn total(&self) -> usize {
        self.dimension_mismatch + self.zero_norm + self.non_finite + self.below_min_score
    }
}

/// Brute-force cosine similarity search over an in-memory snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct CosineSearch;

impl CosineSearch {
    /// Create a new cosine search.
    pub fn new() -> Self {
        Self
    }

    /// Scores `candidates` against `query` and returns at most `limit`
    /// results with score `>= min_score`, best first.
    ///
    /// Candidates with a different dimension or a zero-norm embedding are
    /// skipped silently. Equal scores keep the candidates' input order.
    pub fn search(
        &self,
        query: &[f32],
        candidates: &[VectorRecord],
        limit: usize,
        min_score: f32,
    ) -> Vec<SearchResult> {
        self.search_with_stats(query, candidates, limit, min_score).0
    }

    /// Like [`search`](Self::search), also reporting why candidates were skipped.
    pub fn search_with_stats(
        &self,
        query: &[f32],
        candidates: &[VectorRecord],
        limit: usize,
        min_score: f32,
    ) -> (Vec<SearchResult>, SkipCounts) {
        let mut skipped = SkipCounts::default();

        let query_norm = l2_norm(query);
        if candidates.is_empty() || limit == 0 || query_norm == 0.0 {
            return (Vec::new(), skipped);
        }

        let mut scored: Vec<(f32, &VectorRecord)> = Vec::with_capacity(candidates.len());
        for record in candidates {
            if record.embedding.len() != query.len() {
                skipped.dimension_mismatch += 1;
                continue;
            }
            let doc_norm = l2_norm(&record.embedding);
            if doc_norm == 0.0 {
                skipped.zero_norm += 1;
                continue;
            }

            let score = dot(query, &record.embedding) / (query_norm * doc_norm);
            if !score.is_finite() {
                skipped.non_finite += 1;
                continue;
            }
            if score < min_score {
                skipped.below_min_score += 1;
                continue;
            }
            scored.push((score, record));
        }

        // Stable: ties keep candidate order, which the re-ranker relies on.
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
        scored.truncate(limit);

        debug!(
            candidates = candidates.len(),
            kept = scored.len(),
            dimension_mismatch = skipped.dimension_mismatch,
            zero_norm = skipped.zero_norm,
            non_finite = skipped.non_finite,
            below_min_score = skipped.below_min_score,
            "cosine search complete"
        );

        let results = scored
            .into_iter()
            .map(|(score, record)| SearchResult::from_record(record, score))
            .collect();
        (results, skipped)
    }
}
