//! # Hybrid Re-Ranking
//!
//! Second retrieval stage. Each cosine match is re-scored as
//!
//! ```text
//! final = clamp(0.6 * clamp(cosine, 0, 1) + 0.3 * entity + 0.1 * keyword, 0, 1)
//! ```
//!
//! and the list is stably re-sorted, so equal final scores keep the cosine
//! stage's order.

use std::cmp::Ordering;

use tracing::debug;

use crate::error::Result;
use crate::extract::{EntityExtractor, Lexicon};
use crate::rerank::keyword::KeywordScorer;
use crate::types::{EntityCategory, EntitySet, RankedResult, SearchResult};

/// Weight of the clamped cosine similarity in the final score.
pub const WEIGHT_COSINE: f32 = 0.6;
/// Weight of the entity overlap in the final score.
pub const WEIGHT_ENTITY: f32 = 0.3;
/// Weight of the keyword overlap in the final score.
pub const WEIGHT_KEYWORD: f32 = 0.1;

/// Weighted entity overlap between a query and a document, in `[0.0, 1.0]`.
///
/// Only categories where the query has at least one entity contribute; the
/// weighted Jaccard sum is divided by the total weight of those categories.
/// A query without entities scores 0.
#[must_use]
pub fn entity_match_score(query: &EntitySet, doc: &EntitySet) -> f32 {
    let mut score = 0.0;
    let mut total_weight = 0.0;

    for category in EntityCategory::ALL {
        if query.get(category).is_empty() {
            continue;
        }
        let weight = category.weight();
        score += weight * query.jaccard(doc, category);
        total_weight += weight;
    }

    if total_weight > 0.0 {
        score / total_weight
    } else {
        0.0
    }
}

/// Combines the three signals into the final score.
fn hybrid_score(cosine: f32, entity: f32, keyword: f32) -> f32 {
    let cosine_normalized = cosine.clamp(0.0, 1.0);
    let combined =
        WEIGHT_COSINE * cosine_normalized + WEIGHT_ENTITY * entity + WEIGHT_KEYWORD * keyword;
    combined.clamp(0.0, 1.0)
}

/// Re-ranks cosine matches with entity and keyword evidence.
pub struct HybridReRanker {
    extractor: EntityExtractor,
    keywords: KeywordScorer,
}

impl HybridReRanker {
    /// Create a re-ranker from its two scorers.
    pub fn new(extractor: EntityExtractor, keywords: KeywordScorer) -> Self {
        Self {
            extractor,
            keywords,
        }
    }

    /// Builds the extractor and keyword scorer from one lexicon.
    ///
    /// # Errors
    ///
    /// Propagates lexicon and regex errors from the scorers.
    pub fn from_lexicon(lexicon: &Lexicon) -> Result<Self> {
        Ok(Self::new(
            EntityExtractor::new(lexicon)?,
            KeywordScorer::new(lexicon)?,
        ))
    }

    /// The entity extractor used for documents; use it for the query too.
    #[must_use]
    pub fn extractor(&self) -> &EntityExtractor {
        &self.extractor
    }

    /// The keyword scorer.
    #[must_use]
    pub fn keywords(&self) -> &KeywordScorer {
        &self.keywords
    }

    /// Scores every result and returns them best first.
    ///
    /// Output has the same length as `results`. Document entities are
    /// extracted from each result's text in `language`.
    #[must_use]
    pub fn rerank(
        &self,
        results: Vec<SearchResult>,
        query_text: &str,
        query_entities: &EntitySet,
        language: &str,
    ) -> Vec<RankedResult> {
        let query_tokens = self.keywords.tokens(query_text);

        let mut ranked: Vec<RankedResult> = results
            .into_iter()
            .map(|result| {
                let doc_entities = self.extractor.extract(&result.text, language);
                let score_entity = entity_match_score(query_entities, &doc_entities);
                let score_keyword = self.keywords.score_tokens(&query_tokens, &result.text);
                let score_cosine = result.score;

                RankedResult {
                    score_final: hybrid_score(score_cosine, score_entity, score_keyword),
                    score_cosine,
                    score_entity,
                    score_keyword,
                    result,
                }
            })
            .collect();

        // Stable: ties fall back to the cosine order.
        ranked.sort_by(|a, b| {
            b.score_final
                .partial_cmp(&a.score_final)
                .unwrap_or(Ordering::Equal)
        });

        if let Some(top) = ranked.first() {
            debug!(
                candidates = ranked.len(),
                top_id = %top.result.id,
                top_score = top.score_final,
                "re-ranking complete"
            );
        }

        ranked
    }
}
