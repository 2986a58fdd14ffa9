use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::config::RetrievalConfig;
use crate::error::{KhabarError, Result};
use crate::extract::Lexicon;
use crate::rerank::HybridReRanker;
use crate::retrieval::RetrievalContext;
use crate::search::CosineSearch;
use crate::types::{Embedding, RankedResult, SearchResult};
use crate::verdict::Verdict;

/// The best match for a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Retrieval {
    /// The top re-ranked result, enriched with article metadata when available.
    pub result: RankedResult,
    /// The top result's final hybrid score in `[0.0, 1.0]`.
    pub final_score: f32,
    /// The language the query was processed in (given or detected).
    pub language: String,
}

impl Retrieval {
    /// Grades the claim from the final score.
    #[must_use]
    pub fn verdict(&self) -> Verdict {
        Verdict::from_score(self.final_score)
    }
}

/// Every re-ranked candidate for a query, best first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    pub results: Vec<RankedResult>,
    pub language: String,
    /// `true` when the language-filtered search found nothing and the whole
    /// store was searched instead.
    pub unfiltered: bool,
}

/// Runs the two-stage retrieval pipeline against a shared context.
pub struct Retriever {
    context: RetrievalContext,
    search: CosineSearch,
    reranker: HybridReRanker,
    config: RetrievalConfig,
}

impl Retriever {
    /// Create a retriever with the default lexicon and configuration.
    ///
    /// # Errors
    ///
    /// Propagates lexicon and regex errors from the re-ranker.
    pub fn new(context: RetrievalContext) -> Result<Self> {
        Self::with_config(context, &Lexicon::default(), RetrievalConfig::default())
    }

    /// Create a retriever with a custom lexicon and configuration.
    ///
    /// # Errors
    ///
    /// Propagates lexicon and regex errors from the re-ranker.
    pub fn with_config(
        context: RetrievalContext,
        lexicon: &Lexicon,
        config: RetrievalConfig,
    ) -> Result<Self> {
        Ok(Self {
            context,
            search: CosineSearch::new(),
            reranker: HybridReRanker::from_lexicon(lexicon)?,
            config,
        })
    }

    /// Finds the single best match for `query_text`.
    ///
    /// When `language` is `None` it is detected from the query. The search
    /// is first restricted to records in that language and widened to the
    /// whole store if that finds nothing.
    ///
    /// # Errors
    ///
    /// - `KhabarError::EmptyInput` for blank query text.
    /// - `KhabarError::NotFound` when no record can be scored at all.
    /// - Embedder and store errors, unchanged.
    #[instrument(skip(self, query_text), fields(query_len = query_text.len()))]
    pub fn retrieve(&self, query_text: &str, language: Option<&str>) -> Result<Retrieval> {
        let ranking = self.rank(query_text, language)?;

        let mut best = ranking
            .results
            .into_iter()
            .next()
            .ok_or_else(|| KhabarError::NotFound {
                language: ranking.language.clone(),
            })?;

        if let Some(articles) = self.context.articles() {
            best.result.article = articles.lookup(&best.result.url)?;
        }

        info!(
            id = %best.result.id,
            score_final = best.score_final,
            language = %ranking.language,
            unfiltered = ranking.unfiltered,
            "closest article selected"
        );

        Ok(Retrieval {
            final_score: best.score_final,
            result: best,
            language: ranking.language,
        })
    }

    /// Runs both stages and returns every re-ranked candidate.
    ///
    /// # Errors
    ///
    /// As [`retrieve`](Self::retrieve).
    pub fn rank(&self, query_text: &str, language: Option<&str>) -> Result<Ranking> {
        let query_text = query_text.trim();
        if query_text.is_empty() {
            return Err(KhabarError::EmptyInput);
        }

        // No lock is held here: slow model calls never block other queries.
        let query_embedding = self.context.embedder().embed(query_text)?;

        let language = match language {
            Some(tag) => tag.to_string(),
            None => self.context.detector().detect(query_text),
        };

        let mut unfiltered = false;
        let mut matches = self.coarse_search(&query_embedding, Some(&language))?;
        if matches.is_empty() {
            info!(language = %language, "no match in language, searching all records");
            unfiltered = true;
            matches = self.coarse_search(&query_embedding, None)?;
        }
        if matches.is_empty() {
            return Err(KhabarError::NotFound { language });
        }

        let query_entities = self.reranker.extractor().extract(query_text, &language);
        debug!(entities = %query_entities, "query entities");

        let results = self
            .reranker
            .rerank(matches, query_text, &query_entities, &language);

        Ok(Ranking {
            results,
            language,
            unfiltered,
        })
    }

    /// The configuration in use.
    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    /// The re-ranker, for callers that want entity extraction on its own.
    pub fn reranker(&self) -> &HybridReRanker {
        &self.reranker
    }

    fn coarse_search(
        &self,
        query_embedding: &Embedding,
        language: Option<&str>,
    ) -> Result<Vec<SearchResult>> {
        let snapshot = self.context.store().fetch_all(language)?;
        debug!(
            language = language.unwrap_or("*"),
            candidates = snapshot.len(),
            "fetched candidate snapshot"
        );
        Ok(self.search.search(
            query_embedding,
            &snapshot,
            self.config.top_k,
            self.config.min_score,
        ))
    }
}
