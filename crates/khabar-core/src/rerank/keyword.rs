use std::collections::HashSet;

use regex::Regex;

use crate::error::Result;
use crate::extract::Lexicon;

/// Tokens this short or shorter (in characters) carry no signal.
const MIN_TOKEN_CHARS: usize = 3;

/// Keyword overlap between a query and a document.
pub struct KeywordScorer {
    re_word: Regex,
    stopwords: HashSet<String>,
}

impl KeywordScorer {
    /// Builds a scorer ignoring the lexicon's stopwords.
    ///
    /// # Errors
    ///
    /// Returns `KhabarError::RegexError` if the word pattern fails to compile.
    pub fn new(lexicon: &Lexicon) -> Result<Self> {
        Ok(Self {
            re_word: Regex::new(r"\w+")?,
            stopwords: lexicon
                .stopwords
                .iter()
                .map(|w| w.trim().to_lowercase())
                .collect(),
        })
    }

    /// Lower-cased word tokens of `text`, without short tokens and stopwords.
    #[must_use]
    pub fn tokens(&self, text: &str) -> HashSet<String> {
        let lowered = text.to_lowercase();
        self.re_word
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|w| w.chars().count() >= MIN_TOKEN_CHARS && !self.stopwords.contains(*w))
            .map(str::to_string)
            .collect()
    }

    /// Fraction of the query's tokens found in the document, in `[0.0, 1.0]`.
    ///
    /// Returns 0 when the query has no usable token.
    #[must_use]
    pub fn score(&self, query: &str, doc: &str) -> f32 {
        self.score_tokens(&self.tokens(query), doc)
    }

    /// Same as [`score`](Self::score) with the query already tokenized.
    #[must_use]
    pub fn score_tokens(&self, query_tokens: &HashSet<String>, doc: &str) -> f32 {
        if query_tokens.is_empty() {
            return 0.0;
        }
        let doc_tokens = self.tokens(doc);
        let shared = query_tokens.intersection(&doc_tokens).count();
        (shared as f32 / query_tokens.len() as f32).min(1.0)
    }
}
