//! Lightweight French/English language identification.
//!
//! The retrieval pipeline only needs to tell the two corpus languages
//! apart. Function words are counted for each side; when the vote is
//! inconclusive, any French diacritic tips the text to French.

use std::collections::HashSet;

use regex::Regex;

use crate::error::Result;
use crate::retrieval::LanguageDetector;

const FRENCH_MARKERS: &[&str] = &[
    "le", "la", "les", "de", "des", "du", "un", "une", "et", "est", "en", "au", "aux", "pour",
    "avec", "dans", "sur", "par", "qui", "que", "pas", "ne", "se", "son", "sa", "ses", "il",
    "elle", "a", "été", "après", "contre", "lors",
];

const ENGLISH_MARKERS: &[&str] = &[
    "the", "a", "an", "and", "is", "are", "was", "were", "of", "to", "in", "on", "for", "with",
    "by", "at", "from", "his", "her", "he", "she", "it", "has", "have", "after", "against",
    "not", "this", "that", "will",
];

const FRENCH_DIACRITICS: &str = "àâäéèêëïîôùûüÿç";

/// Stopword-vote detector returning `"fr"` or `"en"`.
pub struct HeuristicLanguageDetector {
    re_word: Regex,
    french: HashSet<&'static str>,
    english: HashSet<&'static str>,
}

impl HeuristicLanguageDetector {
    /// Constructs a detector with pre-compiled tokenization.
    ///
    /// # Errors
    ///
    /// Returns `KhabarError::RegexError` if the word pattern fails to compile.
    pub fn new() -> Result<Self> {
        Ok(Self {
            re_word: Regex::new(r"\w+")?,
            french: FRENCH_MARKERS.iter().copied().collect(),
            english: ENGLISH_MARKERS.iter().copied().collect(),
        })
    }

    /// Returns `"fr"` or `"en"` for `text`.
    #[must_use]
    pub fn classify(&self, text: &str) -> &'static str {
        let lowered = text.to_lowercase();

        let mut french = 0usize;
        let mut english = 0usize;
        for word in self.re_word.find_iter(&lowered).map(|m| m.as_str()) {
            // Words shared by both lists ("a") count for neither.
            match (self.french.contains(word), self.english.contains(word)) {
                (true, false) => french += 1,
                (false, true) => english += 1,
                _ => {}
            }
        }

        match french.cmp(&english) {
            std::cmp::Ordering::Greater => "fr",
            std::cmp::Ordering::Less => "en",
            std::cmp::Ordering::Equal => {
                if lowered.chars().any(|c| FRENCH_DIACRITICS.contains(c)) {
                    "fr"
                } else {
                    "en"
                }
            }
        }
    }
}

impl LanguageDetector for HeuristicLanguageDetector {
    fn detect(&self, text: &str) -> String {
        self.classify(text).to_string()
    }
}
