use std::collections::HashMap;

use regex::Regex;

use crate::error::Result;
use crate::extract::lexicon::Lexicon;
use crate::types::EntitySet;

/// A compiled action keyword.
struct ActionPattern {
    keyword: String,
    regex: Regex,
}

/// Gazetteer and keyword based entity extractor.
///
/// Players and clubs are plain substring matches against the lower-cased
/// text, so an entry also matches inside a longer unrelated word. Actions
/// are matched on word boundaries. Scores in the stored corpus depend on
/// this asymmetry, so both behaviors are kept as they are.
pub struct EntityExtractor {
    players: Vec<String>,
    clubs: Vec<String>,
    actions: HashMap<String, Vec<ActionPattern>>,
    fallback_language: String,
}

impl EntityExtractor {
    /// Builds an extractor from a lexicon, compiling one word-boundary
    /// pattern per action keyword.
    ///
    /// # Errors
    ///
    /// Returns `KhabarError::Lexicon` if the lexicon does not normalize and
    /// `KhabarError::RegexError` if a keyword pattern fails to compile.
    pub fn new(lexicon: &Lexicon) -> Result<Self> {
        let lexicon = lexicon.clone().normalized()?;

        let mut actions = HashMap::with_capacity(lexicon.actions.len());
        for (language, keywords) in &lexicon.actions {
            let patterns = keywords
                .iter()
                .map(|keyword| {
                    Ok(ActionPattern {
                        keyword: keyword.clone(),
                        regex: Regex::new(&format!(r"(?i)\b{}\b", regex::escape(keyword)))?,
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            actions.insert(language.clone(), patterns);
        }

        Ok(Self {
            players: lexicon.players,
            clubs: lexicon.clubs,
            actions,
            fallback_language: lexicon.fallback_language,
        })
    }

    /// Extracts players, clubs and actions from `text`.
    ///
    /// Action keywords come from `language`'s table, or the fallback
    /// language's table when `language` has none.
    #[must_use]
    pub fn extract(&self, text: &str, language: &str) -> EntitySet {
        let lowered = text.to_lowercase();

        let mut entities = EntitySet::default();
        entities.players = substring_matches(&self.players, &lowered);
        entities.clubs = substring_matches(&self.clubs, &lowered);
        entities.actions = self
            .action_patterns(language)
            .iter()
            .filter(|pattern| pattern.regex.is_match(&lowered))
            .map(|pattern| pattern.keyword.clone())
            .collect();
        entities
    }

    /// Returns the language tag whose action table `language` resolves to.
    #[must_use]
    pub fn resolve_language<'a>(&'a self, language: &'a str) -> &'a str {
        if self.actions.contains_key(language) {
            language
        } else {
            &self.fallback_language
        }
    }

    fn action_patterns(&self, language: &str) -> &[ActionPattern] {
        self.actions
            .get(self.resolve_language(language))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

fn substring_matches<T: FromIterator<String>>(entries: &[String], lowered: &str) -> T {
    entries
        .iter()
        .filter(|entry| lowered.contains(entry.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> EntityExtractor {
        EntityExtractor::new(&Lexicon::default()).unwrap()
    }

    #[test]
    fn extracts_all_categories_french() {
        let e = extractor();
        let entities = e.extract("Hakim Ziyech a signé au Wydad Casablanca", "fr");

        assert!(entities.players.contains("hakim ziyech"));
        assert!(entities.players.contains("ziyech"));
        assert!(entities.clubs.contains("wydad"));
        assert!(entities.clubs.contains("wydad casablanca"));
        assert_eq!(
            entities.actions.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["signé"]
        );
    }

    #[test]
    fn extracts_english_actions() {
        let e = extractor();
        let entities = e.extract("Ziyech scored the winning goal in the derby", "en");

        assert!(entities.players.contains("ziyech"));
        assert!(entities.actions.contains("goal"));
        assert!(entities.actions.contains("derby"));
        assert!(!entities.actions.contains("goals"));
    }

    #[test]
    fn gazetteer_match_is_case_insensitive() {
        let e = extractor();
        let entities = e.extract("NOUREDDINE AMRABAT rejoint le RAJA", "fr");
        assert!(entities.players.contains("noureddine amrabat"));
        assert!(entities.clubs.contains("raja"));
        assert!(entities.actions.contains("rejoint"));
    }

    #[test]
    fn gazetteer_matches_inside_longer_words() {
        // Known quirk: no word boundaries for players and clubs.
        // "irt" sits inside "shirt", "wac" inside "iwachu".
        let e = extractor();
        let entities = e.extract("a new shirt for iwachu", "en");
        assert!(entities.clubs.contains("irt"));
        assert!(entities.clubs.contains("wac"));
    }

    #[test]
    fn actions_require_word_boundaries() {
        let e = extractor();
        // "but" inside "butane", "match" inside "matches": no action.
        let entities = e.extract("butane et matches", "fr");
        assert!(entities.actions.is_empty());

        let entities = e.extract("Un but magnifique", "fr");
        assert!(entities.actions.contains("but"));
    }

    #[test]
    fn multi_word_and_accented_keywords() {
        let e = extractor();
        let entities = e.extract("Son premier match après sa blessure", "fr");
        assert!(entities.actions.contains("premier match"));
        assert!(entities.actions.contains("match"));
        assert!(entities.actions.contains("blessure"));

        let entities = e.extract("DÉFAITE à domicile", "fr");
        assert!(entities.actions.contains("défaite"));
    }

    #[test]
    fn unknown_language_uses_french_keywords() {
        let e = extractor();
        assert_eq!(e.resolve_language("es"), "fr");
        assert_eq!(e.resolve_language("en"), "en");

        let entities = e.extract("victoire du wydad", "es");
        assert!(entities.actions.contains("victoire"));

        let entities = e.extract("a great victory", "es");
        assert!(entities.actions.is_empty());
    }

    #[test]
    fn empty_text_has_no_entities() {
        let e = extractor();
        assert!(e.extract("", "fr").is_empty());
    }

    #[test]
    fn custom_lexicon() {
        let lexicon = Lexicon::from_json(
            r#"{"players": ["Messi"], "clubs": ["Inter Miami"], "actions": {"fr": ["But"]}}"#,
        )
        .unwrap();
        let e = EntityExtractor::new(&lexicon).unwrap();
        let entities = e.extract("But de Messi pour Inter Miami", "en");

        assert!(entities.players.contains("messi"));
        assert!(entities.clubs.contains("inter miami"));
        assert!(entities.actions.contains("but"));
    }
}
