//! # Lexicon
//!
//! Gazetteers, per-language action keywords, and the stopword list used by
//! entity extraction and keyword scoring. The lists are configuration data:
//! [`Lexicon::default`] carries the production lists, and a JSON document
//! can replace them at startup.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{KhabarError, Result};

const PLAYERS: &[&str] = &[
    "hakim ziyech",
    "ziyech",
    "aziz ki",
    "noureddine amrabat",
    "mouad aounzo",
    "lorch",
    "hamza hannouri",
    "ferreira",
    "mohamed moufid",
    "ayoub boucheta",
    "amine aboulfath",
    "mehdi benabid",
    "joseph bakassu",
    "abdelghafour lamirate",
    "walid sebbar",
    "oussama zemraoui",
    "mohamed amine benhachem",
    "bouchouari",
    "bart",
    "rhulani mokwena",
    "nassim chadli",
    "walid nassi",
    "tumisang",
    "youssef motie",
];

const CLUBS: &[&str] = &[
    "wydad",
    "wydad casablanca",
    "wac",
    "raja",
    "raja casablanca",
    "fath",
    "fath rabat",
    "difaa",
    "difaa el jadida",
    "rca",
    "olympique",
    "as far",
    "far rabat",
    "moghreb tetouan",
    "irt",
    "rsb",
];

const ACTIONS_FR: &[&str] = &[
    "signé",
    "signer",
    "rejoint",
    "arrivé",
    "transfert",
    "recruté",
    "début",
    "première",
    "premier match",
    "buteur",
    "but",
    "buts",
    "victoire",
    "gagné",
    "gagner",
    "défaite",
    "perdu",
    "perdre",
    "blessé",
    "blessure",
    "suspendu",
    "carton",
    "rouge",
    "jaune",
    "derby",
    "classique",
    "match",
    "rencontre",
];

const ACTIONS_EN: &[&str] = &[
    "signed",
    "sign",
    "joined",
    "transfer",
    "transfered",
    "debut",
    "first",
    "first match",
    "scorer",
    "goal",
    "goals",
    "victory",
    "won",
    "win",
    "defeat",
    "lost",
    "lose",
    "injured",
    "injury",
    "suspended",
    "card",
    "red",
    "yellow",
    "derby",
    "match",
    "game",
];

const STOPWORDS: &[&str] = &[
    "le", "la", "les", "de", "du", "des", "et", "ou", "a", "à", "un", "une", "pour", "avec",
    "dans", "sur", "the", "an", "and", "or", "for", "with", "in", "on", "at", "to", "of",
];

fn default_fallback_language() -> String {
    "fr".to_string()
}

fn default_stopwords() -> Vec<String> {
    STOPWORDS.iter().map(|w| (*w).to_string()).collect()
}

/// Entity gazetteers, action keyword tables and stopwords.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lexicon {
    /// Player surface forms, matched as substrings.
    pub players: Vec<String>,
    /// Club surface forms, matched as substrings.
    pub clubs: Vec<String>,
    /// Action keywords keyed by language tag, matched on word boundaries.
    pub actions: BTreeMap<String, Vec<String>>,
    /// Bilingual stopwords ignored by keyword scoring. Omitted in JSON means
    /// the built-in list; an explicit empty list disables filtering.
    #[serde(default = "default_stopwords")]
    pub stopwords: Vec<String>,
    /// Action table used for languages without their own entry.
    #[serde(default = "default_fallback_language")]
    pub fallback_language: String,
}

impl Default for Lexicon {
    fn default() -> Self {
        let owned = |words: &[&str]| words.iter().map(|w| (*w).to_string()).collect::<Vec<_>>();

        let mut actions = BTreeMap::new();
        actions.insert("fr".to_string(), owned(ACTIONS_FR));
        actions.insert("en".to_string(), owned(ACTIONS_EN));

        Self {
            players: owned(PLAYERS),
            clubs: owned(CLUBS),
            actions,
            stopwords: default_stopwords(),
            fallback_language: default_fallback_language(),
        }
    }
}

impl Lexicon {
    /// Parses a lexicon from a JSON document and normalizes it.
    ///
    /// # Errors
    ///
    /// Returns `KhabarError::Json` for malformed JSON and
    /// `KhabarError::Lexicon` if the fallback language has no action table.
    pub fn from_json(json: &str) -> Result<Self> {
        let lexicon: Self = serde_json::from_str(json)?;
        lexicon.normalized()
    }

    /// Reads and parses a lexicon JSON file.
    ///
    /// # Errors
    ///
    /// Returns `KhabarError::Io` if the file cannot be read, otherwise as
    /// [`from_json`](Self::from_json).
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Lower-cases, trims and de-duplicates every list, preserving first
    /// occurrence order.
    ///
    /// # Errors
    ///
    /// Returns `KhabarError::Lexicon` if the fallback language has no action table.
    pub fn normalized(mut self) -> Result<Self> {
        self.players = normalize_words(self.players);
        self.clubs = normalize_words(self.clubs);
        self.stopwords = normalize_words(self.stopwords);
        self.fallback_language = self.fallback_language.trim().to_lowercase();
        self.actions = self
            .actions
            .into_iter()
            .map(|(language, words)| (language.trim().to_lowercase(), normalize_words(words)))
            .collect();

        if !self.actions.contains_key(&self.fallback_language) {
            return Err(KhabarError::Lexicon(format!(
                "fallback language {:?} has no action keywords",
                self.fallback_language
            )));
        }
        for (language, words) in &self.actions {
            if words.is_empty() {
                warn!(language = %language, "action keyword table is empty");
            }
        }

        Ok(self)
    }

    /// Returns the action keywords for `language`, or the fallback table.
    #[must_use]
    pub fn actions_for(&self, language: &str) -> &[String] {
        self.actions
            .get(language)
            .or_else(|| self.actions.get(&self.fallback_language))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

fn normalize_words(words: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(words.len());
    for word in words {
        let word = word.trim().to_lowercase();
        if !word.is_empty() && !out.contains(&word) {
            out.push(word);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_normalized() {
        let lexicon = Lexicon::default();
        assert_eq!(lexicon.clone().normalized().unwrap(), lexicon);
        assert!(lexicon.players.iter().all(|p| *p == p.to_lowercase()));
    }

    #[test]
    fn unknown_language_falls_back_to_french() {
        let lexicon = Lexicon::default();
        assert_eq!(lexicon.actions_for("de"), lexicon.actions_for("fr"));
        assert!(lexicon.actions_for("en").contains(&"goal".to_string()));
    }

    #[test]
    fn from_json_normalizes_entries() {
        let json = r#"{
            "players": ["Hakim Ziyech", "ziyech", "  ZIYECH "],
            "clubs": ["Wydad"],
            "actions": {"FR": ["But", "but"], "en": ["Goal"]}
        }"#;
        let lexicon = Lexicon::from_json(json).unwrap();

        assert_eq!(lexicon.players, vec!["hakim ziyech", "ziyech"]);
        assert_eq!(lexicon.clubs, vec!["wydad"]);
        assert_eq!(lexicon.actions_for("fr"), &["but".to_string()]);
        assert_eq!(lexicon.fallback_language, "fr");
        assert_eq!(lexicon.stopwords, Lexicon::default().stopwords);
    }

    #[test]
    fn explicit_stopwords_replace_the_builtin_list() {
        let json = r#"{
            "players": [], "clubs": [],
            "actions": {"fr": ["but"]},
            "stopwords": ["Match"]
        }"#;
        assert_eq!(Lexicon::from_json(json).unwrap().stopwords, vec!["match"]);

        let json = r#"{"players": [], "clubs": [], "actions": {"fr": []}, "stopwords": []}"#;
        assert!(Lexicon::from_json(json).unwrap().stopwords.is_empty());
    }

    #[test]
    fn missing_fallback_table_is_rejected() {
        let json = r#"{
            "players": [], "clubs": [],
            "actions": {"en": ["goal"]},
            "fallback_language": "fr"
        }"#;
        assert!(matches!(
            Lexicon::from_json(json),
            Err(KhabarError::Lexicon(_))
        ));
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(matches!(Lexicon::from_json("{"), Err(KhabarError::Json(_))));
    }
}
