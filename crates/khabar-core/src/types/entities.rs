use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Entity weight for player overlap.
pub const WEIGHT_PLAYERS: f32 = 0.5;
/// Entity weight for club overlap.
pub const WEIGHT_CLUBS: f32 = 0.3;
/// Entity weight for action overlap.
pub const WEIGHT_ACTIONS: f32 = 0.2;

/// The symbolic entity categories extracted from text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityCategory {
    /// Known player names (gazetteer, substring match).
    Players,
    /// Known club names (gazetteer, substring match).
    Clubs,
    /// Per-language action keywords (word-boundary match).
    Actions,
}

impl EntityCategory {
    /// All categories in scoring order.
    pub const ALL: [Self; 3] = [Self::Players, Self::Clubs, Self::Actions];

    /// Returns the category's weight in the entity score.
    #[must_use]
    pub fn weight(self) -> f32 {
        match self {
            Self::Players => WEIGHT_PLAYERS,
            Self::Clubs => WEIGHT_CLUBS,
            Self::Actions => WEIGHT_ACTIONS,
        }
    }
}

impl fmt::Display for EntityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Players => write!(f, "players"),
            Self::Clubs => write!(f, "clubs"),
            Self::Actions => write!(f, "actions"),
        }
    }
}

/// Entities found in one text, lower-cased canonical surface forms.
///
/// Sets are only ever compared category by category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySet {
    pub players: BTreeSet<String>,
    pub clubs: BTreeSet<String>,
    pub actions: BTreeSet<String>,
}

impl EntitySet {
    /// Returns the set for one category.
    #[must_use]
    pub fn get(&self, category: EntityCategory) -> &BTreeSet<String> {
        match category {
            EntityCategory::Players => &self.players,
            EntityCategory::Clubs => &self.clubs,
            EntityCategory::Actions => &self.actions,
        }
    }

    /// Returns a mutable reference to the set for one category.
    pub fn get_mut(&mut self, category: EntityCategory) -> &mut BTreeSet<String> {
        match category {
            EntityCategory::Players => &mut self.players,
            EntityCategory::Clubs => &mut self.clubs,
            EntityCategory::Actions => &mut self.actions,
        }
    }

    /// Returns `true` if no entity of any category was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty() && self.clubs.is_empty() && self.actions.is_empty()
    }

    /// Total number of entities across categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.players.len() + self.clubs.len() + self.actions.len()
    }

    /// Jaccard similarity `|a ∩ b| / |a ∪ b|` of one category, 0 when both are empty.
    #[must_use]
    pub fn jaccard(&self, other: &Self, category: EntityCategory) -> f32 {
        let a = self.get(category);
        let b = other.get(category);
        let union = a.union(b).count();
        if union == 0 {
            return 0.0;
        }
        a.intersection(b).count() as f32 / union as f32
    }
}

impl fmt::Display for EntitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntitySet(")?;
        for (i, category) in EntityCategory::ALL.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            let names: Vec<&str> = self.get(*category).iter().map(String::as_str).collect();
            write!(f, "{category}=[{}]", names.join(", "))?;
        }
        write!(f, ")")
    }
}
