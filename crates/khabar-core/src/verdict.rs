use std::fmt;

use serde::{Deserialize, Serialize};

/// Final scores above this are graded as likely true.
pub const LIKELY_TRUE_ABOVE: f32 = 0.60;
/// Final scores at or above this (and not likely true) are uncertain.
pub const UNCERTAIN_FROM: f32 = 0.40;

/// User-facing grade of a claim, derived from its best final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// A close, entity-consistent article exists.
    LikelyTrue,
    /// Partial evidence only.
    Uncertain,
    /// Nothing in the corpus backs the claim.
    LikelyFalse,
}

impl Verdict {
    /// Grades a final hybrid score. The score is clamped to `[0, 1]` first.
    #[must_use]
    pub fn from_score(score: f32) -> Self {
        let score = if score.is_nan() { 0.0 } else { score.clamp(0.0, 1.0) };
        if score > LIKELY_TRUE_ABOVE {
            Self::LikelyTrue
        } else if score >= UNCERTAIN_FROM {
            Self::Uncertain
        } else {
            Self::LikelyFalse
        }
    }

    /// Stable identifier for machine-readable output.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::LikelyTrue => "likely_true",
            Self::Uncertain => "uncertain",
            Self::LikelyFalse => "likely_false",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LikelyTrue => write!(f, "Information probablement vraie"),
            Self::Uncertain => write!(f, "Information incertaine"),
            Self::LikelyFalse => write!(f, "Information probablement fausse"),
        }
    }
}
