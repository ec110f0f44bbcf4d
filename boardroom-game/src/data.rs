//! Shared choice model used by both catalog variants.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Identifier of one of the two options offered at every decision point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ChoiceId {
    A,
    B,
}

impl ChoiceId {
    pub const ALL: [Self; 2] = [Self::A, Self::B];

    /// The option not taken.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
        }
    }

    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
        }
    }

    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'A' | 'a' => Some(Self::A),
            'B' | 'b' => Some(Self::B),
            _ => None,
        }
    }
}

impl fmt::Display for ChoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for ChoiceId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next().and_then(Self::from_char), chars.next()) {
            (Some(id), None) => Ok(id),
            _ => Err(format!("unknown choice '{s}' (expected A or B)")),
        }
    }
}

/// Exactly two values, one per option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ChoicePair<T> {
    #[serde(rename = "A")]
    pub a: T,
    #[serde(rename = "B")]
    pub b: T,
}

impl<T> ChoicePair<T> {
    pub const fn new(a: T, b: T) -> Self {
        Self { a, b }
    }

    #[must_use]
    pub const fn get(&self, id: ChoiceId) -> &T {
        match id {
            ChoiceId::A => &self.a,
            ChoiceId::B => &self.b,
        }
    }

    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> ChoicePair<U> {
        ChoicePair {
            a: f(&self.a),
            b: f(&self.b),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ChoiceId, &T)> {
        [(ChoiceId::A, &self.a), (ChoiceId::B, &self.b)].into_iter()
    }
}

/// Errors raised when content assets violate catalog invariants.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to parse {catalog} catalog: {source}")]
    Parse {
        catalog: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("{catalog} catalog has no levels")]
    Empty { catalog: &'static str },
    #[error("{catalog} level at position {position} has id {found} (expected {expected})")]
    LevelOutOfOrder {
        catalog: &'static str,
        position: usize,
        expected: u8,
        found: u8,
    },
    #[error("{catalog} level {level} option {choice} has invalid percent {percent}")]
    InvalidPercent {
        catalog: &'static str,
        level: u8,
        choice: ChoiceId,
        percent: f64,
    },
    #[error("outcome {key} has no label or colour")]
    BlankOutcome { key: &'static str },
    #[error("scenario {key} appears more than once")]
    DuplicateScenario { key: String },
    #[error("scenario {key} is missing from the catalog")]
    MissingScenario { key: String },
    #[error("scenario {key} has {found} levels (expected {expected})")]
    LevelCount {
        key: String,
        expected: usize,
        found: usize,
    },
}

/// Raised when a choice history cannot be replayed against a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReplayError {
    #[error("choice #{index} references a level beyond the {available} in the catalog")]
    UnknownLevel { index: usize, available: usize },
}

/// Fail fast when `choices` is longer than the level list it is replayed over.
///
/// # Errors
///
/// Returns [`ReplayError::UnknownLevel`] naming the first choice without a level.
pub fn check_replay_len(choices: usize, levels: usize) -> Result<(), ReplayError> {
    if choices > levels {
        return Err(ReplayError::UnknownLevel {
            index: levels,
            available: levels,
        });
    }
    Ok(())
}
