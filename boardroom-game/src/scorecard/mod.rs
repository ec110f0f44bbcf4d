//! Score-vector variant: six decisions per industry/crisis storyline, each
//! adding a four-component delta to the executive's scorecard.
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::ops::{Add, AddAssign};

use crate::constants::LEVELS_PER_SCENARIO;
use crate::data::{CatalogError, ChoiceId, ChoicePair};
use crate::scenario::{Crisis, Industry, ScenarioKey};

pub mod archetype;
pub mod meter;
pub mod scores;

pub use archetype::{
    Archetype, EvTier, ScorecardOutcome, classify_tier, enterprise_value, format_ev,
    is_winning_outcome, select_archetype,
};
pub use meter::{
    ScoreStatus, is_score_passing, meter_fill_pct, score_range, score_status, score_target,
    target_marker_pct,
};
pub use scores::calculate_scores;

const DEFAULT_SCORECARD_DATA: &str = include_str!("../../assets/data/scorecard.json");
const CATALOG_NAME: &str = "scorecard";

/// The four tracked dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ScoreKey {
    #[serde(rename = "MV")]
    Mv,
    #[serde(rename = "TR")]
    Tr,
    #[serde(rename = "OR")]
    Or,
    #[serde(rename = "TL")]
    Tl,
}

impl ScoreKey {
    pub const ALL: [Self; 4] = [Self::Mv, Self::Tr, Self::Or, Self::Tl];

    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Mv => "MV",
            Self::Tr => "TR",
            Self::Or => "OR",
            Self::Tl => "TL",
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Mv => "Market Value",
            Self::Tr => "Trust & Reputation",
            Self::Or => "Operational Risk",
            Self::Tl => "Talent & Learning",
        }
    }
}

impl fmt::Display for ScoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Running scorecard. Components are unbounded integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Scores {
    #[serde(rename = "MV")]
    pub mv: i32,
    #[serde(rename = "TR")]
    pub tr: i32,
    #[serde(rename = "OR")]
    pub or: i32,
    #[serde(rename = "TL")]
    pub tl: i32,
}

/// Per-option effect; same shape as the scorecard it is added to.
pub type ScoreDelta = Scores;

impl Scores {
    #[must_use]
    pub const fn new(mv: i32, tr: i32, or: i32, tl: i32) -> Self {
        Self { mv, tr, or, tl }
    }

    #[must_use]
    pub const fn get(&self, key: ScoreKey) -> i32 {
        match key {
            ScoreKey::Mv => self.mv,
            ScoreKey::Tr => self.tr,
            ScoreKey::Or => self.or,
            ScoreKey::Tl => self.tl,
        }
    }
}

impl Add for Scores {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            mv: self.mv.saturating_add(rhs.mv),
            tr: self.tr.saturating_add(rhs.tr),
            or: self.or.saturating_add(rhs.or),
            tl: self.tl.saturating_add(rhs.tl),
        }
    }
}

impl AddAssign for Scores {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

/// Two-stage consequence copy shown after a choice.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Insight {
    pub first: String,
    pub second: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScorecardLevel {
    pub id: u8,
    pub title: String,
    pub month: String,
    pub scenario: String,
    pub choices: ChoicePair<String>,
    pub scoring: ChoicePair<ScoreDelta>,
    pub insights: ChoicePair<Insight>,
    /// Optional alternative wordings for each option, cosmetic only.
    #[serde(default)]
    pub variants: ChoicePair<Vec<String>>,
}

impl ScorecardLevel {
    #[must_use]
    pub fn delta(&self, choice: ChoiceId) -> ScoreDelta {
        *self.scoring.get(choice)
    }
}

/// One storyline: the six levels for an industry/crisis pairing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioLevels {
    pub industry: Industry,
    pub crisis: Crisis,
    pub levels: Vec<ScorecardLevel>,
}

impl ScenarioLevels {
    #[must_use]
    pub const fn key(&self) -> ScenarioKey {
        ScenarioKey::new(self.industry, self.crisis)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScorecardCatalog {
    pub scenarios: Vec<ScenarioLevels>,
}

impl ScorecardCatalog {
    /// Parse and validate a scorecard catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or breaks a catalog invariant.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Self = serde_json::from_str(json).map_err(|source| CatalogError::Parse {
            catalog: CATALOG_NAME,
            source,
        })?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load the scorecard catalog bundled with the crate.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled asset fails to parse or validate.
    pub fn load_from_static() -> Result<Self, CatalogError> {
        Self::from_json(DEFAULT_SCORECARD_DATA)
    }

    /// Every industry/crisis pairing must appear exactly once with six
    /// levels numbered `1..=6`.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.scenarios.is_empty() {
            return Err(CatalogError::Empty {
                catalog: CATALOG_NAME,
            });
        }
        let mut seen = HashSet::new();
        for scenario in &self.scenarios {
            let key = scenario.key();
            if !seen.insert(key) {
                return Err(CatalogError::DuplicateScenario {
                    key: key.to_string(),
                });
            }
            if scenario.levels.len() != LEVELS_PER_SCENARIO {
                return Err(CatalogError::LevelCount {
                    key: key.to_string(),
                    expected: LEVELS_PER_SCENARIO,
                    found: scenario.levels.len(),
                });
            }
            for (position, level) in scenario.levels.iter().enumerate() {
                let expected = u8::try_from(position + 1).unwrap_or(u8::MAX);
                if level.id != expected {
                    return Err(CatalogError::LevelOutOfOrder {
                        catalog: CATALOG_NAME,
                        position,
                        expected,
                        found: level.id,
                    });
                }
            }
        }
        if let Some(missing) = ScenarioKey::all().find(|key| !seen.contains(key)) {
            return Err(CatalogError::MissingScenario {
                key: missing.to_string(),
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn levels_for(&self, key: ScenarioKey) -> Option<&[ScorecardLevel]> {
        self.scenarios
            .iter()
            .find(|scenario| scenario.key() == key)
            .map(|scenario| scenario.levels.as_slice())
    }

    pub fn keys(&self) -> impl Iterator<Item = ScenarioKey> + '_ {
        self.scenarios.iter().map(ScenarioLevels::key)
    }
}
