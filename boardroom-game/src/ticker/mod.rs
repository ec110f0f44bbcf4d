//! Scalar-price variant: five decisions that move a synthetic share price.
use serde::{Deserialize, Serialize};

use crate::data::{CatalogError, ChoiceId, ChoicePair};

pub mod stock;
pub mod verdict;

pub use stock::{StockState, compute_stock_state, stock_impact};
pub use verdict::{MarketSentiment, MarketVerdict, Verdict, classify_price, is_winning_price};

const DEFAULT_TICKER_DATA: &str = include_str!("../../assets/data/ticker.json");
const CATALOG_NAME: &str = "ticker";

/// Direction hint the ticker tape shows for an option's market reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TickerKind {
    Gain,
    Loss,
    Volatile,
}

/// Market reaction attached to one option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerResult {
    pub kind: TickerKind,
    pub label: String,
    /// Signed percent change, e.g. `7.0` for +7 %.
    pub percent: f64,
    #[serde(default)]
    pub analyst_note: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerChoice {
    pub label: String,
    pub title: String,
    #[serde(default)]
    pub strategic_tags: String,
    #[serde(default)]
    pub insight_recap: String,
    #[serde(default)]
    pub market_reacts: String,
    pub ticker: TickerResult,
    #[serde(default)]
    pub description_variants: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerLevel {
    pub id: u8,
    pub title: String,
    pub month: String,
    pub month_number: u8,
    pub scenario: String,
    pub choices: ChoicePair<TickerChoice>,
}

impl TickerLevel {
    /// Percent delta carried by the given option.
    #[must_use]
    pub fn percent(&self, choice: ChoiceId) -> f64 {
        self.choices.get(choice).ticker.percent
    }
}

/// Ordered list of ticker decisions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TickerCatalog {
    pub levels: Vec<TickerLevel>,
}

impl TickerCatalog {
    /// Parse and validate a ticker catalog.
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

    /// Load the ticker catalog bundled with the crate.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled asset fails to parse or validate.
    pub fn load_from_static() -> Result<Self, CatalogError> {
        Self::from_json(DEFAULT_TICKER_DATA)
    }

    /// Check that levels are numbered `1..=N` and every percent can be compounded.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.levels.is_empty() {
            return Err(CatalogError::Empty {
                catalog: CATALOG_NAME,
            });
        }
        for (position, level) in self.levels.iter().enumerate() {
            let expected = u8::try_from(position + 1).unwrap_or(u8::MAX);
            if level.id != expected {
                return Err(CatalogError::LevelOutOfOrder {
                    catalog: CATALOG_NAME,
                    position,
                    expected,
                    found: level.id,
                });
            }
            for (choice, option) in level.choices.iter() {
                let percent = option.ticker.percent;
                // A move of -100 % or worse would zero or flip the price.
                if !percent.is_finite() || percent <= -100.0 {
                    return Err(CatalogError::InvalidPercent {
                        catalog: CATALOG_NAME,
                        level: level.id,
                        choice,
                        percent,
                    });
                }
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn levels(&self) -> &[TickerLevel] {
        &self.levels
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}
