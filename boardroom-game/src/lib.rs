//! Boardroom Game Engine
//!
//! Platform-agnostic core for the AI strategy boardroom decision game.
//! Two variants share one shape: a fixed sequence of binary decisions is
//! folded into a state, and the terminal state is classified into a labelled
//! outcome. This crate provides the catalogs, the pure accumulators and
//! classifiers, and the session controller without any UI dependencies.

pub mod constants;
pub mod data;
pub mod history;
pub mod numbers;
pub mod outcomes;
pub mod reveal;
pub mod scenario;
pub mod scorecard;
pub mod seed;
pub mod session;
pub mod signal;
pub mod ticker;
pub mod variants;

use std::sync::Arc;

// Re-export commonly used types
pub use data::{CatalogError, ChoiceId, ChoicePair, ReplayError};
pub use history::{ChoicePath, ChoiceRecord, parse_path, path_digest, path_label};
pub use outcomes::{OutcomeCatalog, OutcomeMeta};
pub use reveal::{RevealStage, RevealTiming};
pub use scenario::{Crisis, Industry, ScenarioKey};
pub use scorecard::{
    Archetype, EvTier, Insight, ScoreDelta, ScoreKey, ScoreStatus, ScorecardCatalog,
    ScorecardLevel, ScorecardOutcome, Scores, calculate_scores, classify_tier, enterprise_value,
    format_ev, is_score_passing, is_winning_outcome, meter_fill_pct, score_range, score_status,
    score_target, select_archetype, target_marker_pct,
};
pub use seed::{
    GameVariant, decode_to_seed, encode_friendly, generate_code_from_entropy, parse_share_code,
};
pub use session::{
    Phase, Ruleset, ScorecardRules, Session, SessionError, SingleTrack, Step, TickerRules,
};
pub use signal::{Flash, StepDelta};
pub use ticker::{
    MarketSentiment, MarketVerdict, StockState, TickerCatalog, TickerLevel, Verdict,
    classify_price, compute_stock_state, is_winning_price, stock_impact,
};
pub use variants::{DisplayPlan, describe, plan_for_level};

/// Trait for abstracting where content catalogs come from
/// Hosts and tests provide their own implementation
pub trait CatalogLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the five-level ticker catalog
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded or fails validation.
    fn load_ticker(&self) -> Result<TickerCatalog, Self::Error>;

    /// Load the industry/crisis scorecard catalog
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded or fails validation.
    fn load_scorecard(&self) -> Result<ScorecardCatalog, Self::Error>;

    /// Load outcome display metadata
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded or fails validation.
    fn load_outcomes(&self) -> Result<OutcomeCatalog, Self::Error>;
}

/// Loader serving the JSON assets compiled into the crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticCatalogLoader;

impl CatalogLoader for StaticCatalogLoader {
    type Error = CatalogError;

    fn load_ticker(&self) -> Result<TickerCatalog, Self::Error> {
        TickerCatalog::load_from_static()
    }

    fn load_scorecard(&self) -> Result<ScorecardCatalog, Self::Error> {
        ScorecardCatalog::load_from_static()
    }

    fn load_outcomes(&self) -> Result<OutcomeCatalog, Self::Error> {
        OutcomeCatalog::load_from_static()
    }
}

/// Main engine for creating game sessions
pub struct GameEngine<L>
where
    L: CatalogLoader,
{
    loader: L,
}

impl<L> GameEngine<L>
where
    L: CatalogLoader,
{
    /// Create a new engine with the provided catalog loader
    pub const fn new(loader: L) -> Self {
        Self { loader }
    }

    /// Build the ticker ruleset from freshly loaded catalogs.
    ///
    /// # Errors
    ///
    /// Returns an error if a catalog cannot be loaded.
    pub fn ticker_rules(&self) -> Result<TickerRules, L::Error> {
        let catalog = self.loader.load_ticker()?;
        let outcomes = self.loader.load_outcomes()?;
        Ok(TickerRules::new(Arc::new(catalog), Arc::new(outcomes)))
    }

    /// Build the scorecard ruleset from freshly loaded catalogs.
    ///
    /// # Errors
    ///
    /// Returns an error if a catalog cannot be loaded.
    pub fn scorecard_rules(&self) -> Result<ScorecardRules, L::Error> {
        let catalog = self.loader.load_scorecard()?;
        let outcomes = self.loader.load_outcomes()?;
        Ok(ScorecardRules::new(Arc::new(catalog), Arc::new(outcomes)))
    }

    /// Start a ticker session; `seed` drives cosmetic variation only.
    ///
    /// # Errors
    ///
    /// Returns an error if a catalog cannot be loaded.
    pub fn ticker_session(&self, seed: u64) -> Result<Session<TickerRules>, L::Error> {
        self.ticker_rules().map(|rules| Session::new(rules, seed))
    }

    /// Start a scorecard session; `seed` drives cosmetic variation only.
    ///
    /// # Errors
    ///
    /// Returns an error if a catalog cannot be loaded.
    pub fn scorecard_session(&self, seed: u64) -> Result<Session<ScorecardRules>, L::Error> {
        self.scorecard_rules().map(|rules| Session::new(rules, seed))
    }
}
