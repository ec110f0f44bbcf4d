use std::fmt;
use std::sync::Arc;

use super::SessionError;
use crate::data::{ChoiceId, ChoicePair, ReplayError};
use crate::outcomes::OutcomeCatalog;
use crate::scenario::ScenarioKey;
use crate::scorecard::{
    ScorecardCatalog, ScorecardLevel, ScorecardOutcome, Scores, calculate_scores,
    enterprise_value,
};
use crate::seed::GameVariant;
use crate::ticker::{MarketVerdict, StockState, TickerCatalog, TickerLevel, compute_stock_state};

/// Variant-specific math plugged into a [`super::Session`].
///
/// Implementations must keep `compute_state` a pure function of its inputs;
/// the session relies on it for every commit and every undo.
pub trait Ruleset {
    /// Picks which level sequence a run plays.
    type Selector: Copy + fmt::Debug + fmt::Display + PartialEq;
    type Level;
    type State: Clone + fmt::Debug + PartialEq;
    type Outcome: Clone + fmt::Debug + PartialEq;

    const VARIANT: GameVariant;
    const SUPPORTS_UNDO: bool;

    /// Level sequence for `selector`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::UnknownScenario`] when the catalog has no such storyline.
    fn levels(&self, selector: Self::Selector) -> Result<&[Self::Level], SessionError>;

    fn initial_state(&self) -> Self::State;

    /// Fold `choices` over `levels` from the initial state.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError`] when a choice has no matching level.
    fn compute_state(
        &self,
        levels: &[Self::Level],
        choices: &[ChoiceId],
    ) -> Result<Self::State, ReplayError>;

    /// Scalar that drives the step flash and the greedy tester policy.
    fn headline(&self, state: &Self::State) -> f64;

    /// Unrounded movement of the headline between two states.
    fn step_change(&self, before: &Self::State, after: &Self::State) -> f64 {
        self.headline(after) - self.headline(before)
    }

    fn classify(&self, state: &Self::State) -> Self::Outcome;

    /// Stable key naming the outcome band, e.g. `strong_buy` or `architect`.
    fn outcome_key(outcome: &Self::Outcome) -> &'static str;

    fn is_winning(outcome: &Self::Outcome) -> bool;

    fn level_id(level: &Self::Level) -> u8;

    /// Size of each option's description pool.
    fn variant_counts(level: &Self::Level) -> ChoicePair<usize>;
}

/// Placeholder selector: the ticker game has a single storyline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SingleTrack;

impl fmt::Display for SingleTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("market")
    }
}

#[derive(Debug, Clone)]
pub struct TickerRules {
    catalog: Arc<TickerCatalog>,
    outcomes: Arc<OutcomeCatalog>,
}

impl TickerRules {
    #[must_use]
    pub const fn new(catalog: Arc<TickerCatalog>, outcomes: Arc<OutcomeCatalog>) -> Self {
        Self { catalog, outcomes }
    }

    #[must_use]
    pub fn catalog(&self) -> &TickerCatalog {
        &self.catalog
    }
}

impl Ruleset for TickerRules {
    type Selector = SingleTrack;
    type Level = TickerLevel;
    type State = StockState;
    type Outcome = MarketVerdict;

    const VARIANT: GameVariant = GameVariant::Ticker;
    const SUPPORTS_UNDO: bool = false;

    fn levels(&self, _selector: SingleTrack) -> Result<&[TickerLevel], SessionError> {
        Ok(self.catalog.levels())
    }

    fn initial_state(&self) -> StockState {
        StockState::baseline()
    }

    fn compute_state(
        &self,
        levels: &[TickerLevel],
        choices: &[ChoiceId],
    ) -> Result<StockState, ReplayError> {
        compute_stock_state(levels, choices)
    }

    fn headline(&self, state: &StockState) -> f64 {
        state.price
    }

    fn step_change(&self, before: &StockState, after: &StockState) -> f64 {
        after.raw_price() - before.raw_price()
    }

    fn classify(&self, state: &StockState) -> MarketVerdict {
        MarketVerdict::from_price(state.price, &self.outcomes)
    }

    fn outcome_key(outcome: &MarketVerdict) -> &'static str {
        outcome.verdict.key()
    }

    fn is_winning(outcome: &MarketVerdict) -> bool {
        outcome.winning
    }

    fn level_id(level: &TickerLevel) -> u8 {
        level.id
    }

    fn variant_counts(level: &TickerLevel) -> ChoicePair<usize> {
        level.choices.map(|choice| choice.description_variants.len())
    }
}

#[derive(Debug, Clone)]
pub struct ScorecardRules {
    catalog: Arc<ScorecardCatalog>,
    outcomes: Arc<OutcomeCatalog>,
}

impl ScorecardRules {
    #[must_use]
    pub const fn new(catalog: Arc<ScorecardCatalog>, outcomes: Arc<OutcomeCatalog>) -> Self {
        Self { catalog, outcomes }
    }

    #[must_use]
    pub fn catalog(&self) -> &ScorecardCatalog {
        &self.catalog
    }
}

impl Ruleset for ScorecardRules {
    type Selector = ScenarioKey;
    type Level = ScorecardLevel;
    type State = Scores;
    type Outcome = ScorecardOutcome;

    const VARIANT: GameVariant = GameVariant::Scorecard;
    const SUPPORTS_UNDO: bool = true;

    fn levels(&self, selector: ScenarioKey) -> Result<&[ScorecardLevel], SessionError> {
        self.catalog
            .levels_for(selector)
            .ok_or_else(|| SessionError::UnknownScenario {
                key: selector.to_string(),
            })
    }

    fn initial_state(&self) -> Scores {
        Scores::default()
    }

    fn compute_state(
        &self,
        levels: &[ScorecardLevel],
        choices: &[ChoiceId],
    ) -> Result<Scores, ReplayError> {
        calculate_scores(levels, choices)
    }

    fn headline(&self, state: &Scores) -> f64 {
        f64::from(enterprise_value(state))
    }

    fn classify(&self, state: &Scores) -> ScorecardOutcome {
        ScorecardOutcome::from_scores(*state, &self.outcomes)
    }

    fn outcome_key(outcome: &ScorecardOutcome) -> &'static str {
        outcome.archetype.key()
    }

    fn is_winning(outcome: &ScorecardOutcome) -> bool {
        outcome.winning
    }

    fn level_id(level: &ScorecardLevel) -> u8 {
        level.id
    }

    fn variant_counts(level: &ScorecardLevel) -> ChoicePair<usize> {
        level.variants.map(Vec::len)
    }
}
