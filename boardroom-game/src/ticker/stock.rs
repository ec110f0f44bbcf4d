//! Multiplicative price walk.
//!
//! Prices compound at full precision. Only the headline fields of
//! [`StockState`] are rounded to cents, so replaying any prefix of a history
//! always lands on the same numbers as the forward walk did.
use serde::{Deserialize, Serialize};

use super::TickerLevel;
use crate::constants::{BASELINE_PRICE, LOG_TARGET_REPLAY};
use crate::data::{ChoiceId, ReplayError, check_replay_len};
use crate::numbers::round_cents;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockState {
    /// Current price rounded to cents.
    pub price: f64,
    /// Baseline followed by the unrounded price after each choice.
    pub history: Vec<f64>,
    /// `price - 100`, rounded to cents.
    pub change: f64,
    /// Change relative to the baseline in percent, rounded to cents.
    pub change_percent: f64,
}

impl Default for StockState {
    fn default() -> Self {
        Self::baseline()
    }
}

impl StockState {
    #[must_use]
    pub fn baseline() -> Self {
        Self::from_history(vec![BASELINE_PRICE])
    }

    fn from_history(history: Vec<f64>) -> Self {
        let raw = history.last().copied().unwrap_or(BASELINE_PRICE);
        let change = raw - BASELINE_PRICE;
        Self {
            price: round_cents(raw),
            change: round_cents(change),
            change_percent: round_cents(change / BASELINE_PRICE * 100.0),
            history,
        }
    }

    /// Unrounded price after the last recorded choice.
    #[must_use]
    pub fn raw_price(&self) -> f64 {
        self.history.last().copied().unwrap_or(BASELINE_PRICE)
    }

    /// Number of choices folded into this state.
    #[must_use]
    pub fn steps(&self) -> usize {
        self.history.len().saturating_sub(1)
    }

    /// Price delta produced by the `step`-th choice (1-based), rounded to cents.
    #[must_use]
    pub fn step_change(&self, step: usize) -> Option<f64> {
        if step == 0 {
            return None;
        }
        let before = self.history.get(step - 1)?;
        let after = self.history.get(step)?;
        Some(round_cents(after - before))
    }
}

/// Fold `choices` over `levels`, starting from the baseline price.
///
/// # Errors
///
/// Returns [`ReplayError::UnknownLevel`] when there are more choices than levels.
pub fn compute_stock_state(
    levels: &[TickerLevel],
    choices: &[ChoiceId],
) -> Result<StockState, ReplayError> {
    check_replay_len(choices.len(), levels.len())?;
    let mut history = Vec::with_capacity(choices.len() + 1);
    history.push(BASELINE_PRICE);
    let mut price = BASELINE_PRICE;
    for (level, choice) in levels.iter().zip(choices) {
        price *= 1.0 + level.percent(*choice) / 100.0;
        log::trace!(
            target: LOG_TARGET_REPLAY,
            "ticker level {} choice {choice} -> {price:.4}",
            level.id
        );
        history.push(price);
    }
    Ok(StockState::from_history(history))
}

/// Rounded price that taking `choice` at `level` would produce from `current_price`.
#[must_use]
pub fn stock_impact(level: &TickerLevel, choice: ChoiceId, current_price: f64) -> f64 {
    round_cents(current_price * (1.0 + level.percent(choice) / 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ticker::fixtures::{GAINS, LOSSES, catalog};
    use ChoiceId::{A, B};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn empty_history_is_baseline() {
        let levels = catalog(&GAINS, &LOSSES).levels;
        let state = compute_stock_state(&levels, &[]).unwrap();
        assert_eq!(state, StockState::baseline());
        assert!(close(state.price, 100.0));
        assert!(close(state.change, 0.0));
        assert_eq!(state.steps(), 0);
        assert_eq!(state.step_change(1), None);
    }

    #[test]
    fn all_gains_compound_multiplicatively() {
        let levels = catalog(&GAINS, &LOSSES).levels;
        let state = compute_stock_state(&levels, &[A; 5]).unwrap();
        assert!(close(state.price, 129.20));
        assert!(close(state.change, 29.20));
        assert!(close(state.change_percent, 29.20));
        assert_eq!(state.history.len(), 6);
        assert!(close(state.history[1], 101.5));
        assert!(close(state.step_change(1).unwrap(), 1.5));
    }

    #[test]
    fn mixed_losses_track_unrounded_history() {
        let levels = catalog(&GAINS, &LOSSES).levels;
        let state = compute_stock_state(&levels, &[B; 5]).unwrap();
        assert!(close(state.price, 84.81));
        assert!(close(state.change, -15.19));
        assert!((state.history[3] - 92.664).abs() < 1e-6);
        assert!(close(state.raw_price(), state.history[5]));
    }

    #[test]
    fn too_many_choices_fail_fast() {
        let levels = catalog(&GAINS[..2], &LOSSES[..2]).levels;
        assert_eq!(
            compute_stock_state(&levels, &[A, B, A]),
            Err(ReplayError::UnknownLevel {
                index: 2,
                available: 2
            })
        );
    }

    #[test]
    fn impact_previews_without_committing() {
        let levels = catalog(&GAINS, &LOSSES).levels;
        assert!(close(stock_impact(&levels[3], B, 100.0), 88.0));
        assert!(close(stock_impact(&levels[0], A, 200.0), 203.0));
    }
}
