//! Transient gain/loss feedback derived from a single step.
use serde::{Deserialize, Serialize};

use crate::data::ChoiceId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flash {
    Gain,
    Loss,
    Volatile,
}

impl Flash {
    /// Sign of the step: positive gains, negative losses, flat (or NaN) is volatile.
    #[must_use]
    pub fn from_change(change: f64) -> Self {
        if change > 0.0 {
            Self::Gain
        } else if change < 0.0 {
            Self::Loss
        } else {
            Self::Volatile
        }
    }
}

/// Movement of the headline scalar caused by one choice.
///
/// For the ticker the headline is the rounded price; for the scorecard it is
/// the enterprise value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepDelta {
    pub level_id: u8,
    pub choice: ChoiceId,
    pub before: f64,
    pub after: f64,
    pub change: f64,
    pub flash: Flash,
}

impl StepDelta {
    /// `change` is the unrounded movement; it is rounded to cents before the
    /// flash is derived from it.
    #[must_use]
    pub fn new(level_id: u8, choice: ChoiceId, before: f64, after: f64, change: f64) -> Self {
        let change = crate::numbers::round_cents(change);
        Self {
            level_id,
            choice,
            before,
            after,
            change,
            flash: Flash::from_change(change),
        }
    }
}
