//! Per-dimension targets and gauge geometry for the live scorecard.
use serde::{Deserialize, Serialize};

use super::ScoreKey;
use crate::constants::{
    RANGE_MV, RANGE_OR, RANGE_TL, RANGE_TR, TARGET_MV, TARGET_OR, TARGET_TL, TARGET_TOLERANCE,
    TARGET_TR,
};
use crate::numbers::percent_of_range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreStatus {
    Met,
    Target,
    Missed,
}

#[must_use]
pub const fn score_target(key: ScoreKey) -> i32 {
    match key {
        ScoreKey::Mv => TARGET_MV,
        ScoreKey::Tr => TARGET_TR,
        ScoreKey::Or => TARGET_OR,
        ScoreKey::Tl => TARGET_TL,
    }
}

/// Visual `(min, max)` of the gauge. Scores outside it are pinned to the ends.
#[must_use]
pub const fn score_range(key: ScoreKey) -> (i32, i32) {
    match key {
        ScoreKey::Mv => RANGE_MV,
        ScoreKey::Tr => RANGE_TR,
        ScoreKey::Or => RANGE_OR,
        ScoreKey::Tl => RANGE_TL,
    }
}

/// Operational risk is better when low; talent only needs to stay positive;
/// the growth metrics get a tolerance band below target.
#[must_use]
pub const fn score_status(key: ScoreKey, value: i32) -> ScoreStatus {
    let target = score_target(key);
    match key {
        ScoreKey::Or => {
            if value < target {
                ScoreStatus::Met
            } else if value == target {
                ScoreStatus::Target
            } else {
                ScoreStatus::Missed
            }
        }
        ScoreKey::Tl => {
            if value > 0 {
                ScoreStatus::Met
            } else if value == 0 {
                ScoreStatus::Target
            } else {
                ScoreStatus::Missed
            }
        }
        ScoreKey::Mv | ScoreKey::Tr => {
            if value >= target {
                ScoreStatus::Met
            } else if value >= target - TARGET_TOLERANCE {
                ScoreStatus::Target
            } else {
                ScoreStatus::Missed
            }
        }
    }
}

#[must_use]
pub const fn is_score_passing(key: ScoreKey, value: i32) -> bool {
    matches!(score_status(key, value), ScoreStatus::Met)
}

/// Fill of the gauge bar in percent.
#[must_use]
pub fn meter_fill_pct(key: ScoreKey, value: i32) -> f64 {
    let (min, max) = score_range(key);
    percent_of_range(value, min, max)
}

/// Position of the target tick in percent.
#[must_use]
pub fn target_marker_pct(key: ScoreKey) -> f64 {
    meter_fill_pct(key, score_target(key))
}
