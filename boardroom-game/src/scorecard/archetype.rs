//! Enterprise value, value tiers and leadership archetypes.
//!
//! Both classifiers are total: every score vector maps to exactly one tier
//! and exactly one archetype. Archetype rules are evaluated in declaration
//! order and the last one always matches.
use serde::{Deserialize, Serialize};

use super::Scores;
use crate::constants::{
    ARCHETYPE_EFFICIENCY_TRAP_EV_MIN, ARCHETYPE_MV_STRONG, ARCHETYPE_OR_RISKY,
    ARCHETYPE_TR_ARCHITECT, ARCHETYPE_TR_GUARDIAN, EV_NEGATIVE_TL_PENALTY, EV_OR_EXCESS_PENALTY,
    EV_OR_THRESHOLD, EV_TIER_EXCEPTIONAL_MIN, EV_TIER_PARTIAL_MIN, EV_TIER_SOLID_MIN,
    EV_WEIGHT_MV, EV_WEIGHT_TL, EV_WEIGHT_TR, EV_WINNING_MIN,
};
use crate::outcomes::{OutcomeCatalog, OutcomeMeta};

/// Enterprise value in millions.
///
/// Operational risk above its threshold is penalised per point; a negative
/// talent score forfeits its contribution and costs a flat penalty instead.
#[must_use]
pub fn enterprise_value(scores: &Scores) -> i32 {
    let or_excess = (scores.or - EV_OR_THRESHOLD).max(0);
    let (tl_contribution, tl_penalty) = if scores.tl < 0 {
        (0, EV_NEGATIVE_TL_PENALTY)
    } else {
        (scores.tl.saturating_mul(EV_WEIGHT_TL), 0)
    };
    scores
        .mv
        .saturating_mul(EV_WEIGHT_MV)
        .saturating_add(scores.tr.saturating_mul(EV_WEIGHT_TR))
        .saturating_add(tl_contribution)
        .saturating_sub(or_excess.saturating_mul(EV_OR_EXCESS_PENALTY))
        .saturating_sub(tl_penalty)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvTier {
    Exceptional,
    Solid,
    Partial,
    ValueDestruction,
}

impl EvTier {
    pub const ALL: [Self; 4] = [
        Self::Exceptional,
        Self::Solid,
        Self::Partial,
        Self::ValueDestruction,
    ];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Exceptional => "exceptional",
            Self::Solid => "solid",
            Self::Partial => "partial",
            Self::ValueDestruction => "value_destruction",
        }
    }
}

#[must_use]
pub const fn classify_tier(ev: i32) -> EvTier {
    if ev >= EV_TIER_EXCEPTIONAL_MIN {
        EvTier::Exceptional
    } else if ev >= EV_TIER_SOLID_MIN {
        EvTier::Solid
    } else if ev >= EV_TIER_PARTIAL_MIN {
        EvTier::Partial
    } else {
        EvTier::ValueDestruction
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Archetype {
    Architect,
    VelocityMaximizer,
    TrustGuardian,
    EfficiencyTrap,
    CautionaryTale,
}

impl Archetype {
    /// Rule evaluation order.
    pub const ALL: [Self; 5] = [
        Self::Architect,
        Self::VelocityMaximizer,
        Self::TrustGuardian,
        Self::EfficiencyTrap,
        Self::CautionaryTale,
    ];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Architect => "architect",
            Self::VelocityMaximizer => "velocity_maximizer",
            Self::TrustGuardian => "trust_guardian",
            Self::EfficiencyTrap => "efficiency_trap",
            Self::CautionaryTale => "cautionary_tale",
        }
    }

    /// Whether this archetype's rule holds, ignoring the rules ahead of it.
    #[must_use]
    pub const fn matches(self, scores: &Scores, ev: i32) -> bool {
        let strong_mv = scores.mv > ARCHETYPE_MV_STRONG;
        match self {
            Self::Architect => {
                ev >= EV_TIER_EXCEPTIONAL_MIN
                    && strong_mv
                    && scores.tr > ARCHETYPE_TR_ARCHITECT
                    && scores.tl > 0
            }
            Self::VelocityMaximizer => {
                ev >= EV_TIER_SOLID_MIN
                    && strong_mv
                    && (scores.or >= ARCHETYPE_OR_RISKY || scores.tl <= 0)
            }
            Self::TrustGuardian => {
                scores.tr > ARCHETYPE_TR_GUARDIAN && !strong_mv && ev >= EV_TIER_PARTIAL_MIN
            }
            Self::EfficiencyTrap => {
                strong_mv && scores.tl < 0 && ev >= ARCHETYPE_EFFICIENCY_TRAP_EV_MIN
            }
            Self::CautionaryTale => true,
        }
    }
}

/// First archetype, in rule order, whose condition holds.
#[must_use]
pub fn select_archetype(scores: &Scores, ev: i32) -> Archetype {
    Archetype::ALL
        .into_iter()
        .find(|archetype| archetype.matches(scores, ev))
        .unwrap_or(Archetype::CautionaryTale)
}

/// Render an EV in millions: `$4.3B`, `$850M`, `$0`, `-$200M`.
///
/// Billions keep one decimal, with halves rounded away from zero.
#[must_use]
pub fn format_ev(millions: i32) -> String {
    let value = i64::from(millions);
    if value >= 1_000 {
        let tenths = (value + 50) / 100;
        format!("${}.{}B", tenths / 10, tenths % 10)
    } else if value > 0 {
        format!("${value}M")
    } else if value == 0 {
        "$0".to_string()
    } else {
        format!("-${}M", value.abs())
    }
}

#[must_use]
pub const fn is_winning_outcome(ev: i32) -> bool {
    ev >= EV_WINNING_MIN
}

/// Everything the result screen needs for a finished scorecard run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScorecardOutcome {
    pub scores: Scores,
    pub ev: i32,
    pub ev_display: String,
    pub tier: EvTier,
    pub archetype: Archetype,
    pub tier_meta: OutcomeMeta,
    pub archetype_meta: OutcomeMeta,
    pub winning: bool,
}

impl ScorecardOutcome {
    #[must_use]
    pub fn from_scores(scores: Scores, outcomes: &OutcomeCatalog) -> Self {
        let ev = enterprise_value(&scores);
        let tier = classify_tier(ev);
        let archetype = select_archetype(&scores, ev);
        Self {
            scores,
            ev,
            ev_display: format_ev(ev),
            tier,
            archetype,
            tier_meta: outcomes.tier(tier).clone(),
            archetype_meta: outcomes.archetype(archetype).clone(),
            winning: is_winning_outcome(ev),
        }
    }
}
