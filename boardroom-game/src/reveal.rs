//! Staged reveal of the final outcome.
//!
//! The stages only pace the presentation. The outcome is already fixed when
//! the first stage is entered.
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::{
    REVEAL_CALCULATING_MS, REVEAL_COMPLETE_MS, REVEAL_FINAL_MS, REVEAL_HIGHLIGHTING_MS,
    REVEAL_SCANNING_MS, REVEAL_SHOWING_ARCHETYPES_MS, REVEAL_STEPPING_FORWARD_MS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RevealStage {
    Calculating,
    Scanning,
    ShowingArchetypes,
    Highlighting,
    SteppingForward,
    FinalReveal,
    Complete,
}

impl RevealStage {
    pub const ALL: [Self; 7] = [
        Self::Calculating,
        Self::Scanning,
        Self::ShowingArchetypes,
        Self::Highlighting,
        Self::SteppingForward,
        Self::FinalReveal,
        Self::Complete,
    ];

    /// Following stage, or `None` once complete.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Calculating => Some(Self::Scanning),
            Self::Scanning => Some(Self::ShowingArchetypes),
            Self::ShowingArchetypes => Some(Self::Highlighting),
            Self::Highlighting => Some(Self::SteppingForward),
            Self::SteppingForward => Some(Self::FinalReveal),
            Self::FinalReveal => Some(Self::Complete),
            Self::Complete => None,
        }
    }

    #[must_use]
    pub const fn is_complete(self) -> bool {
        matches!(self, Self::Complete)
    }
}

/// How long a host should hold each stage before advancing, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealTiming {
    pub calculating_ms: u32,
    pub scanning_ms: u32,
    pub showing_archetypes_ms: u32,
    pub highlighting_ms: u32,
    pub stepping_forward_ms: u32,
    pub final_reveal_ms: u32,
    /// Hold on the completed reveal before handing over to the result screen.
    pub complete_ms: u32,
}

impl Default for RevealTiming {
    fn default() -> Self {
        Self {
            calculating_ms: REVEAL_CALCULATING_MS,
            scanning_ms: REVEAL_SCANNING_MS,
            showing_archetypes_ms: REVEAL_SHOWING_ARCHETYPES_MS,
            highlighting_ms: REVEAL_HIGHLIGHTING_MS,
            stepping_forward_ms: REVEAL_STEPPING_FORWARD_MS,
            final_reveal_ms: REVEAL_FINAL_MS,
            complete_ms: REVEAL_COMPLETE_MS,
        }
    }
}

impl RevealTiming {
    #[must_use]
    pub const fn millis(&self, stage: RevealStage) -> u32 {
        match stage {
            RevealStage::Calculating => self.calculating_ms,
            RevealStage::Scanning => self.scanning_ms,
            RevealStage::ShowingArchetypes => self.showing_archetypes_ms,
            RevealStage::Highlighting => self.highlighting_ms,
            RevealStage::SteppingForward => self.stepping_forward_ms,
            RevealStage::FinalReveal => self.final_reveal_ms,
            RevealStage::Complete => self.complete_ms,
        }
    }

    #[must_use]
    pub fn duration(&self, stage: RevealStage) -> Duration {
        Duration::from_millis(u64::from(self.millis(stage)))
    }

    /// Wall time of an unskipped reveal.
    #[must_use]
    pub fn total(&self) -> Duration {
        RevealStage::ALL
            .into_iter()
            .map(|stage| self.duration(stage))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_run_in_order_and_stop() {
        let mut stage = RevealStage::Calculating;
        let mut seen = vec![stage];
        while let Some(next) = stage.next() {
            stage = next;
            seen.push(stage);
        }
        assert_eq!(seen, RevealStage::ALL);
        assert!(stage.is_complete());
    }

    #[test]
    fn default_timing_totals_ten_seconds() {
        let timing = RevealTiming::default();
        assert_eq!(timing.duration(RevealStage::Calculating), Duration::from_secs(2));
        assert_eq!(timing.total(), Duration::from_millis(10_000));
    }

    #[test]
    fn partial_overrides_keep_defaults() {
        let timing: RevealTiming = serde_json::from_str(r#"{ "scanning_ms": 0 }"#).unwrap();
        assert_eq!(timing.millis(RevealStage::Scanning), 0);
        assert_eq!(timing.millis(RevealStage::FinalReveal), 2_500);
    }
}
