//! Session controller: the only stateful piece of the engine.
//!
//! A session owns the committed choice path and nothing else that matters.
//! Every commit and every undo replays the full path through the ruleset, so
//! the state can never drift from the choices that produced it.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::constants::LOG_TARGET_SESSION;
use crate::data::{CatalogError, ChoiceId, ReplayError};
use crate::history::{ChoicePath, ChoiceRecord};
use crate::reveal::{RevealStage, RevealTiming};
use crate::seed::GameVariant;
use crate::signal::StepDelta;
use crate::variants::{DisplayPlan, plan_for_level};

pub mod ruleset;

pub use ruleset::{Ruleset, ScorecardRules, SingleTrack, TickerRules};

/// Sub-state of a single decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    AwaitingChoice,
    ShowingConsequence,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    SelectingScenario,
    Intro,
    /// `level` is the 0-based index of the open decision.
    Deciding { level: usize, step: Step },
    RevealingOutcome(RevealStage),
    ShowingResult,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelectingScenario => f.write_str("selecting a scenario"),
            Self::Intro => f.write_str("on the intro"),
            Self::Deciding {
                level,
                step: Step::AwaitingChoice,
            } => write!(f, "awaiting a choice at level {}", level + 1),
            Self::Deciding {
                level,
                step: Step::ShowingConsequence,
            } => write!(f, "showing the consequence at level {}", level + 1),
            Self::RevealingOutcome(stage) => write!(f, "revealing the outcome ({stage:?})"),
            Self::ShowingResult => f.write_str("showing the result"),
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("cannot {action} while {phase}")]
    InvalidTransition { action: &'static str, phase: Phase },
    #[error("there is no committed choice to undo")]
    NothingToUndo,
    #[error("{variant} sessions do not support undo")]
    UndoUnsupported { variant: GameVariant },
    #[error("scenario {key} is not in the catalog")]
    UnknownScenario { key: String },
    #[error(transparent)]
    Replay(#[from] ReplayError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// One playthrough of either variant.
#[derive(Debug, Clone)]
pub struct Session<R: Ruleset> {
    rules: R,
    seed: u64,
    timing: RevealTiming,
    phase: Phase,
    selector: Option<R::Selector>,
    choices: ChoicePath,
    history: Vec<ChoiceRecord<R::State>>,
    state: R::State,
    pending: Option<ChoiceId>,
    outcome: Option<R::Outcome>,
    last_delta: Option<StepDelta>,
}

impl<R: Ruleset> Session<R> {
    /// Fresh session waiting for a scenario. `seed` only drives cosmetic variation.
    #[must_use]
    pub fn new(rules: R, seed: u64) -> Self {
        let state = rules.initial_state();
        Self {
            rules,
            seed,
            timing: RevealTiming::default(),
            phase: Phase::SelectingScenario,
            selector: None,
            choices: ChoicePath::new(),
            history: Vec::new(),
            state,
            pending: None,
            outcome: None,
            last_delta: None,
        }
    }

    #[must_use]
    pub fn with_timing(mut self, timing: RevealTiming) -> Self {
        self.timing = timing;
        self
    }

    fn reject(&self, action: &'static str) -> SessionError {
        log::warn!(
            target: LOG_TARGET_SESSION,
            "{} session rejected '{action}' while {}",
            R::VARIANT,
            self.phase
        );
        SessionError::InvalidTransition {
            action,
            phase: self.phase,
        }
    }

    fn active_levels(&self) -> Result<&[R::Level], SessionError> {
        let Some(selector) = self.selector else {
            return Err(self.reject("read levels"));
        };
        self.rules.levels(selector)
    }

    fn step_delta(&self, level_id: u8, choice: ChoiceId, after: &R::State) -> StepDelta {
        StepDelta::new(
            level_id,
            choice,
            self.rules.headline(&self.state),
            self.rules.headline(after),
            self.rules.step_change(&self.state, after),
        )
    }

    fn level_at(levels: &[R::Level], index: usize) -> Result<&R::Level, ReplayError> {
        levels.get(index).ok_or(ReplayError::UnknownLevel {
            index,
            available: levels.len(),
        })
    }

    /// Choose the storyline and move to the intro.
    ///
    /// # Errors
    ///
    /// Fails outside scenario selection or when the catalog lacks the storyline.
    pub fn select_scenario(&mut self, selector: R::Selector) -> Result<(), SessionError> {
        if self.phase != Phase::SelectingScenario {
            return Err(self.reject("select a scenario"));
        }
        if self.rules.levels(selector)?.is_empty() {
            return Err(CatalogError::Empty {
                catalog: R::VARIANT.key(),
            }
            .into());
        }
        self.selector = Some(selector);
        self.phase = Phase::Intro;
        log::debug!(target: LOG_TARGET_SESSION, "{} session selected {selector}", R::VARIANT);
        Ok(())
    }

    /// Leave the intro and open the first decision.
    ///
    /// # Errors
    ///
    /// Fails unless the session is on the intro.
    pub fn begin(&mut self) -> Result<(), SessionError> {
        if self.phase != Phase::Intro {
            return Err(self.reject("begin"));
        }
        self.phase = Phase::Deciding {
            level: 0,
            step: Step::AwaitingChoice,
        };
        log::debug!(target: LOG_TARGET_SESSION, "{} session started", R::VARIANT);
        Ok(())
    }

    /// Hold `choice` as pending and preview its effect. Nothing is committed.
    ///
    /// # Errors
    ///
    /// Fails unless a decision is awaiting a choice.
    pub fn submit_choice(&mut self, choice: ChoiceId) -> Result<StepDelta, SessionError> {
        let Phase::Deciding {
            level,
            step: Step::AwaitingChoice,
        } = self.phase
        else {
            return Err(self.reject("submit a choice"));
        };
        let levels = self.active_levels()?;
        let level_id = R::level_id(Self::level_at(levels, level)?);
        let mut path = self.choices.clone();
        path.push(choice);
        let preview = self.rules.compute_state(levels, &path)?;
        let delta = self.step_delta(level_id, choice, &preview);

        self.pending = Some(choice);
        self.last_delta = Some(delta);
        self.phase = Phase::Deciding {
            level,
            step: Step::ShowingConsequence,
        };
        log::debug!(
            target: LOG_TARGET_SESSION,
            "level {level_id} choice {choice} pending ({:?} {:+.2})",
            delta.flash,
            delta.change
        );
        Ok(delta)
    }

    /// Commit the pending choice. After the last level the outcome is
    /// classified and the reveal starts.
    ///
    /// # Errors
    ///
    /// Fails unless a pending choice is showing its consequence. On failure
    /// nothing is committed.
    pub fn advance(&mut self) -> Result<Phase, SessionError> {
        let (
            Phase::Deciding {
                level,
                step: Step::ShowingConsequence,
            },
            Some(choice),
        ) = (self.phase, self.pending)
        else {
            return Err(self.reject("advance"));
        };
        let levels = self.active_levels()?;
        let level_id = R::level_id(Self::level_at(levels, level)?);
        let mut path = self.choices.clone();
        path.push(choice);
        let state = self.rules.compute_state(levels, &path)?;
        let finished = path.len() >= levels.len();
        let delta = self.step_delta(level_id, choice, &state);
        let outcome = finished.then(|| self.rules.classify(&state));

        self.history.push(ChoiceRecord {
            level_id,
            choice,
            state_after: state.clone(),
        });
        self.choices = path;
        self.state = state;
        self.pending = None;
        self.last_delta = Some(delta);
        self.phase = match outcome {
            Some(outcome) => {
                log::debug!(
                    target: LOG_TARGET_SESSION,
                    "{} session finished: {outcome:?}",
                    R::VARIANT
                );
                self.outcome = Some(outcome);
                Phase::RevealingOutcome(RevealStage::Calculating)
            }
            None => Phase::Deciding {
                level: level + 1,
                step: Step::AwaitingChoice,
            },
        };
        Ok(self.phase)
    }

    /// Drop the last committed choice and replay the rest from scratch.
    ///
    /// Valid in any phase once something is committed; any outcome or
    /// pending choice is discarded and the dropped level reopens.
    ///
    /// # Errors
    ///
    /// Fails for rulesets without undo and when nothing is committed.
    pub fn undo(&mut self) -> Result<ChoiceRecord<R::State>, SessionError> {
        if !R::SUPPORTS_UNDO {
            log::warn!(target: LOG_TARGET_SESSION, "{} session cannot undo", R::VARIANT);
            return Err(SessionError::UndoUnsupported { variant: R::VARIANT });
        }
        if self.history.is_empty() {
            return Err(SessionError::NothingToUndo);
        }
        let levels = self.active_levels()?;
        let keep = self.choices.len().saturating_sub(1);
        let state = self.rules.compute_state(levels, &self.choices[..keep])?;

        let Some(record) = self.history.pop() else {
            return Err(SessionError::NothingToUndo);
        };
        self.choices.truncate(keep);
        self.state = state;
        self.pending = None;
        self.outcome = None;
        self.last_delta = None;
        self.phase = Phase::Deciding {
            level: self.history.len(),
            step: Step::AwaitingChoice,
        };
        log::debug!(
            target: LOG_TARGET_SESSION,
            "undid level {} choice {}; {} choices remain",
            record.level_id,
            record.choice,
            self.choices.len()
        );
        Ok(record)
    }

    /// Step the reveal forward; the stage after `Complete` is the result.
    ///
    /// # Errors
    ///
    /// Fails unless the outcome is being revealed.
    pub fn advance_reveal(&mut self) -> Result<Phase, SessionError> {
        let Phase::RevealingOutcome(stage) = self.phase else {
            return Err(self.reject("advance the reveal"));
        };
        self.phase = stage
            .next()
            .map_or(Phase::ShowingResult, Phase::RevealingOutcome);
        Ok(self.phase)
    }

    /// Jump straight to the result.
    ///
    /// # Errors
    ///
    /// Fails unless the outcome is being revealed.
    pub fn skip_reveal(&mut self) -> Result<(), SessionError> {
        if !matches!(self.phase, Phase::RevealingOutcome(_)) {
            return Err(self.reject("skip the reveal"));
        }
        self.phase = Phase::ShowingResult;
        Ok(())
    }

    /// Back to scenario selection with nothing committed. Always succeeds.
    pub fn reset(&mut self) {
        self.phase = Phase::SelectingScenario;
        self.selector = None;
        self.choices.clear();
        self.history.clear();
        self.state = self.rules.initial_state();
        self.pending = None;
        self.outcome = None;
        self.last_delta = None;
        log::debug!(target: LOG_TARGET_SESSION, "{} session reset", R::VARIANT);
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub const fn state(&self) -> &R::State {
        &self.state
    }

    #[must_use]
    pub fn history(&self) -> &[ChoiceRecord<R::State>] {
        &self.history
    }

    #[must_use]
    pub fn choices(&self) -> &[ChoiceId] {
        &self.choices
    }

    #[must_use]
    pub const fn outcome(&self) -> Option<&R::Outcome> {
        self.outcome.as_ref()
    }

    #[must_use]
    pub const fn pending(&self) -> Option<ChoiceId> {
        self.pending
    }

    /// Most recent step signal: the preview after a submit, or the committed
    /// step after an advance.
    #[must_use]
    pub const fn last_delta(&self) -> Option<StepDelta> {
        self.last_delta
    }

    #[must_use]
    pub fn selector(&self) -> Option<R::Selector> {
        self.selector
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub const fn rules(&self) -> &R {
        &self.rules
    }

    #[must_use]
    pub const fn timing(&self) -> &RevealTiming {
        &self.timing
    }

    #[must_use]
    pub fn levels(&self) -> Option<&[R::Level]> {
        self.selector
            .and_then(|selector| self.rules.levels(selector).ok())
    }

    #[must_use]
    pub fn level_count(&self) -> usize {
        self.levels().map_or(0, <[R::Level]>::len)
    }

    /// Level currently open for a decision.
    #[must_use]
    pub fn current_level(&self) -> Option<&R::Level> {
        let Phase::Deciding { level, .. } = self.phase else {
            return None;
        };
        self.levels()?.get(level)
    }

    /// Cosmetic layout for the open decision.
    #[must_use]
    pub fn display_plan(&self) -> Option<DisplayPlan> {
        let Phase::Deciding { level, .. } = self.phase else {
            return None;
        };
        self.display_plan_for(level)
    }

    /// Cosmetic layout for any level of the selected storyline.
    #[must_use]
    pub fn display_plan_for(&self, level_index: usize) -> Option<DisplayPlan> {
        let level = self.levels()?.get(level_index)?;
        Some(plan_for_level(
            self.seed,
            level_index,
            R::variant_counts(level),
        ))
    }

    /// How long the host should hold the current reveal stage.
    #[must_use]
    pub fn reveal_duration(&self) -> Option<Duration> {
        match self.phase {
            Phase::RevealingOutcome(stage) => Some(self.timing.duration(stage)),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::ShowingResult)
    }
}

impl<R: Ruleset> Session<R> {
    /// Headline scalar of the current state.
    #[must_use]
    pub fn headline(&self) -> f64 {
        self.rules.headline(&self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ChoicePair;
    use crate::outcomes::OutcomeCatalog;
    use crate::scenario::{Crisis, Industry, ScenarioKey};
    use crate::scorecard::{Archetype, ScenarioLevels, ScorecardCatalog, Scores, fixtures};
    use crate::signal::Flash;
    use crate::ticker::{StockState, Verdict, fixtures as ticker_fixtures};
    use std::sync::Arc;
    use ChoiceId::{A, B};

    const KEY: ScenarioKey = ScenarioKey::new(Industry::Tech, Crisis::Product);

    fn ticker() -> Session<TickerRules> {
        let catalog = ticker_fixtures::catalog(&ticker_fixtures::GAINS, &ticker_fixtures::LOSSES);
        let outcomes = OutcomeCatalog::load_from_static().unwrap();
        Session::new(TickerRules::new(Arc::new(catalog), Arc::new(outcomes)), 7)
    }

    fn scorecard() -> Session<ScorecardRules> {
        let catalog = ScorecardCatalog {
            scenarios: vec![ScenarioLevels {
                industry: KEY.industry,
                crisis: KEY.crisis,
                levels: fixtures::contrasting(),
            }],
        };
        let outcomes = OutcomeCatalog::load_from_static().unwrap();
        Session::new(
            ScorecardRules::new(Arc::new(catalog), Arc::new(outcomes)),
            7,
        )
    }

    fn play<R: Ruleset>(session: &mut Session<R>, choices: &[ChoiceId]) {
        for choice in choices {
            session.submit_choice(*choice).unwrap();
            session.advance().unwrap();
        }
    }

    #[test]
    fn ticker_runs_from_selection_to_result() {
        let mut session = ticker();
        session.select_scenario(SingleTrack).unwrap();
        session.begin().unwrap();
        assert_eq!(session.level_count(), 5);

        let preview = session.submit_choice(A).unwrap();
        assert_eq!(preview.flash, Flash::Gain);
        assert!((preview.after - 101.5).abs() < 1e-9);
        assert_eq!(*session.state(), StockState::baseline());
        assert_eq!(session.pending(), Some(A));

        session.advance().unwrap();
        assert!((session.state().price - 101.5).abs() < 1e-9);
        play(&mut session, &[A, A, A]);
        session.submit_choice(A).unwrap();
        assert_eq!(
            session.advance().unwrap(),
            Phase::RevealingOutcome(RevealStage::Calculating)
        );

        let outcome = session.outcome().unwrap();
        assert_eq!(outcome.verdict, Verdict::Outperform);
        assert!((outcome.final_price - 129.20).abs() < 1e-9);
        assert_eq!(session.history().len(), 5);
        assert_eq!(session.reveal_duration(), Some(Duration::from_millis(2_000)));

        for _ in 0..6 {
            session.advance_reveal().unwrap();
        }
        assert_eq!(session.phase(), Phase::RevealingOutcome(RevealStage::Complete));
        assert_eq!(session.advance_reveal().unwrap(), Phase::ShowingResult);
        assert!(session.is_finished());
        assert!(session.advance_reveal().is_err());
    }

    #[test]
    fn step_signal_matches_the_unrounded_price_walk() {
        let catalog = ticker_fixtures::catalog(&[0.004, 0.002], &[-1.0, -1.0]);
        let outcomes = OutcomeCatalog::load_from_static().unwrap();
        let mut session = Session::new(TickerRules::new(Arc::new(catalog), Arc::new(outcomes)), 7);
        session.select_scenario(SingleTrack).unwrap();
        session.begin().unwrap();
        session.submit_choice(A).unwrap();
        session.advance().unwrap();
        assert!((session.state().price - 100.0).abs() < 1e-9);

        let preview = session.submit_choice(A).unwrap();
        session.advance().unwrap();
        let committed = session.last_delta().unwrap();
        assert!((committed.after - 100.01).abs() < 1e-9);
        assert_eq!(committed, preview);
        assert_eq!(Some(committed.change), session.state().step_change(2));
        assert_eq!(committed.flash, Flash::Volatile);
    }

    #[test]
    fn invalid_calls_leave_the_session_untouched() {
        let mut session = ticker();
        assert!(matches!(
            session.begin(),
            Err(SessionError::InvalidTransition {
                action: "begin",
                phase: Phase::SelectingScenario
            })
        ));
        session.select_scenario(SingleTrack).unwrap();
        session.begin().unwrap();
        assert!(session.advance().is_err());
        session.submit_choice(B).unwrap();
        assert!(session.submit_choice(A).is_err());
        assert_eq!(session.pending(), Some(B));
        assert!(session.skip_reveal().is_err());
        assert!(matches!(
            session.undo(),
            Err(SessionError::UndoUnsupported {
                variant: GameVariant::Ticker
            })
        ));
        assert_eq!(
            session.phase(),
            Phase::Deciding {
                level: 0,
                step: Step::ShowingConsequence
            }
        );
        assert!(session.history().is_empty());
    }

    #[test]
    fn undo_restores_the_state_before_the_last_advance() {
        let mut session = scorecard();
        session.select_scenario(KEY).unwrap();
        session.begin().unwrap();
        assert!(matches!(session.undo(), Err(SessionError::NothingToUndo)));

        play(&mut session, &[A, B, A]);
        let before = *session.state();
        session.submit_choice(B).unwrap();
        session.advance().unwrap();
        assert_ne!(*session.state(), before);

        let record = session.undo().unwrap();
        assert_eq!(record.choice, B);
        assert_eq!(record.level_id, 4);
        assert_eq!(*session.state(), before);
        assert_eq!(session.choices(), &[A, B, A]);
        assert_eq!(
            session.phase(),
            Phase::Deciding {
                level: 3,
                step: Step::AwaitingChoice
            }
        );
        assert!(session.last_delta().is_none());
    }

    #[test]
    fn undo_after_the_result_reopens_the_last_level() {
        let mut session = scorecard();
        session.select_scenario(KEY).unwrap();
        session.begin().unwrap();
        play(&mut session, &[B; 6]);
        session.skip_reveal().unwrap();
        let outcome = session.outcome().unwrap();
        assert_eq!(outcome.scores, Scores::new(25, 44, 15, 25));
        assert_eq!(outcome.archetype, Archetype::TrustGuardian);

        session.undo().unwrap();
        assert!(session.outcome().is_none());
        assert_eq!(
            session.phase(),
            Phase::Deciding {
                level: 5,
                step: Step::AwaitingChoice
            }
        );
        play(&mut session, &[A]);
        assert_eq!(session.outcome().unwrap().scores, Scores::new(30, 37, 16, 18));
    }

    #[test]
    fn undo_discards_a_pending_choice() {
        let mut session = scorecard();
        session.select_scenario(KEY).unwrap();
        session.begin().unwrap();
        play(&mut session, &[A]);
        session.submit_choice(B).unwrap();
        session.undo().unwrap();
        assert_eq!(session.pending(), None);
        assert_eq!(*session.state(), Scores::default());
    }

    #[test]
    fn unknown_scenario_is_rejected() {
        let mut session = scorecard();
        let missing = ScenarioKey::new(Industry::Retail, Crisis::Breach);
        assert!(matches!(
            session.select_scenario(missing),
            Err(SessionError::UnknownScenario { .. })
        ));
        assert_eq!(session.phase(), Phase::SelectingScenario);
        assert_eq!(session.level_count(), 0);
    }

    #[test]
    fn scorecard_flash_follows_enterprise_value() {
        let mut session = scorecard();
        session.select_scenario(KEY).unwrap();
        session.begin().unwrap();
        let delta = session.submit_choice(A).unwrap();
        // 10 MV, 2 TR, 8 OR, -3 TL: 500 + 100 - 500 penalty.
        assert!((delta.after - 100.0).abs() < 1e-9);
        assert_eq!(delta.flash, Flash::Gain);
    }

    #[test]
    fn reset_always_returns_to_selection() {
        let mut session = scorecard();
        session.reset();
        assert_eq!(session.phase(), Phase::SelectingScenario);
        session.select_scenario(KEY).unwrap();
        session.begin().unwrap();
        play(&mut session, &[A, A]);
        session.submit_choice(B).unwrap();
        session.reset();
        assert_eq!(session.phase(), Phase::SelectingScenario);
        assert!(session.choices().is_empty());
        assert!(session.history().is_empty());
        assert_eq!(session.pending(), None);
        assert_eq!(*session.state(), Scores::default());
        assert_eq!(session.selector(), None);
    }

    #[test]
    fn display_plans_follow_the_seed() {
        let mut session = scorecard();
        session.select_scenario(KEY).unwrap();
        assert!(session.display_plan().is_none());
        session.begin().unwrap();
        let plan = session.display_plan().unwrap();
        assert_eq!(plan, plan_for_level(7, 0, ChoicePair::new(1, 0)));
        assert_eq!(session.current_level().unwrap().id, 1);
        assert!(session.display_plan_for(6).is_none());
    }
}
