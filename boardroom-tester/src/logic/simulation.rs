//! Drives one session end to end under a policy and checks the engine's
//! invariants after every transition.
use std::time::{Duration, Instant};

use boardroom_game::{
    ChoiceId, ChoicePair, Flash, GameVariant, Phase, RevealStage, Ruleset, Session, SessionError,
    encode_friendly, path_digest, path_label,
};
use serde::Serialize;
use thiserror::Error;

use crate::logic::policy::{DecisionContext, DecisionPolicy};

const LOG_TARGET: &str = "boardroom_tester::simulation";

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("{check} failed: {detail}")]
    Invariant { check: &'static str, detail: String },
}

fn violated(check: &'static str, detail: impl Into<String>) -> SimulationError {
    SimulationError::Invariant {
        check,
        detail: detail.into(),
    }
}

fn same_headline(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

/// Snapshot of a committed decision.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionRecord {
    pub level_id: u8,
    pub choice: ChoiceId,
    pub headline: f64,
    pub flash: Flash,
    pub policy_name: String,
    pub rationale: Option<String>,
}

/// Everything a report needs from one finished run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub variant: GameVariant,
    pub scenario: String,
    pub seed: u64,
    pub share_code: String,
    pub path: String,
    pub digest: u64,
    pub headline: f64,
    pub outcome: String,
    pub winning: bool,
    pub undo_count: usize,
    pub decisions: Vec<DecisionRecord>,
    #[serde(skip)]
    pub duration: Duration,
}

fn preview<R: Ruleset>(
    session: &Session<R>,
    level_index: usize,
) -> Result<DecisionContext, SimulationError> {
    let levels = session
        .levels()
        .ok_or_else(|| violated("preview", "no storyline selected"))?;
    let level = levels
        .get(level_index)
        .ok_or_else(|| violated("preview", format!("level {level_index} is missing")))?;
    let headline_for = |choice: ChoiceId| -> Result<f64, SimulationError> {
        let mut path = session.choices().to_vec();
        path.push(choice);
        let state = session
            .rules()
            .compute_state(levels, &path)
            .map_err(SessionError::from)?;
        Ok(session.rules().headline(&state))
    };
    Ok(DecisionContext {
        level_index,
        level_id: R::level_id(level),
        current: session.headline(),
        previews: ChoicePair::new(headline_for(ChoiceId::A)?, headline_for(ChoiceId::B)?),
    })
}

fn check_replay<R: Ruleset>(session: &Session<R>) -> Result<(), SimulationError> {
    let levels = session
        .levels()
        .ok_or_else(|| violated("replay", "no storyline selected"))?;
    let replayed = session
        .rules()
        .compute_state(levels, session.choices())
        .map_err(SessionError::from)?;
    if &replayed != session.state() {
        return Err(violated(
            "replay",
            format!(
                "path {} replays to {replayed:?}, session holds {:?}",
                path_label(session.choices()),
                session.state()
            ),
        ));
    }
    if session.history().len() != session.choices().len() {
        return Err(violated(
            "history",
            format!(
                "{} records for {} choices",
                session.history().len(),
                session.choices().len()
            ),
        ));
    }
    for (k, record) in session.history().iter().enumerate() {
        let prefix = session
            .rules()
            .compute_state(levels, &session.choices()[..=k])
            .map_err(SessionError::from)?;
        if prefix != record.state_after || record.choice != session.choices()[k] {
            return Err(violated(
                "history",
                format!("record {} does not match its prefix replay", record.level_id),
            ));
        }
    }
    Ok(())
}

/// Commit `choice`, then undo it and confirm the session is back where it was.
fn probe<R: Ruleset>(session: &mut Session<R>, choice: ChoiceId) -> Result<(), SimulationError> {
    let before_state = session.state().clone();
    let before_phase = session.phase();
    let before_len = session.choices().len();
    session.submit_choice(choice)?;
    session.advance()?;
    let record = session.undo()?;
    if record.choice != choice {
        return Err(violated(
            "undo",
            format!("undid {} after probing {choice}", record.choice),
        ));
    }
    if session.state() != &before_state
        || session.phase() != before_phase
        || session.choices().len() != before_len
    {
        return Err(violated(
            "undo",
            format!(
                "probe of {choice} left {:?} in phase {}",
                session.state(),
                session.phase()
            ),
        ));
    }
    log::trace!(target: LOG_TARGET, "probed {choice} at level {}", record.level_id);
    Ok(())
}

fn walk_reveal<R: Ruleset>(session: &mut Session<R>) -> Result<(), SimulationError> {
    let mut stages = 0;
    while let Phase::RevealingOutcome(stage) = session.phase() {
        if stages > RevealStage::ALL.len() {
            return Err(violated("reveal", format!("stuck at {stage:?}")));
        }
        session.advance_reveal()?;
        stages += 1;
    }
    if stages != RevealStage::ALL.len() || !session.is_finished() {
        return Err(violated(
            "reveal",
            format!("{stages} stages before {}", session.phase()),
        ));
    }
    Ok(())
}

/// Play a full run of `selector`, checking invariants as it goes.
///
/// # Errors
///
/// Returns the first session error or broken invariant.
pub fn play<R: Ruleset>(
    session: &mut Session<R>,
    selector: R::Selector,
    policy: &mut dyn DecisionPolicy,
) -> Result<RunSummary, SimulationError> {
    let start = Instant::now();
    session.select_scenario(selector)?;
    session.begin()?;

    let mut decisions = Vec::with_capacity(session.level_count());
    let mut undo_count = 0;
    while let Phase::Deciding { level, .. } = session.phase() {
        let ctx = preview(session, level)?;
        let decision = policy.pick(&ctx);
        if decision.probe && R::SUPPORTS_UNDO {
            probe(session, decision.choice.other())?;
            undo_count += 1;
        }

        let delta = session.submit_choice(decision.choice)?;
        if !same_headline(delta.after, *ctx.previews.get(decision.choice)) {
            return Err(violated(
                "preview",
                format!(
                    "level {} previewed {} but submit showed {}",
                    ctx.level_id,
                    ctx.previews.get(decision.choice),
                    delta.after
                ),
            ));
        }
        if session.choices().len() != level {
            return Err(violated("submit", "a pending choice was committed early"));
        }
        session.advance()?;
        check_replay(session)?;
        if !same_headline(session.headline(), delta.after) {
            return Err(violated(
                "commit",
                format!(
                    "level {} headline {} after showing {}",
                    ctx.level_id,
                    session.headline(),
                    delta.after
                ),
            ));
        }
        decisions.push(DecisionRecord {
            level_id: delta.level_id,
            choice: decision.choice,
            headline: delta.after,
            flash: delta.flash,
            policy_name: policy.name().to_string(),
            rationale: decision.rationale,
        });
    }

    let outcome = session
        .outcome()
        .cloned()
        .ok_or_else(|| violated("outcome", format!("no outcome while {}", session.phase())))?;
    if outcome != session.rules().classify(session.state()) {
        return Err(violated(
            "outcome",
            "outcome differs from a fresh classification",
        ));
    }
    walk_reveal(session)?;

    let summary = RunSummary {
        variant: R::VARIANT,
        scenario: selector.to_string(),
        seed: session.seed(),
        share_code: encode_friendly(R::VARIANT, session.seed()),
        path: path_label(session.choices()),
        digest: path_digest(session.choices()),
        headline: session.headline(),
        outcome: R::outcome_key(&outcome).to_string(),
        winning: R::is_winning(&outcome),
        undo_count,
        decisions,
        duration: start.elapsed(),
    };
    log::debug!(
        target: LOG_TARGET,
        "{} {} {} -> {} ({:.2})",
        summary.variant,
        summary.scenario,
        summary.path,
        summary.outcome,
        summary.headline
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::policy::{ScriptedPolicy, Strategy};
    use boardroom_game::{
        Crisis, GameEngine, Industry, ScenarioKey, SingleTrack, StaticCatalogLoader, parse_path,
    };

    const KEY: ScenarioKey = ScenarioKey::new(Industry::Financial, Crisis::Competitor);

    #[test]
    fn scripted_ticker_run_reaches_strong_buy() {
        let engine = GameEngine::new(StaticCatalogLoader);
        let mut session = engine.ticker_session(42).unwrap();
        let mut policy = ScriptedPolicy::new(parse_path("ABABA").unwrap());
        let summary = play(&mut session, SingleTrack, &mut policy).unwrap();
        assert_eq!(summary.path, "ABABA");
        assert_eq!(summary.outcome, "strong_buy");
        assert!(summary.winning);
        assert_eq!(summary.decisions.len(), 5);
        assert_eq!(summary.scenario, "market");
        assert!(session.is_finished());
    }

    #[test]
    fn undo_explorer_probes_every_scorecard_level() {
        let engine = GameEngine::new(StaticCatalogLoader);
        let mut session = engine.scorecard_session(7).unwrap();
        let mut policy = Strategy::UndoExplorer.create_policy(7);
        let summary = play(&mut session, KEY, policy.as_mut()).unwrap();
        assert_eq!(summary.undo_count, 6);
        assert_eq!(summary.path.len(), 6);
        assert_eq!(summary.share_code, encode_friendly(GameVariant::Scorecard, 7));
    }

    #[test]
    fn ticker_runs_skip_probes() {
        let engine = GameEngine::new(StaticCatalogLoader);
        let mut session = engine.ticker_session(7).unwrap();
        let mut policy = Strategy::UndoExplorer.create_policy(7);
        let summary = play(&mut session, SingleTrack, policy.as_mut()).unwrap();
        assert_eq!(summary.undo_count, 0);
    }

    #[test]
    fn greedy_scorecard_run_records_each_headline() {
        let engine = GameEngine::new(StaticCatalogLoader);
        let mut session = engine.scorecard_session(1).unwrap();
        let mut policy = Strategy::Greedy.create_policy(1);
        let summary = play(&mut session, KEY, policy.as_mut()).unwrap();
        let headlines: Vec<f64> = summary.decisions.iter().map(|d| d.headline).collect();
        assert_eq!(headlines.len(), 6);
        assert!(same_headline(summary.headline, headlines[5]));
    }

    #[test]
    fn replaying_a_started_session_is_rejected() {
        let engine = GameEngine::new(StaticCatalogLoader);
        let mut session = engine.ticker_session(3).unwrap();
        let mut policy = Strategy::AlwaysA.create_policy(3);
        play(&mut session, SingleTrack, policy.as_mut()).unwrap();
        let err = play(&mut session, SingleTrack, policy.as_mut()).unwrap_err();
        assert!(matches!(
            err,
            SimulationError::Session(SessionError::InvalidTransition { .. })
        ));
    }
}
