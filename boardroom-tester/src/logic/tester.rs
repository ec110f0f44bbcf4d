use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use anyhow::Result;
use boardroom_game::numbers::usize_to_f64;
use boardroom_game::{
    CatalogLoader, ChoiceId, ChoicePath, GameEngine, GameVariant, ScenarioKey, ScorecardRules,
    Session, SingleTrack, TickerRules,
};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::logic::policy::{DecisionPolicy, ScriptedPolicy, Strategy};
use crate::logic::seeds::SeedInfo;
use crate::logic::simulation::{RunSummary, SimulationError, play};

/// Which storyline a plan plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Track {
    Ticker,
    Scorecard(ScenarioKey),
}

impl Track {
    #[must_use]
    pub const fn variant(self) -> GameVariant {
        match self {
            Self::Ticker => GameVariant::Ticker,
            Self::Scorecard(_) => GameVariant::Scorecard,
        }
    }

    #[must_use]
    pub fn label(self) -> String {
        match self {
            Self::Ticker => "ticker".to_string(),
            Self::Scorecard(key) => key.to_string(),
        }
    }
}

/// How a plan picks its choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Driver {
    Strategy(Strategy),
    /// Every path of the storyline, once each.
    Exhaustive,
}

impl Driver {
    #[must_use]
    pub fn label(self) -> String {
        match self {
            Self::Strategy(strategy) => strategy.key().to_string(),
            Self::Exhaustive => "exhaustive".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RunPlan {
    pub track: Track,
    pub driver: Driver,
}

impl RunPlan {
    #[must_use]
    pub fn name(&self) -> String {
        format!("{} / {}", self.track.label(), self.driver.label())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub variant: GameVariant,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub failures: Vec<String>,
    /// Outcome key to number of runs that landed on it.
    pub outcomes: BTreeMap<String, usize>,
    pub wins: usize,
    pub distinct_paths: usize,
    pub undo_probes: usize,
    /// SHA-256 over every run's seed, path and outcome. Stable across sweeps.
    pub fingerprint: String,
    #[serde(with = "duration_serde")]
    pub average_duration: Duration,
}

impl ScenarioResult {
    #[must_use]
    pub fn win_rate(&self) -> f64 {
        if self.successful_iterations == 0 {
            return 0.0;
        }
        usize_to_f64(self.wins) / usize_to_f64(self.successful_iterations) * 100.0
    }
}

/// Ready-made rulesets shared by every run of a sweep.
#[derive(Debug, Clone)]
pub struct GameTester {
    ticker: TickerRules,
    scorecard: ScorecardRules,
    verbose: bool,
}

impl GameTester {
    /// # Errors
    ///
    /// Fails when the loader cannot produce a catalog.
    pub fn new<L>(engine: &GameEngine<L>, verbose: bool) -> Result<Self>
    where
        L: CatalogLoader,
    {
        Ok(Self {
            ticker: engine.ticker_rules()?,
            scorecard: engine.scorecard_rules()?,
            verbose,
        })
    }

    #[must_use]
    pub fn scenario_keys(&self) -> Vec<ScenarioKey> {
        self.scorecard.catalog().keys().collect()
    }

    fn level_count(&self, track: Track) -> usize {
        match track {
            Track::Ticker => self.ticker.catalog().len(),
            Track::Scorecard(key) => self
                .scorecard
                .catalog()
                .levels_for(key)
                .map_or(0, <[_]>::len),
        }
    }

    /// Play one run of `track` under `policy`.
    ///
    /// # Errors
    ///
    /// Returns the first session error or broken invariant.
    pub fn run_once(
        &self,
        track: Track,
        seed: u64,
        policy: &mut dyn DecisionPolicy,
    ) -> Result<RunSummary, SimulationError> {
        match track {
            Track::Ticker => {
                let mut session = Session::new(self.ticker.clone(), seed);
                play(&mut session, SingleTrack, policy)
            }
            Track::Scorecard(key) => {
                let mut session = Session::new(self.scorecard.clone(), seed);
                play(&mut session, key, policy)
            }
        }
    }

    /// Run `plan` for every matching seed.
    #[must_use]
    pub fn run_plan(
        &self,
        plan: &RunPlan,
        seeds: &[SeedInfo],
        iterations: usize,
    ) -> ScenarioResult {
        let variant = plan.track.variant();
        let seeds: Vec<&SeedInfo> = seeds
            .iter()
            .filter(|s| s.matches_variant(variant))
            .collect();
        if self.verbose {
            let codes: Vec<String> = seeds.iter().map(|s| s.share_code_for(variant)).collect();
            println!(
                "🧪 Running {} (seeds: {})",
                plan.name().bright_white(),
                codes.join(", ")
            );
        }

        let runs: Vec<(u64, Box<dyn DecisionPolicy + Send>)> = match plan.driver {
            Driver::Strategy(strategy) => {
                let per_seed = if strategy.is_seeded() {
                    iterations.max(1)
                } else {
                    1
                };
                seeds
                    .iter()
                    .flat_map(|info| {
                        (0..per_seed).map(move |i| {
                            let offset = u64::try_from(i).unwrap_or(u64::MAX);
                            let seed = info.seed.wrapping_add(offset);
                            (seed, strategy.create_policy(seed))
                        })
                    })
                    .collect()
            }
            Driver::Exhaustive => {
                let seed = seeds.first().map_or(0, |info| info.seed);
                all_paths(self.level_count(plan.track))
                    .into_iter()
                    .map(|path| {
                        let policy: Box<dyn DecisionPolicy + Send> =
                            Box::new(ScriptedPolicy::new(path));
                        (seed, policy)
                    })
                    .collect()
            }
        };

        let mut summaries = Vec::with_capacity(runs.len());
        let mut failures = Vec::new();
        let iterations_run = runs.len();
        if seeds.is_empty() {
            let message = format!("No seeds match variant {variant}");
            log::warn!("{}: {message}", plan.name());
            failures.push(message);
        }
        for (i, (seed, mut policy)) in runs.into_iter().enumerate() {
            let started = Instant::now();
            match self.run_once(plan.track, seed, policy.as_mut()) {
                Ok(summary) => {
                    if self.verbose {
                        println!(
                            "  ✅ Run {}/{} seed {} path {} -> {} ({:?})",
                            i + 1,
                            iterations_run,
                            summary.share_code,
                            summary.path,
                            summary.outcome,
                            started.elapsed()
                        );
                    }
                    summaries.push(summary);
                }
                Err(err) => {
                    let message = format!(
                        "Run {} ({}, seed {seed}, policy {}): {err}",
                        i + 1,
                        plan.name(),
                        policy.name()
                    );
                    if self.verbose {
                        println!("  ❌ {}", message.clone().red());
                    }
                    log::warn!("{message}");
                    failures.push(message);
                }
            }
        }

        summarize(plan, variant, iterations_run, &summaries, failures)
    }
}

fn all_paths(len: usize) -> Vec<ChoicePath> {
    let Some(count) = u32::try_from(len).ok().and_then(|l| 1_u64.checked_shl(l)) else {
        return Vec::new();
    };
    (0..count)
        .map(|bits| {
            (0..len)
                .map(|i| ChoiceId::ALL[usize::from(bits >> i & 1 == 1)])
                .collect()
        })
        .collect()
}

fn summarize(
    plan: &RunPlan,
    variant: GameVariant,
    iterations_run: usize,
    summaries: &[RunSummary],
    failures: Vec<String>,
) -> ScenarioResult {
    let mut outcomes: BTreeMap<String, usize> = BTreeMap::new();
    let mut digests: Vec<u64> = Vec::with_capacity(summaries.len());
    let mut hasher = Sha256::new();
    for summary in summaries {
        *outcomes.entry(summary.outcome.clone()).or_default() += 1;
        digests.push(summary.digest);
        hasher.update(format!("{}:{}:{}\n", summary.seed, summary.path, summary.outcome));
    }
    digests.sort_unstable();
    digests.dedup();

    let average_duration = if summaries.is_empty() {
        Duration::ZERO
    } else {
        summaries.iter().map(|s| s.duration).sum::<Duration>()
            / u32::try_from(summaries.len()).unwrap_or(1)
    };

    ScenarioResult {
        scenario_name: plan.name(),
        variant,
        passed: failures.is_empty() && iterations_run > 0,
        iterations_run,
        successful_iterations: summaries.len(),
        failures,
        outcomes,
        wins: summaries.iter().filter(|s| s.winning).count(),
        distinct_paths: digests.len(),
        undo_probes: summaries.iter().map(|s| s.undo_count).sum(),
        fingerprint: format!("{:x}", hasher.finalize()),
        average_duration,
    }
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_micros().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let micros = u128::deserialize(deserializer)?;
        Ok(Duration::from_micros(u64::try_from(micros).unwrap_or(0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boardroom_game::{Crisis, Industry, StaticCatalogLoader};

    fn tester() -> GameTester {
        GameTester::new(&GameEngine::new(StaticCatalogLoader), false).unwrap()
    }

    #[test]
    fn exhaustive_ticker_sweep_covers_every_path() {
        let plan = RunPlan {
            track: Track::Ticker,
            driver: Driver::Exhaustive,
        };
        let result = tester().run_plan(&plan, &[SeedInfo::from_numeric(1)], 1);
        assert!(result.passed, "{:?}", result.failures);
        assert_eq!(result.iterations_run, 32);
        assert_eq!(result.distinct_paths, 32);
        assert_eq!(result.outcomes.get("underperform"), Some(&13));
        assert_eq!(result.outcomes.get("hold"), Some(&10));
        assert_eq!(result.outcomes.get("outperform"), Some(&5));
        assert_eq!(result.outcomes.get("sell"), Some(&3));
        assert_eq!(result.outcomes.get("strong_buy"), Some(&1));
        assert_eq!(result.wins, 6);
    }

    #[test]
    fn fixed_strategies_run_once_per_seed() {
        let plan = RunPlan {
            track: Track::Scorecard(ScenarioKey::new(Industry::Financial, Crisis::Competitor)),
            driver: Driver::Strategy(Strategy::AlwaysB),
        };
        let seeds = [SeedInfo::from_numeric(1), SeedInfo::from_numeric(2)];
        let result = tester().run_plan(&plan, &seeds, 10);
        assert_eq!(result.iterations_run, 2);
        assert_eq!(result.distinct_paths, 1);
        assert_eq!(result.outcomes.get("trust_guardian"), Some(&2));
        assert!((result.win_rate() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn sweeps_are_reproducible() {
        let plan = RunPlan {
            track: Track::Scorecard(ScenarioKey::new(Industry::Retail, Crisis::Breach)),
            driver: Driver::Strategy(Strategy::UndoExplorer),
        };
        let seeds = [SeedInfo::from_numeric(99)];
        let first = tester().run_plan(&plan, &seeds, 4);
        let second = tester().run_plan(&plan, &seeds, 4);
        assert!(first.passed);
        assert_eq!(first.fingerprint, second.fingerprint);
        assert_eq!(first.undo_probes, 24);
    }

    #[test]
    fn share_codes_only_feed_their_variant() {
        let plan = RunPlan {
            track: Track::Ticker,
            driver: Driver::Strategy(Strategy::Greedy),
        };
        let scorecard_only = [SeedInfo::from_share_code(
            5,
            GameVariant::Scorecard,
            "SC-MOAT07".to_string(),
        )];
        let result = tester().run_plan(&plan, &scorecard_only, 3);
        assert_eq!(result.iterations_run, 0);
        assert!(!result.passed);
        assert_eq!(result.failures, vec!["No seeds match variant ticker".to_string()]);
    }

    #[test]
    fn exhaustive_sweep_without_matching_seed_fails() {
        let plan = RunPlan {
            track: Track::Scorecard(ScenarioKey::new(Industry::Tech, Crisis::Product)),
            driver: Driver::Exhaustive,
        };
        let ticker_only = [SeedInfo::from_share_code(
            7,
            GameVariant::Ticker,
            "TK-PIVOT42".to_string(),
        )];
        let result = tester().run_plan(&plan, &ticker_only, 1);
        assert!(!result.passed);
        assert!(result.failures[0].contains("scorecard"));
    }

    #[test]
    fn all_paths_enumerates_binary_order() {
        let paths = all_paths(2);
        assert_eq!(paths.len(), 4);
        assert_eq!(paths[1].as_slice(), &[ChoiceId::B, ChoiceId::A]);
        assert_eq!(all_paths(0).len(), 1);
    }
}
