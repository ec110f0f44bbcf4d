use std::fmt;
use std::str::FromStr;

use boardroom_game::{ChoiceId, ChoicePair, ChoicePath};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// What a policy sees before committing a decision.
#[derive(Debug, Clone, Copy)]
pub struct DecisionContext {
    pub level_index: usize,
    pub level_id: u8,
    /// Headline of the committed state.
    pub current: f64,
    /// Headline each option would produce.
    pub previews: ChoicePair<f64>,
}

/// Decision returned by a [`DecisionPolicy`]
#[derive(Debug, Clone)]
pub struct PolicyDecision {
    pub choice: ChoiceId,
    pub rationale: Option<String>,
    /// Commit the other option first and undo it before committing `choice`.
    pub probe: bool,
}

impl PolicyDecision {
    #[must_use]
    pub fn new(choice: ChoiceId, rationale: Option<String>) -> Self {
        Self {
            choice,
            rationale,
            probe: false,
        }
    }

    #[must_use]
    pub fn probing(mut self) -> Self {
        self.probe = true;
        self
    }
}

/// Policy interface for automated play strategies.
pub trait DecisionPolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    fn pick(&mut self, ctx: &DecisionContext) -> PolicyDecision;
}

/// Built-in strategies for automated runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Strategy {
    AlwaysA,
    AlwaysB,
    Alternating,
    Random,
    Greedy,
    UndoExplorer,
}

impl Strategy {
    pub const ALL: [Self; 6] = [
        Self::AlwaysA,
        Self::AlwaysB,
        Self::Alternating,
        Self::Random,
        Self::Greedy,
        Self::UndoExplorer,
    ];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::AlwaysA => "always-a",
            Self::AlwaysB => "always-b",
            Self::Alternating => "alternating",
            Self::Random => "random",
            Self::Greedy => "greedy",
            Self::UndoExplorer => "undo-explorer",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::AlwaysA => "Always A",
            Self::AlwaysB => "Always B",
            Self::Alternating => "Alternating",
            Self::Random => "Random",
            Self::Greedy => "Greedy",
            Self::UndoExplorer => "Undo Explorer",
        }
    }

    /// Seeded strategies vary by iteration; the rest play one fixed path.
    #[must_use]
    pub const fn is_seeded(self) -> bool {
        matches!(self, Self::Random | Self::UndoExplorer)
    }

    #[must_use]
    pub fn create_policy(self, seed: u64) -> Box<dyn DecisionPolicy + Send> {
        match self {
            Self::AlwaysA => Box::new(FixedPolicy(ChoiceId::A)),
            Self::AlwaysB => Box::new(FixedPolicy(ChoiceId::B)),
            Self::Alternating => Box::new(AlternatingPolicy),
            Self::Random => Box::new(RandomPolicy::new(seed)),
            Self::Greedy => Box::new(GreedyPolicy),
            Self::UndoExplorer => Box::new(UndoExplorerPolicy::new(seed)),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.key().eq_ignore_ascii_case(needle))
            .ok_or_else(|| format!("unknown strategy '{needle}'"))
    }
}

struct FixedPolicy(ChoiceId);
struct AlternatingPolicy;
struct GreedyPolicy;

struct RandomPolicy {
    rng: ChaCha20Rng,
}

impl RandomPolicy {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

struct UndoExplorerPolicy {
    rng: ChaCha20Rng,
}

impl UndoExplorerPolicy {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed ^ 0x5EED_0F_F00D),
        }
    }
}

/// Replays a fixed path; used by exhaustive sweeps.
pub struct ScriptedPolicy {
    path: ChoicePath,
}

impl ScriptedPolicy {
    #[must_use]
    pub fn new(path: ChoicePath) -> Self {
        Self { path }
    }
}

fn coin(rng: &mut ChaCha20Rng) -> ChoiceId {
    ChoiceId::ALL[usize::from(rng.next_u64() & 1 == 1)]
}

impl DecisionPolicy for FixedPolicy {
    fn name(&self) -> &'static str {
        match self.0 {
            ChoiceId::A => Strategy::AlwaysA.label(),
            ChoiceId::B => Strategy::AlwaysB.label(),
        }
    }

    fn pick(&mut self, _ctx: &DecisionContext) -> PolicyDecision {
        PolicyDecision::new(self.0, None)
    }
}

impl DecisionPolicy for AlternatingPolicy {
    fn name(&self) -> &'static str {
        Strategy::Alternating.label()
    }

    fn pick(&mut self, ctx: &DecisionContext) -> PolicyDecision {
        PolicyDecision::new(ChoiceId::ALL[ctx.level_index % 2], None)
    }
}

impl DecisionPolicy for RandomPolicy {
    fn name(&self) -> &'static str {
        Strategy::Random.label()
    }

    fn pick(&mut self, _ctx: &DecisionContext) -> PolicyDecision {
        PolicyDecision::new(coin(&mut self.rng), None)
    }
}

impl DecisionPolicy for GreedyPolicy {
    fn name(&self) -> &'static str {
        Strategy::Greedy.label()
    }

    fn pick(&mut self, ctx: &DecisionContext) -> PolicyDecision {
        let a = ctx.previews.a;
        let b = ctx.previews.b;
        let choice = if b > a { ChoiceId::B } else { ChoiceId::A };
        let gain = ctx.previews.get(choice) - ctx.current;
        PolicyDecision::new(choice, Some(format!("headline {gain:+.2}")))
    }
}

impl DecisionPolicy for UndoExplorerPolicy {
    fn name(&self) -> &'static str {
        Strategy::UndoExplorer.label()
    }

    fn pick(&mut self, ctx: &DecisionContext) -> PolicyDecision {
        let choice = coin(&mut self.rng);
        let rejected = ctx.previews.get(choice.other());
        PolicyDecision::new(choice, Some(format!("probed {rejected:.2}"))).probing()
    }
}

impl DecisionPolicy for ScriptedPolicy {
    fn name(&self) -> &'static str {
        "Scripted"
    }

    fn pick(&mut self, ctx: &DecisionContext) -> PolicyDecision {
        let choice = self
            .path
            .get(ctx.level_index)
            .copied()
            .unwrap_or(ChoiceId::A);
        PolicyDecision::new(choice, None)
    }
}
