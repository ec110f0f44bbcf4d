//! Centralized balance and tuning constants for the boardroom engine.
//!
//! These values define the deterministic math for both game variants.
//! Keeping them together ensures that scoring can only be adjusted via
//! code changes reviewed in version control, rather than through the
//! JSON content assets.

// Logging targets ----------------------------------------------------------
pub(crate) const LOG_TARGET_SESSION: &str = "boardroom::session";
pub(crate) const LOG_TARGET_REPLAY: &str = "boardroom::replay";

// Ticker variant -------------------------------------------------------------
/// Opening share price every ticker run starts from.
pub const BASELINE_PRICE: f64 = 100.0;
pub(crate) const VERDICT_STRONG_BUY_MIN: f64 = 130.0;
pub(crate) const VERDICT_OUTPERFORM_MIN: f64 = 110.0;
pub(crate) const VERDICT_HOLD_MIN: f64 = 90.0;
pub(crate) const VERDICT_UNDERPERFORM_MIN: f64 = 70.0;
/// Final price at or above which the result screen celebrates.
pub(crate) const WINNING_PRICE_MIN: f64 = 110.0;
pub(crate) const SENTIMENT_EUPHORIC_PCT: f64 = 20.0;
pub(crate) const SENTIMENT_BULLISH_PCT: f64 = 10.0;
pub(crate) const SENTIMENT_CAUTIOUS_PCT: f64 = 0.0;
pub(crate) const SENTIMENT_NERVOUS_PCT: f64 = -10.0;

// Scorecard variant: enterprise value ---------------------------------------
pub(crate) const EV_WEIGHT_MV: i32 = 50;
pub(crate) const EV_WEIGHT_TR: i32 = 50;
pub(crate) const EV_WEIGHT_TL: i32 = 25;
pub(crate) const EV_OR_THRESHOLD: i32 = 35;
pub(crate) const EV_OR_EXCESS_PENALTY: i32 = 80;
pub(crate) const EV_NEGATIVE_TL_PENALTY: i32 = 500;
pub(crate) const EV_TIER_EXCEPTIONAL_MIN: i32 = 3_500;
pub(crate) const EV_TIER_SOLID_MIN: i32 = 2_500;
pub(crate) const EV_TIER_PARTIAL_MIN: i32 = 1_500;
/// EV at or above which a scorecard run counts as a win.
pub(crate) const EV_WINNING_MIN: i32 = EV_TIER_EXCEPTIONAL_MIN;

// Scorecard variant: archetype gates -----------------------------------------
pub(crate) const ARCHETYPE_MV_STRONG: i32 = 40;
pub(crate) const ARCHETYPE_TR_ARCHITECT: i32 = 30;
pub(crate) const ARCHETYPE_TR_GUARDIAN: i32 = 35;
pub(crate) const ARCHETYPE_OR_RISKY: i32 = 35;
pub(crate) const ARCHETYPE_EFFICIENCY_TRAP_EV_MIN: i32 = 2_000;

// Scorecard variant: meters --------------------------------------------------
pub(crate) const TARGET_MV: i32 = 40;
pub(crate) const TARGET_TR: i32 = 30;
pub(crate) const TARGET_OR: i32 = 35;
pub(crate) const TARGET_TL: i32 = 0;
/// Values this far below a growth target still read as "on target".
pub(crate) const TARGET_TOLERANCE: i32 = 10;
pub(crate) const RANGE_MV: (i32, i32) = (-20, 80);
pub(crate) const RANGE_TR: (i32, i32) = (-20, 60);
pub(crate) const RANGE_OR: (i32, i32) = (0, 70);
pub(crate) const RANGE_TL: (i32, i32) = (-30, 40);

// Timeline -------------------------------------------------------------------
/// Month shown for each of the six scorecard decisions.
pub const MONTH_MARKERS: [u8; 6] = [1, 3, 6, 9, 12, 15];
/// Decisions in every scorecard storyline.
pub const LEVELS_PER_SCENARIO: usize = MONTH_MARKERS.len();
/// Length of the simulated transformation window.
pub const TOTAL_MONTHS: u8 = 18;

// Reveal timing (milliseconds) ------------------------------------------------
pub(crate) const REVEAL_CALCULATING_MS: u32 = 2_000;
pub(crate) const REVEAL_SCANNING_MS: u32 = 1_500;
pub(crate) const REVEAL_SHOWING_ARCHETYPES_MS: u32 = 1_200;
pub(crate) const REVEAL_HIGHLIGHTING_MS: u32 = 1_000;
pub(crate) const REVEAL_STEPPING_FORWARD_MS: u32 = 1_500;
pub(crate) const REVEAL_FINAL_MS: u32 = 2_500;
pub(crate) const REVEAL_COMPLETE_MS: u32 = 300;

// Cosmetic variation ---------------------------------------------------------
pub(crate) const DOMAIN_TAG_ORDER: &[u8] = b"boardroom/order";
pub(crate) const DOMAIN_TAG_VARIANT: &[u8] = b"boardroom/variant";
