//! Price bands for the final analyst verdict and the live sentiment gauge.
use serde::{Deserialize, Serialize};

use crate::constants::{
    BASELINE_PRICE, SENTIMENT_BULLISH_PCT, SENTIMENT_CAUTIOUS_PCT, SENTIMENT_EUPHORIC_PCT,
    SENTIMENT_NERVOUS_PCT, VERDICT_HOLD_MIN, VERDICT_OUTPERFORM_MIN, VERDICT_STRONG_BUY_MIN,
    VERDICT_UNDERPERFORM_MIN, WINNING_PRICE_MIN,
};
use crate::outcomes::{OutcomeCatalog, OutcomeMeta};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    StrongBuy,
    Outperform,
    Hold,
    Underperform,
    Sell,
}

impl Verdict {
    /// Best to worst.
    pub const ALL: [Self; 5] = [
        Self::StrongBuy,
        Self::Outperform,
        Self::Hold,
        Self::Underperform,
        Self::Sell,
    ];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::StrongBuy => "strong_buy",
            Self::Outperform => "outperform",
            Self::Hold => "hold",
            Self::Underperform => "underperform",
            Self::Sell => "sell",
        }
    }
}

/// Classify a final price. Bands are checked top-down; NaN falls through to `Sell`.
#[must_use]
pub fn classify_price(price: f64) -> Verdict {
    if price >= VERDICT_STRONG_BUY_MIN {
        Verdict::StrongBuy
    } else if price >= VERDICT_OUTPERFORM_MIN {
        Verdict::Outperform
    } else if price >= VERDICT_HOLD_MIN {
        Verdict::Hold
    } else if price >= VERDICT_UNDERPERFORM_MIN {
        Verdict::Underperform
    } else {
        Verdict::Sell
    }
}

#[must_use]
pub fn is_winning_price(price: f64) -> bool {
    price >= WINNING_PRICE_MIN
}

/// Final ticker outcome with its display copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketVerdict {
    pub verdict: Verdict,
    pub final_price: f64,
    pub winning: bool,
    pub meta: OutcomeMeta,
}

impl MarketVerdict {
    #[must_use]
    pub fn from_price(price: f64, outcomes: &OutcomeCatalog) -> Self {
        let verdict = classify_price(price);
        Self {
            verdict,
            final_price: price,
            winning: is_winning_price(price),
            meta: outcomes.verdict(verdict).clone(),
        }
    }
}

/// Mood gauge shown next to the tape while decisions are still open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketSentiment {
    Euphoric,
    Bullish,
    Cautious,
    Nervous,
    Panic,
}

impl MarketSentiment {
    #[must_use]
    pub fn from_price(price: f64) -> Self {
        let pct = (price - BASELINE_PRICE) / BASELINE_PRICE * 100.0;
        if pct >= SENTIMENT_EUPHORIC_PCT {
            Self::Euphoric
        } else if pct >= SENTIMENT_BULLISH_PCT {
            Self::Bullish
        } else if pct >= SENTIMENT_CAUTIOUS_PCT {
            Self::Cautious
        } else if pct >= SENTIMENT_NERVOUS_PCT {
            Self::Nervous
        } else {
            Self::Panic
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Euphoric => "EUPHORIC",
            Self::Bullish => "BULLISH",
            Self::Cautious => "CAUTIOUS",
            Self::Nervous => "NERVOUS",
            Self::Panic => "PANIC",
        }
    }
}
