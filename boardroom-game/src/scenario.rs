//! Industry and crisis selectors that key the scorecard catalog.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Industry {
    Financial,
    Healthcare,
    Retail,
    Tech,
}

impl Industry {
    pub const ALL: [Self; 4] = [Self::Financial, Self::Healthcare, Self::Retail, Self::Tech];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Financial => "financial",
            Self::Healthcare => "healthcare",
            Self::Retail => "retail",
            Self::Tech => "tech",
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Financial => "Financial Services",
            Self::Healthcare => "Healthcare",
            Self::Retail => "Retail & Consumer",
            Self::Tech => "Technology",
        }
    }

    #[must_use]
    pub const fn blurb(self) -> &'static str {
        match self {
            Self::Financial => "Banks, insurers and wealth managers facing AI-native challengers.",
            Self::Healthcare => "Providers and payers balancing clinical safety with automation.",
            Self::Retail => "Brands and marketplaces where margins meet personalisation.",
            Self::Tech => "Enterprise software platforms racing to embed AI.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Crisis {
    Competitor,
    Breach,
    Market,
    Product,
}

impl Crisis {
    pub const ALL: [Self; 4] = [Self::Competitor, Self::Breach, Self::Market, Self::Product];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Competitor => "competitor",
            Self::Breach => "breach",
            Self::Market => "market",
            Self::Product => "product",
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Competitor => "AI-Native Competitor",
            Self::Breach => "Data Breach",
            Self::Market => "Market Downturn",
            Self::Product => "Product Failure",
        }
    }

    #[must_use]
    pub const fn blurb(self) -> &'static str {
        match self {
            Self::Competitor => "A disruptor is taking share with an AI-first offering.",
            Self::Breach => "Customer data has leaked and trust is collapsing.",
            Self::Market => "Budgets are slashed and revenue is falling.",
            Self::Product => "Your own AI system failed in production.",
        }
    }
}

impl FromStr for Industry {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|industry| industry.key() == needle)
            .ok_or_else(|| format!("unknown industry '{s}'"))
    }
}

impl FromStr for Crisis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|crisis| crisis.key() == needle)
            .ok_or_else(|| format!("unknown crisis '{s}'"))
    }
}

/// Selector pair choosing one of the sixteen scorecard storylines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ScenarioKey {
    pub industry: Industry,
    pub crisis: Crisis,
}

impl ScenarioKey {
    #[must_use]
    pub const fn new(industry: Industry, crisis: Crisis) -> Self {
        Self { industry, crisis }
    }

    /// Every industry/crisis pairing, industry-major.
    pub fn all() -> impl Iterator<Item = Self> {
        Industry::ALL
            .into_iter()
            .flat_map(|industry| {
                Crisis::ALL
                    .into_iter()
                    .map(move |crisis| Self::new(industry, crisis))
            })
    }
}

impl fmt::Display for ScenarioKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.industry.key(), self.crisis.key())
    }
}

impl FromStr for ScenarioKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (industry, crisis) = s
            .split_once(':')
            .ok_or_else(|| format!("scenario '{s}' must look like industry:crisis"))?;
        Ok(Self::new(industry.parse()?, crisis.parse()?))
    }
}
