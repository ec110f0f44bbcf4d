//! Display metadata for every outcome the classifiers can select.
//!
//! Classification thresholds live in [`crate::constants`]; this catalog only
//! carries the copy and colours shown for each label. Each table is a typed
//! struct so a missing entry is rejected at parse time instead of at lookup.
use serde::{Deserialize, Serialize};

use crate::data::CatalogError;
use crate::scorecard::{Archetype, EvTier};
use crate::ticker::Verdict;

const DEFAULT_OUTCOME_DATA: &str = include_str!("../assets/data/outcomes.json");

/// Label, narrative and colour for one outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeMeta {
    pub label: String,
    pub description: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerdictTable {
    pub strong_buy: OutcomeMeta,
    pub outperform: OutcomeMeta,
    pub hold: OutcomeMeta,
    pub underperform: OutcomeMeta,
    pub sell: OutcomeMeta,
}

impl VerdictTable {
    #[must_use]
    pub const fn get(&self, verdict: Verdict) -> &OutcomeMeta {
        match verdict {
            Verdict::StrongBuy => &self.strong_buy,
            Verdict::Outperform => &self.outperform,
            Verdict::Hold => &self.hold,
            Verdict::Underperform => &self.underperform,
            Verdict::Sell => &self.sell,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierTable {
    pub exceptional: OutcomeMeta,
    pub solid: OutcomeMeta,
    pub partial: OutcomeMeta,
    pub value_destruction: OutcomeMeta,
}

impl TierTable {
    #[must_use]
    pub const fn get(&self, tier: EvTier) -> &OutcomeMeta {
        match tier {
            EvTier::Exceptional => &self.exceptional,
            EvTier::Solid => &self.solid,
            EvTier::Partial => &self.partial,
            EvTier::ValueDestruction => &self.value_destruction,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchetypeTable {
    pub architect: OutcomeMeta,
    pub velocity_maximizer: OutcomeMeta,
    pub trust_guardian: OutcomeMeta,
    pub efficiency_trap: OutcomeMeta,
    pub cautionary_tale: OutcomeMeta,
}

impl ArchetypeTable {
    #[must_use]
    pub const fn get(&self, archetype: Archetype) -> &OutcomeMeta {
        match archetype {
            Archetype::Architect => &self.architect,
            Archetype::VelocityMaximizer => &self.velocity_maximizer,
            Archetype::TrustGuardian => &self.trust_guardian,
            Archetype::EfficiencyTrap => &self.efficiency_trap,
            Archetype::CautionaryTale => &self.cautionary_tale,
        }
    }
}

/// Outcome display catalog for both variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeCatalog {
    pub verdicts: VerdictTable,
    pub tiers: TierTable,
    pub archetypes: ArchetypeTable,
}

impl OutcomeCatalog {
    /// Load the outcome catalog from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or any outcome lacks metadata.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Self = serde_json::from_str(json).map_err(|source| CatalogError::Parse {
            catalog: "outcome",
            source,
        })?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load the outcome catalog bundled with the crate.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled asset fails to parse.
    pub fn load_from_static() -> Result<Self, CatalogError> {
        Self::from_json(DEFAULT_OUTCOME_DATA)
    }

    /// Reject catalogs where any outcome would render without a label or colour.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::BlankOutcome`] naming the first incomplete entry.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let verdicts = Verdict::ALL.map(|v| (v.key(), self.verdict(v)));
        let tiers = EvTier::ALL.map(|t| (t.key(), self.tier(t)));
        let archetypes = Archetype::ALL.map(|a| (a.key(), self.archetype(a)));
        for (key, meta) in verdicts.into_iter().chain(tiers).chain(archetypes) {
            if meta.label.trim().is_empty() || meta.color.trim().is_empty() {
                return Err(CatalogError::BlankOutcome { key });
            }
        }
        Ok(())
    }

    #[must_use]
    pub const fn verdict(&self, verdict: Verdict) -> &OutcomeMeta {
        self.verdicts.get(verdict)
    }

    #[must_use]
    pub const fn tier(&self, tier: EvTier) -> &OutcomeMeta {
        self.tiers.get(tier)
    }

    #[must_use]
    pub const fn archetype(&self, archetype: Archetype) -> &OutcomeMeta {
        self.archetypes.get(archetype)
    }
}
