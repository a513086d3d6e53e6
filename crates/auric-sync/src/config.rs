//! Top-level configuration
//!
//! Gathers every module's configuration into one TOML-loadable document.
//! All sections default independently, so a config file only needs to name
//! what it overrides.

use auric_keeper::KeeperConfig;
use auric_ledger::{ApyTable, LedgerConfig};
use auric_quests::QuestConfig;
use auric_skills::SkillConfig;
use serde::{Deserialize, Serialize};

/// Complete Auric configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AuricConfig {
    /// Deposit bounds and early-exit policy
    #[serde(default)]
    pub ledger: LedgerConfig,

    /// Lockup tier table
    #[serde(default)]
    pub apy: ApyTable,

    /// Skill caps and windows
    #[serde(default)]
    pub skills: SkillConfig,

    /// Claim windows for quest/achievement rewards
    #[serde(default)]
    pub quests: QuestConfig,

    /// Keeper cadence
    #[serde(default)]
    pub keeper: KeeperConfig,
}

impl AuricConfig {
    /// Parse a TOML document
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Check cross-field consistency
    pub fn validate(&self) -> bool {
        self.apy.validate() && self.ledger.min_deposit <= self.ledger.max_deposit
    }
}
