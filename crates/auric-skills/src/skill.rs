//! Skill types, rarity tiers, and active effect instances
//!
//! ## Rarity Multipliers
//!
//! | Rarity | Multiplier |
//! |--------|------------|
//! | Common | 1.00x |
//! | Uncommon | 1.50x |
//! | Rare | 2.00x |
//! | Epic | 3.00x |
//! | Legendary | 5.00x |

use auric_core::{BasisPoints, SkillId, UserId};
use serde::{Deserialize, Serialize};

/// Skill kinds a depositor can hold as owned tokens
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillType {
    /// Flat stake yield boost, tier I
    StakeBoostI,
    /// Flat stake yield boost, tier II
    StakeBoostII,
    /// Flat stake yield boost, tier III
    StakeBoostIII,
    /// Large yield boost for long-term holders
    YieldAmplifier,
    /// Boosts compounded yield and unlocks auto-compound
    CompoundMaster,
    /// Extra XP from quest completions
    QuestXpBoost,
    /// Extra XP from achievement unlocks
    AchievementXpBoost,
    /// Reduces early-exit fees
    FeeReduction,
    /// Rewards committing to longer lockups
    LockExtender,
    /// Small boost available from the first day of a lock
    EarlyHarvest,
    /// Strengthens the effect of higher-rarity skills
    RarityAttunement,
    /// Chance-themed bonus yield
    FortunesFavor,
    /// Rewards unbroken staking streaks
    IronDiscipline,
    /// Faster claim cadence bonus
    SwiftClaim,
    /// Grows with total time staked
    DeepRoots,
    /// Guild-affiliation bonus
    GuildBanner,
    /// Time-weighted bonus curve
    TimeWeaver,
    /// Crafting-mastery bonus
    MasterForger,
}

impl SkillType {
    /// Default boost in basis points, substituted when a skill is activated
    /// with an effect value of zero
    pub fn default_boost_bp(&self) -> BasisPoints {
        match self {
            Self::StakeBoostI => 500,
            Self::StakeBoostII => 1_000,
            Self::StakeBoostIII => 1_500,
            Self::YieldAmplifier => 2_000,
            Self::CompoundMaster => 750,
            Self::QuestXpBoost => 300,
            Self::AchievementXpBoost => 300,
            Self::FeeReduction => 250,
            Self::LockExtender => 400,
            Self::EarlyHarvest => 200,
            Self::RarityAttunement => 350,
            Self::FortunesFavor => 600,
            Self::IronDiscipline => 450,
            Self::SwiftClaim => 150,
            Self::DeepRoots => 800,
            Self::GuildBanner => 100,
            Self::TimeWeaver => 550,
            Self::MasterForger => 1_200,
        }
    }

    /// Human-readable skill name
    pub fn name(&self) -> &'static str {
        match self {
            Self::StakeBoostI => "Stake Boost I",
            Self::StakeBoostII => "Stake Boost II",
            Self::StakeBoostIII => "Stake Boost III",
            Self::YieldAmplifier => "Yield Amplifier",
            Self::CompoundMaster => "Compound Master",
            Self::QuestXpBoost => "Quest XP Boost",
            Self::AchievementXpBoost => "Achievement XP Boost",
            Self::FeeReduction => "Fee Reduction",
            Self::LockExtender => "Lock Extender",
            Self::EarlyHarvest => "Early Harvest",
            Self::RarityAttunement => "Rarity Attunement",
            Self::FortunesFavor => "Fortune's Favor",
            Self::IronDiscipline => "Iron Discipline",
            Self::SwiftClaim => "Swift Claim",
            Self::DeepRoots => "Deep Roots",
            Self::GuildBanner => "Guild Banner",
            Self::TimeWeaver => "Time Weaver",
            Self::MasterForger => "Master Forger",
        }
    }
}

/// Rarity tiers, ordered lowest to highest
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    /// Reward multiplier in percent (100 = 1.0x)
    pub fn multiplier(&self) -> u32 {
        match self {
            Self::Common => 100,
            Self::Uncommon => 150,
            Self::Rare => 200,
            Self::Epic => 300,
            Self::Legendary => 500,
        }
    }

    /// Rarity tier name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Common => "Common",
            Self::Uncommon => "Uncommon",
            Self::Rare => "Rare",
            Self::Epic => "Epic",
            Self::Legendary => "Legendary",
        }
    }
}

/// One active boost instance tied to an owned skill token
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SkillEffect {
    /// The owned skill token this effect comes from
    pub skill_id: SkillId,

    /// Owning depositor
    pub owner: UserId,

    /// Skill kind
    pub skill_type: SkillType,

    /// Boost contribution in basis points (defaulted if activated with zero)
    pub effect_value_bp: BasisPoints,

    /// Rarity tier at activation
    pub rarity: Rarity,

    /// Activation timestamp
    pub activated_at: i64,

    /// Same skill type cannot reactivate before this timestamp
    pub cooldown_ends: i64,

    /// Is effect active
    pub is_active: bool,
}

impl SkillEffect {
    /// Check whether the effect window has elapsed
    pub fn is_expired(&self, effect_duration_secs: u64, now: i64) -> bool {
        now >= self.activated_at + effect_duration_secs as i64
    }
}
