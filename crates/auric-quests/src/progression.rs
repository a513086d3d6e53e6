//! XP accounting and the level curve
//!
//! ## Level Curve
//!
//! Thresholds start at 100 XP for level 2 and the gap doubles per level
//! (100, 200, 400, ...), capped at level 50.
//!
//! ## Skill-Cap Breakpoints
//!
//! | Level | Max active skills |
//! |-------|-------------------|
//! | 1 | 5 |
//! | 10 | 6 |
//! | 20 | 7 |
//! | 35 | 8 |

use auric_core::constants::ONE_AUR;
use serde::{Deserialize, Serialize};

/// Maximum reachable level
pub const LEVEL_CAP: u32 = 50;

/// Actions that grant XP, each weighted differently
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    /// Opening or growing a deposit
    Stake,
    /// Auto-compound execution
    Compound,
    /// Quest completion
    QuestComplete,
    /// Achievement unlock
    AchievementUnlock,
}

impl ActionKind {
    /// XP granted for an action over the given token amount
    pub fn xp_for(&self, amount: u128) -> u64 {
        match self {
            // 1 XP per 100 AUR staked
            Self::Stake => (amount / (100 * ONE_AUR)) as u64,
            // 1 XP per 200 AUR compounded
            Self::Compound => (amount / (200 * ONE_AUR)) as u64,
            // Flat 50 XP plus 1 per 10 AUR of quest reward
            Self::QuestComplete => 50 + (amount / (10 * ONE_AUR)) as u64,
            // Flat 200 XP
            Self::AchievementUnlock => 200,
        }
    }

    /// Action name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Stake => "Stake",
            Self::Compound => "Compound",
            Self::QuestComplete => "Quest Complete",
            Self::AchievementUnlock => "Achievement Unlock",
        }
    }
}

/// Level implied by a total-XP figure
pub fn level_for_xp(xp: u64) -> u32 {
    let mut level = 1u32;
    let mut threshold = 0u64;
    let mut gap = 100u64;

    while level < LEVEL_CAP && xp >= threshold + gap {
        threshold += gap;
        gap *= 2;
        level += 1;
    }
    level
}

/// Active-skill cap unlocked at a level
pub fn max_skills_for_level(level: u32) -> usize {
    match level {
        0..=9 => 5,
        10..=19 => 6,
        20..=34 => 7,
        _ => 8,
    }
}

/// Per-user progression state
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UserProgress {
    /// Total XP, monotonic
    pub xp: u64,

    /// Level derived from XP
    pub level: u32,

    /// XP earned from staking actions
    pub xp_from_stake: u64,

    /// XP earned from compounding
    pub xp_from_compound: u64,

    /// XP earned from quests
    pub xp_from_quests: u64,

    /// XP earned from achievements
    pub xp_from_achievements: u64,

    /// Quests completed
    pub quests_completed: u64,

    /// Achievements unlocked
    pub achievements_unlocked: u64,

    /// Bonus rewards claimed out, in base units
    pub total_rewards_claimed: u128,
}

impl UserProgress {
    /// Fresh level-1 progression
    pub fn new() -> Self {
        Self {
            level: 1,
            ..Default::default()
        }
    }
}

/// Result of an XP update
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct XpOutcome {
    /// XP granted by this update
    pub xp_gained: u64,

    /// New XP total
    pub total_xp: u64,

    /// Level after the update
    pub level: u32,

    /// Did the update cross a level threshold
    pub leveled_up: bool,

    /// New active-skill cap, set when a breakpoint was crossed
    pub new_max_skills: Option<usize>,
}
