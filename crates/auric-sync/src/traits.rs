//! Notification interfaces between modules
//!
//! The hub never calls a concrete module type directly: each peer is held as
//! a trait reference injected at configuration time, so a module can be
//! replaced without touching its callers. The implementing set is closed -
//! the skill registry behind [`SkillEvents`], the gamification engine (with
//! its skill-registry handle for boost reads and level feedback) behind
//! [`ProgressionEvents`].

use crate::hub::SyncError;
use auric_core::{AchievementId, BasisPoints, QuestId, SkillId, UserId};
use auric_quests::{ActionKind, GamificationEngine, XpOutcome};
use auric_skills::{SkillRegistry, SkillType};
use std::sync::Arc;

/// Skill lifecycle notifications
pub trait SkillEvents: Send + Sync {
    /// A skill token was activated for a user
    fn skill_activated(
        &self,
        user: UserId,
        skill_id: SkillId,
        skill_type: SkillType,
        effect_value_bp: BasisPoints,
        now: i64,
    ) -> Result<(), SyncError>;

    /// A skill token was deactivated
    fn skill_deactivated(&self, user: UserId, skill_id: SkillId) -> Result<(), SyncError>;
}

/// Progression notifications: quests, achievements, XP
pub trait ProgressionEvents: Send + Sync {
    /// A quest was completed; returns the (boosted) reward amount granted
    fn quest_completed(
        &self,
        user: UserId,
        quest_id: QuestId,
        amount: u128,
        now: i64,
    ) -> Result<u128, SyncError>;

    /// An achievement was unlocked; returns the (boosted) reward amount granted
    fn achievement_unlocked(
        &self,
        user: UserId,
        achievement_id: AchievementId,
        amount: u128,
        expiration_days: u32,
        now: i64,
    ) -> Result<u128, SyncError>;

    /// Weighted XP gain for an action
    fn xp_gained(&self, user: UserId, action: ActionKind, amount: u128)
        -> Result<XpOutcome, SyncError>;
}

/// The skill registry as a notification target
pub struct SkillModule {
    registry: Arc<SkillRegistry>,
}

impl SkillModule {
    /// Wrap a registry handle
    pub fn new(registry: Arc<SkillRegistry>) -> Self {
        Self { registry }
    }
}

impl SkillEvents for SkillModule {
    fn skill_activated(
        &self,
        user: UserId,
        skill_id: SkillId,
        skill_type: SkillType,
        effect_value_bp: BasisPoints,
        now: i64,
    ) -> Result<(), SyncError> {
        self.registry
            .activate(user, skill_id, skill_type, effect_value_bp, now)?;
        Ok(())
    }

    fn skill_deactivated(&self, user: UserId, skill_id: SkillId) -> Result<(), SyncError> {
        self.registry.deactivate(user, skill_id)?;
        Ok(())
    }
}

/// The gamification engine as a notification target.
///
/// Holds a skill-registry handle for two cross-module reads: the boost
/// aggregate applied to granted rewards, and the level/skill-cap feedback
/// pushed back after an XP update.
pub struct ProgressionModule {
    engine: Arc<GamificationEngine>,
    skills: Arc<SkillRegistry>,
}

impl ProgressionModule {
    /// Wrap engine and registry handles
    pub fn new(engine: Arc<GamificationEngine>, skills: Arc<SkillRegistry>) -> Self {
        Self { engine, skills }
    }

    /// Apply an XP update and propagate level changes into the skill registry
    fn apply_xp(&self, user: UserId, action: ActionKind, amount: u128) -> XpOutcome {
        let outcome = self.engine.update_xp(user, action, amount);
        if outcome.leveled_up {
            self.skills.set_user_level(user, outcome.level);
            if let Some(max) = outcome.new_max_skills {
                self.skills.set_max_active_skills(user, max);
            }
        }
        outcome
    }
}

impl ProgressionEvents for ProgressionModule {
    fn quest_completed(
        &self,
        user: UserId,
        quest_id: QuestId,
        amount: u128,
        now: i64,
    ) -> Result<u128, SyncError> {
        let boost = self.skills.aggregate(&user);
        let reward =
            self.engine
                .grant_quest_reward(user, quest_id, amount, boost.effective_boost_bp, now)?;
        self.apply_xp(user, ActionKind::QuestComplete, amount);
        Ok(reward.amount)
    }

    fn achievement_unlocked(
        &self,
        user: UserId,
        achievement_id: AchievementId,
        amount: u128,
        expiration_days: u32,
        now: i64,
    ) -> Result<u128, SyncError> {
        let boost = self.skills.aggregate(&user);
        let reward = self.engine.grant_achievement_reward(
            user,
            achievement_id,
            amount,
            expiration_days,
            boost.effective_boost_bp,
            now,
        )?;
        self.apply_xp(user, ActionKind::AchievementUnlock, amount);
        Ok(reward.amount)
    }

    fn xp_gained(
        &self,
        user: UserId,
        action: ActionKind,
        amount: u128,
    ) -> Result<XpOutcome, SyncError> {
        Ok(self.apply_xp(user, action, amount))
    }
}
