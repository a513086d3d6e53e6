//! Gamification engine manager

use crate::progression::{level_for_xp, max_skills_for_level, ActionKind, UserProgress, XpOutcome};
use crate::rewards::PendingReward;
use auric_core::constants::{SECONDS_PER_DAY, SECONDS_PER_YEAR};
use auric_core::{apply_bp, AchievementId, BasisPoints, QuestId, UserId};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Gamification configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuestConfig {
    /// Claim window for quest rewards, in seconds
    #[serde(default = "default_quest_ttl")]
    pub quest_reward_ttl_secs: u64,

    /// Claim window cap for achievement rewards, in days
    #[serde(default = "default_max_achievement_days")]
    pub max_achievement_expiration_days: u32,
}

fn default_quest_ttl() -> u64 {
    7 * SECONDS_PER_DAY as u64
}

fn default_max_achievement_days() -> u32 {
    (SECONDS_PER_YEAR / SECONDS_PER_DAY as u64) as u32
}

impl Default for QuestConfig {
    fn default() -> Self {
        Self {
            quest_reward_ttl_secs: default_quest_ttl(),
            max_achievement_expiration_days: default_max_achievement_days(),
        }
    }
}

/// XP totals, levels, and pending quest/achievement rewards
pub struct GamificationEngine {
    /// Per-user progression
    progress: RwLock<HashMap<UserId, UserProgress>>,

    /// Pending quest rewards keyed by (user, quest)
    quest_rewards: RwLock<HashMap<(UserId, QuestId), PendingReward>>,

    /// Pending achievement rewards keyed by (user, achievement)
    achievement_rewards: RwLock<HashMap<(UserId, AchievementId), PendingReward>>,

    /// Claim windows
    config: QuestConfig,
}

impl GamificationEngine {
    /// Create an engine
    pub fn new(config: QuestConfig) -> Self {
        Self {
            progress: RwLock::new(HashMap::new()),
            quest_rewards: RwLock::new(HashMap::new()),
            achievement_rewards: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Apply a weighted XP update for an action.
    ///
    /// Returns the level transition so the caller can propagate a raised
    /// skill cap when a breakpoint is crossed.
    pub fn update_xp(&self, user: UserId, action: ActionKind, amount: u128) -> XpOutcome {
        let mut progress = self.progress.write();
        let entry = progress.entry(user).or_insert_with(UserProgress::new);

        let xp_gained = action.xp_for(amount);
        let old_level = entry.level;

        entry.xp = entry.xp.saturating_add(xp_gained);
        match action {
            ActionKind::Stake => entry.xp_from_stake += xp_gained,
            ActionKind::Compound => entry.xp_from_compound += xp_gained,
            ActionKind::QuestComplete => entry.xp_from_quests += xp_gained,
            ActionKind::AchievementUnlock => entry.xp_from_achievements += xp_gained,
        }
        entry.level = level_for_xp(entry.xp);

        let leveled_up = entry.level > old_level;
        let new_max_skills = if leveled_up
            && max_skills_for_level(entry.level) > max_skills_for_level(old_level)
        {
            Some(max_skills_for_level(entry.level))
        } else {
            None
        };

        if leveled_up {
            tracing::info!(
                "Level up: user={} level={} xp={}",
                user,
                entry.level,
                entry.xp
            );
        }

        XpOutcome {
            xp_gained,
            total_xp: entry.xp,
            level: entry.level,
            leveled_up,
            new_max_skills,
        }
    }

    /// Create a pending quest reward. The user's effective skill boost is
    /// applied to the granted amount; the claim window comes from config.
    pub fn grant_quest_reward(
        &self,
        user: UserId,
        quest_id: QuestId,
        amount: u128,
        effective_boost_bp: BasisPoints,
        now: i64,
    ) -> Result<PendingReward, QuestError> {
        let boosted = amount.saturating_add(apply_bp(amount, effective_boost_bp));
        let reward = PendingReward::new(
            boosted,
            now,
            now + self.config.quest_reward_ttl_secs as i64,
        );

        let mut rewards = self.quest_rewards.write();
        if let Some(existing) = rewards.get(&(user, quest_id)) {
            if !existing.is_terminal() {
                return Err(QuestError::AlreadyGranted);
            }
        }
        rewards.insert((user, quest_id), reward.clone());

        self.progress
            .write()
            .entry(user)
            .or_insert_with(UserProgress::new)
            .quests_completed += 1;

        tracing::info!(
            "Quest reward granted: user={} quest={} amount={}",
            user,
            quest_id,
            boosted
        );
        Ok(reward)
    }

    /// Create a pending achievement reward with an explicit claim window in
    /// days (clamped to the configured cap).
    pub fn grant_achievement_reward(
        &self,
        user: UserId,
        achievement_id: AchievementId,
        amount: u128,
        expiration_days: u32,
        effective_boost_bp: BasisPoints,
        now: i64,
    ) -> Result<PendingReward, QuestError> {
        let days = expiration_days.min(self.config.max_achievement_expiration_days);
        let boosted = amount.saturating_add(apply_bp(amount, effective_boost_bp));
        let reward = PendingReward::new(boosted, now, now + days as i64 * SECONDS_PER_DAY);

        let mut rewards = self.achievement_rewards.write();
        if let Some(existing) = rewards.get(&(user, achievement_id)) {
            if !existing.is_terminal() {
                return Err(QuestError::AlreadyGranted);
            }
        }
        rewards.insert((user, achievement_id), reward.clone());

        self.progress
            .write()
            .entry(user)
            .or_insert_with(UserProgress::new)
            .achievements_unlocked += 1;

        tracing::info!(
            "Achievement reward granted: user={} achievement={} amount={}",
            user,
            achievement_id,
            boosted
        );
        Ok(reward)
    }

    /// Claim a quest reward. Fails on unknown, already-claimed, or expired
    /// entries; on success the amount is returned exactly once.
    pub fn claim_quest(&self, user: UserId, quest_id: QuestId, now: i64) -> Result<u128, QuestError> {
        let mut rewards = self.quest_rewards.write();
        let reward = rewards
            .get_mut(&(user, quest_id))
            .ok_or(QuestError::RewardNotFound)?;
        Self::claim_entry(reward, now)?;
        let amount = reward.amount;
        drop(rewards);

        self.progress
            .write()
            .entry(user)
            .or_insert_with(UserProgress::new)
            .total_rewards_claimed += amount;

        tracing::info!("Quest reward claimed: user={} quest={}", user, quest_id);
        Ok(amount)
    }

    /// Claim an achievement reward
    pub fn claim_achievement(
        &self,
        user: UserId,
        achievement_id: AchievementId,
        now: i64,
    ) -> Result<u128, QuestError> {
        let mut rewards = self.achievement_rewards.write();
        let reward = rewards
            .get_mut(&(user, achievement_id))
            .ok_or(QuestError::RewardNotFound)?;
        Self::claim_entry(reward, now)?;
        let amount = reward.amount;
        drop(rewards);

        self.progress
            .write()
            .entry(user)
            .or_insert_with(UserProgress::new)
            .total_rewards_claimed += amount;

        tracing::info!(
            "Achievement reward claimed: user={} achievement={}",
            user,
            achievement_id
        );
        Ok(amount)
    }

    fn claim_entry(reward: &mut PendingReward, now: i64) -> Result<(), QuestError> {
        if reward.claimed {
            return Err(QuestError::AlreadyClaimed);
        }
        if reward.expired || reward.is_past_expiry(now) {
            return Err(QuestError::Expired);
        }
        reward.claimed = true;
        Ok(())
    }

    /// Sweep a batch of quest rewards into the expired state. Each element is
    /// processed independently; the flag records whether that entry was swept
    /// by this call. Safe to retry.
    pub fn expire_quest_rewards(
        &self,
        user: UserId,
        quest_ids: &[QuestId],
        now: i64,
    ) -> Vec<(QuestId, bool)> {
        let mut rewards = self.quest_rewards.write();
        quest_ids
            .iter()
            .map(|id| (*id, Self::expire_entry(rewards.get_mut(&(user, *id)), now)))
            .collect()
    }

    /// Sweep a batch of achievement rewards into the expired state
    pub fn expire_achievement_rewards(
        &self,
        user: UserId,
        achievement_ids: &[AchievementId],
        now: i64,
    ) -> Vec<(AchievementId, bool)> {
        let mut rewards = self.achievement_rewards.write();
        achievement_ids
            .iter()
            .map(|id| (*id, Self::expire_entry(rewards.get_mut(&(user, *id)), now)))
            .collect()
    }

    fn expire_entry(reward: Option<&mut PendingReward>, now: i64) -> bool {
        match reward {
            Some(r) if !r.is_terminal() && r.is_past_expiry(now) => {
                r.expired = true;
                true
            }
            _ => false,
        }
    }

    /// One quest reward entry
    pub fn quest_reward(&self, user: &UserId, quest_id: &QuestId) -> Option<PendingReward> {
        self.quest_rewards.read().get(&(*user, *quest_id)).cloned()
    }

    /// One achievement reward entry
    pub fn achievement_reward(
        &self,
        user: &UserId,
        achievement_id: &AchievementId,
    ) -> Option<PendingReward> {
        self.achievement_rewards
            .read()
            .get(&(*user, *achievement_id))
            .cloned()
    }

    /// A user's claimable quest rewards, oldest grant first, paginated
    pub fn pending_quest_rewards(
        &self,
        user: &UserId,
        offset: usize,
        limit: usize,
    ) -> Vec<(QuestId, PendingReward)> {
        let rewards = self.quest_rewards.read();
        let mut pending: Vec<(QuestId, PendingReward)> = rewards
            .iter()
            .filter(|((owner, _), reward)| owner == user && !reward.is_terminal())
            .map(|((_, id), reward)| (*id, reward.clone()))
            .collect();
        pending.sort_by_key(|(id, reward)| (reward.granted_at, *id));
        pending.into_iter().skip(offset).take(limit).collect()
    }

    /// A user's claimable achievement rewards, oldest grant first, paginated
    pub fn pending_achievement_rewards(
        &self,
        user: &UserId,
        offset: usize,
        limit: usize,
    ) -> Vec<(AchievementId, PendingReward)> {
        let rewards = self.achievement_rewards.read();
        let mut pending: Vec<(AchievementId, PendingReward)> = rewards
            .iter()
            .filter(|((owner, _), reward)| owner == user && !reward.is_terminal())
            .map(|((_, id), reward)| (*id, reward.clone()))
            .collect();
        pending.sort_by_key(|(id, reward)| (reward.granted_at, *id));
        pending.into_iter().skip(offset).take(limit).collect()
    }

    /// Snapshot of a user's progression
    pub fn progress(&self, user: &UserId) -> UserProgress {
        self.progress
            .read()
            .get(user)
            .cloned()
            .unwrap_or_else(UserProgress::new)
    }
}

/// Gamification errors
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum QuestError {
    #[error("Reward not found")]
    RewardNotFound,

    #[error("Reward already claimed")]
    AlreadyClaimed,

    #[error("Reward expired")]
    Expired,

    #[error("An unclaimed reward for this id already exists")]
    AlreadyGranted,
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: i64 = 86_400;

    fn make_user(id: u8) -> UserId {
        UserId::new([id; 32])
    }

    fn make_quest(id: u8) -> QuestId {
        QuestId::new([id; 32])
    }

    fn make_achievement(id: u8) -> AchievementId {
        AchievementId::new([id; 32])
    }

    fn make_engine() -> GamificationEngine {
        GamificationEngine::new(QuestConfig::default())
    }

    #[test]
    fn test_grant_and_claim_once() {
        let engine = make_engine();
        let user = make_user(1);
        let quest = make_quest(1);

        engine.grant_quest_reward(user, quest, 50, 0, 0).unwrap();
        let amount = engine.claim_quest(user, quest, DAY).unwrap();
        assert_eq!(amount, 50);

        // Second claim fails and pays nothing
        assert_eq!(
            engine.claim_quest(user, quest, DAY).unwrap_err(),
            QuestError::AlreadyClaimed
        );
        assert_eq!(engine.progress(&user).total_rewards_claimed, 50);
    }

    #[test]
    fn test_boost_applied_at_grant() {
        let engine = make_engine();
        let user = make_user(1);

        // 50 units with a 20% effective boost
        let reward = engine
            .grant_quest_reward(user, make_quest(1), 50, 2_000, 0)
            .unwrap();
        assert_eq!(reward.amount, 60);
    }

    #[test]
    fn test_quest_reward_expires_after_window() {
        let engine = make_engine();
        let user = make_user(1);
        let quest = make_quest(1);

        engine.grant_quest_reward(user, quest, 50, 0, 0).unwrap();

        // Unclaimed after 8 days: sweepable, then un-claimable
        let swept = engine.expire_quest_rewards(user, &[quest], 8 * DAY);
        assert_eq!(swept, vec![(quest, true)]);
        assert_eq!(
            engine.claim_quest(user, quest, 8 * DAY).unwrap_err(),
            QuestError::Expired
        );

        // Re-sweeping is a no-op, not an error
        let swept = engine.expire_quest_rewards(user, &[quest], 9 * DAY);
        assert_eq!(swept, vec![(quest, false)]);
    }

    #[test]
    fn test_claim_past_expiry_fails_without_sweep() {
        let engine = make_engine();
        let user = make_user(1);
        let quest = make_quest(1);

        engine.grant_quest_reward(user, quest, 50, 0, 0).unwrap();
        assert_eq!(
            engine.claim_quest(user, quest, 8 * DAY).unwrap_err(),
            QuestError::Expired
        );
    }

    #[test]
    fn test_sweep_skips_unexpired_and_unknown_entries() {
        let engine = make_engine();
        let user = make_user(1);
        let fresh = make_quest(1);
        let unknown = make_quest(2);

        engine.grant_quest_reward(user, fresh, 50, 0, 0).unwrap();
        let swept = engine.expire_quest_rewards(user, &[fresh, unknown], DAY);

        assert_eq!(swept, vec![(fresh, false), (unknown, false)]);
        // Still claimable
        assert!(engine.claim_quest(user, fresh, DAY).is_ok());
    }

    #[test]
    fn test_regrant_only_after_terminal() {
        let engine = make_engine();
        let user = make_user(1);
        let quest = make_quest(1);

        engine.grant_quest_reward(user, quest, 50, 0, 0).unwrap();
        assert_eq!(
            engine
                .grant_quest_reward(user, quest, 50, 0, DAY)
                .unwrap_err(),
            QuestError::AlreadyGranted
        );

        engine.claim_quest(user, quest, DAY).unwrap();
        engine.grant_quest_reward(user, quest, 75, 0, 2 * DAY).unwrap();
        assert_eq!(engine.claim_quest(user, quest, 3 * DAY).unwrap(), 75);
    }

    #[test]
    fn test_achievement_expiration_days() {
        let engine = make_engine();
        let user = make_user(1);
        let achievement = make_achievement(1);

        engine
            .grant_achievement_reward(user, achievement, 100, 3, 0, 0)
            .unwrap();

        assert_eq!(
            engine
                .claim_achievement(user, achievement, 4 * DAY)
                .unwrap_err(),
            QuestError::Expired
        );
    }

    #[test]
    fn test_xp_level_up_reports_skill_cap() {
        let engine = make_engine();
        let user = make_user(1);

        // Enough achievement XP to cross level 10 (threshold 51,100)
        for _ in 0..256 {
            engine.update_xp(user, ActionKind::AchievementUnlock, 0);
        }
        let progress = engine.progress(&user);
        assert!(progress.level >= 10);

        // Replaying the climb step by step must have produced exactly one
        // breakpoint crossing at level 10
        let fresh_engine = make_engine();
        let mut cap_updates = Vec::new();
        for _ in 0..256 {
            let outcome = fresh_engine.update_xp(user, ActionKind::AchievementUnlock, 0);
            if let Some(cap) = outcome.new_max_skills {
                cap_updates.push((outcome.level, cap));
            }
        }
        assert_eq!(cap_updates, vec![(10, 6)]);
    }

    #[test]
    fn test_pending_rewards_pagination() {
        let engine = make_engine();
        let user = make_user(1);

        for i in 0..5u8 {
            engine
                .grant_quest_reward(user, make_quest(i), 10 + i as u128, 0, i as i64)
                .unwrap();
        }
        engine.claim_quest(user, make_quest(0), 10).unwrap();

        let page = engine.pending_quest_rewards(&user, 0, 2);
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].0, make_quest(1));
        assert_eq!(page[1].0, make_quest(2));

        let rest = engine.pending_quest_rewards(&user, 2, 10);
        assert_eq!(rest.len(), 2);
    }

    #[test]
    fn test_progress_counters() {
        let engine = make_engine();
        let user = make_user(1);

        engine.grant_quest_reward(user, make_quest(1), 50, 0, 0).unwrap();
        engine
            .grant_achievement_reward(user, make_achievement(1), 100, 7, 0, 0)
            .unwrap();

        let progress = engine.progress(&user);
        assert_eq!(progress.quests_completed, 1);
        assert_eq!(progress.achievements_unlocked, 1);
    }
}
