//! Synchronization hub
//!
//! One entry surface for three kinds of callers:
//!
//! 1. **Authorized modules** (marketplace, quest issuer) invoke the
//!    notification protocol; every call is checked against the
//!    authorization table before any state is touched.
//! 2. **End users** act on their own deposits, claims, and opt-ins.
//! 3. **Keepers** drive the auto-compound check/perform cycle.
//!
//! Each entry point has an `*_at` twin taking an explicit timestamp; the
//! undated form stamps the current wall clock.

use crate::authorization::AuthorizationTable;
use crate::config::AuricConfig;
use crate::events::{EventLog, LedgerEvent};
use crate::traits::{ProgressionEvents, ProgressionModule, SkillEvents, SkillModule};
use auric_core::{AchievementId, BasisPoints, ModuleId, QuestId, SkillId, UserId};
use auric_keeper::{AutoCompoundConfig, AutoCompoundKeeper, CompoundOutcome, KeeperError};
use auric_ledger::{CloseOutcome, DepositLedger, LedgerTotals, StakeError, UserDeposit};
use auric_quests::{
    ActionKind, GamificationEngine, PendingReward, QuestError, UserProgress, XpOutcome,
};
use auric_rewards::{RewardEngine, RewardError};
use auric_skills::{
    BoostAggregate, Rarity, SkillEffect, SkillError, SkillRegistry, SkillType, UserSkillProfile,
};
use std::sync::Arc;
use thiserror::Error;

/// The synchronization hub wiring all Auric modules together
pub struct SyncHub {
    /// Trust table for cross-module calls
    auth: AuthorizationTable,

    /// Deposit ledger
    ledger: Arc<DepositLedger>,

    /// Reward accrual engine
    engine: Arc<RewardEngine>,

    /// Skill boost registry
    skills: Arc<SkillRegistry>,

    /// Gamification engine
    quests: Arc<GamificationEngine>,

    /// Auto-compound keeper
    keeper: Arc<AutoCompoundKeeper>,

    /// Skill notification target, injected at construction
    skill_events: Arc<dyn SkillEvents>,

    /// Progression notification target, injected at construction
    progression: Arc<dyn ProgressionEvents>,

    /// Cross-module event history
    events: EventLog,
}

impl SyncHub {
    /// Build and wire every module from one configuration document.
    ///
    /// The `authority` is the configuration address allowed to mutate the
    /// authorization table and skill rarities.
    pub fn new(config: AuricConfig, authority: ModuleId) -> Self {
        let ledger = Arc::new(DepositLedger::new(config.apy.clone(), config.ledger));
        let engine = Arc::new(RewardEngine::new(config.apy));
        let skills = Arc::new(SkillRegistry::new(config.skills));
        let quests = Arc::new(GamificationEngine::new(config.quests));
        let keeper = Arc::new(AutoCompoundKeeper::new(
            ledger.clone(),
            engine.clone(),
            skills.clone(),
            config.keeper,
        ));

        let skill_events: Arc<dyn SkillEvents> = Arc::new(SkillModule::new(skills.clone()));
        let progression: Arc<dyn ProgressionEvents> =
            Arc::new(ProgressionModule::new(quests.clone(), skills.clone()));

        Self {
            auth: AuthorizationTable::new(authority),
            ledger,
            engine,
            skills,
            quests,
            keeper,
            skill_events,
            progression,
            events: EventLog::new(),
        }
    }

    fn now() -> i64 {
        chrono::Utc::now().timestamp()
    }

    fn ensure_authorized(&self, caller: &ModuleId) -> Result<(), SyncError> {
        if !self.auth.is_authorized(caller) {
            tracing::warn!("Unauthorized cross-module call from {}", caller);
            return Err(SyncError::NotAuthorized { module: *caller });
        }
        Ok(())
    }

    /// Bank accrued-so-far yield at the user's current effective rate.
    ///
    /// Called before any mutation that changes the user's aggregate boost,
    /// so the new rate only applies from this timestamp forward.
    fn checkpoint_accrual(&self, user: UserId, now: i64) -> Result<(), SyncError> {
        let deposit = match self.ledger.get_active(&user) {
            Some(d) => d,
            None => return Ok(()),
        };
        let aggregate = self.skills.aggregate(&user);
        let accrued = self.engine.accrue_with_rarity(
            &deposit,
            aggregate.total_boost_bp,
            aggregate.rarity_multiplier,
            now,
        )?;
        self.ledger.bank_accrued(user, accrued, now)?;
        Ok(())
    }

    // === Administration (configuration authority only) ===

    /// Add or remove an authorized module
    pub fn set_authorized(
        &self,
        caller: ModuleId,
        module: ModuleId,
        allowed: bool,
    ) -> Result<(), SyncError> {
        if !self.auth.set_authorized(&caller, module, allowed) {
            return Err(SyncError::NotAuthorized { module: caller });
        }
        Ok(())
    }

    /// Assign a rarity tier to a skill token
    pub fn set_skill_rarity(
        &self,
        caller: ModuleId,
        skill_id: SkillId,
        rarity: Rarity,
    ) -> Result<(), SyncError> {
        self.set_skill_rarity_at(caller, skill_id, rarity, Self::now())
    }

    /// Assign a rarity tier, explicit timestamp
    pub fn set_skill_rarity_at(
        &self,
        caller: ModuleId,
        skill_id: SkillId,
        rarity: Rarity,
        now: i64,
    ) -> Result<(), SyncError> {
        if caller != self.auth.authority() {
            return Err(SyncError::NotAuthorized { module: caller });
        }
        // A rarity change moves the owner's effective rate, so bank first
        if let Some(effect) = self.skills.effect(&skill_id) {
            if effect.is_active {
                self.checkpoint_accrual(effect.owner, now)?;
            }
        }
        self.skills.set_rarity(skill_id, rarity);
        Ok(())
    }

    /// Override a user's active-skill cap
    pub fn set_max_active_skills(
        &self,
        caller: ModuleId,
        user: UserId,
        max: usize,
    ) -> Result<(), SyncError> {
        if caller != self.auth.authority() {
            return Err(SyncError::NotAuthorized { module: caller });
        }
        self.skills.set_max_active_skills(user, max);
        Ok(())
    }

    // === Notification protocol (authorized modules) ===

    /// Skill activated by the marketplace/skills module
    pub fn notify_skill_activation(
        &self,
        caller: ModuleId,
        user: UserId,
        skill_id: SkillId,
        skill_type: SkillType,
        effect_value_bp: BasisPoints,
    ) -> Result<(), SyncError> {
        self.notify_skill_activation_at(caller, user, skill_id, skill_type, effect_value_bp, Self::now())
    }

    /// Skill activated, explicit timestamp
    pub fn notify_skill_activation_at(
        &self,
        caller: ModuleId,
        user: UserId,
        skill_id: SkillId,
        skill_type: SkillType,
        effect_value_bp: BasisPoints,
        now: i64,
    ) -> Result<(), SyncError> {
        self.ensure_authorized(&caller)?;
        self.checkpoint_accrual(user, now)?;
        self.skill_events
            .skill_activated(user, skill_id, skill_type, effect_value_bp, now)?;
        self.events.push(LedgerEvent::SkillActivated {
            module: caller,
            user,
            skill_id,
            effect_value_bp,
            timestamp: now,
        });
        Ok(())
    }

    /// Skill deactivated
    pub fn notify_skill_deactivation(
        &self,
        caller: ModuleId,
        user: UserId,
        skill_id: SkillId,
    ) -> Result<(), SyncError> {
        self.notify_skill_deactivation_at(caller, user, skill_id, Self::now())
    }

    /// Skill deactivated, explicit timestamp
    pub fn notify_skill_deactivation_at(
        &self,
        caller: ModuleId,
        user: UserId,
        skill_id: SkillId,
        now: i64,
    ) -> Result<(), SyncError> {
        self.ensure_authorized(&caller)?;
        self.checkpoint_accrual(user, now)?;
        self.skill_events.skill_deactivated(user, skill_id)?;
        self.events.push(LedgerEvent::SkillDeactivated {
            module: caller,
            user,
            skill_id,
            timestamp: now,
        });
        Ok(())
    }

    /// Quest completed; returns the boosted reward amount granted
    pub fn notify_quest_completion(
        &self,
        caller: ModuleId,
        user: UserId,
        quest_id: QuestId,
        amount: u128,
    ) -> Result<u128, SyncError> {
        self.notify_quest_completion_at(caller, user, quest_id, amount, Self::now())
    }

    /// Quest completed, explicit timestamp
    pub fn notify_quest_completion_at(
        &self,
        caller: ModuleId,
        user: UserId,
        quest_id: QuestId,
        amount: u128,
        now: i64,
    ) -> Result<u128, SyncError> {
        self.ensure_authorized(&caller)?;
        let granted = self.progression.quest_completed(user, quest_id, amount, now)?;
        self.events.push(LedgerEvent::QuestCompleted {
            module: caller,
            user,
            quest_id,
            amount: granted,
            timestamp: now,
        });
        Ok(granted)
    }

    /// Achievement unlocked; returns the boosted reward amount granted
    pub fn notify_achievement_unlocked(
        &self,
        caller: ModuleId,
        user: UserId,
        achievement_id: AchievementId,
        amount: u128,
        expiration_days: u32,
    ) -> Result<u128, SyncError> {
        self.notify_achievement_unlocked_at(
            caller,
            user,
            achievement_id,
            amount,
            expiration_days,
            Self::now(),
        )
    }

    /// Achievement unlocked, explicit timestamp
    pub fn notify_achievement_unlocked_at(
        &self,
        caller: ModuleId,
        user: UserId,
        achievement_id: AchievementId,
        amount: u128,
        expiration_days: u32,
        now: i64,
    ) -> Result<u128, SyncError> {
        self.ensure_authorized(&caller)?;
        let granted =
            self.progression
                .achievement_unlocked(user, achievement_id, amount, expiration_days, now)?;
        self.events.push(LedgerEvent::AchievementUnlocked {
            module: caller,
            user,
            achievement_id,
            amount: granted,
            timestamp: now,
        });
        Ok(granted)
    }

    /// Weighted XP update. The most commonly abused entry point, so the
    /// authorization check happens before anything else is even read.
    pub fn update_user_xp(
        &self,
        caller: ModuleId,
        user: UserId,
        action: ActionKind,
        amount: u128,
    ) -> Result<XpOutcome, SyncError> {
        self.update_user_xp_at(caller, user, action, amount, Self::now())
    }

    /// Weighted XP update, explicit timestamp
    pub fn update_user_xp_at(
        &self,
        caller: ModuleId,
        user: UserId,
        action: ActionKind,
        amount: u128,
        now: i64,
    ) -> Result<XpOutcome, SyncError> {
        self.ensure_authorized(&caller)?;
        let outcome = self.progression.xp_gained(user, action, amount)?;
        self.events.push(LedgerEvent::XpGained {
            module: caller,
            user,
            xp: outcome.xp_gained,
            level: outcome.level,
            timestamp: now,
        });
        Ok(outcome)
    }

    // === Depositor surface ===

    /// Open a deposit under a lockup tier
    pub fn open_deposit(
        &self,
        user: UserId,
        amount: u128,
        tier_index: usize,
    ) -> Result<UserDeposit, SyncError> {
        self.open_deposit_at(user, amount, tier_index, Self::now())
    }

    /// Open a deposit, explicit timestamp
    pub fn open_deposit_at(
        &self,
        user: UserId,
        amount: u128,
        tier_index: usize,
        now: i64,
    ) -> Result<UserDeposit, SyncError> {
        let deposit = self.ledger.open(user, amount, tier_index, now)?;
        self.progression.xp_gained(user, ActionKind::Stake, amount)?;
        self.events.push(LedgerEvent::DepositOpened {
            user,
            amount,
            tier: tier_index,
            timestamp: now,
        });
        Ok(deposit)
    }

    /// Close a deposit and return the principal
    pub fn close_deposit(&self, user: UserId) -> Result<CloseOutcome, SyncError> {
        self.close_deposit_at(user, Self::now())
    }

    /// Close a deposit, explicit timestamp
    pub fn close_deposit_at(&self, user: UserId, now: i64) -> Result<CloseOutcome, SyncError> {
        // Bank the final accrual window so closing pays it out
        self.checkpoint_accrual(user, now)?;
        let outcome = self.ledger.close(user, now)?;
        self.events.push(LedgerEvent::DepositClosed {
            user,
            principal_returned: outcome.principal_returned,
            fee: outcome.fee,
            timestamp: now,
        });
        Ok(outcome)
    }

    /// Claim accrued staking rewards (boosted, with rarity multiplier)
    pub fn claim_staking_rewards(&self, user: UserId) -> Result<u128, SyncError> {
        self.claim_staking_rewards_at(user, Self::now())
    }

    /// Claim accrued staking rewards, explicit timestamp
    pub fn claim_staking_rewards_at(&self, user: UserId, now: i64) -> Result<u128, SyncError> {
        let deposit = self.ledger.get_active(&user).ok_or(StakeError::NotFound)?;
        let aggregate = self.skills.aggregate(&user);
        let accrued = self.engine.accrue_with_rarity(
            &deposit,
            aggregate.total_boost_bp,
            aggregate.rarity_multiplier,
            now,
        )?;
        let total = self.ledger.claim(user, accrued, now)?;
        self.events.push(LedgerEvent::RewardsClaimed {
            user,
            amount: total,
            timestamp: now,
        });
        Ok(total)
    }

    /// Claim a pending quest reward
    pub fn claim_quest_reward(&self, user: UserId, quest_id: QuestId) -> Result<u128, SyncError> {
        self.claim_quest_reward_at(user, quest_id, Self::now())
    }

    /// Claim a pending quest reward, explicit timestamp
    pub fn claim_quest_reward_at(
        &self,
        user: UserId,
        quest_id: QuestId,
        now: i64,
    ) -> Result<u128, SyncError> {
        Ok(self.quests.claim_quest(user, quest_id, now)?)
    }

    /// Claim a pending achievement reward
    pub fn claim_achievement_reward(
        &self,
        user: UserId,
        achievement_id: AchievementId,
    ) -> Result<u128, SyncError> {
        self.claim_achievement_reward_at(user, achievement_id, Self::now())
    }

    /// Claim a pending achievement reward, explicit timestamp
    pub fn claim_achievement_reward_at(
        &self,
        user: UserId,
        achievement_id: AchievementId,
        now: i64,
    ) -> Result<u128, SyncError> {
        Ok(self.quests.claim_achievement(user, achievement_id, now)?)
    }

    /// Sweep a batch of quest rewards into the expired state
    pub fn expire_quest_rewards(&self, user: UserId, quest_ids: &[QuestId]) -> Vec<(QuestId, bool)> {
        self.expire_quest_rewards_at(user, quest_ids, Self::now())
    }

    /// Sweep quest rewards, explicit timestamp
    pub fn expire_quest_rewards_at(
        &self,
        user: UserId,
        quest_ids: &[QuestId],
        now: i64,
    ) -> Vec<(QuestId, bool)> {
        self.quests.expire_quest_rewards(user, quest_ids, now)
    }

    /// Sweep a batch of achievement rewards into the expired state
    pub fn expire_achievement_rewards(
        &self,
        user: UserId,
        achievement_ids: &[AchievementId],
    ) -> Vec<(AchievementId, bool)> {
        self.expire_achievement_rewards_at(user, achievement_ids, Self::now())
    }

    /// Sweep achievement rewards, explicit timestamp
    pub fn expire_achievement_rewards_at(
        &self,
        user: UserId,
        achievement_ids: &[AchievementId],
        now: i64,
    ) -> Vec<(AchievementId, bool)> {
        self.quests.expire_achievement_rewards(user, achievement_ids, now)
    }

    /// Deactivate a user's expired skill effects
    pub fn sweep_expired_skills(&self, user: UserId) -> Result<usize, SyncError> {
        self.sweep_expired_skills_at(user, Self::now())
    }

    /// Deactivate expired skill effects, explicit timestamp.
    ///
    /// The pre-sweep aggregate is banked first: an expired-but-unswept boost
    /// keeps applying until someone sweeps it, and that window is settled at
    /// the old rate.
    pub fn sweep_expired_skills_at(&self, user: UserId, now: i64) -> Result<usize, SyncError> {
        self.checkpoint_accrual(user, now)?;
        Ok(self.skills.sweep_expired(user, now))
    }

    /// Opt a user in or out of auto-compounding
    pub fn set_auto_compound(&self, user: UserId, enabled: bool, min_amount: u128) {
        self.keeper.set_config(user, enabled, min_amount);
    }

    // === Keeper surface ===

    /// Read-only auto-compound check
    pub fn check_auto_compound(&self, user: &UserId) -> (bool, u128) {
        self.check_auto_compound_at(user, Self::now())
    }

    /// Read-only auto-compound check, explicit timestamp
    pub fn check_auto_compound_at(&self, user: &UserId, now: i64) -> (bool, u128) {
        self.keeper.check(user, now)
    }

    /// Execute a compound for one user, then award compound XP
    pub fn perform_auto_compound(&self, user: UserId) -> Result<u128, SyncError> {
        self.perform_auto_compound_at(user, Self::now())
    }

    /// Execute a compound, explicit timestamp
    pub fn perform_auto_compound_at(&self, user: UserId, now: i64) -> Result<u128, SyncError> {
        let reward = self.keeper.perform(user, now)?;
        self.progression.xp_gained(user, ActionKind::Compound, reward)?;
        self.events.push(LedgerEvent::Compounded {
            user,
            reward,
            timestamp: now,
        });
        Ok(reward)
    }

    /// Compound a batch of users; per-user outcomes, no batch abort
    pub fn batch_auto_compound(&self, users: &[UserId]) -> Vec<CompoundOutcome> {
        self.batch_auto_compound_at(users, Self::now())
    }

    /// Compound a batch, explicit timestamp
    pub fn batch_auto_compound_at(&self, users: &[UserId], now: i64) -> Vec<CompoundOutcome> {
        let outcomes = self.keeper.batch(users, now);
        for outcome in &outcomes {
            if let Ok(reward) = outcome.result {
                let _ = self
                    .progression
                    .xp_gained(outcome.user, ActionKind::Compound, reward);
                self.events.push(LedgerEvent::Compounded {
                    user: outcome.user,
                    reward,
                    timestamp: now,
                });
            }
        }
        outcomes
    }

    // === Read-only query surface ===

    /// A depositor's entry
    pub fn deposit_info(&self, user: &UserId) -> Option<UserDeposit> {
        self.ledger.get(user)
    }

    /// Global ledger counters
    pub fn ledger_totals(&self) -> LedgerTotals {
        self.ledger.totals()
    }

    /// A user's skill profile
    pub fn skill_profile(&self, user: &UserId) -> UserSkillProfile {
        self.skills.profile(user)
    }

    /// A user's aggregate boost figures
    pub fn boost_aggregate(&self, user: &UserId) -> BoostAggregate {
        self.skills.aggregate(user)
    }

    /// A user's active skill effects
    pub fn active_skill_effects(&self, user: &UserId) -> Vec<SkillEffect> {
        self.skills.active_effects(user)
    }

    /// A user's progression snapshot
    pub fn progress(&self, user: &UserId) -> UserProgress {
        self.quests.progress(user)
    }

    /// One quest reward entry
    pub fn quest_reward(&self, user: &UserId, quest_id: &QuestId) -> Option<PendingReward> {
        self.quests.quest_reward(user, quest_id)
    }

    /// One achievement reward entry
    pub fn achievement_reward(
        &self,
        user: &UserId,
        achievement_id: &AchievementId,
    ) -> Option<PendingReward> {
        self.quests.achievement_reward(user, achievement_id)
    }

    /// A user's claimable quest rewards, paginated
    pub fn pending_quest_rewards(
        &self,
        user: &UserId,
        offset: usize,
        limit: usize,
    ) -> Vec<(QuestId, PendingReward)> {
        self.quests.pending_quest_rewards(user, offset, limit)
    }

    /// A user's claimable achievement rewards, paginated
    pub fn pending_achievement_rewards(
        &self,
        user: &UserId,
        offset: usize,
        limit: usize,
    ) -> Vec<(AchievementId, PendingReward)> {
        self.quests.pending_achievement_rewards(user, offset, limit)
    }

    /// A user's auto-compound opt-in
    pub fn auto_compound_config(&self, user: &UserId) -> Option<AutoCompoundConfig> {
        self.keeper.config(user)
    }

    /// Opted-in users, paginated, for keeper discovery
    pub fn auto_compound_users(&self, offset: usize, limit: usize) -> Vec<UserId> {
        self.keeper.enabled_users(offset, limit)
    }

    /// The most recent events, oldest first
    pub fn recent_events(&self, count: usize) -> Vec<LedgerEvent> {
        self.events.recent(count)
    }
}

/// Synchronization layer errors
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SyncError {
    #[error("Module {module} is not authorized")]
    NotAuthorized { module: ModuleId },

    #[error(transparent)]
    Stake(#[from] StakeError),

    #[error(transparent)]
    Reward(#[from] RewardError),

    #[error(transparent)]
    Skill(#[from] SkillError),

    #[error(transparent)]
    Quest(#[from] QuestError),

    #[error(transparent)]
    Keeper(#[from] KeeperError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use auric_core::constants::ONE_AUR;

    const DAY: i64 = 86_400;

    fn make_user(id: u8) -> UserId {
        UserId::new([id; 32])
    }

    fn make_module(id: u8) -> ModuleId {
        ModuleId::new([id; 32])
    }

    fn make_hub() -> (SyncHub, ModuleId, ModuleId) {
        let authority = make_module(0);
        let marketplace = make_module(1);
        let hub = SyncHub::new(AuricConfig::default(), authority);
        hub.set_authorized(authority, marketplace, true).unwrap();
        (hub, authority, marketplace)
    }

    #[test]
    fn test_unauthorized_caller_leaves_state_untouched() {
        let (hub, _, _) = make_hub();
        let intruder = make_module(9);
        let user = make_user(1);

        let before_profile = hub.skill_profile(&user);
        let before_progress = hub.progress(&user);

        let result = hub.notify_skill_activation_at(
            intruder,
            user,
            SkillId::new([1; 32]),
            SkillType::StakeBoostI,
            500,
            0,
        );
        assert!(matches!(result, Err(SyncError::NotAuthorized { .. })));

        let result = hub.update_user_xp_at(intruder, user, ActionKind::Stake, 1_000 * ONE_AUR, 0);
        assert!(matches!(result, Err(SyncError::NotAuthorized { .. })));

        let after_profile = hub.skill_profile(&user);
        let after_progress = hub.progress(&user);
        assert_eq!(before_profile.active_skills, after_profile.active_skills);
        assert_eq!(before_profile.total_boost_bp, after_profile.total_boost_bp);
        assert_eq!(before_progress.xp, after_progress.xp);
        assert!(hub.recent_events(10).is_empty());
    }

    #[test]
    fn test_authorized_skill_activation_flows_through() {
        let (hub, _, marketplace) = make_hub();
        let user = make_user(1);

        hub.notify_skill_activation_at(
            marketplace,
            user,
            SkillId::new([1; 32]),
            SkillType::StakeBoostI,
            0,
            0,
        )
        .unwrap();

        let aggregate = hub.boost_aggregate(&user);
        assert_eq!(aggregate.total_boost_bp, 500); // type default substituted
        assert_eq!(hub.recent_events(10).len(), 1);
    }

    #[test]
    fn test_revoked_module_is_rejected() {
        let (hub, authority, marketplace) = make_hub();

        hub.set_authorized(authority, marketplace, false).unwrap();
        let result = hub.notify_skill_deactivation_at(
            marketplace,
            make_user(1),
            SkillId::new([1; 32]),
            0,
        );

        assert!(matches!(result, Err(SyncError::NotAuthorized { .. })));
    }

    #[test]
    fn test_non_authority_cannot_administer() {
        let (hub, _, marketplace) = make_hub();

        let result = hub.set_authorized(marketplace, make_module(7), true);
        assert!(matches!(result, Err(SyncError::NotAuthorized { .. })));

        let result = hub.set_skill_rarity(marketplace, SkillId::new([1; 32]), Rarity::Legendary);
        assert!(matches!(result, Err(SyncError::NotAuthorized { .. })));
    }

    #[test]
    fn test_quest_completion_grants_boosted_reward_and_xp() {
        let (hub, _, marketplace) = make_hub();
        let user = make_user(1);

        // 20% boost active before the quest completes
        hub.notify_skill_activation_at(
            marketplace,
            user,
            SkillId::new([1; 32]),
            SkillType::YieldAmplifier,
            2_000,
            0,
        )
        .unwrap();

        let granted = hub
            .notify_quest_completion_at(marketplace, user, QuestId::new([2; 32]), 50 * ONE_AUR, 0)
            .unwrap();
        assert_eq!(granted, 60 * ONE_AUR);

        let progress = hub.progress(&user);
        assert_eq!(progress.quests_completed, 1);
        assert!(progress.xp > 0);
    }

    #[test]
    fn test_deposit_claim_cycle() {
        let (hub, _, _) = make_hub();
        let user = make_user(1);

        hub.open_deposit_at(user, 1_000 * ONE_AUR, 2, 0).unwrap();
        let reward = hub.claim_staking_rewards_at(user, 30 * DAY).unwrap();

        // ~9.86 AUR at 12% over 30 days
        assert!(reward > 9 * ONE_AUR && reward < 10 * ONE_AUR);
        assert_eq!(hub.ledger_totals().total_rewards_paid, reward);

        // Accrual restarts from the claim
        let immediately_after = hub.claim_staking_rewards_at(user, 30 * DAY).unwrap();
        assert_eq!(immediately_after, 0);
    }

    #[test]
    fn test_stake_earns_xp() {
        let (hub, _, _) = make_hub();
        let user = make_user(1);

        hub.open_deposit_at(user, 1_000 * ONE_AUR, 0, 0).unwrap();
        assert_eq!(hub.progress(&user).xp, 10);
    }

    #[test]
    fn test_level_breakpoint_raises_skill_cap() {
        let (hub, _, marketplace) = make_hub();
        let user = make_user(1);

        // 256 achievement unlocks push the user past level 10
        for _ in 0..256 {
            hub.update_user_xp_at(marketplace, user, ActionKind::AchievementUnlock, 0, 0)
                .unwrap();
        }

        let profile = hub.skill_profile(&user);
        assert!(profile.level >= 10);
        assert_eq!(profile.max_active_skills, 6);
    }
}
