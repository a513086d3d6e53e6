//! Auto-compound keeper

use auric_core::UserId;
use auric_ledger::{DepositLedger, StakeError};
use auric_rewards::{RewardEngine, RewardError};
use auric_skills::SkillRegistry;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Per-user auto-compound opt-in
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AutoCompoundConfig {
    /// Is auto-compound enabled
    pub enabled: bool,

    /// Minimum accrued reward before a compound fires
    pub min_amount: u128,

    /// Last compound execution timestamp
    pub last_compound_time: i64,
}

/// Keeper-wide settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KeeperConfig {
    /// Minimum seconds between compounds for one user
    #[serde(default = "default_min_interval")]
    pub min_interval_secs: u64,
}

fn default_min_interval() -> u64 {
    3_600
}

impl Default for KeeperConfig {
    fn default() -> Self {
        Self {
            min_interval_secs: default_min_interval(),
        }
    }
}

/// Per-user result of a batch run
#[derive(Clone, Debug)]
pub struct CompoundOutcome {
    /// The user this entry is for
    pub user: UserId,

    /// Compounded amount, or why this user was skipped
    pub result: Result<u128, KeeperError>,
}

/// Auto-compound scheduler
pub struct AutoCompoundKeeper {
    /// Deposit ledger (principal mutations)
    ledger: Arc<DepositLedger>,

    /// Accrual engine (reward reads)
    engine: Arc<RewardEngine>,

    /// Skill registry (boost aggregates)
    skills: Arc<SkillRegistry>,

    /// Per-user opt-in settings
    configs: RwLock<HashMap<UserId, AutoCompoundConfig>>,

    /// Keeper-wide settings
    keeper_config: KeeperConfig,
}

impl AutoCompoundKeeper {
    /// Create a keeper over the ledger, engine, and registry
    pub fn new(
        ledger: Arc<DepositLedger>,
        engine: Arc<RewardEngine>,
        skills: Arc<SkillRegistry>,
        keeper_config: KeeperConfig,
    ) -> Self {
        Self {
            ledger,
            engine,
            skills,
            configs: RwLock::new(HashMap::new()),
            keeper_config,
        }
    }

    /// Create or update a user's opt-in
    pub fn set_config(&self, user: UserId, enabled: bool, min_amount: u128) {
        let mut configs = self.configs.write();
        let entry = configs.entry(user).or_default();
        entry.enabled = enabled;
        entry.min_amount = min_amount;

        tracing::info!(
            "Auto-compound config: user={} enabled={} min={}",
            user,
            enabled,
            min_amount
        );
    }

    /// A user's opt-in settings
    pub fn config(&self, user: &UserId) -> Option<AutoCompoundConfig> {
        self.configs.read().get(user).cloned()
    }

    /// Read-only compound check.
    ///
    /// Returns `(true, reward)` iff the user opted in, the per-user interval
    /// has elapsed, and the currently accrued reward (boosted, with rarity
    /// multiplier) meets the user's minimum. The amount is reported even
    /// when `should` is false, so keepers can log near-misses.
    pub fn check(&self, user: &UserId, now: i64) -> (bool, u128) {
        let config = match self.config(user) {
            Some(c) if c.enabled => c,
            _ => return (false, 0),
        };
        let deposit = match self.ledger.get_active(user) {
            Some(d) => d,
            None => return (false, 0),
        };

        let aggregate = self.skills.aggregate(user);
        let accrued = self
            .engine
            .accrue_with_rarity(
                &deposit,
                aggregate.total_boost_bp,
                aggregate.rarity_multiplier,
                now,
            )
            .unwrap_or(0);
        let reward = deposit.pending_rewards.saturating_add(accrued);

        let interval_ok =
            now - config.last_compound_time >= self.keeper_config.min_interval_secs as i64;
        (interval_ok && reward >= config.min_amount, reward)
    }

    /// Re-validate and execute a compound for one user.
    ///
    /// On success the reward has been added to principal, the claim cursor
    /// reset, and the user's last-compound time updated.
    pub fn perform(&self, user: UserId, now: i64) -> Result<u128, KeeperError> {
        let config = self
            .config(&user)
            .filter(|c| c.enabled)
            .ok_or(KeeperError::NotEnabled)?;

        let until = config.last_compound_time + self.keeper_config.min_interval_secs as i64;
        if now < until {
            return Err(KeeperError::TooSoon { until });
        }

        let deposit = self
            .ledger
            .get_active(&user)
            .ok_or(KeeperError::NoActiveDeposit)?;
        let aggregate = self.skills.aggregate(&user);
        let accrued = self.engine.accrue_with_rarity(
            &deposit,
            aggregate.total_boost_bp,
            aggregate.rarity_multiplier,
            now,
        )?;
        let available = deposit.pending_rewards.saturating_add(accrued);
        if available < config.min_amount {
            return Err(KeeperError::BelowMinimum {
                minimum: config.min_amount,
                available,
            });
        }

        let total = self.ledger.compound(user, accrued, now)?;
        if let Some(entry) = self.configs.write().get_mut(&user) {
            entry.last_compound_time = now;
        }

        tracing::info!("Auto-compound performed: user={} reward={}", user, total);
        Ok(total)
    }

    /// Compound a batch of users, accumulating one result per user. A failed
    /// entry is recorded and never aborts its siblings.
    pub fn batch(&self, users: &[UserId], now: i64) -> Vec<CompoundOutcome> {
        users
            .iter()
            .map(|user| CompoundOutcome {
                user: *user,
                result: self.perform(*user, now),
            })
            .collect()
    }

    /// Paginated listing of opted-in users, for keeper discovery
    pub fn enabled_users(&self, offset: usize, limit: usize) -> Vec<UserId> {
        let configs = self.configs.read();
        let mut users: Vec<UserId> = configs
            .iter()
            .filter(|(_, c)| c.enabled)
            .map(|(user, _)| *user)
            .collect();
        users.sort();
        users.into_iter().skip(offset).take(limit).collect()
    }
}

/// Auto-compound errors
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum KeeperError {
    #[error("Auto-compound is not enabled for this user")]
    NotEnabled,

    #[error("Too soon to compound again; next eligible at {until}")]
    TooSoon { until: i64 },

    #[error("Accrued reward {available} below configured minimum {minimum}")]
    BelowMinimum { minimum: u128, available: u128 },

    #[error("No active deposit")]
    NoActiveDeposit,

    #[error(transparent)]
    Reward(#[from] RewardError),

    #[error(transparent)]
    Stake(#[from] StakeError),
}
