//! Per-depositor deposit entry

use auric_core::UserId;
use serde::{Deserialize, Serialize};

/// One depositor's staked principal under one lockup commitment
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserDeposit {
    /// Depositor
    pub user: UserId,

    /// Staked principal in base units
    pub amount: u128,

    /// Deposit timestamp
    pub deposit_time: i64,

    /// Last reward claim (or compound) timestamp
    pub last_claim_time: i64,

    /// Lock maturity timestamp
    pub lock_end_time: i64,

    /// Lockup period index into the tier table (0-4)
    pub lockup_tier: usize,

    /// Yield banked at an earlier rate but not yet paid out. Boost changes
    /// checkpoint accrual here so a new rate never applies retroactively.
    pub pending_rewards: u128,

    /// Total yield claimed out over the deposit's lifetime
    pub total_claimed: u128,

    /// Number of compound operations applied
    pub compound_count: u64,

    /// Is deposit active
    pub active: bool,
}

impl UserDeposit {
    /// Create a new deposit entry
    pub fn new(user: UserId, amount: u128, lockup_tier: usize, lock_duration_secs: u64, now: i64) -> Self {
        Self {
            user,
            amount,
            deposit_time: now,
            last_claim_time: now,
            lock_end_time: now + lock_duration_secs as i64,
            lockup_tier,
            pending_rewards: 0,
            total_claimed: 0,
            compound_count: 0,
            active: true,
        }
    }

    /// Timestamp accrual resumes from: the later of deposit and last claim
    pub fn accrual_start(&self) -> i64 {
        self.last_claim_time.max(self.deposit_time)
    }

    /// Check if the lock has matured
    pub fn is_mature(&self, now: i64) -> bool {
        now >= self.lock_end_time
    }

    /// Seconds until maturity (0 once mature)
    pub fn remaining_lock(&self, now: i64) -> u64 {
        (self.lock_end_time - now).max(0) as u64
    }

    /// Bank accrued-so-far yield and advance the claim cursor, so future
    /// accrual restarts at the new effective rate
    pub fn bank_accrued(&mut self, accrued: u128, now: i64) {
        self.pending_rewards = self.pending_rewards.saturating_add(accrued);
        self.last_claim_time = now;
    }

    /// Fold banked plus freshly accrued yield into principal, returning the
    /// total compounded
    pub fn apply_compound(&mut self, accrued: u128, now: i64) -> u128 {
        let total = self.pending_rewards.saturating_add(accrued);
        self.pending_rewards = 0;
        self.amount = self.amount.saturating_add(total);
        self.last_claim_time = now;
        self.compound_count += 1;
        total
    }

    /// Pay out banked plus freshly accrued yield, returning the total paid
    pub fn apply_claim(&mut self, accrued: u128, now: i64) -> u128 {
        let total = self.pending_rewards.saturating_add(accrued);
        self.pending_rewards = 0;
        self.total_claimed = self.total_claimed.saturating_add(total);
        self.last_claim_time = now;
        total
    }

    /// Zero out and deactivate, returning (principal, banked rewards)
    pub fn close_out(&mut self) -> (u128, u128) {
        let principal = self.amount;
        let pending = self.pending_rewards;
        self.amount = 0;
        self.pending_rewards = 0;
        self.active = false;
        (principal, pending)
    }
}
