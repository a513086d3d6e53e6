//! Deposit ledger manager
//!
//! Owns every [`UserDeposit`] plus the global totals. Each state-mutating
//! operation takes one write-lock acquisition and either fully applies or
//! fully fails; callers pass timestamps explicitly so time-based behavior is
//! reproducible.

use crate::deposit::UserDeposit;
use crate::tiers::ApyTable;
use auric_core::constants::{MAX_DEPOSIT, MIN_DEPOSIT};
use auric_core::{apply_bp, BasisPoints, UserId};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Ledger configuration set by the configuration authority
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Minimum deposit in base units
    #[serde(default = "default_min_deposit")]
    pub min_deposit: u128,

    /// Maximum deposit in base units
    #[serde(default = "default_max_deposit")]
    pub max_deposit: u128,

    /// Allow closing a deposit before lock maturity (fee applies)
    #[serde(default)]
    pub allow_early_exit: bool,

    /// Fee on early exit, in basis points of principal
    #[serde(default = "default_early_exit_fee")]
    pub early_exit_fee_bp: BasisPoints,
}

fn default_min_deposit() -> u128 {
    MIN_DEPOSIT
}

fn default_max_deposit() -> u128 {
    MAX_DEPOSIT
}

fn default_early_exit_fee() -> BasisPoints {
    1_000 // 10%
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            min_deposit: MIN_DEPOSIT,
            max_deposit: MAX_DEPOSIT,
            allow_early_exit: false,
            early_exit_fee_bp: default_early_exit_fee(),
        }
    }
}

/// Global ledger counters
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LedgerTotals {
    /// Sum of all active principal
    pub total_staked: u128,

    /// Lifetime yield paid out
    pub total_rewards_paid: u128,

    /// Lifetime early-exit fees collected
    pub total_fees_collected: u128,

    /// Number of active deposits
    pub depositor_count: u64,
}

/// Result of closing a deposit
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CloseOutcome {
    /// Principal returned to the depositor
    pub principal_returned: u128,

    /// Banked rewards paid out alongside the principal
    pub rewards_paid: u128,

    /// Early-exit fee withheld (0 on a mature close)
    pub fee: u128,
}

/// Deposit ledger manager
pub struct DepositLedger {
    /// All deposits, one entry per depositor
    deposits: RwLock<HashMap<UserId, UserDeposit>>,

    /// Global counters
    totals: RwLock<LedgerTotals>,

    /// Tier table
    table: ApyTable,

    /// Bounds and early-exit policy
    config: LedgerConfig,
}

impl DepositLedger {
    /// Create a ledger over a tier table
    pub fn new(table: ApyTable, config: LedgerConfig) -> Self {
        Self {
            deposits: RwLock::new(HashMap::new()),
            totals: RwLock::new(LedgerTotals::default()),
            table,
            config,
        }
    }

    /// The tier table this ledger was configured with
    pub fn table(&self) -> &ApyTable {
        &self.table
    }

    /// Open a deposit (or reopen a previously closed one)
    pub fn open(
        &self,
        user: UserId,
        amount: u128,
        tier_index: usize,
        now: i64,
    ) -> Result<UserDeposit, StakeError> {
        if amount < self.config.min_deposit {
            return Err(StakeError::BelowMinimum {
                minimum: self.config.min_deposit,
            });
        }
        if amount > self.config.max_deposit {
            return Err(StakeError::AboveMaximum {
                maximum: self.config.max_deposit,
            });
        }
        let tier = self
            .table
            .get(tier_index)
            .ok_or(StakeError::UnknownTier { index: tier_index })?;

        let mut deposits = self.deposits.write();
        if deposits.get(&user).map(|d| d.active).unwrap_or(false) {
            return Err(StakeError::AlreadyActive);
        }

        let deposit = UserDeposit::new(user, amount, tier_index, tier.duration_secs, now);
        deposits.insert(user, deposit.clone());

        let mut totals = self.totals.write();
        totals.total_staked += amount;
        totals.depositor_count += 1;

        tracing::info!(
            "Deposit opened: user={} amount={} tier={}",
            user,
            amount,
            tier_index
        );
        Ok(deposit)
    }

    /// Close a deposit, returning the principal.
    ///
    /// Fails with [`StakeError::StakeLocked`] before maturity unless the
    /// early-exit policy is enabled, in which case the configured fee is
    /// withheld from the returned principal.
    pub fn close(&self, user: UserId, now: i64) -> Result<CloseOutcome, StakeError> {
        let mut deposits = self.deposits.write();
        let deposit = deposits.get_mut(&user).ok_or(StakeError::NotFound)?;
        if !deposit.active {
            return Err(StakeError::NotActive);
        }

        let mut fee = 0u128;
        if !deposit.is_mature(now) {
            if !self.config.allow_early_exit {
                return Err(StakeError::StakeLocked {
                    remaining_secs: deposit.remaining_lock(now),
                });
            }
            fee = apply_bp(deposit.amount, self.config.early_exit_fee_bp);
            tracing::warn!("Early exit: user={} fee={}", user, fee);
        }

        let (principal, pending) = deposit.close_out();

        let mut totals = self.totals.write();
        totals.total_staked -= principal;
        totals.total_rewards_paid += pending;
        totals.total_fees_collected += fee;
        totals.depositor_count -= 1;

        tracing::info!("Deposit closed: user={} principal={}", user, principal);
        Ok(CloseOutcome {
            principal_returned: principal - fee,
            rewards_paid: pending,
            fee,
        })
    }

    /// Advance a deposit's last-claim cursor.
    ///
    /// The cursor is monotonic: a timestamp earlier than the current one is
    /// rejected so a stale caller cannot reopen an already-claimed window.
    pub fn touch(&self, user: UserId, new_last_claim: i64) -> Result<(), StakeError> {
        let mut deposits = self.deposits.write();
        let deposit = deposits.get_mut(&user).ok_or(StakeError::NotFound)?;
        if !deposit.active {
            return Err(StakeError::NotActive);
        }
        if new_last_claim < deposit.last_claim_time {
            return Err(StakeError::StaleClaimTime);
        }
        deposit.last_claim_time = new_last_claim;
        Ok(())
    }

    /// Bank freshly accrued yield against a later payout and advance the
    /// claim cursor. Called whenever a user's effective rate changes, so the
    /// new rate never applies to an already-elapsed window.
    pub fn bank_accrued(&self, user: UserId, accrued: u128, now: i64) -> Result<(), StakeError> {
        let mut deposits = self.deposits.write();
        let deposit = deposits.get_mut(&user).ok_or(StakeError::NotFound)?;
        if !deposit.active {
            return Err(StakeError::NotActive);
        }
        if now < deposit.last_claim_time {
            return Err(StakeError::StaleClaimTime);
        }
        deposit.bank_accrued(accrued, now);
        Ok(())
    }

    /// Pay out banked plus freshly accrued yield. Returns the total paid.
    pub fn claim(&self, user: UserId, accrued: u128, now: i64) -> Result<u128, StakeError> {
        let mut deposits = self.deposits.write();
        let deposit = deposits.get_mut(&user).ok_or(StakeError::NotFound)?;
        if !deposit.active {
            return Err(StakeError::NotActive);
        }
        if now < deposit.last_claim_time {
            return Err(StakeError::StaleClaimTime);
        }
        let total = deposit.apply_claim(accrued, now);

        self.totals.write().total_rewards_paid += total;

        tracing::info!("Rewards claimed: user={} amount={}", user, total);
        Ok(total)
    }

    /// Fold banked plus freshly accrued yield back into principal
    /// (auto-compound path). Returns the total compounded.
    pub fn compound(&self, user: UserId, accrued: u128, now: i64) -> Result<u128, StakeError> {
        let mut deposits = self.deposits.write();
        let deposit = deposits.get_mut(&user).ok_or(StakeError::NotFound)?;
        if !deposit.active {
            return Err(StakeError::NotActive);
        }
        if now < deposit.last_claim_time {
            return Err(StakeError::StaleClaimTime);
        }
        let total = deposit.apply_compound(accrued, now);
        let new_amount = deposit.amount;

        self.totals.write().total_staked += total;

        tracing::info!(
            "Compounded: user={} reward={} principal={}",
            user,
            total,
            new_amount
        );
        Ok(total)
    }

    /// Get a depositor's entry
    pub fn get(&self, user: &UserId) -> Option<UserDeposit> {
        self.deposits.read().get(user).cloned()
    }

    /// Get a depositor's entry if it is active
    pub fn get_active(&self, user: &UserId) -> Option<UserDeposit> {
        self.deposits.read().get(user).filter(|d| d.active).cloned()
    }

    /// Snapshot of the global counters
    pub fn totals(&self) -> LedgerTotals {
        self.totals.read().clone()
    }
}

/// Deposit ledger errors
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StakeError {
    #[error("Deposit amount below minimum of {minimum}")]
    BelowMinimum { minimum: u128 },

    #[error("Deposit amount above maximum of {maximum}")]
    AboveMaximum { maximum: u128 },

    #[error("Unknown lockup tier index: {index}")]
    UnknownTier { index: usize },

    #[error("Depositor already has an active deposit")]
    AlreadyActive,

    #[error("Deposit not found")]
    NotFound,

    #[error("Deposit is not active")]
    NotActive,

    #[error("Stake is locked for another {remaining_secs} seconds")]
    StakeLocked { remaining_secs: u64 },

    #[error("Claim time predates the current claim cursor")]
    StaleClaimTime,
}
