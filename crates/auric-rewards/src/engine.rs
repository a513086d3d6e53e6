//! Reward accrual engine

use auric_core::constants::{
    MAX_RARITY_MULTIPLIER, MAX_TOTAL_BOOST_BP, MIN_RARITY_MULTIPLIER, SECONDS_PER_YEAR,
};
use auric_core::{boosted_apy_bp, mul_div_floor, BasisPoints, BP_DENOMINATOR};
use auric_ledger::{ApyTable, UserDeposit};
use thiserror::Error;

/// Reward accrual engine over a fixed APY table
#[derive(Clone, Debug)]
pub struct RewardEngine {
    /// Tier table: lockup period index -> (duration, base APY)
    table: ApyTable,
}

impl RewardEngine {
    /// Create an engine over a tier table
    pub fn new(table: ApyTable) -> Self {
        Self { table }
    }

    /// The configured tier table
    pub fn table(&self) -> &ApyTable {
        &self.table
    }

    /// Base APY for a deposit's tier, in basis points
    pub fn base_apy_bp(&self, deposit: &UserDeposit) -> Result<BasisPoints, RewardError> {
        self.table
            .get(deposit.lockup_tier)
            .map(|t| t.base_apy_bp)
            .ok_or(RewardError::UnknownTier {
                index: deposit.lockup_tier,
            })
    }

    /// Effective APY after an additive skill boost, in basis points.
    ///
    /// The boost is clamped to [`MAX_TOTAL_BOOST_BP`] before it is applied.
    pub fn effective_apy_bp(
        &self,
        deposit: &UserDeposit,
        total_boost_bp: BasisPoints,
    ) -> Result<BasisPoints, RewardError> {
        let base = self.base_apy_bp(deposit)?;
        Ok(boosted_apy_bp(base, total_boost_bp.min(MAX_TOTAL_BOOST_BP)))
    }

    /// Accrued reward at base APY, no boosts
    pub fn accrue_base(&self, deposit: &UserDeposit, now: i64) -> Result<u128, RewardError> {
        self.accrue_boosted(deposit, 0, now)
    }

    /// Accrued reward with an additive skill boost
    pub fn accrue_boosted(
        &self,
        deposit: &UserDeposit,
        total_boost_bp: BasisPoints,
        now: i64,
    ) -> Result<u128, RewardError> {
        let effective_apy = self.effective_apy_bp(deposit, total_boost_bp)?;
        if !deposit.active {
            return Ok(0);
        }

        let elapsed = now - deposit.accrual_start();
        if elapsed <= 0 {
            return Ok(0);
        }

        Ok(mul_div_floor(
            deposit.amount,
            effective_apy as u128 * elapsed as u128,
            SECONDS_PER_YEAR as u128 * BP_DENOMINATOR as u128,
        ))
    }

    /// Accrued reward with a rarity multiplier applied on top of the boosted
    /// figure.
    ///
    /// The multiplier is clamped to [100, 500] and applied multiplicatively
    /// after additive boost aggregation, never before.
    pub fn accrue_with_rarity(
        &self,
        deposit: &UserDeposit,
        total_boost_bp: BasisPoints,
        rarity_multiplier: u32,
        now: i64,
    ) -> Result<u128, RewardError> {
        let boosted = self.accrue_boosted(deposit, total_boost_bp, now)?;
        let multiplier = rarity_multiplier.clamp(MIN_RARITY_MULTIPLIER, MAX_RARITY_MULTIPLIER);
        Ok(mul_div_floor(boosted, multiplier as u128, 100))
    }
}

/// Reward accrual errors
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RewardError {
    #[error("Unknown lockup tier index: {index}")]
    UnknownTier { index: usize },
}
