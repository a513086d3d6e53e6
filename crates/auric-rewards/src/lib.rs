//! # Auric Reward Accrual Engine
//!
//! Pure calculation over ledger entries. The engine holds no mutable state of
//! its own beyond the configured APY table.
//!
//! ## Accrual Formula
//!
//! ```text
//! elapsed      = now - max(last_claim_time, deposit_time)
//! effectiveAPY = baseAPY * (10,000 + totalBoostBp) / 10,000
//! reward       = amount * effectiveAPY * elapsed / (SECONDS_PER_YEAR * 10,000)
//! ```
//!
//! Three variants are exposed and agree at identity values (0 bp boost,
//! 100 rarity multiplier):
//!
//! 1. [`RewardEngine::accrue_base`] - base APY only
//! 2. [`RewardEngine::accrue_boosted`] - additive skill boost
//! 3. [`RewardEngine::accrue_with_rarity`] - rarity multiplier applied on top
//!    of the boosted figure (`boosted * multiplier / 100`)
//!
//! Every division rounds down.

pub mod engine;

// Re-exports
pub use engine::{RewardEngine, RewardError};
