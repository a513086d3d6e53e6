//! Lockup tier configuration
//!
//! The tier table maps a lockup period index (0-4) to its lock duration and
//! base APY. It is set by the configuration authority and read-only at
//! runtime.

use auric_core::constants::SECONDS_PER_DAY;
use auric_core::BasisPoints;
use serde::{Deserialize, Serialize};

/// Maximum allowed base APY for any tier: 50%
pub const MAX_APY_BP: BasisPoints = 5_000;

/// One lockup tier: lock duration and base APY
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockupTier {
    /// Lock duration in seconds (0 = no lock)
    pub duration_secs: u64,

    /// Base APY in basis points
    pub base_apy_bp: BasisPoints,
}

impl LockupTier {
    /// Create a tier from a lock period in days and an APY in basis points
    pub fn new(lock_days: u64, base_apy_bp: BasisPoints) -> Self {
        Self {
            duration_secs: lock_days * SECONDS_PER_DAY as u64,
            base_apy_bp,
        }
    }
}

/// The static tier table consulted on deposit and on every accrual
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApyTable {
    /// Tiers ordered by index; longer locks carry higher APY
    pub tiers: Vec<LockupTier>,
}

impl Default for ApyTable {
    fn default() -> Self {
        Self {
            tiers: vec![
                LockupTier::new(0, 500),
                LockupTier::new(30, 800),
                LockupTier::new(90, 1_200),
                LockupTier::new(180, 1_600),
                LockupTier::new(365, 2_200),
            ],
        }
    }
}

impl ApyTable {
    /// Get tier by lockup period index
    pub fn get(&self, index: usize) -> Option<&LockupTier> {
        self.tiers.get(index)
    }

    /// Number of configured tiers
    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    /// True if no tiers are configured
    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// Validate the table: at least one tier, APYs within [`MAX_APY_BP`],
    /// durations and APYs non-decreasing by index
    pub fn validate(&self) -> bool {
        if self.tiers.is_empty() {
            return false;
        }
        if self.tiers.iter().any(|t| t.base_apy_bp > MAX_APY_BP) {
            return false;
        }
        self.tiers
            .windows(2)
            .all(|w| w[0].duration_secs <= w[1].duration_secs && w[0].base_apy_bp <= w[1].base_apy_bp)
    }
}
