//! Pending quest/achievement reward entries

use serde::{Deserialize, Serialize};

/// A pending, claimable bonus granted for completing a quest or unlocking an
/// achievement
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PendingReward {
    /// Claimable amount in base units (skill boost already applied at grant)
    pub amount: u128,

    /// Grant timestamp
    pub granted_at: i64,

    /// Claimable until this timestamp
    pub expiration_time: i64,

    /// Has been claimed (terminal)
    pub claimed: bool,

    /// Has been swept as expired (terminal)
    pub expired: bool,
}

impl PendingReward {
    /// Create a pending reward
    pub fn new(amount: u128, granted_at: i64, expiration_time: i64) -> Self {
        Self {
            amount,
            granted_at,
            expiration_time,
            claimed: false,
            expired: false,
        }
    }

    /// Terminal entries never mutate again
    pub fn is_terminal(&self) -> bool {
        self.claimed || self.expired
    }

    /// Past its claim window (whether or not it has been swept yet)
    pub fn is_past_expiry(&self, now: i64) -> bool {
        now > self.expiration_time
    }
}
