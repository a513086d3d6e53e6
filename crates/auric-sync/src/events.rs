//! Cross-module event history

use auric_core::{AchievementId, BasisPoints, ModuleId, QuestId, SkillId, UserId};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// One entry in the hub's event history
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum LedgerEvent {
    DepositOpened {
        user: UserId,
        amount: u128,
        tier: usize,
        timestamp: i64,
    },
    DepositClosed {
        user: UserId,
        principal_returned: u128,
        fee: u128,
        timestamp: i64,
    },
    RewardsClaimed {
        user: UserId,
        amount: u128,
        timestamp: i64,
    },
    SkillActivated {
        module: ModuleId,
        user: UserId,
        skill_id: SkillId,
        effect_value_bp: BasisPoints,
        timestamp: i64,
    },
    SkillDeactivated {
        module: ModuleId,
        user: UserId,
        skill_id: SkillId,
        timestamp: i64,
    },
    QuestCompleted {
        module: ModuleId,
        user: UserId,
        quest_id: QuestId,
        amount: u128,
        timestamp: i64,
    },
    AchievementUnlocked {
        module: ModuleId,
        user: UserId,
        achievement_id: AchievementId,
        amount: u128,
        timestamp: i64,
    },
    XpGained {
        module: ModuleId,
        user: UserId,
        xp: u64,
        level: u32,
        timestamp: i64,
    },
    Compounded {
        user: UserId,
        reward: u128,
        timestamp: i64,
    },
}

/// Append-only event history
#[derive(Default)]
pub struct EventLog {
    events: RwLock<Vec<LedgerEvent>>,
}

impl EventLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event
    pub fn push(&self, event: LedgerEvent) {
        self.events.write().push(event);
    }

    /// The most recent `count` events, oldest first
    pub fn recent(&self, count: usize) -> Vec<LedgerEvent> {
        let events = self.events.read();
        let start = events.len().saturating_sub(count);
        events[start..].to_vec()
    }

    /// Total events recorded
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// True if nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }
}
