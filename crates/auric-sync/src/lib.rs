//! # Auric Synchronization Layer
//!
//! The trust boundary between Auric's independently-deployed modules.
//!
//! Cooperating modules (marketplace, quest issuer, keeper bots) never touch
//! another module's storage directly: every cross-module mutation enters
//! through [`SyncHub`], which checks the caller against the
//! [`AuthorizationTable`] and then dispatches through a notification trait to
//! the owning module. Any module can be swapped out as long as its
//! replacement re-registers in the table.
//!
//! ## Notification Protocol
//!
//! | Entry point | Forwarded to |
//! |-------------|--------------|
//! | `notify_skill_activation` | skill registry |
//! | `notify_skill_deactivation` | skill registry |
//! | `notify_quest_completion` | gamification engine |
//! | `notify_achievement_unlocked` | gamification engine |
//! | `update_user_xp` | gamification engine (strictest gate) |
//!
//! An unauthorized caller always gets [`SyncError::NotAuthorized`] and no
//! state changes - never a silent skip.

pub mod authorization;
pub mod config;
pub mod events;
pub mod hub;
pub mod traits;

// Re-exports
pub use authorization::AuthorizationTable;
pub use config::AuricConfig;
pub use events::{EventLog, LedgerEvent};
pub use hub::{SyncHub, SyncError};
pub use traits::{ProgressionEvents, SkillEvents};
