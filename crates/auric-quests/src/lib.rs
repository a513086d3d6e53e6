//! # Auric Gamification Engine
//!
//! XP and level progression plus a keyed store of pending quest and
//! achievement rewards with expiration.
//!
//! ## Progression
//!
//! XP is a monotonic per-user counter fed by weighted actions (stake,
//! compound, quest, achievement). Level is a step function over total XP,
//! and specific level breakpoints raise the active-skill cap.
//!
//! ## Reward Lifecycle
//!
//! One state machine per `(user, id)` pair:
//!
//! ```text
//! Pending -> Completed (reward created, claimed = false)
//!            Completed -> Claimed  (terminal)
//!            Completed -> Expired  (terminal, via explicit sweep or lapsed claim)
//! ```
//!
//! Expiry is an explicit, batchable sweep; terminal entries never mutate
//! again and never pay out twice.

pub mod engine;
pub mod progression;
pub mod rewards;

// Re-exports
pub use engine::{GamificationEngine, QuestConfig, QuestError};
pub use progression::{ActionKind, UserProgress, XpOutcome, LEVEL_CAP};
pub use rewards::PendingReward;
