//! # Auric Skill Boost Registry
//!
//! Owns the set of active skill effects per user, enforces caps and
//! per-type uniqueness, and aggregates effects into the boost figures the
//! reward engine consumes.
//!
//! ## Aggregation Rules
//!
//! - `total_boost_bp` is the **sum** of all active effect values, clamped at
//!   the configured ceiling.
//! - `rarity_multiplier` is the multiplier of the **highest-rarity** active
//!   skill - a ceiling effect, never a sum.
//! - An effect value of zero substitutes the skill type's default boost at
//!   activation time.
//!
//! Effects expire a fixed window after activation and the same skill type
//! stays on cooldown for a further day; expiry is applied by an explicit,
//! idempotent sweep.

pub mod registry;
pub mod skill;

// Re-exports
pub use registry::{BoostAggregate, SkillConfig, SkillError, SkillRegistry, UserSkillProfile};
pub use skill::{Rarity, SkillEffect, SkillType};
