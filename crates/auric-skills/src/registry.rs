//! Skill registry manager

use crate::skill::{Rarity, SkillEffect, SkillType};
use auric_core::constants::{MAX_TOTAL_BOOST_BP, SECONDS_PER_DAY};
use auric_core::{mul_div_floor, BasisPoints, SkillId, UserId};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Skill registry configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SkillConfig {
    /// Active-skill cap for a fresh profile
    #[serde(default = "default_max_active")]
    pub max_active_skills: usize,

    /// Effect window after activation, in seconds
    #[serde(default = "default_effect_duration")]
    pub effect_duration_secs: u64,

    /// Cooldown after the effect window before the same type can reactivate
    #[serde(default = "default_cooldown")]
    pub cooldown_secs: u64,

    /// Ceiling on the aggregate boost
    #[serde(default = "default_max_boost")]
    pub max_total_boost_bp: BasisPoints,
}

fn default_max_active() -> usize {
    5
}

fn default_effect_duration() -> u64 {
    30 * SECONDS_PER_DAY as u64
}

fn default_cooldown() -> u64 {
    SECONDS_PER_DAY as u64
}

fn default_max_boost() -> BasisPoints {
    MAX_TOTAL_BOOST_BP
}

impl Default for SkillConfig {
    fn default() -> Self {
        Self {
            max_active_skills: default_max_active(),
            effect_duration_secs: default_effect_duration(),
            cooldown_secs: default_cooldown(),
            max_total_boost_bp: default_max_boost(),
        }
    }
}

/// Aggregate of a user's active skills
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserSkillProfile {
    /// Active skill ids, never longer than `max_active_skills`
    pub active_skills: Vec<SkillId>,

    /// Sum of active effect values, clamped at the configured ceiling
    pub total_boost_bp: BasisPoints,

    /// Multiplier of the highest-rarity active skill (100-500)
    pub rarity_multiplier: u32,

    /// Progression level mirrored from the gamification engine
    pub level: u32,

    /// Active-skill cap, grown at level breakpoints
    pub max_active_skills: usize,

    /// True while a Compound Master skill is active
    pub has_auto_compound: bool,
}

impl UserSkillProfile {
    fn new(max_active_skills: usize) -> Self {
        Self {
            active_skills: Vec::new(),
            total_boost_bp: 0,
            rarity_multiplier: 100,
            level: 1,
            max_active_skills,
            has_auto_compound: false,
        }
    }
}

/// Boost figures consumed by the reward engine
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct BoostAggregate {
    /// Additive boost, basis points
    pub total_boost_bp: BasisPoints,

    /// Rarity ceiling multiplier, percent
    pub rarity_multiplier: u32,

    /// `total_boost_bp * rarity_multiplier / 100`, rounded down
    pub effective_boost_bp: BasisPoints,
}

/// Skill boost registry
pub struct SkillRegistry {
    /// Per-user aggregates
    profiles: RwLock<HashMap<UserId, UserSkillProfile>>,

    /// Every effect ever activated, keyed by skill token
    effects: RwLock<HashMap<SkillId, SkillEffect>>,

    /// Per-(user, type) reactivation locks
    cooldowns: RwLock<HashMap<(UserId, SkillType), i64>>,

    /// Rarity assignments, set by the configuration authority
    rarities: RwLock<HashMap<SkillId, Rarity>>,

    /// Caps and windows
    config: SkillConfig,
}

impl SkillRegistry {
    /// Create a registry
    pub fn new(config: SkillConfig) -> Self {
        Self {
            profiles: RwLock::new(HashMap::new()),
            effects: RwLock::new(HashMap::new()),
            cooldowns: RwLock::new(HashMap::new()),
            rarities: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Activate a skill effect for a user.
    ///
    /// An effect value of zero substitutes the skill type's default boost.
    pub fn activate(
        &self,
        user: UserId,
        skill_id: SkillId,
        skill_type: SkillType,
        effect_value_bp: BasisPoints,
        now: i64,
    ) -> Result<SkillEffect, SkillError> {
        let mut effects = self.effects.write();
        let mut profiles = self.profiles.write();

        if effects.get(&skill_id).map(|e| e.is_active).unwrap_or(false) {
            return Err(SkillError::AlreadyActive);
        }

        if let Some(&until) = self.cooldowns.read().get(&(user, skill_type)) {
            if now < until {
                return Err(SkillError::OnCooldown { until });
            }
        }

        let profile = profiles
            .entry(user)
            .or_insert_with(|| UserSkillProfile::new(self.config.max_active_skills));

        if profile.active_skills.len() >= profile.max_active_skills {
            return Err(SkillError::CapExceeded {
                max: profile.max_active_skills,
            });
        }
        let duplicate = profile
            .active_skills
            .iter()
            .any(|id| effects.get(id).map(|e| e.skill_type == skill_type).unwrap_or(false));
        if duplicate {
            return Err(SkillError::DuplicateSkillType { skill_type });
        }

        let value = if effect_value_bp == 0 {
            skill_type.default_boost_bp()
        } else {
            effect_value_bp
        };
        let rarity = self.rarities.read().get(&skill_id).copied().unwrap_or_default();

        let effect = SkillEffect {
            skill_id,
            owner: user,
            skill_type,
            effect_value_bp: value,
            rarity,
            activated_at: now,
            cooldown_ends: now
                + self.config.effect_duration_secs as i64
                + self.config.cooldown_secs as i64,
            is_active: true,
        };
        effects.insert(skill_id, effect.clone());
        profile.active_skills.push(skill_id);
        self.cooldowns
            .write()
            .insert((user, skill_type), effect.cooldown_ends);

        Self::recompute(profile, &effects, &self.config);

        tracing::info!(
            "Skill activated: user={} skill={} type={} value={}bp rarity={}",
            user,
            skill_id,
            skill_type.name(),
            value,
            rarity.name()
        );
        Ok(effect)
    }

    /// Deactivate a skill effect.
    ///
    /// Idempotent: deactivating an unknown or already-inactive skill is a
    /// no-op, so expiry sweeps can be retried safely.
    pub fn deactivate(&self, user: UserId, skill_id: SkillId) -> Result<(), SkillError> {
        let mut effects = self.effects.write();
        let mut profiles = self.profiles.write();

        let effect = match effects.get_mut(&skill_id) {
            Some(e) => e,
            None => return Ok(()),
        };
        if effect.owner != user {
            return Err(SkillError::NotOwner);
        }
        if !effect.is_active {
            return Ok(());
        }
        effect.is_active = false;

        if let Some(profile) = profiles.get_mut(&user) {
            profile.active_skills.retain(|id| *id != skill_id);
            Self::recompute(profile, &effects, &self.config);
        }

        tracing::info!("Skill deactivated: user={} skill={}", user, skill_id);
        Ok(())
    }

    /// Deactivate every expired effect a user holds. Returns the number of
    /// effects swept. Safe to call repeatedly.
    pub fn sweep_expired(&self, user: UserId, now: i64) -> usize {
        let mut effects = self.effects.write();
        let mut profiles = self.profiles.write();

        let profile = match profiles.get_mut(&user) {
            Some(p) => p,
            None => return 0,
        };

        let expired: Vec<SkillId> = profile
            .active_skills
            .iter()
            .filter(|id| {
                effects
                    .get(id)
                    .map(|e| e.is_expired(self.config.effect_duration_secs, now))
                    .unwrap_or(false)
            })
            .copied()
            .collect();

        for id in &expired {
            if let Some(effect) = effects.get_mut(id) {
                effect.is_active = false;
            }
            profile.active_skills.retain(|active| active != id);
        }
        if !expired.is_empty() {
            Self::recompute(profile, &effects, &self.config);
            tracing::debug!("Swept {} expired skills for user={}", expired.len(), user);
        }
        expired.len()
    }

    /// Assign a rarity to a skill token. If the token's effect is currently
    /// active, the owner's aggregate is recomputed.
    pub fn set_rarity(&self, skill_id: SkillId, rarity: Rarity) {
        self.rarities.write().insert(skill_id, rarity);

        let mut effects = self.effects.write();
        let mut profiles = self.profiles.write();
        if let Some(effect) = effects.get_mut(&skill_id) {
            effect.rarity = rarity;
            if effect.is_active {
                let owner = effect.owner;
                if let Some(profile) = profiles.get_mut(&owner) {
                    Self::recompute(profile, &effects, &self.config);
                }
            }
        }
    }

    /// Raise (or lower) a user's active-skill cap. Already-active skills are
    /// never evicted by a lowered cap; the cap only gates new activations.
    pub fn set_max_active_skills(&self, user: UserId, max: usize) {
        let mut profiles = self.profiles.write();
        let profile = profiles
            .entry(user)
            .or_insert_with(|| UserSkillProfile::new(self.config.max_active_skills));
        profile.max_active_skills = max;
    }

    /// Mirror the gamification level into the profile
    pub fn set_user_level(&self, user: UserId, level: u32) {
        let mut profiles = self.profiles.write();
        let profile = profiles
            .entry(user)
            .or_insert_with(|| UserSkillProfile::new(self.config.max_active_skills));
        profile.level = level;
    }

    /// Snapshot of a user's profile (a fresh default if none exists)
    pub fn profile(&self, user: &UserId) -> UserSkillProfile {
        self.profiles
            .read()
            .get(user)
            .cloned()
            .unwrap_or_else(|| UserSkillProfile::new(self.config.max_active_skills))
    }

    /// Current boost figures for the reward engine
    pub fn aggregate(&self, user: &UserId) -> BoostAggregate {
        let profile = self.profile(user);
        BoostAggregate {
            total_boost_bp: profile.total_boost_bp,
            rarity_multiplier: profile.rarity_multiplier,
            effective_boost_bp: mul_div_floor(
                profile.total_boost_bp as u128,
                profile.rarity_multiplier as u128,
                100,
            ) as BasisPoints,
        }
    }

    /// Snapshot of one effect by skill token
    pub fn effect(&self, skill_id: &SkillId) -> Option<SkillEffect> {
        self.effects.read().get(skill_id).cloned()
    }

    /// Snapshots of a user's active effects
    pub fn active_effects(&self, user: &UserId) -> Vec<SkillEffect> {
        let effects = self.effects.read();
        self.profiles
            .read()
            .get(user)
            .map(|p| {
                p.active_skills
                    .iter()
                    .filter_map(|id| effects.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Recompute a profile's aggregates from its active effects. Runs under
    /// the same write locks as the mutation that triggered it.
    fn recompute(
        profile: &mut UserSkillProfile,
        effects: &HashMap<SkillId, SkillEffect>,
        config: &SkillConfig,
    ) {
        let active: Vec<&SkillEffect> = profile
            .active_skills
            .iter()
            .filter_map(|id| effects.get(id))
            .collect();

        let sum: BasisPoints = active.iter().map(|e| e.effect_value_bp).sum();
        profile.total_boost_bp = sum.min(config.max_total_boost_bp);
        profile.rarity_multiplier = active
            .iter()
            .map(|e| e.rarity)
            .max()
            .map(|r| r.multiplier())
            .unwrap_or(100);
        profile.has_auto_compound = active
            .iter()
            .any(|e| e.skill_type == SkillType::CompoundMaster);
    }
}

/// Skill registry errors
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SkillError {
    #[error("Active-skill cap of {max} reached")]
    CapExceeded { max: usize },

    #[error("An active effect of this skill type already exists")]
    DuplicateSkillType { skill_type: SkillType },

    #[error("Skill effect is already active")]
    AlreadyActive,

    #[error("Skill type is on cooldown until {until}")]
    OnCooldown { until: i64 },

    #[error("Caller does not own this skill")]
    NotOwner,
}
