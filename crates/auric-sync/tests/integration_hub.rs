//! Integration tests for the Auric synchronization hub
//!
//! These tests drive full cross-module flows: deposits accruing through the
//! reward engine, skill boosts feeding accrual, quest rewards expiring, and
//! keeper-driven auto-compounding - all through the hub's authorized surface.

use auric_core::constants::ONE_AUR;
use auric_core::{AchievementId, ModuleId, QuestId, SkillId, UserId};
use auric_quests::ActionKind;
use auric_skills::{Rarity, SkillType};
use auric_sync::{AuricConfig, SyncError, SyncHub};

const DAY: i64 = 86_400;
const SECONDS_PER_YEAR: u128 = 365 * 86_400;

fn make_user(id: u8) -> UserId {
    UserId::new([id; 32])
}

fn make_module(id: u8) -> ModuleId {
    ModuleId::new([id; 32])
}

fn make_skill(id: u8) -> SkillId {
    SkillId::new([id; 32])
}

/// Hub with one authorized marketplace module
fn make_hub() -> (SyncHub, ModuleId, ModuleId) {
    let authority = make_module(0);
    let marketplace = make_module(1);
    let hub = SyncHub::new(AuricConfig::default(), authority);
    hub.set_authorized(authority, marketplace, true).unwrap();
    (hub, authority, marketplace)
}

/// Reference accrual: amount * apy_bp * elapsed / (year * 10,000), floored
fn expected_reward(amount: u128, apy_bp: u128, elapsed_secs: u128) -> u128 {
    amount * apy_bp * elapsed_secs / (SECONDS_PER_YEAR * 10_000)
}

mod accrual_tests {
    use super::*;

    #[test]
    fn test_worked_example_through_hub() {
        let (hub, _, _) = make_hub();
        let user = make_user(1);

        // 1,000 AUR at tier 2: 90-day lock, 12% base APY
        hub.open_deposit_at(user, 1_000 * ONE_AUR, 2, 0).unwrap();
        let reward = hub.claim_staking_rewards_at(user, 30 * DAY).unwrap();

        assert_eq!(
            reward,
            expected_reward(1_000 * ONE_AUR, 1_200, 30 * DAY as u128)
        );
    }

    #[test]
    fn test_boost_applies_from_activation_forward_only() {
        let (hub, _, marketplace) = make_hub();
        let user = make_user(1);

        hub.open_deposit_at(user, 1_000 * ONE_AUR, 2, 0).unwrap();

        // Stake Boost I (500 bp) activated at day 30
        hub.notify_skill_activation_at(
            marketplace,
            user,
            make_skill(1),
            SkillType::StakeBoostI,
            500,
            30 * DAY,
        )
        .unwrap();

        let total = hub.claim_staking_rewards_at(user, 60 * DAY).unwrap();

        // First 30 days at 12%, second 30 days at 12.6% - never 60 days
        // at the boosted rate
        let base_window = expected_reward(1_000 * ONE_AUR, 1_200, 30 * DAY as u128);
        let boosted_window = expected_reward(1_000 * ONE_AUR, 1_260, 30 * DAY as u128);
        let retroactive = expected_reward(1_000 * ONE_AUR, 1_260, 60 * DAY as u128);

        assert_eq!(total, base_window + boosted_window);
        assert!(total < retroactive);
    }

    #[test]
    fn test_rarity_multiplier_on_claim() {
        let (hub, authority, marketplace) = make_hub();
        let user = make_user(1);
        let skill = make_skill(1);

        hub.open_deposit_at(user, 1_000 * ONE_AUR, 2, 0).unwrap();
        hub.set_skill_rarity_at(authority, skill, Rarity::Legendary, 0)
            .unwrap();
        hub.notify_skill_activation_at(marketplace, user, skill, SkillType::StakeBoostI, 500, 0)
            .unwrap();

        let reward = hub.claim_staking_rewards_at(user, 30 * DAY).unwrap();
        let boosted = expected_reward(1_000 * ONE_AUR, 1_260, 30 * DAY as u128);

        // Legendary: boosted figure times 5
        assert_eq!(reward, boosted * 5);
    }

    #[test]
    fn test_deactivation_drops_rate_forward_only() {
        let (hub, _, marketplace) = make_hub();
        let user = make_user(1);
        let skill = make_skill(1);

        hub.open_deposit_at(user, 1_000 * ONE_AUR, 2, 0).unwrap();
        hub.notify_skill_activation_at(marketplace, user, skill, SkillType::StakeBoostI, 500, 0)
            .unwrap();
        hub.notify_skill_deactivation_at(marketplace, user, skill, 30 * DAY)
            .unwrap();

        let total = hub.claim_staking_rewards_at(user, 60 * DAY).unwrap();
        let boosted_window = expected_reward(1_000 * ONE_AUR, 1_260, 30 * DAY as u128);
        let base_window = expected_reward(1_000 * ONE_AUR, 1_200, 30 * DAY as u128);

        assert_eq!(total, boosted_window + base_window);
    }

    #[test]
    fn test_close_pays_principal_and_final_accrual() {
        let (hub, _, _) = make_hub();
        let user = make_user(1);

        hub.open_deposit_at(user, 1_000 * ONE_AUR, 2, 0).unwrap();
        let outcome = hub.close_deposit_at(user, 90 * DAY).unwrap();

        assert_eq!(outcome.principal_returned, 1_000 * ONE_AUR);
        assert_eq!(outcome.fee, 0);
        assert_eq!(
            outcome.rewards_paid,
            expected_reward(1_000 * ONE_AUR, 1_200, 90 * DAY as u128)
        );
        assert_eq!(hub.ledger_totals().total_staked, 0);
    }

    #[test]
    fn test_close_before_maturity_rejected() {
        let (hub, _, _) = make_hub();
        let user = make_user(1);

        hub.open_deposit_at(user, 1_000 * ONE_AUR, 2, 0).unwrap();
        let result = hub.close_deposit_at(user, 30 * DAY);

        assert!(result.is_err());
        // Deposit untouched and still accruing
        assert!(hub.deposit_info(&user).unwrap().active);
        assert!(hub.claim_staking_rewards_at(user, 60 * DAY).unwrap() > 0);
    }
}

mod skill_tests {
    use super::*;

    #[test]
    fn test_cap_enforced_through_hub() {
        let (hub, _, marketplace) = make_hub();
        let user = make_user(1);

        let types = [
            SkillType::StakeBoostI,
            SkillType::StakeBoostII,
            SkillType::StakeBoostIII,
            SkillType::EarlyHarvest,
            SkillType::SwiftClaim,
        ];
        for (i, skill_type) in types.iter().enumerate() {
            hub.notify_skill_activation_at(
                marketplace,
                user,
                make_skill(i as u8),
                *skill_type,
                100,
                0,
            )
            .unwrap();
        }

        let result = hub.notify_skill_activation_at(
            marketplace,
            user,
            make_skill(9),
            SkillType::DeepRoots,
            100,
            0,
        );
        assert!(result.is_err());
        assert_eq!(hub.skill_profile(&user).active_skills.len(), 5);
    }

    #[test]
    fn test_idempotent_deactivation_through_hub() {
        let (hub, _, marketplace) = make_hub();
        let user = make_user(1);
        let skill = make_skill(1);

        hub.notify_skill_activation_at(marketplace, user, skill, SkillType::StakeBoostI, 500, 0)
            .unwrap();
        hub.notify_skill_deactivation_at(marketplace, user, skill, DAY)
            .unwrap();
        let profile_once = hub.skill_profile(&user);

        hub.notify_skill_deactivation_at(marketplace, user, skill, 2 * DAY)
            .unwrap();
        let profile_twice = hub.skill_profile(&user);

        assert_eq!(profile_once.active_skills, profile_twice.active_skills);
        assert_eq!(profile_once.total_boost_bp, profile_twice.total_boost_bp);
    }

    #[test]
    fn test_expired_skill_sweep_stops_boost() {
        let (hub, _, marketplace) = make_hub();
        let user = make_user(1);

        hub.open_deposit_at(user, 1_000 * ONE_AUR, 2, 0).unwrap();
        hub.notify_skill_activation_at(
            marketplace,
            user,
            make_skill(1),
            SkillType::StakeBoostI,
            500,
            0,
        )
        .unwrap();

        // Effect window is 30 days; sweep at day 40
        let swept = hub.sweep_expired_skills_at(user, 40 * DAY).unwrap();
        assert_eq!(swept, 1);
        assert_eq!(hub.boost_aggregate(&user).total_boost_bp, 0);

        // Boost applied up to the sweep, base rate afterwards
        let total = hub.claim_staking_rewards_at(user, 70 * DAY).unwrap();
        let boosted_window = expected_reward(1_000 * ONE_AUR, 1_260, 40 * DAY as u128);
        let base_window = expected_reward(1_000 * ONE_AUR, 1_200, 30 * DAY as u128);
        assert_eq!(total, boosted_window + base_window);
    }
}

mod quest_tests {
    use super::*;

    #[test]
    fn test_no_double_payout() {
        let (hub, _, marketplace) = make_hub();
        let user = make_user(1);
        let quest = QuestId::new([7; 32]);

        let granted = hub
            .notify_quest_completion_at(marketplace, user, quest, 50 * ONE_AUR, 0)
            .unwrap();
        assert_eq!(granted, 50 * ONE_AUR);

        let paid = hub.claim_quest_reward_at(user, quest, DAY).unwrap();
        assert_eq!(paid, 50 * ONE_AUR);

        let second = hub.claim_quest_reward_at(user, quest, DAY);
        assert!(second.is_err());
        assert_eq!(hub.progress(&user).total_rewards_claimed, 50 * ONE_AUR);
    }

    #[test]
    fn test_seven_day_expiry_scenario() {
        // A 50-unit quest reward with the default 7-day window, unclaimed
        // after 8 days, must be sweepable and subsequently un-claimable
        let (hub, _, marketplace) = make_hub();
        let user = make_user(1);
        let quest = QuestId::new([7; 32]);

        hub.notify_quest_completion_at(marketplace, user, quest, 50 * ONE_AUR, 0)
            .unwrap();

        let swept = hub.expire_quest_rewards_at(user, &[quest], 8 * DAY);
        assert_eq!(swept, vec![(quest, true)]);

        let claim = hub.claim_quest_reward_at(user, quest, 8 * DAY);
        assert!(claim.is_err());
        assert_eq!(hub.progress(&user).total_rewards_claimed, 0);
    }

    #[test]
    fn test_achievement_expiration_days_respected() {
        let (hub, _, marketplace) = make_hub();
        let user = make_user(1);
        let achievement = AchievementId::new([3; 32]);

        hub.notify_achievement_unlocked_at(marketplace, user, achievement, 100 * ONE_AUR, 14, 0)
            .unwrap();

        // Claimable inside the window, gone after it
        assert!(hub
            .claim_achievement_reward_at(user, achievement, 13 * DAY)
            .is_ok());

        let again = AchievementId::new([4; 32]);
        hub.notify_achievement_unlocked_at(marketplace, user, again, 100 * ONE_AUR, 14, 0)
            .unwrap();
        assert!(hub
            .claim_achievement_reward_at(user, again, 15 * DAY)
            .is_err());
    }

    #[test]
    fn test_quest_reward_boosted_by_skills() {
        let (hub, _, marketplace) = make_hub();
        let user = make_user(1);

        hub.notify_skill_activation_at(
            marketplace,
            user,
            make_skill(1),
            SkillType::YieldAmplifier,
            2_000,
            0,
        )
        .unwrap();

        let granted = hub
            .notify_quest_completion_at(marketplace, user, QuestId::new([7; 32]), 50 * ONE_AUR, 0)
            .unwrap();
        assert_eq!(granted, 60 * ONE_AUR);
    }

    #[test]
    fn test_pending_rewards_query() {
        let (hub, _, marketplace) = make_hub();
        let user = make_user(1);

        for i in 0..4u8 {
            hub.notify_quest_completion_at(
                marketplace,
                user,
                QuestId::new([i; 32]),
                10 * ONE_AUR,
                i as i64,
            )
            .unwrap();
        }

        assert_eq!(hub.pending_quest_rewards(&user, 0, 10).len(), 4);
        assert_eq!(hub.pending_quest_rewards(&user, 2, 10).len(), 2);
        assert!(hub
            .quest_reward(&user, &QuestId::new([0; 32]))
            .is_some());
    }
}

mod authorization_tests {
    use super::*;

    #[test]
    fn test_every_notification_gate() {
        let (hub, _, _) = make_hub();
        let intruder = make_module(9);
        let user = make_user(1);

        assert!(matches!(
            hub.notify_skill_activation_at(intruder, user, make_skill(1), SkillType::StakeBoostI, 0, 0),
            Err(SyncError::NotAuthorized { .. })
        ));
        assert!(matches!(
            hub.notify_skill_deactivation_at(intruder, user, make_skill(1), 0),
            Err(SyncError::NotAuthorized { .. })
        ));
        assert!(matches!(
            hub.notify_quest_completion_at(intruder, user, QuestId::new([1; 32]), 10, 0),
            Err(SyncError::NotAuthorized { .. })
        ));
        assert!(matches!(
            hub.notify_achievement_unlocked_at(intruder, user, AchievementId::new([1; 32]), 10, 7, 0),
            Err(SyncError::NotAuthorized { .. })
        ));
        assert!(matches!(
            hub.update_user_xp_at(intruder, user, ActionKind::Stake, 10, 0),
            Err(SyncError::NotAuthorized { .. })
        ));

        // Nothing leaked into any module
        assert_eq!(hub.skill_profile(&user).active_skills.len(), 0);
        assert_eq!(hub.progress(&user).xp, 0);
        assert_eq!(hub.progress(&user).quests_completed, 0);
        assert!(hub.recent_events(10).is_empty());
    }

    #[test]
    fn test_module_swap_via_reregistration() {
        let (hub, authority, marketplace) = make_hub();
        let replacement = make_module(2);
        let user = make_user(1);

        // Old module retired, replacement registered
        hub.set_authorized(authority, marketplace, false).unwrap();
        hub.set_authorized(authority, replacement, true).unwrap();

        assert!(hub
            .notify_skill_activation_at(marketplace, user, make_skill(1), SkillType::StakeBoostI, 0, 0)
            .is_err());
        assert!(hub
            .notify_skill_activation_at(replacement, user, make_skill(1), SkillType::StakeBoostI, 0, 0)
            .is_ok());
    }
}

mod keeper_tests {
    use super::*;

    #[test]
    fn test_check_then_perform_cycle() {
        let (hub, _, _) = make_hub();
        let user = make_user(1);

        hub.open_deposit_at(user, 1_000 * ONE_AUR, 2, 0).unwrap();
        hub.set_auto_compound(user, true, ONE_AUR);

        let (should, amount) = hub.check_auto_compound_at(&user, 30 * DAY);
        assert!(should);
        assert_eq!(
            amount,
            expected_reward(1_000 * ONE_AUR, 1_200, 30 * DAY as u128)
        );

        let compounded = hub.perform_auto_compound_at(user, 30 * DAY).unwrap();
        assert_eq!(compounded, amount);

        let deposit = hub.deposit_info(&user).unwrap();
        assert_eq!(deposit.amount, 1_000 * ONE_AUR + compounded);
        assert_eq!(deposit.compound_count, 1);

        // Compound XP awarded through the hub path
        assert!(hub.progress(&user).xp_from_compound <= hub.progress(&user).xp);
        assert!(hub.progress(&user).xp_from_stake > 0);
    }

    #[test]
    fn test_batch_partial_failure_reports_per_user() {
        let (hub, _, _) = make_hub();
        let staked = make_user(1);
        let closed = make_user(2);
        let not_opted = make_user(3);

        hub.open_deposit_at(staked, 1_000 * ONE_AUR, 0, 0).unwrap();
        hub.set_auto_compound(staked, true, 0);

        hub.open_deposit_at(closed, 1_000 * ONE_AUR, 0, 0).unwrap();
        hub.set_auto_compound(closed, true, 0);
        hub.close_deposit_at(closed, DAY).unwrap();

        let outcomes = hub.batch_auto_compound_at(&[staked, closed, not_opted], 30 * DAY);

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].result.is_ok());
        assert!(outcomes[1].result.is_err());
        assert!(outcomes[2].result.is_err());

        // The successful user's deposit grew despite sibling failures
        assert!(hub.deposit_info(&staked).unwrap().amount > 1_000 * ONE_AUR);
    }

    #[test]
    fn test_keeper_discovery_pagination() {
        let (hub, _, _) = make_hub();

        for i in 1..=7u8 {
            hub.set_auto_compound(make_user(i), i % 2 == 1, 0);
        }

        let all = hub.auto_compound_users(0, 100);
        assert_eq!(all.len(), 4);

        let first_page = hub.auto_compound_users(0, 3);
        let second_page = hub.auto_compound_users(3, 3);
        assert_eq!(first_page.len(), 3);
        assert_eq!(second_page.len(), 1);
        assert!(!first_page.contains(&second_page[0]));
    }

    #[test]
    fn test_compound_includes_banked_rewards() {
        let (hub, _, marketplace) = make_hub();
        let user = make_user(1);

        hub.open_deposit_at(user, 1_000 * ONE_AUR, 2, 0).unwrap();
        hub.set_auto_compound(user, true, 0);

        // Boost change at day 15 banks the first window
        hub.notify_skill_activation_at(
            marketplace,
            user,
            make_skill(1),
            SkillType::StakeBoostI,
            500,
            15 * DAY,
        )
        .unwrap();
        assert!(hub.deposit_info(&user).unwrap().pending_rewards > 0);

        let compounded = hub.perform_auto_compound_at(user, 30 * DAY).unwrap();
        let first_window = expected_reward(1_000 * ONE_AUR, 1_200, 15 * DAY as u128);
        let second_window = expected_reward(1_000 * ONE_AUR, 1_260, 15 * DAY as u128);

        assert_eq!(compounded, first_window + second_window);
        assert_eq!(hub.deposit_info(&user).unwrap().pending_rewards, 0);
    }
}
