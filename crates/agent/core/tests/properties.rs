mod common;

use agent_core::healing::{evaluate, self_gate, urgency};
use agent_core::{
    AbilityConfig, AbilityTier, Action, AllyHealSelector, AttackPlanner, BackoffTracker, Category,
    Configuration, Context, CreatureRef, EventDrivenCooldowns, GroupId, PriorityArbiter,
    PriorityClass, ReadinessStrategy, Thresholds, Timestamp,
};
use common::{Creature, World, snapshot};
use proptest::prelude::*;

fn area_config(min_count: u32) -> Configuration {
    let mut config = Configuration::default()
        .with_ability(AbilityConfig::new(
            1,
            GroupId::ATTACK,
            10,
            2_000,
            AbilityTier::AreaAbility,
        ))
        .with_ability(AbilityConfig::new(
            2,
            GroupId::SUPPORT,
            0,
            2_000,
            AbilityTier::AreaConsumable,
        ));
    config.clustering.min_count = min_count;
    config
}

fn hostile_layout() -> impl Strategy<Value = Vec<(i32, i32)>> {
    prop::collection::vec((-6i32..=6, -6i32..=6), 0..10)
}

proptest! {
    #[test]
    fn no_area_action_below_cluster_threshold(
        layout in hostile_layout(),
        bystanders in prop::collection::vec((-6i32..=6, -6i32..=6), 0..3),
        min_count in 1u32..6,
        ignore_bystanders in any::<bool>(),
    ) {
        let mut config = area_config(min_count);
        config.clustering.ignore_bystanders = ignore_bystanders;

        let mut creatures = vec![Creature::hostile(1, 0, 2, 80)];
        creatures.extend(
            layout
                .iter()
                .enumerate()
                .map(|(i, &(x, y))| Creature::hostile(10 + i as u32, x, y, 80)),
        );
        creatures.extend(
            bystanders
                .iter()
                .enumerate()
                .map(|(i, &(x, y))| Creature::bystander(100 + i as u32, x, y)),
        );
        let world = World::new(creatures.clone());
        let anchor = creatures[0].position;

        let hostiles_in_radius = creatures
            .iter()
            .filter(|c| c.hostile && c.position.within(anchor, config.clustering.radius))
            .count() as u32;
        let bystanders_in_radius = creatures
            .iter()
            .filter(|c| !c.hostile && c.position.within(anchor, config.clustering.radius))
            .count();

        let mut ctx = Context::new(&config, ReadinessStrategy::EventDriven);
        let action = AttackPlanner::new(&config).plan(
            CreatureRef(1),
            &mut ctx,
            world.env(),
            &snapshot(80, 50),
            Timestamp(0),
        );

        let is_area = matches!(
            action,
            Some(Action::AreaAbility { .. } | Action::AreaConsumable { .. })
        );
        if is_area {
            prop_assert!(hostiles_in_radius >= min_count);
            prop_assert!(ignore_bystanders || bystanders_in_radius == 0);
        }
    }

    #[test]
    fn consumables_never_wasted_on_nearly_dead_targets(target_hp in 0u8..=100, mp_pct in 0u8..=100) {
        let mut config = Configuration::default().with_ability(AbilityConfig::new(
            5,
            GroupId::SUPPORT,
            0,
            1_000,
            AbilityTier::SingleConsumable,
        ));
        config.anti_waste.min_target_hp_for_consumable = 15;
        let world = World::new(vec![Creature::hostile(1, 1, 0, target_hp)]);
        let mut ctx = Context::new(&config, ReadinessStrategy::EventDriven);

        let action = AttackPlanner::new(&config).plan(
            CreatureRef(1),
            &mut ctx,
            world.env(),
            &snapshot(80, mp_pct),
            Timestamp(0),
        );
        if target_hp < 15 {
            prop_assert_eq!(action, None);
        }
    }

    #[test]
    fn urgency_is_bounded_and_monotone(hp in 0u8..=100, distance in 0u32..60) {
        let score = urgency(hp, distance);
        prop_assert!(score <= 100);

        if hp < 100 {
            prop_assert!(urgency(hp + 1, distance) <= score);
        }
        let unclamped = 100 - u32::from(hp) > 2 * (distance + 1);
        if unclamped {
            prop_assert!(urgency(hp, distance + 1) < score);
        } else {
            prop_assert!(urgency(hp, distance + 1) <= score);
        }
    }

    #[test]
    fn current_class_is_monotone_in_health(hp in 0u8..100, mp in 0u8..=100, interrupt in any::<bool>()) {
        let mut config = Configuration::default();
        config.emergency_interrupt_enabled = interrupt;
        config.thresholds.normal_self_hp = Some(60);
        let arbiter = PriorityArbiter::new(&config);

        let lower = arbiter.current_class(&snapshot(hp, mp));
        let higher = arbiter.current_class(&snapshot(hp + 1, mp));
        prop_assert!(lower <= higher);
    }

    #[test]
    fn critical_self_never_heals_allies(
        self_hp in 0u8..Thresholds::DEFAULT_CRITICAL_SELF_HP,
        ally_hp in 0u8..=100,
        ally_x in -5i32..=5,
    ) {
        let config = Configuration::default().with_ability(AbilityConfig::new(
            9,
            GroupId::HEALING,
            10,
            1_000,
            AbilityTier::StandardRemedy,
        ));
        let world = World::new(vec![Creature::ally(3, "Mira", ally_x, 1, ally_hp)]);
        let mut ctx = Context::new(&config, ReadinessStrategy::EventDriven);

        let action = AllyHealSelector::new(&config).plan(
            &mut ctx,
            world.env(),
            &snapshot(self_hp, 100),
            Timestamp(0),
        );
        prop_assert_eq!(action, None);
        prop_assert!(self_gate(&config.thresholds, self_hp).is_some());
        prop_assert!(!evaluate(&config.thresholds, self_hp, ally_hp, None, 100).is_heal());
    }

    #[test]
    fn cooldown_round_trip(duration in 1u64..10_000, start in 0u64..1_000_000, epsilon in 0u64..100) {
        let config = Configuration::default();
        let mut ctx = Context::new(&config, ReadinessStrategy::EventDriven);
        let ability = agent_core::AbilityId(4);
        let t = Timestamp(start);

        ctx.cooldowns.mark_used(ability, GroupId::ATTACK, duration, t);
        prop_assert!(!ctx.cooldowns.can_use(ability, GroupId::ATTACK, &EventDrivenCooldowns, t));
        prop_assert!(ctx.cooldowns.can_use(
            ability,
            GroupId::ATTACK,
            &EventDrivenCooldowns,
            t + duration + epsilon
        ));
    }
}

#[test]
fn backoff_sequence_and_reset() {
    let mut tracker = BackoffTracker::new();
    let now = Timestamp(0);
    let windows: Vec<u64> = (0..4)
        .map(|_| tracker.mark_failure(Category::Heal, now).as_millis())
        .collect();
    assert_eq!(windows, vec![100, 200, 400, 800]);

    tracker.mark_success(Category::Heal);
    assert_eq!(tracker.mark_failure(Category::Heal, now).as_millis(), 100);
}

#[test]
fn class_thresholds_with_interrupt_disabled() {
    let mut config = Configuration::default();
    config.emergency_interrupt_enabled = false;
    let arbiter = PriorityArbiter::new(&config);
    for hp in 0..=100u8 {
        let class = arbiter.current_class(&snapshot(hp, 50));
        assert!(class >= PriorityClass::ResourceRecovery, "hp {hp} gave {class}");
    }
}
