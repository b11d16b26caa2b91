mod common;

use agent_core::{
    AbilityConfig, AbilityId, AbilityTier, Action, AgentEvent, AllyHealSelector, AttackPlanner,
    Cluster, Configuration, Context, CreatureRef, GroupId, Point3, PriorityClass,
    ReadinessStrategy, Timestamp, plan_tick,
};
use common::{Creature, World, snapshot};

const TARGET: CreatureRef = CreatureRef(1);

fn healer_config() -> Configuration {
    Configuration::default()
        .with_ability(AbilityConfig::new(
            100,
            GroupId::HEALING,
            90,
            1_000,
            AbilityTier::StandardRemedy,
        ))
        .with_ability(AbilityConfig::new(
            101,
            GroupId::HEALING,
            40,
            1_000,
            AbilityTier::StandardRemedy,
        ))
        .with_ability(AbilityConfig::new(
            102,
            GroupId::HEALING,
            20,
            1_000,
            AbilityTier::StandardRemedy,
        ))
}

fn fighter_config() -> Configuration {
    Configuration::default()
        .with_ability(AbilityConfig::new(
            1,
            GroupId::ATTACK,
            50,
            2_000,
            AbilityTier::AreaAbility,
        ))
        .with_ability(AbilityConfig::new(
            2,
            GroupId::SPECIAL,
            30,
            2_000,
            AbilityTier::SingleAbility,
        ))
        .with_ability(AbilityConfig::new(
            3,
            GroupId::ATTACK,
            20,
            2_000,
            AbilityTier::SingleAbility,
        ))
}

#[test]
fn scenario_a_heals_wounded_ally_with_cheapest_ready_remedy() {
    let mut config = healer_config();
    config.heal.strong_below_hp = 0;
    let world = World::new(vec![Creature::ally(7, "Mira", 3, 0, 20)]);
    let mut ctx = Context::new(&config, ReadinessStrategy::EventDriven);
    // The cheapest remedy is still cooling down.
    ctx.cooldowns
        .mark_ability_used(AbilityId(102), 5_000, Timestamp(0));

    let selector = AllyHealSelector::new(&config);
    let snap = snapshot(100, 100);
    let candidate = selector
        .find_best_target(&mut ctx, world.env(), &snap, Timestamp(10))
        .expect("ally at 20% must be selected");
    assert_eq!(candidate.creature, CreatureRef(7));
    assert_eq!(candidate.distance, 3);

    let action = selector.plan_heal(&candidate, &mut ctx, world.env(), &snap, Timestamp(10));
    assert_eq!(
        action,
        Some(Action::HealSpell {
            id: AbilityId(101),
            target_name: "Mira".into(),
            cost: 40,
        })
    );
}

#[test]
fn scenario_b_declines_when_self_is_low() {
    let config = healer_config();
    let world = World::new(vec![Creature::ally(7, "Mira", 1, 0, 10)]);
    let mut ctx = Context::new(&config, ReadinessStrategy::EventDriven);

    let selector = AllyHealSelector::new(&config);
    let snap = snapshot(40, 100);
    assert_eq!(
        selector.find_best_target(&mut ctx, world.env(), &snap, Timestamp(0)),
        None
    );
    assert_eq!(selector.plan(&mut ctx, world.env(), &snap, Timestamp(0)), None);
}

#[test]
fn scenario_c_bystander_blocks_area_tier() {
    let config = fighter_config();
    let mut creatures: Vec<Creature> = (0..5)
        .map(|i| Creature::hostile(1 + i, 4 + (i as i32 % 2), (i as i32) / 2, 90))
        .collect();
    creatures.push(Creature::bystander(50, 5, 1));
    let world = World::new(creatures);
    let mut ctx = Context::new(&config, ReadinessStrategy::EventDriven);

    let action = AttackPlanner::new(&config).plan(
        TARGET,
        &mut ctx,
        world.env(),
        &snapshot(80, 50),
        Timestamp(0),
    );
    assert_eq!(
        action,
        Some(Action::SingleAbility {
            id: AbilityId(2),
            target: TARGET
        })
    );

    let mut tolerant = config.clone();
    tolerant.clustering.ignore_bystanders = true;
    let mut ctx = Context::new(&tolerant, ReadinessStrategy::EventDriven);
    let action = AttackPlanner::new(&tolerant).plan(
        TARGET,
        &mut ctx,
        world.env(),
        &snapshot(80, 50),
        Timestamp(0),
    );
    assert_eq!(
        action,
        Some(Action::AreaAbility {
            id: AbilityId(1),
            target: TARGET
        })
    );
}

#[test]
fn scenario_d_other_group_still_fires() {
    let config = fighter_config();
    let world = World::new(vec![Creature::hostile(1, 2, 0, 90)]);
    let mut ctx = Context::new(&config, ReadinessStrategy::EventDriven);
    ctx.cooldowns
        .mark_group_used(GroupId::SPECIAL, 2_000, Timestamp(0));

    let action = AttackPlanner::new(&config).plan(
        TARGET,
        &mut ctx,
        world.env(),
        &snapshot(80, 50),
        Timestamp(100),
    );
    assert_eq!(
        action,
        Some(Action::SingleAbility {
            id: AbilityId(3),
            target: TARGET
        })
    );
}

#[test]
fn tick_plans_heal_and_attack_independently() {
    let mut config = fighter_config();
    config.abilities.extend(healer_config().abilities);
    let world = World::new(vec![
        Creature::hostile(1, 2, 0, 90),
        Creature::ally(7, "Mira", 1, 1, 40),
    ])
    .with_resources((800, 1000), (500, 1000));
    let mut ctx = Context::new(&config, ReadinessStrategy::EventDriven);

    let plan = plan_tick(&mut ctx, &config, world.env(), Some(TARGET), Timestamp(0));
    assert_eq!(plan.class, PriorityClass::Offense);
    assert!(matches!(plan.heal, Some(Action::HealSpell { ref target_name, .. }) if target_name == "Mira"));
    assert!(matches!(plan.attack, Some(Action::SingleAbility { .. })));
    assert_eq!(plan.actions().count(), 2);
}

#[test]
fn inbox_is_applied_before_reads() {
    let config = fighter_config();
    let world = World::new(vec![Creature::hostile(1, 2, 0, 90)]);
    let mut ctx = Context::new(&config, ReadinessStrategy::EventDriven);

    // First tick observes full health.
    let plan = plan_tick(&mut ctx, &config, world.env(), Some(TARGET), Timestamp(0));
    assert_eq!(plan.snapshot.hp_pct, 100);

    // A health drop pushed between ticks is visible to the very next tick,
    // which no longer attacks.
    ctx.push_event(
        Timestamp(20),
        AgentEvent::HealthChanged {
            hp: 100,
            hp_max: 1000,
        },
    );
    let plan = plan_tick(&mut ctx, &config, world.env(), Some(TARGET), Timestamp(30));
    assert_eq!(plan.snapshot.hp_pct, 10);
    assert_eq!(plan.class, PriorityClass::EmergencyHeal);
    assert_eq!(plan.attack, None);
}

#[test]
fn outcomes_feed_back_into_next_tick() {
    let config = fighter_config();
    let world = World::new(vec![Creature::hostile(1, 2, 0, 90)]);
    let mut ctx = Context::new(&config, ReadinessStrategy::EventDriven);

    let plan = plan_tick(&mut ctx, &config, world.env(), Some(TARGET), Timestamp(0));
    let first = plan.attack.expect("attack planned");
    assert_eq!(first.id(), AbilityId(2));
    ctx.record_outcome(&config, &first, true, Timestamp(0));

    // Ability 2 is now cooling down; ability 3 in another group fires.
    let plan = plan_tick(&mut ctx, &config, world.env(), Some(TARGET), Timestamp(50));
    let second = plan.attack.expect("attack planned");
    assert_eq!(second.id(), AbilityId(3));

    // A failed attempt backs off the whole attack category.
    ctx.record_outcome(&config, &second, false, Timestamp(50));
    let plan = plan_tick(&mut ctx, &config, world.env(), Some(TARGET), Timestamp(100));
    assert_eq!(plan.attack, None);
    let plan = plan_tick(&mut ctx, &config, world.env(), Some(TARGET), Timestamp(150));
    assert!(plan.attack.is_some());
}

// ============================================================================
// Heal concern ordering
// ============================================================================

/// Ally remedy plus a cheaper self remedy, both in the healing group.
fn medic_config() -> Configuration {
    let mut config = Configuration::default()
        .with_ability(AbilityConfig::new(
            101,
            GroupId::HEALING,
            40,
            1_000,
            AbilityTier::StandardRemedy,
        ))
        .with_ability(AbilityConfig::new(
            200,
            GroupId::HEALING,
            20,
            1_000,
            AbilityTier::SelfRemedy,
        ));
    config.heal.self_name = "Healer".into();
    config
}

/// Name the planned heal spell targets at the given self and ally hp%.
fn heal_target(self_hp: u8, ally_hp: u8) -> Option<String> {
    let config = medic_config();
    let world = World::new(vec![Creature::ally(7, "Mira", 2, 0, ally_hp)])
        .with_resources((u32::from(self_hp) * 10, 1000), (1000, 1000));
    let mut ctx = Context::new(&config, ReadinessStrategy::EventDriven);

    let plan = plan_tick(&mut ctx, &config, world.env(), None, Timestamp(0));
    assert_eq!(plan.snapshot.hp_pct, self_hp);
    match plan.heal {
        Some(Action::HealSpell { target_name, .. }) => Some(target_name),
        Some(other) => panic!("unexpected heal action {other:?}"),
        None => None,
    }
}

#[test]
fn critical_ally_outranks_a_hurt_self() {
    // Self below medium but above low: the dying ally still goes first.
    assert_eq!(heal_target(60, 10).as_deref(), Some("Mira"));
    assert_eq!(heal_target(50, 24).as_deref(), Some("Mira"));
}

#[test]
fn low_self_hp_keeps_the_remedy_for_self() {
    assert_eq!(heal_target(49, 10).as_deref(), Some("Healer"));
    assert_eq!(heal_target(36, 10).as_deref(), Some("Healer"));
    // Critical class with the interrupt on.
    assert_eq!(heal_target(30, 10).as_deref(), Some("Healer"));
}

#[test]
fn merely_low_ally_waits_for_a_healthy_self() {
    assert_eq!(heal_target(60, 40).as_deref(), Some("Healer"));
    assert_eq!(heal_target(69, 40).as_deref(), Some("Healer"));
    assert_eq!(heal_target(71, 40).as_deref(), Some("Mira"));
}

#[test]
fn critical_ally_yields_to_self_when_no_ally_remedy_is_ready() {
    let config = medic_config();
    let world = World::new(vec![Creature::ally(7, "Mira", 5, 0, 10)])
        .with_resources((600, 1000), (1000, 1000));
    let mut ctx = Context::new(&config, ReadinessStrategy::EventDriven);
    // The only ally remedy is cooling down. Its group is not.
    ctx.cooldowns
        .mark_ability_used(AbilityId(101), 5_000, Timestamp(0));

    let plan = plan_tick(&mut ctx, &config, world.env(), None, Timestamp(10));
    assert_eq!(
        plan.heal,
        Some(Action::HealSpell {
            id: AbilityId(200),
            target_name: "Healer".into(),
            cost: 20,
        })
    );
}

#[test]
fn survey_sees_the_far_side_of_a_distant_cluster() {
    let config = fighter_config();
    // Target near the edge of the default scan radius; the bystander is within
    // the cluster radius of the target but farther than that from the agent.
    let world = World::new(vec![
        Creature::hostile(1, 7, 0, 90),
        Creature::hostile(2, 8, 1, 90),
        Creature::hostile(3, 9, 0, 90),
        Creature::bystander(50, 10, 0),
    ]);

    let cluster = Cluster::survey(&world, Point3::new(7, 0, 0), &config.clustering);
    assert_eq!(cluster.hostiles, 3);
    assert_eq!(cluster.bystanders, 1);
    assert!(!cluster.permits_area(&config.clustering));

    let mut ctx = Context::new(&config, ReadinessStrategy::EventDriven);
    let action = AttackPlanner::new(&config).plan(
        TARGET,
        &mut ctx,
        world.env(),
        &snapshot(80, 50),
        Timestamp(0),
    );
    assert!(matches!(action, Some(Action::SingleAbility { .. })), "{action:?}");
}
