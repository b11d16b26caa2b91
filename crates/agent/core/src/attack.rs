//! Attack planner.
//!
//! Chooses between area and single-target abilities and consumables for the
//! current target. Tiers, first satisfied wins:
//!
//! 1. area ability
//! 2. area consumable
//! 3. single ability
//! 4. single consumable
//!
//! Area tiers require a cluster of hostiles around the target and, unless
//! configured otherwise, no bystanders that the area would hit. Consumable
//! tiers are withheld from targets already below the anti-waste threshold.

use crate::action::Action;
use crate::backoff::Category;
use crate::clock::Timestamp;
use crate::config::{AbilityTier, Clustering, Configuration};
use crate::context::Context;
use crate::env::{AgentEnv, EntityOracle};
use crate::priority::PriorityArbiter;
use crate::resources::ResourceSnapshot;
use crate::tiers::{Tier, TierChain};
use crate::types::{AbilityId, CreatureRef, Point3};

/// Creatures counted around an area anchor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cluster {
    /// Hostile creatures within the cluster radius, the target included.
    pub hostiles: u32,
    /// Non-hostile creatures within the cluster radius.
    pub bystanders: u32,
}

impl Cluster {
    /// Counts visible creatures within `clustering.radius` of `anchor`.
    ///
    /// The visibility query is widened past `clustering.scan_radius` when the
    /// anchor sits near its edge, so the whole disc around the anchor is seen.
    /// Creatures whose position cannot be resolved are skipped.
    pub fn survey(entities: &dyn EntityOracle, anchor: Point3, clustering: &Clustering) -> Self {
        let reach = entities
            .self_position()
            .and_then(|origin| origin.distance(anchor))
            .map_or(0, |d| d.saturating_add(clustering.radius));
        let query_radius = clustering.scan_radius.max(reach);

        let mut cluster = Cluster::default();
        for creature in entities.visible_creatures(query_radius) {
            let Some(position) = entities.position(creature) else {
                continue;
            };
            if !position.within(anchor, clustering.radius) {
                continue;
            }
            if entities.is_hostile(creature) {
                cluster.hostiles += 1;
            } else {
                cluster.bystanders += 1;
            }
        }
        cluster
    }

    /// Returns true when an area action is allowed on this cluster.
    pub fn permits_area(&self, clustering: &Clustering) -> bool {
        self.hostiles >= clustering.min_count
            && (clustering.ignore_bystanders || self.bystanders == 0)
    }
}

/// State read once at the top of an attack pass.
struct AttackPass<'p, 'e> {
    config: &'p Configuration,
    arbiter: &'p PriorityArbiter,
    ctx: &'p mut Context,
    env: AgentEnv<'e>,
    snapshot: ResourceSnapshot,
    target: CreatureRef,
    target_hp: u8,
    cluster: Cluster,
    now: Timestamp,
}

impl AttackPass<'_, '_> {
    fn permitted(&self, category: Category) -> bool {
        self.arbiter
            .can_attack(&self.snapshot, &self.ctx.backoff, category, self.now)
    }

    fn area_allowed(&self) -> bool {
        self.cluster.permits_area(&self.config.clustering)
    }

    fn worth_a_consumable(&self) -> bool {
        self.target_hp >= self.config.anti_waste.min_target_hp_for_consumable
    }

    /// First ability of `tier`, in configuration order, that is affordable and ready.
    fn pick(&mut self, tier: AbilityTier) -> Option<AbilityId> {
        let mana = self.snapshot.mp;
        let cooldowns = self.env.cooldowns;
        let now = self.now;
        let registry = &mut self.ctx.cooldowns;

        self.config
            .abilities_in(tier)
            .find(|ability| {
                ability.cost <= mana && registry.can_use(ability.id, ability.group, cooldowns, now)
            })
            .map(|ability| ability.id)
    }
}

fn area_ability(pass: &mut AttackPass<'_, '_>) -> Option<Action> {
    if !pass.area_allowed() || !pass.permitted(Category::Attack) {
        return None;
    }
    let id = pass.pick(AbilityTier::AreaAbility)?;
    Some(Action::AreaAbility {
        id,
        target: pass.target,
    })
}

fn area_consumable(pass: &mut AttackPass<'_, '_>) -> Option<Action> {
    if !pass.area_allowed() || !pass.worth_a_consumable() || !pass.permitted(Category::Consumable)
    {
        return None;
    }
    let id = pass.pick(AbilityTier::AreaConsumable)?;
    Some(Action::AreaConsumable {
        id,
        target: pass.target,
    })
}

fn single_ability(pass: &mut AttackPass<'_, '_>) -> Option<Action> {
    if !pass.permitted(Category::Attack) {
        return None;
    }
    let id = pass.pick(AbilityTier::SingleAbility)?;
    Some(Action::SingleAbility {
        id,
        target: pass.target,
    })
}

fn single_consumable(pass: &mut AttackPass<'_, '_>) -> Option<Action> {
    if !pass.worth_a_consumable() || !pass.permitted(Category::Consumable) {
        return None;
    }
    let id = pass.pick(AbilityTier::SingleConsumable)?;
    Some(Action::SingleConsumable {
        id,
        target: pass.target,
    })
}

/// Plans at most one offensive action per tick.
#[derive(Clone, Debug)]
pub struct AttackPlanner<'c> {
    config: &'c Configuration,
    arbiter: PriorityArbiter,
}

impl<'c> AttackPlanner<'c> {
    pub fn new(config: &'c Configuration) -> Self {
        Self {
            config,
            arbiter: PriorityArbiter::new(config),
        }
    }

    /// Plans an action against `target`.
    ///
    /// # Arguments
    ///
    /// * `target` - Creature currently being fought
    /// * `ctx` - Agent state; only the cooldown registry is written (poll cache)
    /// * `env` - Oracles for positions, health and cooldown polls
    /// * `snapshot` - The tick's resource snapshot
    /// * `now` - Current time
    ///
    /// # Returns
    ///
    /// `None` when the target vanished, offense is gated, or no tier is satisfied.
    pub fn plan(
        &self,
        target: CreatureRef,
        ctx: &mut Context,
        env: AgentEnv<'_>,
        snapshot: &ResourceSnapshot,
        now: Timestamp,
    ) -> Option<Action> {
        let Some(anchor) = env.entities.position(target) else {
            tracing::debug!("attack target {} has no position", target);
            return None;
        };
        let Some(target_hp) = env.entities.health_percent(target) else {
            tracing::debug!("attack target {} has no health reading", target);
            return None;
        };

        let mut pass = AttackPass {
            config: self.config,
            arbiter: &self.arbiter,
            ctx,
            env,
            snapshot: *snapshot,
            target,
            target_hp,
            cluster: Cluster::survey(env.entities, anchor, &self.config.clustering),
            now,
        };

        let tiers = [
            Tier::new("area_ability", area_ability),
            Tier::new("area_consumable", area_consumable),
            Tier::new("single_ability", single_ability),
            Tier::new("single_consumable", single_consumable),
        ];
        let (tier, action) = TierChain::new("attack", &tiers).first_satisfied(&mut pass)?;

        tracing::debug!(
            "attack via {}: {} (hostiles={}, bystanders={}, target hp={}%)",
            tier,
            action,
            pass.cluster.hostiles,
            pass.cluster.bystanders,
            target_hp
        );
        Some(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AbilityConfig;
    use crate::cooldown::ReadinessStrategy;
    use crate::env::{EventDrivenCooldowns, NoAffiliation, ProviderError, ResourceOracle};
    use crate::types::GroupId;

    struct Field {
        creatures: Vec<(CreatureRef, Point3, u8, bool)>,
    }

    impl EntityOracle for Field {
        fn visible_creatures(&self, _radius: u32) -> Vec<CreatureRef> {
            self.creatures.iter().map(|c| c.0).collect()
        }
        fn position(&self, creature: CreatureRef) -> Option<Point3> {
            self.creatures.iter().find(|c| c.0 == creature).map(|c| c.1)
        }
        fn health_percent(&self, creature: CreatureRef) -> Option<u8> {
            self.creatures.iter().find(|c| c.0 == creature).map(|c| c.2)
        }
        fn is_hostile(&self, creature: CreatureRef) -> bool {
            self.creatures.iter().any(|c| c.0 == creature && c.3)
        }
        fn name(&self, creature: CreatureRef) -> Option<String> {
            Some(format!("creature {}", creature.0))
        }
        fn self_position(&self) -> Option<Point3> {
            Some(Point3::ORIGIN)
        }
    }

    struct FullTank;

    impl ResourceOracle for FullTank {
        fn agent_health(&self) -> Result<(u32, u32), ProviderError> {
            Ok((100, 100))
        }
        fn agent_mana(&self) -> Result<(u32, u32), ProviderError> {
            Ok((500, 1000))
        }
    }

    const TARGET: CreatureRef = CreatureRef(1);

    fn config() -> Configuration {
        Configuration::default()
            .with_ability(AbilityConfig::new(10, GroupId::ATTACK, 100, 2_000, AbilityTier::AreaAbility))
            .with_ability(AbilityConfig::new(20, GroupId::ATTACK, 0, 2_000, AbilityTier::AreaConsumable))
            .with_ability(AbilityConfig::new(30, GroupId::ATTACK, 20, 2_000, AbilityTier::SingleAbility))
            .with_ability(AbilityConfig::new(40, GroupId::ATTACK, 0, 2_000, AbilityTier::SingleConsumable))
    }

    fn hostiles(count: u32, target_hp: u8) -> Field {
        let mut creatures = vec![(TARGET, Point3::new(4, 0, 0), target_hp, true)];
        for i in 1..count {
            creatures.push((CreatureRef(100 + i), Point3::new(4 + i as i32 % 2, 1, 0), 90, true));
        }
        Field { creatures }
    }

    fn snapshot(mp: u32) -> ResourceSnapshot {
        ResourceSnapshot {
            hp: 100,
            hp_max: 100,
            hp_pct: 100,
            mp,
            mp_max: mp.max(1) * 2,
            mp_pct: 50,
            last_update: Timestamp::ZERO,
        }
    }

    fn plan(config: &Configuration, field: &Field, mp: u32) -> Option<Action> {
        let mut ctx = Context::new(config, ReadinessStrategy::EventDriven);
        let env = AgentEnv::new(field, &FullTank, &EventDrivenCooldowns, &NoAffiliation);
        AttackPlanner::new(config).plan(TARGET, &mut ctx, env, &snapshot(mp), Timestamp(0))
    }

    #[test]
    fn cluster_counts_hostiles_and_bystanders() {
        let mut field = hostiles(3, 80);
        field.creatures.push((CreatureRef(50), Point3::new(5, 1, 0), 100, false));
        field.creatures.push((CreatureRef(51), Point3::new(30, 30, 0), 100, true));

        let cluster = Cluster::survey(&field, Point3::new(4, 0, 0), &Clustering::default());
        assert_eq!(cluster, Cluster { hostiles: 3, bystanders: 1 });
    }

    #[test]
    fn cluster_picks_area_ability() {
        let config = config();
        let action = plan(&config, &hostiles(3, 80), 500);
        assert_eq!(
            action,
            Some(Action::AreaAbility {
                id: AbilityId(10),
                target: TARGET
            })
        );
    }

    #[test]
    fn small_group_falls_to_single_target() {
        let config = config();
        let action = plan(&config, &hostiles(2, 80), 500);
        assert_eq!(
            action,
            Some(Action::SingleAbility {
                id: AbilityId(30),
                target: TARGET
            })
        );
    }

    #[test]
    fn insufficient_mana_falls_to_area_consumable() {
        let config = config();
        let action = plan(&config, &hostiles(4, 80), 50);
        assert_eq!(
            action,
            Some(Action::AreaConsumable {
                id: AbilityId(20),
                target: TARGET
            })
        );
    }

    #[test]
    fn anti_waste_withholds_consumables() {
        let config = config();
        // No mana for spells, target nearly dead.
        assert_eq!(plan(&config, &hostiles(4, 10), 5), None);
        assert_eq!(
            plan(&config, &hostiles(1, 15), 5),
            Some(Action::SingleConsumable {
                id: AbilityId(40),
                target: TARGET
            })
        );
    }

    #[test]
    fn vanished_target_yields_nothing() {
        let config = config();
        let field = Field {
            creatures: Vec::new(),
        };
        assert_eq!(plan(&config, &field, 500), None);
    }

    #[test]
    fn low_health_gates_offense() {
        let config = config();
        let field = hostiles(3, 80);
        let mut ctx = Context::new(&config, ReadinessStrategy::EventDriven);
        let env = AgentEnv::new(&field, &FullTank, &EventDrivenCooldowns, &NoAffiliation);
        let hurt = ResourceSnapshot {
            hp_pct: 10,
            ..snapshot(500)
        };

        assert_eq!(
            AttackPlanner::new(&config).plan(TARGET, &mut ctx, env, &hurt, Timestamp(0)),
            None
        );
    }

    #[test]
    fn attack_backoff_skips_spells_but_not_consumables() {
        let config = config();
        let field = hostiles(1, 80);
        let mut ctx = Context::new(&config, ReadinessStrategy::EventDriven);
        ctx.backoff.mark_failure(Category::Attack, Timestamp(0));
        let env = AgentEnv::new(&field, &FullTank, &EventDrivenCooldowns, &NoAffiliation);

        let action =
            AttackPlanner::new(&config).plan(TARGET, &mut ctx, env, &snapshot(500), Timestamp(10));
        assert_eq!(
            action,
            Some(Action::SingleConsumable {
                id: AbilityId(40),
                target: TARGET
            })
        );
    }
}
