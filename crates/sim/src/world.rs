//! Scripted arena the agent fights in.
//!
//! The arena plays the game's part: it answers the oracle queries, applies the
//! agent's actions, and lets the hostiles hit back once per step.

use std::sync::{Mutex, MutexGuard, PoisonError};

use rand::Rng;
use serde::Serialize;

use agent_core::resources::percent;
use agent_core::{
    AffiliationFlags, AgentEvent, CreatureRef, EntityOracle, Point3, ProviderError,
    ResourceOracle,
};

const MANA_REGEN_PER_STEP: u32 = 12;
const HOSTILE_HIT_CHANCE: f64 = 0.25;
const MELEE_REACH: u32 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Hostile,
    Ally,
    Bystander,
}

#[derive(Clone, Debug, Serialize)]
pub struct Creature {
    pub id: CreatureRef,
    pub name: String,
    pub role: Role,
    pub position: Point3,
    pub hp: u32,
    pub hp_max: u32,
}

impl Creature {
    fn new(id: u32, name: &str, role: Role, position: Point3, hp_max: u32) -> Self {
        Self {
            id: CreatureRef(id),
            name: name.to_string(),
            role,
            position,
            hp: hp_max,
            hp_max,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn hp_pct(&self) -> u8 {
        percent(self.hp, self.hp_max)
    }
}

#[derive(Debug)]
struct ArenaState {
    creatures: Vec<Creature>,
    hp: (u32, u32),
    mp: (u32, u32),
}

impl ArenaState {
    fn find(&self, c: CreatureRef) -> Option<&Creature> {
        self.creatures.iter().find(|x| x.id == c && x.is_alive())
    }
}

/// End-of-run view of the arena.
#[derive(Clone, Debug, Serialize)]
pub struct ArenaSummary {
    pub agent_hp_pct: u8,
    pub agent_mp_pct: u8,
    pub hostiles_left: usize,
    pub allies_alive: usize,
    pub creatures: Vec<Creature>,
}

/// Shared arena state. The agent stands at the origin.
#[derive(Debug)]
pub struct ArenaWorld {
    state: Mutex<ArenaState>,
}

impl ArenaWorld {
    /// Four goblins packed together, two party members and a villager
    /// at the edge of the fight.
    pub fn skirmish() -> Self {
        let creatures = vec![
            Creature::new(1, "goblin", Role::Hostile, Point3::new(3, 0, 0), 300),
            Creature::new(2, "goblin", Role::Hostile, Point3::new(4, 1, 0), 300),
            Creature::new(3, "goblin", Role::Hostile, Point3::new(4, -1, 0), 300),
            Creature::new(4, "goblin shaman", Role::Hostile, Point3::new(5, 0, 0), 220),
            Creature::new(10, "Mira", Role::Ally, Point3::new(2, 1, 0), 600),
            Creature::new(11, "Tobin", Role::Ally, Point3::new(1, -2, 0), 800),
            Creature::new(20, "villager", Role::Bystander, Point3::new(8, 3, 0), 100),
        ];
        Self {
            state: Mutex::new(ArenaState {
                creatures,
                hp: (1000, 1000),
                mp: (600, 1000),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ArenaState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Closest living hostile, the agent's attack target.
    pub fn nearest_hostile(&self) -> Option<CreatureRef> {
        let state = self.lock();
        state
            .creatures
            .iter()
            .filter(|c| c.role == Role::Hostile && c.is_alive())
            .filter_map(|c| Some((c.position.distance(Point3::ORIGIN)?, c.id)))
            .min()
            .map(|(_, id)| id)
    }

    /// Advances the arena by one step: hostiles advance and swing, the agent
    /// regenerates mana. Returns what the game would report to the agent.
    pub fn step(&self, rng: &mut impl Rng) -> Vec<AgentEvent> {
        let mut state = self.lock();
        let mut events = Vec::new();

        let attackers: Vec<Point3> = state
            .creatures
            .iter()
            .filter(|c| c.role == Role::Hostile && c.is_alive())
            .map(|c| c.position)
            .collect();

        for from in attackers {
            if !rng.gen_bool(HOSTILE_HIT_CHANCE) {
                continue;
            }
            let damage = rng.gen_range(15..=45);

            // The agent is the preferred victim; otherwise the nearest ally in reach.
            if from.within(Point3::ORIGIN, MELEE_REACH + 1) && rng.gen_bool(0.5) {
                state.hp.0 = state.hp.0.saturating_sub(damage);
                events.push(AgentEvent::HealthChanged {
                    hp: state.hp.0,
                    hp_max: state.hp.1,
                });
                continue;
            }
            let victim = state
                .creatures
                .iter_mut()
                .filter(|c| c.role == Role::Ally && c.is_alive())
                .find(|c| from.within(c.position, MELEE_REACH + 1));
            if let Some(ally) = victim {
                ally.hp = ally.hp.saturating_sub(damage);
                events.push(AgentEvent::AllyHealthChanged {
                    creature: ally.id,
                    hp_pct: ally.hp_pct(),
                });
            }
        }

        state.mp.0 = (state.mp.0 + MANA_REGEN_PER_STEP).min(state.mp.1);
        events
    }

    /// Spends `cost` mana. Fails without spending when the pool is short.
    pub fn spend_mana(&self, cost: u32) -> bool {
        let mut state = self.lock();
        if state.mp.0 < cost {
            return false;
        }
        state.mp.0 -= cost;
        true
    }

    /// Deals `damage` to every living hostile within `radius` of `center`.
    /// Returns how many were hit.
    pub fn damage_area(&self, center: CreatureRef, radius: u32, damage: u32) -> usize {
        let mut state = self.lock();
        let Some(anchor) = state.find(center).map(|c| c.position) else {
            return 0;
        };
        let mut hit = 0;
        for creature in state
            .creatures
            .iter_mut()
            .filter(|c| c.role == Role::Hostile && c.is_alive())
            .filter(|c| c.position.within(anchor, radius))
        {
            creature.hp = creature.hp.saturating_sub(damage);
            if !creature.is_alive() {
                tracing::info!("{} {} falls", creature.name, creature.id);
            }
            hit += 1;
        }
        hit
    }

    /// Heals the agent itself.
    pub fn heal_agent(&self, amount: u32) {
        let mut state = self.lock();
        state.hp.0 = (state.hp.0 + amount).min(state.hp.1);
    }

    /// Heals the living creature called `name`. False when nobody matches.
    pub fn heal_named(&self, name: &str, amount: u32) -> bool {
        let mut state = self.lock();
        match state
            .creatures
            .iter_mut()
            .find(|c| c.name == name && c.is_alive())
        {
            Some(creature) => {
                creature.hp = (creature.hp + amount).min(creature.hp_max);
                true
            }
            None => false,
        }
    }

    /// Heals a living creature by reference.
    pub fn heal_creature(&self, target: CreatureRef, amount: u32) -> bool {
        let mut state = self.lock();
        match state
            .creatures
            .iter_mut()
            .find(|c| c.id == target && c.is_alive())
        {
            Some(creature) => {
                creature.hp = (creature.hp + amount).min(creature.hp_max);
                true
            }
            None => false,
        }
    }

    /// Heals every living ally within `radius` of the agent, and the agent.
    pub fn heal_around_agent(&self, radius: u32, amount: u32) -> usize {
        let mut state = self.lock();
        state.hp.0 = (state.hp.0 + amount).min(state.hp.1);
        let mut healed = 0;
        for ally in state
            .creatures
            .iter_mut()
            .filter(|c| c.role == Role::Ally && c.is_alive())
            .filter(|c| c.position.within(Point3::ORIGIN, radius))
        {
            ally.hp = (ally.hp + amount).min(ally.hp_max);
            healed += 1;
        }
        healed
    }

    pub fn summary(&self) -> ArenaSummary {
        let state = self.lock();
        ArenaSummary {
            agent_hp_pct: percent(state.hp.0, state.hp.1),
            agent_mp_pct: percent(state.mp.0, state.mp.1),
            hostiles_left: state
                .creatures
                .iter()
                .filter(|c| c.role == Role::Hostile && c.is_alive())
                .count(),
            allies_alive: state
                .creatures
                .iter()
                .filter(|c| c.role == Role::Ally && c.is_alive())
                .count(),
            creatures: state.creatures.clone(),
        }
    }
}

impl EntityOracle for ArenaWorld {
    fn visible_creatures(&self, radius: u32) -> Vec<CreatureRef> {
        self.lock()
            .creatures
            .iter()
            .filter(|c| c.is_alive() && c.position.within(Point3::ORIGIN, radius))
            .map(|c| c.id)
            .collect()
    }

    fn position(&self, creature: CreatureRef) -> Option<Point3> {
        self.lock().find(creature).map(|c| c.position)
    }

    fn health_percent(&self, creature: CreatureRef) -> Option<u8> {
        self.lock().find(creature).map(Creature::hp_pct)
    }

    fn is_hostile(&self, creature: CreatureRef) -> bool {
        self.lock()
            .find(creature)
            .is_some_and(|c| c.role == Role::Hostile)
    }

    fn name(&self, creature: CreatureRef) -> Option<String> {
        self.lock().find(creature).map(|c| c.name.clone())
    }

    fn affiliation(&self, creature: CreatureRef) -> AffiliationFlags {
        match self.lock().find(creature).map(|c| c.role) {
            Some(Role::Ally) => AffiliationFlags::PARTY,
            _ => AffiliationFlags::empty(),
        }
    }

    fn self_position(&self) -> Option<Point3> {
        Some(Point3::ORIGIN)
    }
}

impl ResourceOracle for ArenaWorld {
    fn agent_health(&self) -> Result<(u32, u32), ProviderError> {
        Ok(self.lock().hp)
    }

    fn agent_mana(&self) -> Result<(u32, u32), ProviderError> {
        Ok(self.lock().mp)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn nearest_hostile_skips_the_dead() {
        let world = ArenaWorld::skirmish();
        assert_eq!(world.nearest_hostile(), Some(CreatureRef(1)));

        world.damage_area(CreatureRef(1), 0, 1_000);
        assert_eq!(world.health_percent(CreatureRef(1)), None);
        assert_ne!(world.nearest_hostile(), Some(CreatureRef(1)));
        assert_eq!(world.summary().hostiles_left, 3);
    }

    #[test]
    fn area_damage_spares_bystanders() {
        let world = ArenaWorld::skirmish();
        let hit = world.damage_area(CreatureRef(2), 3, 50);
        assert_eq!(hit, 4);
        assert_eq!(world.health_percent(CreatureRef(20)), Some(100));
    }

    #[test]
    fn mana_is_spent_only_when_available() {
        let world = ArenaWorld::skirmish();
        assert!(world.spend_mana(600));
        assert!(!world.spend_mana(1));
        assert_eq!(world.agent_mana(), Ok((0, 1000)));
    }

    #[test]
    fn steps_are_reproducible_per_seed() {
        let run = |seed| {
            let world = ArenaWorld::skirmish();
            let mut rng = StdRng::seed_from_u64(seed);
            for _ in 0..20 {
                world.step(&mut rng);
            }
            world.agent_health().unwrap()
        };
        assert_eq!(run(3), run(3));
    }
}
