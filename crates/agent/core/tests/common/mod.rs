//! In-memory world used by the integration tests.

#![allow(dead_code)]

use agent_core::{
    AffiliationFlags, AgentEnv, CooldownOracle, CreatureRef, EntityOracle, EventDrivenCooldowns,
    NoAffiliation, Point3, ProviderError, ResourceOracle, ResourceSnapshot, Timestamp,
};

#[derive(Clone, Debug)]
pub struct Creature {
    pub id: CreatureRef,
    pub name: String,
    pub position: Point3,
    pub hp_pct: u8,
    pub hostile: bool,
    pub flags: AffiliationFlags,
}

impl Creature {
    pub fn hostile(id: u32, x: i32, y: i32, hp_pct: u8) -> Self {
        Self {
            id: CreatureRef(id),
            name: format!("monster {id}"),
            position: Point3::new(x, y, 0),
            hp_pct,
            hostile: true,
            flags: AffiliationFlags::empty(),
        }
    }

    pub fn ally(id: u32, name: &str, x: i32, y: i32, hp_pct: u8) -> Self {
        Self {
            id: CreatureRef(id),
            name: name.to_string(),
            position: Point3::new(x, y, 0),
            hp_pct,
            hostile: false,
            flags: AffiliationFlags::PARTY,
        }
    }

    pub fn bystander(id: u32, x: i32, y: i32) -> Self {
        Self {
            id: CreatureRef(id),
            name: format!("bystander {id}"),
            position: Point3::new(x, y, 0),
            hp_pct: 100,
            hostile: false,
            flags: AffiliationFlags::empty(),
        }
    }
}

/// Static world: the agent stands at the origin.
#[derive(Clone, Debug)]
pub struct World {
    pub creatures: Vec<Creature>,
    pub health: (u32, u32),
    pub mana: (u32, u32),
}

impl World {
    pub fn new(creatures: Vec<Creature>) -> Self {
        Self {
            creatures,
            health: (1000, 1000),
            mana: (1000, 1000),
        }
    }

    pub fn with_resources(mut self, health: (u32, u32), mana: (u32, u32)) -> Self {
        self.health = health;
        self.mana = mana;
        self
    }

    pub fn env(&self) -> AgentEnv<'_> {
        AgentEnv::new(self, self, &EventDrivenCooldowns, &NoAffiliation)
    }

    pub fn env_with<'a>(&'a self, cooldowns: &'a dyn CooldownOracle) -> AgentEnv<'a> {
        AgentEnv::new(self, self, cooldowns, &NoAffiliation)
    }

    fn find(&self, c: CreatureRef) -> Option<&Creature> {
        self.creatures.iter().find(|creature| creature.id == c)
    }
}

impl EntityOracle for World {
    fn visible_creatures(&self, radius: u32) -> Vec<CreatureRef> {
        self.creatures
            .iter()
            .filter(|c| c.position.within(Point3::ORIGIN, radius))
            .map(|c| c.id)
            .collect()
    }

    fn position(&self, c: CreatureRef) -> Option<Point3> {
        self.find(c).map(|c| c.position)
    }

    fn health_percent(&self, c: CreatureRef) -> Option<u8> {
        self.find(c).map(|c| c.hp_pct)
    }

    fn is_hostile(&self, c: CreatureRef) -> bool {
        self.find(c).is_some_and(|c| c.hostile)
    }

    fn name(&self, c: CreatureRef) -> Option<String> {
        self.find(c).map(|c| c.name.clone())
    }

    fn affiliation(&self, c: CreatureRef) -> AffiliationFlags {
        self.find(c).map_or(AffiliationFlags::empty(), |c| c.flags)
    }

    fn self_position(&self) -> Option<Point3> {
        Some(Point3::ORIGIN)
    }
}

impl ResourceOracle for World {
    fn agent_health(&self) -> Result<(u32, u32), ProviderError> {
        Ok(self.health)
    }

    fn agent_mana(&self) -> Result<(u32, u32), ProviderError> {
        Ok(self.mana)
    }
}

/// Snapshot with the given percentages over a 1000-point pool.
pub fn snapshot(hp_pct: u8, mp_pct: u8) -> ResourceSnapshot {
    ResourceSnapshot {
        hp: u32::from(hp_pct) * 10,
        hp_max: 1000,
        hp_pct,
        mp: u32::from(mp_pct) * 10,
        mp_max: 1000,
        mp_pct,
        last_update: Timestamp::ZERO,
    }
}
