//! Carries the agent's actions out in the arena.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use agent_core::{AbilityTier, Action, Configuration};
use agent_runtime::ActionExecutor;

use crate::world::ArenaWorld;

/// Chance that the game rejects an otherwise valid action.
const FIZZLE_CHANCE: f64 = 0.05;
const AREA_RADIUS: u32 = 3;

/// Executor backed by [`ArenaWorld`].
///
/// Looks the ability up in the agent's configuration to price it and pick its
/// effect. Fails when mana runs short, the target is gone, or the cast
/// fizzles.
pub struct ArenaExecutor {
    world: Arc<ArenaWorld>,
    config: Configuration,
    rng: Mutex<StdRng>,
}

impl ArenaExecutor {
    pub fn new(world: Arc<ArenaWorld>, config: Configuration, seed: u64) -> Self {
        Self {
            world,
            config,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn fizzles(&self) -> bool {
        self.rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .gen_bool(FIZZLE_CHANCE)
    }

    fn heal_amount(tier: AbilityTier) -> u32 {
        match tier {
            AbilityTier::StrongRemedy | AbilityTier::SelfStrongRemedy => 400,
            AbilityTier::AreaRemedy => 150,
            _ => 220,
        }
    }

    fn apply(&self, action: &Action) -> bool {
        let Some(ability) = self.config.ability(action.id()) else {
            tracing::warn!("{} is not a configured ability", action);
            return false;
        };
        if !self.world.spend_mana(ability.cost) {
            tracing::warn!("not enough mana for {}", action);
            return false;
        }

        match action {
            Action::AreaAbility { target, .. } => {
                self.world.damage_area(*target, AREA_RADIUS, 120) > 0
            }
            Action::AreaConsumable { target, .. } => {
                self.world.damage_area(*target, AREA_RADIUS, 80) > 0
            }
            Action::SingleAbility { target, .. } => self.world.damage_area(*target, 0, 90) > 0,
            Action::SingleConsumable { target, .. } => {
                self.world.damage_area(*target, 0, 60) > 0
            }
            Action::HealSpell { target_name, .. } => {
                let amount = Self::heal_amount(ability.tier);
                match ability.tier {
                    AbilityTier::AreaRemedy => {
                        self.world.heal_around_agent(ability.range, amount);
                        true
                    }
                    AbilityTier::SelfRemedy | AbilityTier::SelfStrongRemedy => {
                        self.world.heal_agent(amount);
                        true
                    }
                    _ if *target_name == self.config.heal.self_name => {
                        self.world.heal_agent(amount);
                        true
                    }
                    _ => self.world.heal_named(target_name, amount),
                }
            }
            Action::HealItem { target, .. } => match ability.tier {
                // Mana potions only matter to the target; the arena does not track ally mana.
                AbilityTier::ManaRemedy => true,
                _ => self.world.heal_creature(*target, 150),
            },
        }
    }
}

#[async_trait]
impl ActionExecutor for ArenaExecutor {
    async fn execute(&self, action: &Action) -> bool {
        if self.fizzles() {
            tracing::info!("{} fizzled", action);
            return false;
        }
        let ok = self.apply(action);
        tracing::debug!("executed {}: {}", action, if ok { "ok" } else { "failed" });
        ok
    }
}
