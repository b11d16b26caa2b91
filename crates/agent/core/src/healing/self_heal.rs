//! Self-heal planner.

use super::cheapest_usable;
use crate::action::Action;
use crate::clock::Timestamp;
use crate::config::{AbilityTier, Configuration};
use crate::context::Context;
use crate::env::AgentEnv;
use crate::priority::{PriorityArbiter, PriorityClass};
use crate::resources::ResourceSnapshot;
use crate::tiers::{Tier, TierChain};

struct SelfPass<'p, 'e> {
    config: &'p Configuration,
    ctx: &'p mut Context,
    env: AgentEnv<'e>,
    class: PriorityClass,
    snapshot: ResourceSnapshot,
    now: Timestamp,
}

impl SelfPass<'_, '_> {
    fn cast(&mut self, tier: AbilityTier) -> Option<Action> {
        let remedy = cheapest_usable(
            self.config,
            tier,
            &mut self.ctx.cooldowns,
            self.env.cooldowns,
            self.snapshot.mp,
            None,
            self.now,
        )?;
        Some(Action::HealSpell {
            id: remedy.id,
            target_name: self.config.heal.self_name.clone(),
            cost: remedy.cost,
        })
    }
}

fn strong_self(pass: &mut SelfPass<'_, '_>) -> Option<Action> {
    if pass.class > PriorityClass::CriticalHeal {
        return None;
    }
    pass.cast(AbilityTier::SelfStrongRemedy)
}

fn regular_self(pass: &mut SelfPass<'_, '_>) -> Option<Action> {
    let hurt = pass.snapshot.hp_pct < pass.config.thresholds.medium_self_hp;
    if !pass.class.is_heal() && !hurt {
        return None;
    }
    pass.cast(AbilityTier::SelfRemedy)
}

/// Heals the agent itself. Runs before ally healing.
///
/// In `EmergencyHeal`/`CriticalHeal` a strong remedy is tried first, falling
/// back to a regular one. Regular remedies are also used whenever the agent is
/// below `medium_self_hp`, even when the arbiter stays in offense.
#[derive(Clone, Debug)]
pub struct SelfHealPlanner<'c> {
    config: &'c Configuration,
    arbiter: PriorityArbiter,
}

impl<'c> SelfHealPlanner<'c> {
    pub fn new(config: &'c Configuration) -> Self {
        Self {
            config,
            arbiter: PriorityArbiter::new(config),
        }
    }

    pub fn plan(
        &self,
        ctx: &mut Context,
        env: AgentEnv<'_>,
        snapshot: &ResourceSnapshot,
        now: Timestamp,
    ) -> Option<Action> {
        if !self.arbiter.can_heal(&ctx.backoff, now) {
            return None;
        }

        let mut pass = SelfPass {
            config: self.config,
            ctx,
            env,
            class: self.arbiter.current_class(snapshot),
            snapshot: *snapshot,
            now,
        };
        let tiers = [
            Tier::new("strong_self", strong_self),
            Tier::new("self", regular_self),
        ];
        let (tier, action) = TierChain::new("self_heal", &tiers).first_satisfied(&mut pass)?;
        tracing::debug!(
            "self heal via {} at {}% ({}): {}",
            tier,
            snapshot.hp_pct,
            pass.class,
            action
        );
        Some(action)
    }
}
