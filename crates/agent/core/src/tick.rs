//! One planning pass.

use crate::action::Action;
use crate::attack::AttackPlanner;
use crate::clock::Timestamp;
use crate::config::Configuration;
use crate::context::Context;
use crate::env::AgentEnv;
use crate::healing::{AllyHealSelector, HealReason, SelfHealPlanner};
use crate::priority::{PriorityArbiter, PriorityClass};
use crate::resources::ResourceSnapshot;
use crate::types::CreatureRef;

/// Outcome of [`plan_tick`]: at most one action per concern.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickPlan {
    pub class: PriorityClass,
    pub snapshot: ResourceSnapshot,
    pub heal: Option<Action>,
    pub attack: Option<Action>,
}

impl TickPlan {
    /// Planned actions, heal first.
    pub fn actions(&self) -> impl Iterator<Item = &Action> {
        self.heal.iter().chain(self.attack.iter())
    }

    pub fn is_idle(&self) -> bool {
        self.heal.is_none() && self.attack.is_none()
    }
}

/// Runs the full pipeline for one tick.
///
/// 1. apply pending events
/// 2. refresh the resource snapshot (read once, shared by every planner)
/// 3. classify
/// 4. heal concern: a critical ally first, then self, then any other ally
/// 5. attack concern, when a target is set
///
/// The two concerns are independent: a heal does not suppress the attack.
pub fn plan_tick(
    ctx: &mut Context,
    config: &Configuration,
    env: AgentEnv<'_>,
    target: Option<CreatureRef>,
    now: Timestamp,
) -> TickPlan {
    ctx.apply_events();
    let snapshot = ctx.resources.refresh(env.resources, now);
    let class = PriorityArbiter::new(config).current_class(&snapshot);

    let heal = plan_heal(ctx, config, env, &snapshot, now);

    let attack = target.and_then(|target| {
        AttackPlanner::new(config).plan(target, ctx, env, &snapshot, now)
    });

    tracing::debug!(
        "tick {}: class={} hp={}% mp={}% heal={} attack={}",
        now,
        class,
        snapshot.hp_pct,
        snapshot.mp_pct,
        heal.is_some(),
        attack.is_some()
    );

    TickPlan {
        class,
        snapshot,
        heal,
        attack,
    }
}

/// The heal concern.
///
/// The ally scan runs first. It declines on its own while the agent is below
/// `low_self_hp`, so a candidate it returns as [`HealReason::AllyCritical`]
/// outranks a self remedy. Any other candidate waits until the agent has no
/// self remedy due.
fn plan_heal(
    ctx: &mut Context,
    config: &Configuration,
    env: AgentEnv<'_>,
    snapshot: &ResourceSnapshot,
    now: Timestamp,
) -> Option<Action> {
    let selector = AllyHealSelector::new(config);
    let self_heal = SelfHealPlanner::new(config);
    let candidate = selector.find_best_target(ctx, env, snapshot, now);

    match candidate {
        Some(ally) if ally.reason == HealReason::AllyCritical => selector
            .plan_heal(&ally, ctx, env, snapshot, now)
            .or_else(|| self_heal.plan(ctx, env, snapshot, now)),
        Some(ally) => self_heal
            .plan(ctx, env, snapshot, now)
            .or_else(|| selector.plan_heal(&ally, ctx, env, snapshot, now)),
        None => self_heal.plan(ctx, env, snapshot, now),
    }
}
