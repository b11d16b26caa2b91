//! Mutable agent state owned by the scheduler.

use crate::action::Action;
use crate::backoff::BackoffTracker;
use crate::clock::Timestamp;
use crate::config::Configuration;
use crate::cooldown::{CooldownRegistry, ReadinessStrategy};
use crate::events::{AgentEvent, EventInbox};
use crate::healing::HealScanCache;
use crate::resources::ResourceCache;

/// Everything the planners remember between ticks.
///
/// The scheduler owns exactly one `Context` and lends it to the planners by
/// `&mut`; there is no other shared state.
#[derive(Clone, Debug)]
pub struct Context {
    pub resources: ResourceCache,
    pub cooldowns: CooldownRegistry,
    pub backoff: BackoffTracker,
    pub heal_cache: HealScanCache,
    pub inbox: EventInbox,
}

impl Context {
    pub fn new(config: &Configuration, strategy: ReadinessStrategy) -> Self {
        Self {
            resources: ResourceCache::new(config.timing.tick_interval_ms),
            cooldowns: CooldownRegistry::new(config, strategy),
            backoff: BackoffTracker::new(),
            heal_cache: HealScanCache::new(),
            inbox: EventInbox::new(),
        }
    }

    /// Queues a host event for the next [`apply_events`](Self::apply_events).
    pub fn push_event(&mut self, at: Timestamp, event: AgentEvent) {
        self.inbox.push(at, event);
    }

    /// Applies every pending event. Returns how many were applied.
    ///
    /// Each event takes effect at its own timestamp, so a cooldown reported
    /// 30 ms ago ends 30 ms earlier than one reported now.
    pub fn apply_events(&mut self) -> usize {
        let Self {
            resources,
            cooldowns,
            heal_cache,
            inbox,
            ..
        } = self;

        let mut applied = 0;
        for (at, event) in inbox.drain() {
            match event {
                AgentEvent::HealthChanged { hp, hp_max } => resources.set_health(hp, hp_max, at),
                AgentEvent::ManaChanged { mp, mp_max } => resources.set_mana(mp, mp_max, at),
                AgentEvent::AbilityUsed {
                    ability,
                    group,
                    duration_ms,
                } => cooldowns.mark_used(ability, group, duration_ms, at),
                AgentEvent::GroupUsed { group, duration_ms } => {
                    cooldowns.mark_group_used(group, duration_ms, at)
                }
                AgentEvent::AllyHealthChanged { creature, hp_pct } => {
                    tracing::trace!("ally {} now at {}%", creature, hp_pct);
                    heal_cache.invalidate();
                }
            }
            applied += 1;
        }
        if applied > 0 {
            tracing::trace!("applied {} event(s)", applied);
        }
        applied
    }

    /// Feeds an executor outcome back into cooldowns and backoff.
    ///
    /// Success starts the ability's configured cooldown on both the ability and
    /// its group and clears the category's backoff. Failure extends the
    /// category's backoff; the action is not retried within the same tick.
    pub fn record_outcome(
        &mut self,
        config: &Configuration,
        action: &Action,
        success: bool,
        now: Timestamp,
    ) {
        let category = action.category();
        if success {
            match config.ability(action.id()) {
                Some(ability) => {
                    self.cooldowns
                        .mark_used(ability.id, ability.group, ability.cooldown_ms, now)
                }
                None => tracing::warn!("executed {} is not in the ability table", action.id()),
            }
            self.backoff.mark_success(category);
        } else {
            let until = self.backoff.mark_failure(category, now);
            tracing::warn!("{} failed, {} backed off until {}", action, category, until);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backoff::Category;
    use crate::config::{AbilityConfig, AbilityTier};
    use crate::env::EventDrivenCooldowns;
    use crate::types::{AbilityId, CreatureRef, GroupId};

    fn config() -> Configuration {
        Configuration::default().with_ability(AbilityConfig::new(
            9,
            GroupId::ATTACK,
            10,
            2_000,
            AbilityTier::SingleAbility,
        ))
    }

    fn strike() -> Action {
        Action::SingleAbility {
            id: AbilityId(9),
            target: CreatureRef(1),
        }
    }

    #[test]
    fn events_apply_at_their_own_time() {
        let config = config();
        let mut ctx = Context::new(&config, ReadinessStrategy::EventDriven);
        ctx.push_event(Timestamp(100), AgentEvent::HealthChanged { hp: 30, hp_max: 100 });
        ctx.push_event(
            Timestamp(100),
            AgentEvent::GroupUsed {
                group: GroupId::ATTACK,
                duration_ms: 500,
            },
        );

        assert_eq!(ctx.apply_events(), 2);
        assert_eq!(ctx.resources.snapshot().hp_pct, 30);
        assert_eq!(
            ctx.cooldowns.group_entry(GroupId::ATTACK).map(|e| e.ready_at),
            Some(Timestamp(600))
        );
        assert_eq!(ctx.apply_events(), 0);
    }

    #[test]
    fn success_starts_cooldown_and_clears_backoff() {
        let config = config();
        let mut ctx = Context::new(&config, ReadinessStrategy::EventDriven);
        ctx.backoff.mark_failure(Category::Attack, Timestamp(0));

        ctx.record_outcome(&config, &strike(), true, Timestamp(1_000));
        assert!(!ctx.backoff.is_blocked(Category::Attack, Timestamp(1_000)));
        assert!(!ctx.cooldowns.can_use(
            AbilityId(9),
            GroupId::ATTACK,
            &EventDrivenCooldowns,
            Timestamp(2_999)
        ));
        assert!(ctx.cooldowns.can_use(
            AbilityId(9),
            GroupId::ATTACK,
            &EventDrivenCooldowns,
            Timestamp(3_000)
        ));
    }

    #[test]
    fn failure_backs_off_category() {
        let config = config();
        let mut ctx = Context::new(&config, ReadinessStrategy::EventDriven);

        ctx.record_outcome(&config, &strike(), false, Timestamp(0));
        ctx.record_outcome(&config, &strike(), false, Timestamp(100));
        assert!(ctx.backoff.is_blocked(Category::Attack, Timestamp(299)));
        assert!(!ctx.backoff.is_blocked(Category::Attack, Timestamp(300)));
        assert!(ctx.cooldowns.ability_entry(AbilityId(9)).is_none());
    }
}
