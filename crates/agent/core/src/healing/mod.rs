//! Healing: ally selection, self-preservation rules and remedy choice.
//!
//! The heal concern runs every tick regardless of the arbiter's class. An ally
//! below `critical_ally_hp` is healed first as long as the agent is at or above
//! `low_self_hp`; otherwise the agent tends to itself ([`SelfHealPlanner`]) and
//! only when no self remedy is due does the [`AllyHealSelector`] pick an ally.
//!
//! Rule sets that used to differ between healing variants are now data: see
//! the named presets in the content crate, all of which feed the same
//! selector.

mod eligibility;
mod rules;
mod selector;
mod self_heal;
mod urgency;

pub use eligibility::{Eligibility, EligibilityReason, assess};
pub use rules::{DeclineReason, HealReason, HealVerdict, evaluate, self_gate};
pub use selector::{AllyHealSelector, HealCandidate, HealScanCache};
pub use self_heal::SelfHealPlanner;
pub use urgency::{DISTANCE_PENALTY, urgency};

use crate::clock::Timestamp;
use crate::config::{AbilityConfig, AbilityTier, Configuration};
use crate::cooldown::CooldownRegistry;
use crate::env::CooldownOracle;

/// Cheapest remedy of `tier` that is affordable, in range and ready.
///
/// Ties on cost keep configuration order. `distance` is `None` for remedies
/// aimed at the agent itself.
pub(crate) fn cheapest_usable<'c>(
    config: &'c Configuration,
    tier: AbilityTier,
    registry: &mut CooldownRegistry,
    cooldowns: &dyn CooldownOracle,
    mana: u32,
    distance: Option<u32>,
    now: Timestamp,
) -> Option<&'c AbilityConfig> {
    let mut remedies: Vec<&AbilityConfig> = config.abilities_in(tier).collect();
    remedies.sort_by_key(|remedy| remedy.cost);

    remedies.into_iter().find(|remedy| {
        remedy.cost <= mana
            && distance.is_none_or(|d| d <= remedy.range)
            && registry.can_use(remedy.id, remedy.group, cooldowns, now)
    })
}
