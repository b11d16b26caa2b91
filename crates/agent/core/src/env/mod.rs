//! Traits describing what the agent can observe about the game world.
//!
//! Oracles expose visible creatures, the agent's own resources, and the game's
//! cooldown state. The [`AgentEnv`] aggregate bundles them so planners can read
//! everything they need without coupling to a concrete host.
//!
//! Optional capabilities are resolved once, when the environment is built:
//! a host without a cooldown query plugs in [`EventDrivenCooldowns`], a host
//! without an affiliation service plugs in [`NoAffiliation`]. Planners never
//! check for capabilities at call time.
mod affiliation;
mod cooldowns;
mod entities;
mod error;
mod resources;

pub use affiliation::{AffiliationOracle, NoAffiliation};
pub use cooldowns::{CooldownOracle, EventDrivenCooldowns};
pub use entities::EntityOracle;
pub use error::ProviderError;
pub use resources::ResourceOracle;

/// Aggregates the oracles a planning pass reads from.
#[derive(Clone, Copy)]
pub struct AgentEnv<'a> {
    pub entities: &'a dyn EntityOracle,
    pub resources: &'a dyn ResourceOracle,
    pub cooldowns: &'a dyn CooldownOracle,
    pub affiliation: &'a dyn AffiliationOracle,
}

impl<'a> AgentEnv<'a> {
    pub fn new(
        entities: &'a dyn EntityOracle,
        resources: &'a dyn ResourceOracle,
        cooldowns: &'a dyn CooldownOracle,
        affiliation: &'a dyn AffiliationOracle,
    ) -> Self {
        Self {
            entities,
            resources,
            cooldowns,
            affiliation,
        }
    }
}

impl std::fmt::Debug for AgentEnv<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentEnv").finish_non_exhaustive()
    }
}
