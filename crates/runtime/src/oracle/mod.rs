//! Shared ownership of the host's oracles.
//!
//! The tick worker outlives the builder, so it holds the oracles behind `Arc`
//! and lends them to the core as an [`AgentEnv`] once per tick. Optional
//! capabilities are settled here, once: a host without a cooldown query gets
//! [`EventDrivenCooldowns`], a host without an affiliation service gets
//! [`NoAffiliation`].
use std::sync::Arc;

use agent_core::{
    AffiliationOracle, AgentEnv, CooldownOracle, EntityOracle, EventDrivenCooldowns,
    NoAffiliation, ReadinessStrategy, ResourceOracle,
};

/// All oracles the core reads from, with fallbacks already resolved.
#[derive(Clone)]
pub struct OracleBundle {
    pub(crate) entities: Arc<dyn EntityOracle>,
    pub(crate) resources: Arc<dyn ResourceOracle>,
    pub(crate) cooldowns: Arc<dyn CooldownOracle>,
    pub(crate) affiliation: Arc<dyn AffiliationOracle>,
    strategy: ReadinessStrategy,
}

impl OracleBundle {
    /// Bundles the oracles, substituting fallbacks for the missing optional ones.
    pub fn new(
        entities: Arc<dyn EntityOracle>,
        resources: Arc<dyn ResourceOracle>,
        cooldowns: Option<Arc<dyn CooldownOracle>>,
        affiliation: Option<Arc<dyn AffiliationOracle>>,
    ) -> Self {
        let strategy = ReadinessStrategy::resolve(cooldowns.is_some());
        let cooldowns = cooldowns.unwrap_or_else(|| Arc::new(EventDrivenCooldowns));
        let affiliation = affiliation.unwrap_or_else(|| Arc::new(NoAffiliation));

        tracing::info!("cooldown readiness strategy: {}", strategy);

        Self {
            entities,
            resources,
            cooldowns,
            affiliation,
            strategy,
        }
    }

    /// How cooldown readiness is decided for this host.
    pub fn strategy(&self) -> ReadinessStrategy {
        self.strategy
    }

    /// Borrows the bundle as the environment for one planning pass.
    pub fn as_agent_env(&self) -> AgentEnv<'_> {
        AgentEnv::new(
            self.entities.as_ref(),
            self.resources.as_ref(),
            self.cooldowns.as_ref(),
            self.affiliation.as_ref(),
        )
    }
}

impl std::fmt::Debug for OracleBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OracleBundle")
            .field("strategy", &self.strategy)
            .finish_non_exhaustive()
    }
}
