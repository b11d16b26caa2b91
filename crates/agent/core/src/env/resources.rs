use super::ProviderError;

/// Raw accessor for the agent's own health and mana.
pub trait ResourceOracle: Send + Sync {
    /// Current and maximum health.
    fn agent_health(&self) -> Result<(u32, u32), ProviderError>;

    /// Current and maximum mana.
    fn agent_mana(&self) -> Result<(u32, u32), ProviderError>;
}
