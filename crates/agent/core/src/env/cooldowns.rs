use super::ProviderError;
use crate::types::{AbilityId, GroupId};

/// Raw readiness query against the game's own cooldown bookkeeping.
///
/// Polling can be comparatively expensive, so the
/// [`CooldownRegistry`](crate::cooldown::CooldownRegistry) caches answers for a
/// short TTL.
pub trait CooldownOracle: Send + Sync {
    fn is_group_ready(&self, group: GroupId) -> Result<bool, ProviderError>;

    fn is_ability_ready(&self, ability: AbilityId) -> Result<bool, ProviderError>;
}

/// Fallback for hosts that only push cooldown events.
///
/// Reports everything as ready; the registry's event-derived deadlines are the
/// only source of "not ready" in this mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventDrivenCooldowns;

impl CooldownOracle for EventDrivenCooldowns {
    fn is_group_ready(&self, _group: GroupId) -> Result<bool, ProviderError> {
        Ok(true)
    }

    fn is_ability_ready(&self, _ability: AbilityId) -> Result<bool, ProviderError> {
        Ok(true)
    }
}
