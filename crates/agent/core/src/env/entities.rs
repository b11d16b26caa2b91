use crate::types::{AffiliationFlags, CreatureRef, Point3};

/// Spatial and entity queries against the host's view of the world.
///
/// Every per-creature lookup returns `Option`: a creature can disappear
/// between the visibility query and the lookup, and planners treat `None` as
/// "ineligible" rather than as an error.
pub trait EntityOracle: Send + Sync {
    /// Creatures visible within `radius` tiles of the agent, excluding the agent.
    fn visible_creatures(&self, radius: u32) -> Vec<CreatureRef>;

    fn position(&self, creature: CreatureRef) -> Option<Point3>;

    /// Health percentage (0-100).
    fn health_percent(&self, creature: CreatureRef) -> Option<u8>;

    fn is_hostile(&self, creature: CreatureRef) -> bool;

    fn name(&self, creature: CreatureRef) -> Option<String>;

    /// Party/guild/alliance membership of the creature.
    fn affiliation(&self, _creature: CreatureRef) -> AffiliationFlags {
        AffiliationFlags::empty()
    }

    /// The agent's own position.
    fn self_position(&self) -> Option<Point3>;

    /// Whether a thrown item can travel from `from` to `to`.
    fn has_line_of_effect(&self, _from: Point3, _to: Point3) -> bool {
        true
    }
}
