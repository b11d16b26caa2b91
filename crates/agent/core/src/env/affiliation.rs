/// External lookup deciding whether a named creature belongs to the agent's side
/// (shared guild roster, whitelist service, ...).
pub trait AffiliationOracle: Send + Sync {
    fn is_affiliated(&self, name: &str) -> bool;
}

/// Fallback for hosts without an affiliation service.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAffiliation;

impl AffiliationOracle for NoAffiliation {
    fn is_affiliated(&self, _name: &str) -> bool {
        false
    }
}
