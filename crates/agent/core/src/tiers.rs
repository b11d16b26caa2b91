//! Ordered "first satisfied wins" evaluation.
//!
//! Every planner in this crate is a priority list: attack tiers, remedy tiers
//! and self-heal tiers are all tried in a fixed order and the first tier that
//! yields a result decides. [`TierChain`] is that selector, with named tiers
//! so the decision path shows up in trace logs.

/// One named step of a [`TierChain`].
pub struct Tier<C, T> {
    pub name: &'static str,
    eval: fn(&mut C) -> Option<T>,
}

impl<C, T> Tier<C, T> {
    pub const fn new(name: &'static str, eval: fn(&mut C) -> Option<T>) -> Self {
        Self { name, eval }
    }
}

impl<C, T> Clone for Tier<C, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C, T> Copy for Tier<C, T> {}

impl<C, T> std::fmt::Debug for Tier<C, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Tier").field(&self.name).finish()
    }
}

/// Tries tiers left to right and stops at the first one that yields a value.
///
/// The analogue of a short-circuited logical OR over the tiers. Tiers may
/// mutate the context (e.g. to cache intermediate lookups for later tiers).
#[derive(Debug)]
pub struct TierChain<'t, C, T> {
    label: &'static str,
    tiers: &'t [Tier<C, T>],
}

impl<'t, C, T> TierChain<'t, C, T> {
    pub const fn new(label: &'static str, tiers: &'t [Tier<C, T>]) -> Self {
        Self { label, tiers }
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.tiers.iter().map(|tier| tier.name)
    }

    /// Returns the first satisfied tier's name together with its value.
    pub fn first_satisfied(&self, ctx: &mut C) -> Option<(&'static str, T)> {
        for tier in self.tiers {
            match (tier.eval)(ctx) {
                Some(value) => {
                    tracing::trace!("{}: tier {} satisfied", self.label, tier.name);
                    return Some((tier.name, value));
                }
                None => tracing::trace!("{}: tier {} skipped", self.label, tier.name),
            }
        }
        None
    }
}
