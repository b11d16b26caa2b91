//! Cooldown registry.
//!
//! Tracks readiness of individual abilities and shared cooldown groups. Two
//! sources feed it:
//!
//! - **Events**: [`CooldownRegistry::mark_used`] (and the inbox's
//!   `AbilityUsed`/`GroupUsed` events) record a `ready_at` deadline.
//! - **Polls**: under [`ReadinessStrategy::Polling`] the game's own bookkeeping
//!   is queried through a [`CooldownOracle`] and the answer is cached for a
//!   short TTL.
//!
//! A recorded deadline in the future always means "not ready". A cached poll
//! is dropped whenever an event touches its entry, so an event is never
//! overridden by a poll that predates it.

use std::collections::HashMap;

use arrayvec::ArrayVec;

use crate::clock::Timestamp;
use crate::config::Configuration;
use crate::env::{CooldownOracle, ProviderError};
use crate::types::{AbilityId, GroupId};

/// Capacity of the group table. Group ids are indices into it.
pub const MAX_GROUPS: usize = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum CooldownKind {
    Ability,
    Group,
}

/// Last acknowledged use of an ability or group.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CooldownEntry {
    pub id: u32,
    pub kind: CooldownKind,
    pub ready_at: Timestamp,
}

impl CooldownEntry {
    #[inline]
    pub fn is_ready(&self, now: Timestamp) -> bool {
        now >= self.ready_at
    }
}

/// How readiness is established, chosen once when the registry is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ReadinessStrategy {
    /// Recorded deadlines first, then TTL-cached oracle polls.
    Polling,
    /// Recorded deadlines only. The oracle is never queried.
    EventDriven,
}

impl ReadinessStrategy {
    pub const fn resolve(provider_available: bool) -> Self {
        if provider_available {
            Self::Polling
        } else {
            Self::EventDriven
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct CachedPoll {
    ready: bool,
    at: Timestamp,
}

#[derive(Clone, Debug, Default)]
struct Slot {
    entry: Option<CooldownEntry>,
    poll: Option<CachedPoll>,
}

impl Slot {
    fn record(&mut self, id: u32, kind: CooldownKind, ready_at: Timestamp) {
        self.entry = Some(CooldownEntry { id, kind, ready_at });
        self.poll = None;
    }

    fn readiness<F>(
        &mut self,
        now: Timestamp,
        ttl_ms: u64,
        strategy: ReadinessStrategy,
        health: &mut ProviderHealth,
        poll: F,
    ) -> bool
    where
        F: FnOnce() -> Result<bool, ProviderError>,
    {
        if self.entry.is_some_and(|entry| !entry.is_ready(now)) {
            return false;
        }

        if strategy == ReadinessStrategy::EventDriven {
            return true;
        }

        if let Some(cached) = self.poll.filter(|c| now.elapsed_since(c.at) < ttl_ms) {
            return cached.ready;
        }

        match health.poll(poll) {
            Some(ready) => {
                self.poll = Some(CachedPoll { ready, at: now });
                ready
            }
            None => true,
        }
    }
}

/// Bookkeeping for the cooldown provider's availability.
#[derive(Clone, Debug, Default)]
struct ProviderHealth {
    degraded: bool,
    polls: u64,
}

impl ProviderHealth {
    /// Runs one poll. `None` means the provider failed and the caller fails open.
    fn poll<F>(&mut self, poll: F) -> Option<bool>
    where
        F: FnOnce() -> Result<bool, ProviderError>,
    {
        self.polls += 1;
        match poll() {
            Ok(ready) => {
                if self.degraded {
                    tracing::info!("cooldown provider recovered");
                    self.degraded = false;
                }
                Some(ready)
            }
            Err(err) => {
                if self.degraded {
                    tracing::trace!("cooldown provider still failing: {}", err);
                } else {
                    tracing::warn!("cooldown provider failed, treating cooldowns as ready: {}", err);
                    self.degraded = true;
                }
                None
            }
        }
    }
}

/// Readiness state for abilities and cooldown groups.
#[derive(Clone, Debug)]
pub struct CooldownRegistry {
    strategy: ReadinessStrategy,
    group_ttl_ms: u64,
    ability_ttl_ms: u64,
    groups: ArrayVec<Slot, MAX_GROUPS>,
    abilities: HashMap<AbilityId, Slot>,
    health: ProviderHealth,
}

impl CooldownRegistry {
    pub fn new(config: &Configuration, strategy: ReadinessStrategy) -> Self {
        let mut groups = ArrayVec::new();
        groups.extend((0..config.group_count()).map(|_| Slot::default()));

        Self {
            strategy,
            group_ttl_ms: config.timing.group_ttl_ms,
            ability_ttl_ms: config.timing.ability_ttl_ms,
            groups,
            abilities: HashMap::with_capacity(config.abilities.len()),
            health: ProviderHealth::default(),
        }
    }

    pub fn strategy(&self) -> ReadinessStrategy {
        self.strategy
    }

    /// Returns true while the last poll of the provider failed.
    pub fn is_degraded(&self) -> bool {
        self.health.degraded
    }

    /// Number of oracle queries issued so far.
    pub fn poll_count(&self) -> u64 {
        self.health.polls
    }

    pub fn is_group_ready(
        &mut self,
        group: GroupId,
        oracle: &dyn CooldownOracle,
        now: Timestamp,
    ) -> bool {
        let strategy = self.strategy;
        let ttl = self.group_ttl_ms;
        let Self { groups, health, .. } = self;

        match Self::group_slot(groups, group) {
            Some(slot) => slot.readiness(now, ttl, strategy, health, || {
                oracle.is_group_ready(group)
            }),
            None => {
                tracing::warn!("{} is outside the group table, treating as ready", group);
                true
            }
        }
    }

    pub fn is_ability_ready(
        &mut self,
        ability: AbilityId,
        oracle: &dyn CooldownOracle,
        now: Timestamp,
    ) -> bool {
        let strategy = self.strategy;
        let ttl = self.ability_ttl_ms;
        let slot = self.abilities.entry(ability).or_default();
        slot.readiness(now, ttl, strategy, &mut self.health, || {
            oracle.is_ability_ready(ability)
        })
    }

    /// Ability ready and its group ready.
    pub fn can_use(
        &mut self,
        ability: AbilityId,
        group: GroupId,
        oracle: &dyn CooldownOracle,
        now: Timestamp,
    ) -> bool {
        self.is_ability_ready(ability, oracle, now) && self.is_group_ready(group, oracle, now)
    }

    /// Records a use of `ability`, putting both it and `group` on cooldown for
    /// `duration_ms`.
    pub fn mark_used(
        &mut self,
        ability: AbilityId,
        group: GroupId,
        duration_ms: u64,
        now: Timestamp,
    ) {
        self.mark_ability_used(ability, duration_ms, now);
        self.mark_group_used(group, duration_ms, now);
    }

    pub fn mark_ability_used(&mut self, ability: AbilityId, duration_ms: u64, now: Timestamp) {
        let ready_at = now + duration_ms;
        self.abilities
            .entry(ability)
            .or_default()
            .record(ability.0, CooldownKind::Ability, ready_at);
        tracing::debug!("{} on cooldown until {}", ability, ready_at);
    }

    pub fn mark_group_used(&mut self, group: GroupId, duration_ms: u64, now: Timestamp) {
        let ready_at = now + duration_ms;
        match Self::group_slot(&mut self.groups, group) {
            Some(slot) => {
                slot.record(u32::from(group.0), CooldownKind::Group, ready_at);
                tracing::debug!("{} on cooldown until {}", group, ready_at);
            }
            None => tracing::warn!("ignoring cooldown for {} outside the group table", group),
        }
    }

    pub fn ability_entry(&self, ability: AbilityId) -> Option<CooldownEntry> {
        self.abilities.get(&ability).and_then(|slot| slot.entry)
    }

    pub fn group_entry(&self, group: GroupId) -> Option<CooldownEntry> {
        self.groups.get(group.index()).and_then(|slot| slot.entry)
    }

    /// Slot for `group`, growing the table up to [`MAX_GROUPS`] on demand.
    fn group_slot(groups: &mut ArrayVec<Slot, MAX_GROUPS>, group: GroupId) -> Option<&mut Slot> {
        let index = group.index();
        if index >= MAX_GROUPS {
            return None;
        }
        while groups.len() <= index {
            groups.push(Slot::default());
        }
        groups.get_mut(index)
    }
}
