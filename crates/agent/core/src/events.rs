//! Host events and the inbox that applies them between ticks.
//!
//! Hosts report resource and cooldown changes as they happen. Events are
//! queued and applied in arrival order right before a tick reads any state, so
//! a tick never observes a half-applied batch and a just-delivered event always
//! beats an older poll.

use std::collections::VecDeque;

use crate::clock::Timestamp;
use crate::types::{AbilityId, CreatureRef, GroupId};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "event", rename_all = "snake_case"))]
pub enum AgentEvent {
    HealthChanged {
        hp: u32,
        hp_max: u32,
    },
    ManaChanged {
        mp: u32,
        mp_max: u32,
    },
    /// The game acknowledged a use of `ability`, starting its and its group's cooldown.
    AbilityUsed {
        ability: AbilityId,
        group: GroupId,
        duration_ms: u64,
    },
    GroupUsed {
        group: GroupId,
        duration_ms: u64,
    },
    AllyHealthChanged {
        creature: CreatureRef,
        hp_pct: u8,
    },
}

/// FIFO of events stamped with their arrival time.
#[derive(Clone, Debug, Default)]
pub struct EventInbox {
    pending: VecDeque<(Timestamp, AgentEvent)>,
}

impl EventInbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, at: Timestamp, event: AgentEvent) {
        self.pending.push_back((at, event));
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Removes and returns every pending event in arrival order.
    pub fn drain(&mut self) -> impl Iterator<Item = (Timestamp, AgentEvent)> + '_ {
        self.pending.drain(..)
    }
}
