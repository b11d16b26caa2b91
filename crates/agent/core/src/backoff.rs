//! Exhaustion/backoff tracking for failed actions.
//!
//! Game cooldowns describe when the *game* allows an action again. Backoff
//! describes when the *agent* is willing to try again after the executor
//! reported a failure (target out of sight, inventory empty, server rejected
//! the packet). The two are orthogonal: a category can be backed off while
//! every ability in it is off cooldown.

use strum::{EnumCount, IntoEnumIterator};

use crate::clock::Timestamp;

/// Failure bucket an action is charged to.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::AsRefStr,
    strum::EnumIter,
    strum::EnumCount,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum Category {
    Heal,
    Attack,
    Consumable,
}

impl Category {
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Per-category failure bookkeeping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BackoffState {
    pub consecutive_failures: u32,
    pub blocked_until: Timestamp,
}

/// Tracks consecutive failures per [`Category`] and the resulting retry deadlines.
#[derive(Clone, Debug, Default)]
pub struct BackoffTracker {
    states: [BackoffState; Category::COUNT],
}

impl BackoffTracker {
    pub const BASE_DELAY_MS: u64 = 100;
    pub const MAX_DELAY_MS: u64 = 800;

    /// Largest shift applied to the base delay; beyond it the cap is reached anyway.
    const MAX_SHIFT: u32 = 3;

    pub fn new() -> Self {
        Self::default()
    }

    /// Backoff delay after `failures` previous consecutive failures.
    ///
    /// Produces 100, 200, 400, 800, 800, ... ms.
    pub const fn delay_for(failures: u32) -> u64 {
        let shift = if failures < Self::MAX_SHIFT {
            failures
        } else {
            Self::MAX_SHIFT
        };
        let delay = Self::BASE_DELAY_MS << shift;
        if delay < Self::MAX_DELAY_MS {
            delay
        } else {
            Self::MAX_DELAY_MS
        }
    }

    pub fn is_blocked(&self, category: Category, now: Timestamp) -> bool {
        now < self.states[category.index()].blocked_until
    }

    /// Records a failure and returns the new retry deadline.
    pub fn mark_failure(&mut self, category: Category, now: Timestamp) -> Timestamp {
        let state = &mut self.states[category.index()];
        let delay = Self::delay_for(state.consecutive_failures);
        state.consecutive_failures = state.consecutive_failures.saturating_add(1);
        state.blocked_until = now + delay;

        tracing::debug!(
            "{} backed off for {}ms after {} consecutive failure(s)",
            category,
            delay,
            state.consecutive_failures
        );
        state.blocked_until
    }

    pub fn mark_success(&mut self, category: Category) {
        let state = &mut self.states[category.index()];
        if state.consecutive_failures > 0 {
            tracing::debug!("{} backoff cleared", category);
        }
        *state = BackoffState::default();
    }

    pub fn state(&self, category: Category) -> BackoffState {
        self.states[category.index()]
    }

    /// Iterates over every category with its current state.
    pub fn iter(&self) -> impl Iterator<Item = (Category, BackoffState)> + '_ {
        Category::iter().map(|category| (category, self.state(category)))
    }
}
