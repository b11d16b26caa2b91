//! Priority arbiter.
//!
//! Derives the agent's operating [`PriorityClass`] from its own health and mana
//! each tick. The class gates offense and support but never gates healing: a
//! heal concern is always evaluated, only the backoff tracker can pause it.

use crate::backoff::{BackoffTracker, Category};
use crate::clock::Timestamp;
use crate::config::{Configuration, Thresholds};
use crate::resources::ResourceSnapshot;

/// Operating mode for one tick. Lower variants are more urgent.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum PriorityClass {
    EmergencyHeal,
    CriticalHeal,
    NormalHeal,
    ResourceRecovery,
    Offense,
    Support,
}

impl PriorityClass {
    #[inline]
    pub fn permits_offense(self) -> bool {
        self >= PriorityClass::Offense
    }

    /// Returns true for classes in which the agent should tend to itself.
    #[inline]
    pub fn is_heal(self) -> bool {
        self <= PriorityClass::NormalHeal
    }
}

/// Computes [`PriorityClass`] and the offense/heal gates.
#[derive(Clone, Debug)]
pub struct PriorityArbiter {
    thresholds: Thresholds,
    interrupt_enabled: bool,
}

impl PriorityArbiter {
    pub fn new(config: &Configuration) -> Self {
        Self {
            thresholds: config.thresholds.clone(),
            interrupt_enabled: config.emergency_interrupt_enabled,
        }
    }

    /// Classifies the snapshot. Pure and total.
    ///
    /// Checks, first match wins:
    /// 1. `hp < emergency_self_hp` (interrupt enabled)
    /// 2. `hp < critical_self_hp` (interrupt enabled)
    /// 3. `hp < normal_self_hp` (when configured)
    /// 4. `mp < low_mana`
    /// 5. `hp >= support_self_hp && mp >= support_mana`
    /// 6. otherwise offense
    pub fn current_class(&self, snapshot: &ResourceSnapshot) -> PriorityClass {
        let t = &self.thresholds;
        let hp = snapshot.hp_pct;
        let mp = snapshot.mp_pct;

        if self.interrupt_enabled {
            if hp < t.emergency_self_hp {
                return PriorityClass::EmergencyHeal;
            }
            if hp < t.critical_self_hp {
                return PriorityClass::CriticalHeal;
            }
        }
        if t.normal_self_hp.is_some_and(|limit| hp < limit) {
            return PriorityClass::NormalHeal;
        }
        if mp < t.low_mana {
            return PriorityClass::ResourceRecovery;
        }
        if hp >= t.support_self_hp && mp >= t.support_mana {
            return PriorityClass::Support;
        }
        PriorityClass::Offense
    }

    /// Offense is allowed when the class permits it and `category` is not backed off.
    ///
    /// Group readiness is left to the planner, per ability.
    pub fn can_attack(
        &self,
        snapshot: &ResourceSnapshot,
        backoff: &BackoffTracker,
        category: Category,
        now: Timestamp,
    ) -> bool {
        let class = self.current_class(snapshot);
        if !class.permits_offense() {
            tracing::trace!("offense gated by {}", class);
            return false;
        }
        !backoff.is_blocked(category, now)
    }

    pub fn can_heal(&self, backoff: &BackoffTracker, now: Timestamp) -> bool {
        !backoff.is_blocked(Category::Heal, now)
    }
}
