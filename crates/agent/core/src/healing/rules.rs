//! Self-preservation rules for ally healing.
//!
//! The agent's own survival outranks any ally. The rules are applied in a
//! fixed order and the first one that matches decides:
//!
//! | # | condition | verdict |
//! |---|-----------|---------|
//! | 1 | self hp < `critical_self_hp` | decline |
//! | 2 | self hp < `low_self_hp` | decline |
//! | 3 | ally hp < `critical_ally_hp` | heal |
//! | 4 | self hp < `medium_self_hp` | decline (tend to self) |
//! | 5 | ally hp < ally threshold (custom or `low_ally_hp`) | heal |
//! | 6 | urgency > `normal_urgency` | heal, otherwise decline |

use crate::config::Thresholds;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum DeclineReason {
    SelfCritical,
    SelfLow,
    SelfPreferred,
    NotUrgent,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum HealReason {
    AllyCritical,
    AllyLow,
    Urgent,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HealVerdict {
    Decline(DeclineReason),
    Heal(HealReason),
}

impl HealVerdict {
    pub fn is_heal(self) -> bool {
        matches!(self, HealVerdict::Heal(_))
    }
}

/// Rules 1 and 2, which depend on the agent alone.
///
/// When this declines no ally can be healed, so the scan can be skipped.
pub fn self_gate(thresholds: &Thresholds, self_hp: u8) -> Option<DeclineReason> {
    if self_hp < thresholds.critical_self_hp {
        Some(DeclineReason::SelfCritical)
    } else if self_hp < thresholds.low_self_hp {
        Some(DeclineReason::SelfLow)
    } else {
        None
    }
}

/// Applies the full rule table to one ally.
pub fn evaluate(
    thresholds: &Thresholds,
    self_hp: u8,
    ally_hp: u8,
    ally_threshold: Option<u8>,
    urgency: u8,
) -> HealVerdict {
    if let Some(reason) = self_gate(thresholds, self_hp) {
        return HealVerdict::Decline(reason);
    }
    if ally_hp < thresholds.critical_ally_hp {
        return HealVerdict::Heal(HealReason::AllyCritical);
    }
    if self_hp < thresholds.medium_self_hp {
        return HealVerdict::Decline(DeclineReason::SelfPreferred);
    }
    if ally_hp < ally_threshold.unwrap_or(thresholds.low_ally_hp) {
        return HealVerdict::Heal(HealReason::AllyLow);
    }
    if urgency > thresholds.normal_urgency {
        HealVerdict::Heal(HealReason::Urgent)
    } else {
        HealVerdict::Decline(DeclineReason::NotUrgent)
    }
}
