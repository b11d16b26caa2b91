//! Who counts as an ally.

use crate::config::HealConfig;
use crate::env::AgentEnv;
use crate::types::{AffiliationFlags, CreatureRef};

/// Why a creature was accepted as a heal target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EligibilityReason {
    /// Named on the allow-list.
    AllowList,
    /// Carries one of the accepted affiliation flags.
    Affiliation(AffiliationFlags),
    /// Confirmed by the external affiliation lookup.
    Affiliated,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Eligibility {
    pub reason: EligibilityReason,
    /// Per-ally hp threshold replacing `low_ally_hp`.
    pub threshold: Option<u8>,
    pub restore_mana: bool,
}

/// Decides whether `creature` (named `name`) may be healed.
///
/// Sources are tried in order and any one match qualifies: allow-list,
/// affiliation flags, then the external lookup when enabled. Hostile creatures
/// are never eligible.
pub fn assess(
    heal: &HealConfig,
    env: AgentEnv<'_>,
    creature: CreatureRef,
    name: &str,
) -> Option<Eligibility> {
    if env.entities.is_hostile(creature) {
        return None;
    }

    if let Some(entry) = heal
        .allow_list
        .iter()
        .find(|entry| entry.name.eq_ignore_ascii_case(name))
    {
        return Some(Eligibility {
            reason: EligibilityReason::AllowList,
            threshold: entry.hp_threshold,
            restore_mana: entry.restore_mana,
        });
    }

    let shared = env.entities.affiliation(creature) & heal.accepted_flags;
    if !shared.is_empty() {
        return Some(Eligibility {
            reason: EligibilityReason::Affiliation(shared),
            threshold: None,
            restore_mana: false,
        });
    }

    if heal.use_affiliation_lookup && env.affiliation.is_affiliated(name) {
        return Some(Eligibility {
            reason: EligibilityReason::Affiliated,
            threshold: None,
            restore_mana: false,
        });
    }

    None
}
