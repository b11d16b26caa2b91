//! Actions emitted by the planners.

use std::fmt;

use crate::backoff::Category;
use crate::types::{AbilityId, CreatureRef};

/// A single thing the agent asks the executor to do.
///
/// Immutable once planned. Spells addressed by name (`HealSpell`) carry the
/// target's name because casting hosts resolve spell targets by name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum Action {
    AreaAbility {
        id: AbilityId,
        target: CreatureRef,
    },
    SingleAbility {
        id: AbilityId,
        target: CreatureRef,
    },
    AreaConsumable {
        id: AbilityId,
        target: CreatureRef,
    },
    SingleConsumable {
        id: AbilityId,
        target: CreatureRef,
    },
    HealSpell {
        id: AbilityId,
        target_name: String,
        cost: u32,
    },
    HealItem {
        id: AbilityId,
        target: CreatureRef,
    },
}

/// Which per-tick slot an action occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Concern {
    Heal,
    Attack,
}

impl Action {
    pub fn id(&self) -> AbilityId {
        match self {
            Action::AreaAbility { id, .. }
            | Action::SingleAbility { id, .. }
            | Action::AreaConsumable { id, .. }
            | Action::SingleConsumable { id, .. }
            | Action::HealSpell { id, .. }
            | Action::HealItem { id, .. } => *id,
        }
    }

    pub fn category(&self) -> Category {
        match self {
            Action::AreaAbility { .. } | Action::SingleAbility { .. } => Category::Attack,
            Action::AreaConsumable { .. } | Action::SingleConsumable { .. } => {
                Category::Consumable
            }
            Action::HealSpell { .. } | Action::HealItem { .. } => Category::Heal,
        }
    }

    pub fn concern(&self) -> Concern {
        match self.category() {
            Category::Heal => Concern::Heal,
            Category::Attack | Category::Consumable => Concern::Attack,
        }
    }

    /// Creature the action is aimed at, when addressed by reference.
    pub fn target(&self) -> Option<CreatureRef> {
        match self {
            Action::AreaAbility { target, .. }
            | Action::SingleAbility { target, .. }
            | Action::AreaConsumable { target, .. }
            | Action::SingleConsumable { target, .. }
            | Action::HealItem { target, .. } => Some(*target),
            Action::HealSpell { .. } => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::HealSpell {
                id, target_name, ..
            } => write!(f, "{} {} -> {}", self.as_ref(), id, target_name),
            other => match other.target() {
                Some(target) => write!(f, "{} {} -> {}", other.as_ref(), other.id(), target),
                None => write!(f, "{} {}", other.as_ref(), other.id()),
            },
        }
    }
}
