//! Identifiers and spatial primitives shared by every planner.

use std::fmt;

/// Opaque handle to a creature the host reports as visible.
///
/// The handle is only meaningful for the duration of a scan: a creature may
/// vanish between two oracle calls, so every lookup through it is fallible.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CreatureRef(pub u32);

impl fmt::Display for CreatureRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier of a castable spell, rune or usable item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct AbilityId(pub u32);

impl fmt::Display for AbilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ability:{}", self.0)
    }
}

/// Shared cooldown bucket covering a category of abilities.
///
/// Group ids index directly into the registry's group table, so they must stay
/// below [`crate::cooldown::MAX_GROUPS`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct GroupId(pub u8);

impl GroupId {
    pub const ATTACK: Self = Self(1);
    pub const HEALING: Self = Self(2);
    pub const SUPPORT: Self = Self(3);
    pub const SPECIAL: Self = Self(4);

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "group:{}", self.0)
    }
}

/// Tile position in the game world. `z` is the floor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point3 {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Point3 {
    pub const ORIGIN: Self = Self { x: 0, y: 0, z: 0 };

    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Chebyshev distance in tiles, or `None` when the points are on different floors.
    ///
    /// Diagonal steps cost the same as cardinal ones, which matches how range
    /// is measured for spells and thrown items.
    pub fn distance(self, other: Point3) -> Option<u32> {
        if self.z != other.z {
            return None;
        }
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        Some(dx.max(dy))
    }

    /// Returns true if `other` is on the same floor and at most `radius` tiles away.
    #[inline]
    pub fn within(self, other: Point3, radius: u32) -> bool {
        self.distance(other).is_some_and(|d| d <= radius)
    }
}

bitflags::bitflags! {
    /// Group and alliance membership reported by the host for a creature.
    ///
    /// Any overlap with the configured accepted flags makes a creature an
    /// eligible heal target.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct AffiliationFlags: u8 {
        /// Member of the agent's party.
        const PARTY = 1 << 0;
        /// Member of the agent's guild.
        const GUILD = 1 << 1;
        /// Member of an allied guild.
        const ALLIANCE = 1 << 2;
        /// On the agent's friend list.
        const FRIEND = 1 << 3;
    }
}
