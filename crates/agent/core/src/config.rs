//! Agent configuration and its documented safe defaults.
//!
//! Every field has a hard-coded default so a partially specified file (or no
//! file at all) still yields a working, conservative agent. With the `serde`
//! feature each section deserializes with `#[serde(default)]`.

use std::collections::HashSet;

use crate::backoff::Category;
use crate::cooldown::MAX_GROUPS;
use crate::error::ConfigError;
use crate::types::{AbilityId, AffiliationFlags, GroupId};

/// Complete configuration for one agent.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Configuration {
    pub thresholds: Thresholds,
    pub abilities: Vec<AbilityConfig>,
    pub anti_waste: AntiWaste,
    pub clustering: Clustering,
    pub heal: HealConfig,
    pub timing: TimingConfig,
    /// Whether low self health interrupts offense through the emergency and
    /// critical priority classes. When false, the arbiter never produces
    /// `EmergencyHeal` or `CriticalHeal`; self-heal still runs through
    /// `medium_self_hp`.
    pub emergency_interrupt_enabled: bool,
}

impl Configuration {
    pub fn new() -> Self {
        Self {
            thresholds: Thresholds::default(),
            abilities: Vec::new(),
            anti_waste: AntiWaste::default(),
            clustering: Clustering::default(),
            heal: HealConfig::default(),
            timing: TimingConfig::default(),
            emergency_interrupt_enabled: true,
        }
    }

    /// Appends an ability to the table (builder pattern).
    #[must_use]
    pub fn with_ability(mut self, ability: AbilityConfig) -> Self {
        self.abilities.push(ability);
        self
    }

    #[must_use]
    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    #[must_use]
    pub fn with_clustering(mut self, clustering: Clustering) -> Self {
        self.clustering = clustering;
        self
    }

    #[must_use]
    pub fn with_heal(mut self, heal: HealConfig) -> Self {
        self.heal = heal;
        self
    }

    /// Looks up an ability by id.
    pub fn ability(&self, id: AbilityId) -> Option<&AbilityConfig> {
        self.abilities.iter().find(|a| a.id == id)
    }

    /// Abilities of one tier, in configuration order.
    pub fn abilities_in(&self, tier: AbilityTier) -> impl Iterator<Item = &AbilityConfig> + '_ {
        self.abilities.iter().filter(move |a| a.tier == tier)
    }

    /// Number of group slots the cooldown registry needs for this table.
    pub fn group_count(&self) -> usize {
        self.abilities
            .iter()
            .map(|a| a.group.index() + 1)
            .max()
            .unwrap_or(0)
            .max(GroupId::SPECIAL.index() + 1)
            .min(MAX_GROUPS)
    }

    /// Checks internal consistency.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found: out-of-range or inverted
    /// thresholds, duplicate ability ids, unsupported groups, or zero gates.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.thresholds.validate()?;
        for (name, value) in [
            (
                "anti_waste.min_target_hp_for_consumable",
                self.anti_waste.min_target_hp_for_consumable,
            ),
            ("heal.strong_below_hp", self.heal.strong_below_hp),
        ] {
            check_percent(name, value)?;
        }
        for entry in &self.heal.allow_list {
            if let Some(value) = entry.hp_threshold {
                check_percent("heal.allow_list.hp_threshold", value)?;
            }
        }

        let mut seen = HashSet::with_capacity(self.abilities.len());
        for ability in &self.abilities {
            if !seen.insert(ability.id) {
                return Err(ConfigError::DuplicateAbility(ability.id));
            }
            if ability.group.index() >= MAX_GROUPS {
                return Err(ConfigError::GroupOutOfRange {
                    ability: ability.id,
                    group: ability.group,
                    max: MAX_GROUPS,
                });
            }
        }

        if self.clustering.min_count == 0 {
            return Err(ConfigError::ZeroClusterCount);
        }
        if self.heal.area_min_allies == 0 {
            return Err(ConfigError::ZeroAreaAllies);
        }
        if self.timing.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        Ok(())
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}

fn check_percent(name: &'static str, value: u8) -> Result<(), ConfigError> {
    if value > 100 {
        return Err(ConfigError::ThresholdOutOfRange { name, value });
    }
    Ok(())
}

fn check_order(
    lower: (&'static str, u8),
    upper: (&'static str, u8),
) -> Result<(), ConfigError> {
    if lower.1 > upper.1 {
        return Err(ConfigError::ThresholdOrder {
            lower: lower.0,
            lower_value: lower.1,
            upper: upper.0,
            upper_value: upper.1,
        });
    }
    Ok(())
}

// ============================================================================
// Thresholds
// ============================================================================

/// Health and mana percentages that drive the arbiter and the heal rules.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Thresholds {
    /// Below this self hp% the arbiter enters `EmergencyHeal`.
    pub emergency_self_hp: u8,
    /// Below this self hp% the arbiter enters `CriticalHeal` and ally heals stop.
    pub critical_self_hp: u8,
    /// Below this self hp% ally heals stop.
    pub low_self_hp: u8,
    /// Below this self hp% the agent prefers healing itself over non-critical allies.
    pub medium_self_hp: u8,
    /// Allies below this hp% are always healed while the agent is adequate.
    pub critical_ally_hp: u8,
    /// Allies below this hp% are healed; allow-list entries may override it.
    pub low_ally_hp: u8,
    /// Minimum urgency for a heal when no other rule fires.
    pub normal_urgency: u8,
    /// Optional `NormalHeal` class threshold. Disabled unless configured.
    pub normal_self_hp: Option<u8>,
    /// Below this self mp% the arbiter enters `ResourceRecovery`.
    pub low_mana: u8,
    /// At or above this self hp% (with `support_mana`) the arbiter reports `Support`.
    pub support_self_hp: u8,
    pub support_mana: u8,
}

impl Thresholds {
    pub const DEFAULT_EMERGENCY_SELF_HP: u8 = 20;
    pub const DEFAULT_CRITICAL_SELF_HP: u8 = 35;
    pub const DEFAULT_LOW_SELF_HP: u8 = 50;
    pub const DEFAULT_MEDIUM_SELF_HP: u8 = 70;
    pub const DEFAULT_CRITICAL_ALLY_HP: u8 = 25;
    pub const DEFAULT_LOW_ALLY_HP: u8 = 60;
    pub const DEFAULT_NORMAL_URGENCY: u8 = 30;
    pub const DEFAULT_LOW_MANA: u8 = 20;
    pub const DEFAULT_SUPPORT_SELF_HP: u8 = 90;
    pub const DEFAULT_SUPPORT_MANA: u8 = 60;

    fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("emergency_self_hp", self.emergency_self_hp),
            ("critical_self_hp", self.critical_self_hp),
            ("low_self_hp", self.low_self_hp),
            ("medium_self_hp", self.medium_self_hp),
            ("critical_ally_hp", self.critical_ally_hp),
            ("low_ally_hp", self.low_ally_hp),
            ("normal_urgency", self.normal_urgency),
            ("low_mana", self.low_mana),
            ("support_self_hp", self.support_self_hp),
            ("support_mana", self.support_mana),
        ] {
            check_percent(name, value)?;
        }

        check_order(
            ("emergency_self_hp", self.emergency_self_hp),
            ("critical_self_hp", self.critical_self_hp),
        )?;
        check_order(
            ("critical_self_hp", self.critical_self_hp),
            ("low_self_hp", self.low_self_hp),
        )?;
        check_order(
            ("low_self_hp", self.low_self_hp),
            ("medium_self_hp", self.medium_self_hp),
        )?;
        check_order(
            ("critical_ally_hp", self.critical_ally_hp),
            ("low_ally_hp", self.low_ally_hp),
        )?;
        if let Some(normal) = self.normal_self_hp {
            check_percent("normal_self_hp", normal)?;
            check_order(
                ("critical_self_hp", self.critical_self_hp),
                ("normal_self_hp", normal),
            )?;
        }
        Ok(())
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            emergency_self_hp: Self::DEFAULT_EMERGENCY_SELF_HP,
            critical_self_hp: Self::DEFAULT_CRITICAL_SELF_HP,
            low_self_hp: Self::DEFAULT_LOW_SELF_HP,
            medium_self_hp: Self::DEFAULT_MEDIUM_SELF_HP,
            critical_ally_hp: Self::DEFAULT_CRITICAL_ALLY_HP,
            low_ally_hp: Self::DEFAULT_LOW_ALLY_HP,
            normal_urgency: Self::DEFAULT_NORMAL_URGENCY,
            normal_self_hp: None,
            low_mana: Self::DEFAULT_LOW_MANA,
            support_self_hp: Self::DEFAULT_SUPPORT_SELF_HP,
            support_mana: Self::DEFAULT_SUPPORT_MANA,
        }
    }
}

// ============================================================================
// Abilities
// ============================================================================

/// Planner slot an ability fills. Tiers are evaluated in a fixed order by the
/// planner that owns them; the table order only matters within one tier.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum AbilityTier {
    // Attack planner
    AreaAbility,
    AreaConsumable,
    SingleAbility,
    SingleConsumable,

    // Ally-healing selector
    CustomRemedy,
    StrongRemedy,
    StandardRemedy,
    AreaRemedy,
    ItemRemedy,
    ManaRemedy,

    // Self-heal planner
    SelfStrongRemedy,
    SelfRemedy,
}

impl AbilityTier {
    /// Backoff category charged when an action of this tier fails.
    pub const fn category(self) -> Category {
        match self {
            Self::AreaAbility | Self::SingleAbility => Category::Attack,
            Self::AreaConsumable | Self::SingleConsumable => Category::Consumable,
            Self::CustomRemedy
            | Self::StrongRemedy
            | Self::StandardRemedy
            | Self::AreaRemedy
            | Self::ItemRemedy
            | Self::ManaRemedy
            | Self::SelfStrongRemedy
            | Self::SelfRemedy => Category::Heal,
        }
    }

    /// Returns true for tiers that are used as items rather than cast.
    pub const fn is_item(self) -> bool {
        matches!(
            self,
            Self::AreaConsumable | Self::SingleConsumable | Self::ItemRemedy | Self::ManaRemedy
        )
    }
}

/// One entry of the ability table.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityConfig {
    pub id: AbilityId,
    pub group: GroupId,
    /// Mana cost; zero for most items.
    pub cost: u32,
    pub cooldown_ms: u64,
    pub tier: AbilityTier,
    /// Maximum distance to the target in tiles. Only remedies are range-checked.
    #[cfg_attr(feature = "serde", serde(default = "AbilityConfig::default_range"))]
    pub range: u32,
}

impl AbilityConfig {
    pub const DEFAULT_RANGE: u32 = 7;

    pub fn new(id: u32, group: GroupId, cost: u32, cooldown_ms: u64, tier: AbilityTier) -> Self {
        Self {
            id: AbilityId(id),
            group,
            cost,
            cooldown_ms,
            tier,
            range: Self::DEFAULT_RANGE,
        }
    }

    #[must_use]
    pub fn with_range(mut self, range: u32) -> Self {
        self.range = range;
        self
    }

    #[cfg(feature = "serde")]
    fn default_range() -> u32 {
        Self::DEFAULT_RANGE
    }
}

// ============================================================================
// Attack gates
// ============================================================================

/// Minimum target health below which costly consumables are withheld.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AntiWaste {
    pub min_target_hp_for_consumable: u8,
}

impl Default for AntiWaste {
    fn default() -> Self {
        Self {
            min_target_hp_for_consumable: 15,
        }
    }
}

/// Cluster gate for area abilities and consumables.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Clustering {
    /// Minimum hostile count around the target, target included.
    pub min_count: u32,
    /// Radius around the target in tiles.
    pub radius: u32,
    /// Fire area actions even when non-hostile creatures stand in the radius.
    pub ignore_bystanders: bool,
    /// Radius of the visibility query used to survey the cluster.
    pub scan_radius: u32,
}

impl Default for Clustering {
    fn default() -> Self {
        Self {
            min_count: 3,
            radius: 3,
            ignore_bystanders: false,
            scan_radius: 8,
        }
    }
}

// ============================================================================
// Healing
// ============================================================================

/// Explicitly trusted heal target.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AllyEntry {
    /// Creature name, matched case-insensitively.
    pub name: String,
    /// Replaces `low_ally_hp` for this ally.
    #[cfg_attr(feature = "serde", serde(default))]
    pub hp_threshold: Option<u8>,
    /// This ally may receive mana-restoring remedies.
    #[cfg_attr(feature = "serde", serde(default))]
    pub restore_mana: bool,
}

impl AllyEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hp_threshold: None,
            restore_mana: false,
        }
    }

    #[must_use]
    pub fn with_threshold(mut self, hp: u8) -> Self {
        self.hp_threshold = Some(hp);
        self
    }

    #[must_use]
    pub fn with_mana_restore(mut self) -> Self {
        self.restore_mana = true;
        self
    }
}

/// Ally-healing eligibility and remedy gates.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HealConfig {
    pub allow_list: Vec<AllyEntry>,
    /// Affiliations that qualify a creature as an ally.
    pub accepted_flags: AffiliationFlags,
    /// Consult the external affiliation lookup as a last resort.
    pub use_affiliation_lookup: bool,
    /// Allies below this hp% get the strong remedy tier.
    pub strong_below_hp: u8,
    /// Wounded eligible allies needed within range for the area remedy.
    pub area_min_allies: u32,
    /// Radius of the visibility query for ally scans.
    pub scan_radius: u32,
    /// How long the last best candidate is reused before a full rescan.
    pub rescan_interval_ms: u64,
    /// Name used as the target of self-heal spells.
    pub self_name: String,
}

impl Default for HealConfig {
    fn default() -> Self {
        Self {
            allow_list: Vec::new(),
            accepted_flags: AffiliationFlags::PARTY,
            use_affiliation_lookup: false,
            strong_below_hp: 30,
            area_min_allies: 2,
            scan_radius: 7,
            rescan_interval_ms: 200,
            self_name: String::new(),
        }
    }
}

// ============================================================================
// Timing
// ============================================================================

/// Tick cadence and cache lifetimes.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TimingConfig {
    /// Tick period; also the staleness bound of the resource snapshot.
    pub tick_interval_ms: u64,
    /// Lifetime of a polled group readiness value.
    pub group_ttl_ms: u64,
    /// Lifetime of a polled ability readiness value.
    pub ability_ttl_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 50,
            group_ttl_ms: 50,
            ability_ttl_ms: 100,
        }
    }
}
