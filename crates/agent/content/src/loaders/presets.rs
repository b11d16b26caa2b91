//! Named, versioned heal-rule presets.
//!
//! A preset is a partial set of thresholds (plus a couple of heal gates)
//! layered over a [`Configuration`]: fields the preset names are replaced,
//! everything else keeps its configured value. Presets are addressed as
//! `name/vN`, e.g. `ally-heal/v2`.

use std::collections::BTreeMap;
use std::fmt;

use agent_core::{Configuration, Thresholds};
use serde::{Deserialize, Serialize};

use crate::loaders::LoadResult;

/// One heal-rule preset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealPreset {
    pub name: String,
    pub version: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub thresholds: ThresholdOverrides,
    #[serde(default = "default_interrupt")]
    pub emergency_interrupt_enabled: bool,
    /// Overrides `heal.strong_below_hp` when set.
    #[serde(default)]
    pub strong_below_hp: Option<u8>,
}

fn default_interrupt() -> bool {
    true
}

/// Threshold fields a preset sets. `None` leaves the configured value alone.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdOverrides {
    pub emergency_self_hp: Option<u8>,
    pub critical_self_hp: Option<u8>,
    pub low_self_hp: Option<u8>,
    pub medium_self_hp: Option<u8>,
    pub critical_ally_hp: Option<u8>,
    pub low_ally_hp: Option<u8>,
    pub normal_urgency: Option<u8>,
    pub normal_self_hp: Option<u8>,
    pub low_mana: Option<u8>,
    pub support_self_hp: Option<u8>,
    pub support_mana: Option<u8>,
}

impl ThresholdOverrides {
    pub fn apply(&self, thresholds: &mut Thresholds) {
        let set = |slot: &mut u8, value: Option<u8>| {
            if let Some(value) = value {
                *slot = value;
            }
        };
        set(&mut thresholds.emergency_self_hp, self.emergency_self_hp);
        set(&mut thresholds.critical_self_hp, self.critical_self_hp);
        set(&mut thresholds.low_self_hp, self.low_self_hp);
        set(&mut thresholds.medium_self_hp, self.medium_self_hp);
        set(&mut thresholds.critical_ally_hp, self.critical_ally_hp);
        set(&mut thresholds.low_ally_hp, self.low_ally_hp);
        set(&mut thresholds.normal_urgency, self.normal_urgency);
        set(&mut thresholds.low_mana, self.low_mana);
        set(&mut thresholds.support_self_hp, self.support_self_hp);
        set(&mut thresholds.support_mana, self.support_mana);
        if self.normal_self_hp.is_some() {
            thresholds.normal_self_hp = self.normal_self_hp;
        }
    }
}

impl HealPreset {
    /// Registry key, `name/vN`.
    pub fn key(&self) -> String {
        format!("{}/v{}", self.name, self.version)
    }

    /// Writes the fields this preset sets into `config`.
    pub fn apply(&self, config: &mut Configuration) {
        self.thresholds.apply(&mut config.thresholds);
        config.emergency_interrupt_enabled = self.emergency_interrupt_enabled;
        if let Some(strong) = self.strong_below_hp {
            config.heal.strong_below_hp = strong;
        }
        tracing::info!("applied heal preset {}", self.key());
    }
}

impl fmt::Display for HealPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

/// All presets shipped with the crate, keyed by `name/vN`.
#[derive(Debug, Clone)]
pub struct PresetRegistry {
    presets: BTreeMap<String, HealPreset>,
}

impl PresetRegistry {
    /// Loads the embedded presets.
    pub fn load() -> LoadResult<Self> {
        let ally_heal_ron = include_str!("../../data/presets/ally_heal.ron");
        Self::from_ron_str(ally_heal_ron)
    }

    /// Parses a RON list of presets, validating each against the default configuration.
    pub fn from_ron_str(content: &str) -> LoadResult<Self> {
        let list: Vec<HealPreset> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse presets RON: {}", e))?;

        let mut presets = BTreeMap::new();
        for preset in list {
            let mut layered = Configuration::default();
            preset.apply(&mut layered);
            layered
                .validate()
                .map_err(|e| anyhow::anyhow!("preset {} is invalid: {}", preset.key(), e))?;

            let key = preset.key();
            if presets.insert(key.clone(), preset).is_some() {
                anyhow::bail!("preset {} is defined more than once", key);
            }
        }
        Ok(Self { presets })
    }

    pub fn get(&self, key: &str) -> Option<&HealPreset> {
        self.presets.get(key)
    }

    /// Newest version of the preset called `name`.
    pub fn latest(&self, name: &str) -> Option<&HealPreset> {
        self.presets
            .values()
            .filter(|preset| preset.name == name)
            .max_by_key(|preset| preset.version)
    }

    /// Resolves either a full key (`ally-heal/v1`) or a bare name (latest version).
    pub fn resolve(&self, key_or_name: &str) -> Option<&HealPreset> {
        self.get(key_or_name).or_else(|| self.latest(key_or_name))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.presets.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}
