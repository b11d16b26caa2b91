//! Simulation settings and loaders.
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use agent_content::{ConfigLoader, PresetRegistry};
use agent_core::Configuration;

/// Settings for one arena run.
#[derive(Clone, Debug)]
pub struct SimConfig {
    pub ticks: u64,
    pub seed: u64,
    /// Agent configuration file; the embedded default when unset.
    pub config_path: Option<PathBuf>,
    /// Heal preset key (`ally-heal/v2`) or bare name (`ally-heal`).
    pub preset: Option<String>,
    pub log_dir: Option<PathBuf>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            ticks: 200,
            seed: 7,
            config_path: None,
            preset: None,
            log_dir: None,
        }
    }
}

impl SimConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `SIM_TICKS` - Number of ticks to run (default: 200)
    /// - `SIM_SEED` - Arena RNG seed (default: 7)
    /// - `SIM_CONFIG` - Path to a TOML or RON agent configuration
    /// - `SIM_PRESET` - Heal preset to apply on top of the configuration
    /// - `SIM_LOG_DIR` - Also write logs to `<dir>/agent-sim.log`
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(ticks) = read_env::<u64>("SIM_TICKS") {
            config.ticks = ticks.max(1);
        }
        if let Some(seed) = read_env::<u64>("SIM_SEED") {
            config.seed = seed;
        }
        config.config_path = env::var("SIM_CONFIG").ok().map(PathBuf::from);
        config.preset = env::var("SIM_PRESET").ok().filter(|p| !p.is_empty());
        config.log_dir = env::var("SIM_LOG_DIR").ok().map(PathBuf::from);

        config
    }

    /// Loads the agent configuration and applies the preset, if any.
    pub fn agent_configuration(&self) -> anyhow::Result<Configuration> {
        let mut agent = match &self.config_path {
            Some(path) => ConfigLoader::load(path)?,
            None => ConfigLoader::embedded_default()?,
        };

        if let Some(name) = &self.preset {
            let registry = PresetRegistry::load()?;
            let preset = registry.resolve(name).ok_or_else(|| {
                let known: Vec<&str> = registry.keys().collect();
                anyhow::anyhow!("unknown preset {name:?}, expected one of {known:?}")
            })?;
            preset.apply(&mut agent);
        }

        Ok(agent)
    }
}

fn read_env<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok()?.parse().ok()
}
