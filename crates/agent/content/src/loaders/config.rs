//! Agent configuration loader.

use std::path::Path;

use agent_core::Configuration;

use crate::loaders::{LoadResult, read_file};

/// Embedded reference configuration.
const DEFAULT_TOML: &str = include_str!("../../data/configs/default.toml");

/// Loader for [`Configuration`] from TOML or RON files.
///
/// Every loaded configuration is validated before it is returned; missing
/// fields take the documented defaults.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load a configuration, choosing the format by file extension
    /// (`.ron` for RON, anything else for TOML).
    pub fn load(path: &Path) -> LoadResult<Configuration> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("ron") => Self::load_ron(path),
            _ => Self::load_toml(path),
        }
    }

    /// Load config data from a TOML file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the TOML file containing a Configuration
    pub fn load_toml(path: &Path) -> LoadResult<Configuration> {
        let content = read_file(path)?;
        Self::from_toml_str(&content)
            .map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))
    }

    /// Load config data from a RON file.
    pub fn load_ron(path: &Path) -> LoadResult<Configuration> {
        let content = read_file(path)?;
        Self::from_ron_str(&content)
            .map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))
    }

    pub fn from_toml_str(content: &str) -> LoadResult<Configuration> {
        let config: Configuration = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;
        Self::checked(config)
    }

    pub fn from_ron_str(content: &str) -> LoadResult<Configuration> {
        let config: Configuration = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config RON: {}", e))?;
        Self::checked(config)
    }

    /// The configuration shipped with the crate.
    pub fn embedded_default() -> LoadResult<Configuration> {
        Self::from_toml_str(DEFAULT_TOML)
    }

    fn checked(config: Configuration) -> LoadResult<Configuration> {
        config.validate()?;
        tracing::debug!(
            "loaded configuration with {} abilities",
            config.abilities.len()
        );
        Ok(config)
    }
}
