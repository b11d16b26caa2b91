//! Data-driven agent configuration.
//!
//! This crate turns data files into `agent_core` configuration:
//! - Agent configuration (TOML or RON)
//! - Named, versioned heal-rule presets (embedded RON)
//!
//! Differences between healing rule sets live here as data. Every preset feeds
//! the same selector in `agent_core::healing`.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, HealPreset, LoadResult, PresetRegistry, ThresholdOverrides,
};
