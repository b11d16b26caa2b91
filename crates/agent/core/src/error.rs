//! Common error infrastructure for agent-core.
//!
//! Planning never fails: missing data makes a candidate ineligible and the pass
//! moves on. The errors defined here cover the two places where something can
//! genuinely be wrong: configuration validation ([`ConfigError`]) and oracle
//! access ([`crate::env::ProviderError`]). Both implement [`AgentError`] so
//! callers can classify them uniformly.

use crate::types::{AbilityId, GroupId};

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Transient condition; the same request may succeed on a later tick.
    ///
    /// Examples: cooldown provider briefly unreachable, creature vanished
    Recoverable,

    /// Invalid input that must be corrected before it can be used.
    ///
    /// Examples: thresholds out of order, duplicate ability ids
    Validation,

    /// Unexpected state inconsistency that indicates a bug.
    Internal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Common trait for all agent-core errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
/// - Error codes are stable identifiers suitable for metrics and tests
pub trait AgentError: std::fmt::Display + std::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Errors reported by [`crate::Configuration::validate`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A percentage threshold is above 100.
    #[error("threshold {name} = {value} exceeds 100")]
    ThresholdOutOfRange { name: &'static str, value: u8 },

    /// Two thresholds that must be ordered are inverted.
    #[error("threshold {lower} ({lower_value}) must not exceed {upper} ({upper_value})")]
    ThresholdOrder {
        lower: &'static str,
        lower_value: u8,
        upper: &'static str,
        upper_value: u8,
    },

    /// The same ability id appears twice in the ability table.
    #[error("ability {0} is configured more than once")]
    DuplicateAbility(AbilityId),

    /// An ability references a cooldown group the registry cannot track.
    #[error("ability {ability} uses {group}, registry supports {max} groups")]
    GroupOutOfRange {
        ability: AbilityId,
        group: GroupId,
        max: usize,
    },

    /// The clustering gate would admit an empty cluster.
    #[error("clustering.min_count must be at least 1")]
    ZeroClusterCount,

    /// The area remedy would fire with no ally in range.
    #[error("heal.area_min_allies must be at least 1")]
    ZeroAreaAllies,

    /// The tick interval is zero.
    #[error("timing.tick_interval_ms must be greater than zero")]
    ZeroTickInterval,
}

impl AgentError for ConfigError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        use ConfigError::*;
        match self {
            ThresholdOutOfRange { .. } => "CONFIG_THRESHOLD_OUT_OF_RANGE",
            ThresholdOrder { .. } => "CONFIG_THRESHOLD_ORDER",
            DuplicateAbility(_) => "CONFIG_DUPLICATE_ABILITY",
            GroupOutOfRange { .. } => "CONFIG_GROUP_OUT_OF_RANGE",
            ZeroClusterCount => "CONFIG_ZERO_CLUSTER_COUNT",
            ZeroAreaAllies => "CONFIG_ZERO_AREA_ALLIES",
            ZeroTickInterval => "CONFIG_ZERO_TICK_INTERVAL",
        }
    }
}
