//! Real-time decision core of a game-playing agent.
//!
//! Each control tick the agent picks at most one heal and one attack action
//! under scarce health and mana, ability and group cooldowns, and a changing
//! view of nearby creatures. Everything here is synchronous and deterministic:
//! time is passed in as [`Timestamp`], the world is read through the oracle
//! traits in [`env`], and all memory lives in an explicit [`Context`].
//!
//! Modules, leaves first:
//! - [`resources`]: cached health/mana snapshot
//! - [`cooldown`]: ability and group readiness
//! - [`backoff`]: retry backoff after failed actions
//! - [`priority`]: operating class and offense/heal gates
//! - [`attack`]: area vs. single-target offense
//! - [`healing`]: self-heal, ally selection and remedy choice
//! - [`tick`]: the per-tick pipeline tying them together
pub mod action;
pub mod attack;
pub mod backoff;
pub mod clock;
pub mod config;
pub mod context;
pub mod cooldown;
pub mod env;
pub mod error;
pub mod events;
pub mod healing;
pub mod priority;
pub mod resources;
pub mod tick;
pub mod tiers;
pub mod types;

pub use action::{Action, Concern};
pub use attack::{AttackPlanner, Cluster};
pub use backoff::{BackoffState, BackoffTracker, Category};
pub use clock::{Clock, ManualClock, SystemClock, Timestamp};
pub use config::{
    AbilityConfig, AbilityTier, AllyEntry, AntiWaste, Clustering, Configuration, HealConfig,
    Thresholds, TimingConfig,
};
pub use context::Context;
pub use cooldown::{CooldownEntry, CooldownKind, CooldownRegistry, MAX_GROUPS, ReadinessStrategy};
pub use env::{
    AffiliationOracle, AgentEnv, CooldownOracle, EntityOracle, EventDrivenCooldowns,
    NoAffiliation, ProviderError, ResourceOracle,
};
pub use error::{AgentError, ConfigError, ErrorSeverity};
pub use events::{AgentEvent, EventInbox};
pub use healing::{AllyHealSelector, EligibilityReason, HealCandidate, SelfHealPlanner};
pub use priority::{PriorityArbiter, PriorityClass};
pub use resources::{ResourceCache, ResourceSnapshot};
pub use tick::{TickPlan, plan_tick};
pub use types::{AbilityId, AffiliationFlags, CreatureRef, GroupId, Point3};
