//! Tick driver for the agent decision core.
//!
//! This crate owns the one mutable [`agent_core::Context`], wakes up on a fixed
//! interval, runs [`agent_core::plan_tick`], hands the planned actions to an
//! [`ActionExecutor`], and feeds the outcomes back into cooldowns and backoff.
//! Consumers embed [`Runtime`] and talk to it through [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`oracle`] bundles the host's oracles with their resolved fallbacks
//! - `workers` keeps the tick task internal to the crate
pub mod api;
pub mod oracle;
pub mod runtime;

mod workers;

pub use api::{
    ActionExecutor, Dispatch, DryRunExecutor, Result, RuntimeError, RuntimeHandle, RuntimeStats,
    TickReport,
};
pub use oracle::OracleBundle;
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
