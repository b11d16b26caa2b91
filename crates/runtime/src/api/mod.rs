//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate so
//! other layers can stay focused on orchestration and the tick worker.

pub mod errors;
pub mod executor;
pub mod handle;
pub mod report;

pub use errors::{Result, RuntimeError};
pub use executor::{ActionExecutor, DryRunExecutor};
pub use handle::RuntimeHandle;
pub use report::{Dispatch, RuntimeStats, TickReport};
