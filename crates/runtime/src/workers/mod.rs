//! Worker tasks that back the runtime orchestration.
//!
//! A single tick worker owns the agent's [`agent_core::Context`]; nothing else
//! touches it, so no locks are needed.

mod tick;

pub use tick::{Command, TickWorker};
