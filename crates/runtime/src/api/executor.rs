//! Asynchronous sink for planned actions.
//!
//! The decision core only plans; carrying an action out in the game is the
//! host's job. Runtime users plug in an [`ActionExecutor`] that forwards the
//! action to the game client, a scripted arena, or a test recorder.
use async_trait::async_trait;

use agent_core::Action;

/// Carries out one planned action.
///
/// Returns whether the game accepted the action. The runtime feeds the result
/// back into cooldowns (on success) or backoff (on failure). Execution is fire
/// and forget: there is no cancellation, and a failed action is not retried
/// within the same tick.
#[async_trait]
pub trait ActionExecutor: Send + Sync {
    async fn execute(&self, action: &Action) -> bool;
}

/// Executor that only logs. Every action reports success.
/// Useful for testing or as a fallback.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunExecutor;

#[async_trait]
impl ActionExecutor for DryRunExecutor {
    async fn execute(&self, action: &Action) -> bool {
        tracing::info!("dry run: {}", action);
        true
    }
}
