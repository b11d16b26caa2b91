//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination and configuration so clients can
//! bubble them up with consistent context. Planning itself never fails: a tick
//! that cannot decide anything simply dispatches nothing.
use thiserror::Error;
use tokio::sync::oneshot;

use agent_core::ConfigError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("runtime requires a {0} oracle before building")]
    MissingProvider(&'static str),

    #[error("invalid agent configuration")]
    InvalidConfig(#[from] ConfigError),

    #[error("tick worker command channel closed")]
    CommandChannelClosed,

    #[error("tick worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("tick worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),
}
