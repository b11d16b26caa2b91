//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! feeding host events, steering the attack target, and forcing a tick.
use tokio::sync::{mpsc, oneshot};

use agent_core::{AgentEvent, CreatureRef};

use super::errors::{Result, RuntimeError};
use super::report::{RuntimeStats, TickReport};
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone, Debug)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>) -> Self {
        Self { command_tx }
    }

    /// Queues a host event. It is stamped on arrival and applied at the start
    /// of the next tick, never in the middle of one.
    pub async fn push_event(&self, event: AgentEvent) -> Result<()> {
        self.send(Command::PushEvent { event }).await
    }

    /// Sets (or clears) the creature the attack concern plans against.
    pub async fn set_target(&self, target: Option<CreatureRef>) -> Result<()> {
        self.send(Command::SetTarget { target }).await
    }

    /// Runs one tick immediately and returns its report.
    pub async fn tick_now(&self) -> Result<TickReport> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::TickNow { reply: reply_tx }).await?;
        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Totals since the runtime started.
    pub async fn stats(&self) -> Result<RuntimeStats> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::QueryStats { reply: reply_tx }).await?;
        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    pub(crate) async fn shutdown(&self) -> Result<()> {
        self.send(Command::Shutdown).await
    }

    async fn send(&self, command: Command) -> Result<()> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)
    }
}
