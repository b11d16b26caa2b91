//! Tick worker that owns the agent's decision state.
//!
//! Receives commands from [`RuntimeHandle`](crate::RuntimeHandle), wakes up on
//! a fixed interval, runs the planning pipeline, and dispatches the planned
//! actions to the executor.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

use agent_core::{AgentEvent, Clock, Configuration, Context, CreatureRef, plan_tick};

use crate::api::{ActionExecutor, Dispatch, RuntimeStats, TickReport};
use crate::oracle::OracleBundle;

/// Commands that can be sent to the tick worker
#[derive(Debug)]
pub enum Command {
    /// Queue a host event for the next tick.
    PushEvent { event: AgentEvent },
    /// Replace the attack target.
    SetTarget { target: Option<CreatureRef> },
    /// Run one tick now and reply with its report.
    TickNow { reply: oneshot::Sender<TickReport> },
    QueryStats { reply: oneshot::Sender<RuntimeStats> },
    Shutdown,
}

/// Background task that drives the agent.
pub struct TickWorker {
    config: Configuration,
    context: Context,
    oracles: OracleBundle,
    executor: Arc<dyn ActionExecutor>,
    clock: Arc<dyn Clock>,
    command_rx: mpsc::Receiver<Command>,
    target: Option<CreatureRef>,
    /// `None` disables the timer; ticks then only happen on `TickNow`.
    interval: Option<Duration>,
    stats: RuntimeStats,
}

impl TickWorker {
    pub fn new(
        config: Configuration,
        oracles: OracleBundle,
        executor: Arc<dyn ActionExecutor>,
        clock: Arc<dyn Clock>,
        command_rx: mpsc::Receiver<Command>,
        interval: Option<Duration>,
    ) -> Self {
        let context = Context::new(&config, oracles.strategy());
        info!(
            "TickWorker initialized with {} abilities, interval {:?}",
            config.abilities.len(),
            interval
        );

        Self {
            config,
            context,
            oracles,
            executor,
            clock,
            command_rx,
            target: None,
            interval,
            stats: RuntimeStats::default(),
        }
    }

    /// Main worker loop.
    ///
    /// Commands take precedence over the timer so events queued before a tick
    /// boundary are visible to that tick. Missed ticks are skipped rather than
    /// replayed in a burst.
    pub async fn run(mut self) {
        let period = self.interval.unwrap_or(Duration::from_secs(3600));
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let timed = self.interval.is_some();

        loop {
            tokio::select! {
                biased;

                cmd = self.command_rx.recv() => match cmd {
                    Some(Command::Shutdown) | None => break,
                    Some(cmd) => self.handle_command(cmd).await,
                },
                _ = ticker.tick(), if timed => {
                    self.run_tick().await;
                }
            }
        }

        info!(
            "TickWorker stopped after {} ticks ({} heals, {} attacks, {} failures)",
            self.stats.ticks, self.stats.heals, self.stats.attacks, self.stats.failures
        );
    }

    async fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::PushEvent { event } => {
                let now = self.clock.now();
                self.context.push_event(now, event);
            }
            Command::SetTarget { target } => {
                if self.target != target {
                    debug!("attack target {:?} -> {:?}", self.target, target);
                }
                self.target = target;
            }
            Command::TickNow { reply } => {
                let report = self.run_tick().await;
                if reply.send(report).is_err() {
                    debug!("TickNow reply channel closed (caller dropped)");
                }
            }
            Command::QueryStats { reply } => {
                if reply.send(self.stats.clone()).is_err() {
                    debug!("QueryStats reply channel closed (caller dropped)");
                }
            }
            Command::Shutdown => {}
        }
    }

    /// One planning pass followed by dispatch.
    ///
    /// The pass sees a single consistent snapshot; outcomes are recorded at
    /// the tick's timestamp and only affect the next tick.
    async fn run_tick(&mut self) -> TickReport {
        let now = self.clock.now();
        let events_applied = self.context.inbox.len();

        let plan = plan_tick(
            &mut self.context,
            &self.config,
            self.oracles.as_agent_env(),
            self.target,
            now,
        );

        let mut dispatched = Vec::new();
        for action in plan.actions() {
            let success = self.executor.execute(action).await;
            self.context
                .record_outcome(&self.config, action, success, now);
            dispatched.push(Dispatch {
                action: action.clone(),
                success,
            });
        }

        let report = TickReport {
            at: now,
            events_applied,
            plan,
            dispatched,
        };
        self.stats.record(&report);
        report
    }
}
