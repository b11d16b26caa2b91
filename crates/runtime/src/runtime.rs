//! High-level runtime orchestrator.
//!
//! The runtime owns the tick worker, wires up the command channel, and
//! exposes a builder-based API for hosts to plug in their oracles and
//! executor.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use agent_core::{
    AffiliationOracle, Clock, Configuration, CooldownOracle, EntityOracle, ResourceOracle,
    SystemClock,
};

use crate::api::{ActionExecutor, DryRunExecutor, Result, RuntimeError, RuntimeHandle};
use crate::oracle::OracleBundle;
use crate::workers::{Command, TickWorker};

/// Runtime configuration shared across the orchestrator and worker.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub agent: Configuration,
    /// Tick period. `None` disables the timer so ticks only run on
    /// [`RuntimeHandle::tick_now`].
    pub tick_interval: Option<Duration>,
    pub command_buffer_size: usize,
}

impl RuntimeConfig {
    /// Uses the agent's configured tick period.
    pub fn for_agent(agent: Configuration) -> Self {
        let tick_interval = Some(Duration::from_millis(agent.timing.tick_interval_ms));
        Self {
            agent,
            tick_interval,
            ..Self::default()
        }
    }

    /// Disables the timer.
    pub fn manual(mut self) -> Self {
        self.tick_interval = None;
        self
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        let agent = Configuration::default();
        Self {
            tick_interval: Some(Duration::from_millis(agent.timing.tick_interval_ms)),
            agent,
            command_buffer_size: 32,
        }
    }
}

/// Main runtime that drives the agent.
///
/// Design: Runtime owns the worker task.
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    ///
    /// The handle can be shared across clients and async tasks.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Stops the worker and waits for it to finish.
    ///
    /// Outstanding handles stop working once this returns.
    pub async fn shutdown(self) -> Result<()> {
        // The worker may already be gone; joining still reports a panic.
        if let Err(e) = self.handle.shutdown().await {
            tracing::debug!("shutdown command not delivered: {}", e);
        }
        self.worker_handle.await.map_err(RuntimeError::WorkerJoin)
    }
}

/// Builder for [`Runtime`] with flexible configuration.
///
/// Entity and resource oracles are required. The cooldown and affiliation
/// oracles are optional; their absence is resolved here, once, into the
/// event-driven readiness strategy and a "nobody is affiliated" service.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    entities: Option<Arc<dyn EntityOracle>>,
    resources: Option<Arc<dyn ResourceOracle>>,
    cooldowns: Option<Arc<dyn CooldownOracle>>,
    affiliation: Option<Arc<dyn AffiliationOracle>>,
    executor: Option<Arc<dyn ActionExecutor>>,
    clock: Option<Arc<dyn Clock>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            entities: None,
            resources: None,
            cooldowns: None,
            affiliation: None,
            executor: None,
            clock: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn entities(mut self, oracle: Arc<dyn EntityOracle>) -> Self {
        self.entities = Some(oracle);
        self
    }

    pub fn resources(mut self, oracle: Arc<dyn ResourceOracle>) -> Self {
        self.resources = Some(oracle);
        self
    }

    /// Sets both the entity and resource oracle from one host object.
    pub fn world<W>(self, world: Arc<W>) -> Self
    where
        W: EntityOracle + ResourceOracle + 'static,
    {
        self.entities(world.clone()).resources(world)
    }

    /// Enables polling readiness against the game's cooldown query.
    pub fn cooldowns(mut self, oracle: Arc<dyn CooldownOracle>) -> Self {
        self.cooldowns = Some(oracle);
        self
    }

    pub fn affiliation(mut self, oracle: Arc<dyn AffiliationOracle>) -> Self {
        self.affiliation = Some(oracle);
        self
    }

    /// Set the action executor. Defaults to [`DryRunExecutor`].
    pub fn executor(mut self, executor: Arc<dyn ActionExecutor>) -> Self {
        self.executor = Some(executor);
        self
    }

    /// Set the time source. Defaults to [`SystemClock`].
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Build the runtime and spawn its worker.
    pub async fn build(self) -> Result<Runtime> {
        let entities = self
            .entities
            .ok_or(RuntimeError::MissingProvider("entity"))?;
        let resources = self
            .resources
            .ok_or(RuntimeError::MissingProvider("resource"))?;

        let agent = self.config.agent;
        agent.validate()?;

        if agent.heal.use_affiliation_lookup && self.affiliation.is_none() {
            tracing::warn!(
                "affiliation lookup enabled but no affiliation oracle provided; only affiliation flags and the allow-list apply"
            );
        }

        let oracles = OracleBundle::new(entities, resources, self.cooldowns, self.affiliation);
        let executor = self.executor.unwrap_or_else(|| {
            tracing::info!("no executor configured, actions are logged only");
            Arc::new(DryRunExecutor)
        });
        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(SystemClock::new()));

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let handle = RuntimeHandle::new(command_tx);

        let worker = TickWorker::new(
            agent,
            oracles,
            executor,
            clock,
            command_rx,
            self.config.tick_interval,
        );

        let worker_handle = tokio::spawn(async move {
            worker.run().await;
        });

        Ok(Runtime {
            handle,
            worker_handle,
        })
    }
}
