//! Arena simulation entry point.
//!
//! Runs the agent runtime against a scripted skirmish for a fixed number of
//! ticks and prints a JSON report on stdout. Logs go to stderr, and also to a
//! file when `SIM_LOG_DIR` is set.
mod config;
mod executor;
mod world;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use agent_core::{ManualClock, Timestamp};
use agent_runtime::{Runtime, RuntimeConfig, RuntimeStats, TickReport};

use config::SimConfig;
use executor::ArenaExecutor;
use world::{ArenaSummary, ArenaWorld};

#[derive(Debug, Serialize)]
struct SimReport {
    seed: u64,
    ticks: u64,
    preset: Option<String>,
    stats: RuntimeStats,
    arena: ArenaSummary,
    /// Ticks that dispatched at least one action.
    timeline: Vec<TickReport>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = SimConfig::from_env();
    let _guard = setup_logging(config.log_dir.as_deref())?;

    let report = run(&config).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

async fn run(config: &SimConfig) -> Result<SimReport> {
    let agent = config.agent_configuration()?;
    let tick_ms = agent.timing.tick_interval_ms;
    tracing::info!(
        "arena run: {} ticks, seed {}, preset {:?}",
        config.ticks,
        config.seed,
        config.preset
    );

    let world = Arc::new(ArenaWorld::skirmish());
    let clock = Arc::new(ManualClock::new(Timestamp::ZERO));
    let executor = ArenaExecutor::new(world.clone(), agent.clone(), config.seed.wrapping_add(1));

    // The clock is advanced by hand, so the timer stays off.
    let runtime = Runtime::builder()
        .config(RuntimeConfig::for_agent(agent).manual())
        .world(world.clone())
        .executor(Arc::new(executor))
        .clock(clock.clone())
        .build()
        .await?;
    let handle = runtime.handle();

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut timeline = Vec::new();

    for _ in 0..config.ticks {
        for event in world.step(&mut rng) {
            handle.push_event(event).await?;
        }
        handle.set_target(world.nearest_hostile()).await?;

        let report = handle.tick_now().await?;
        if !report.is_idle() {
            timeline.push(report);
        }

        clock.advance(tick_ms);
    }

    let stats = handle.stats().await?;
    runtime.shutdown().await?;

    let arena = world.summary();
    tracing::info!(
        "arena finished: {} hostiles left, {} allies alive, agent at {}%",
        arena.hostiles_left,
        arena.allies_alive,
        arena.agent_hp_pct
    );

    Ok(SimReport {
        seed: config.seed,
        ticks: config.ticks,
        preset: config.preset.clone(),
        stats,
        arena,
        timeline,
    })
}

/// Logs to stderr, plus `<dir>/agent-sim.log` when a directory is given.
///
/// The returned guard flushes the file writer when dropped.
fn setup_logging(log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let file_appender = tracing_appender::rolling::never(dir, "agent-sim.log");
            let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking_file)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    if let Some(dir) = log_dir {
        tracing::info!("Log file: {}/agent-sim.log", dir.display());
    }

    Ok(guard)
}
