//! Local demo: synthetic feed → execution loop → simulated gateway
//!
//! A producer task pushes quotes into the bounded event queue while the
//! execution loop drains it, runs `SpreadCapture`, gates each order through
//! the risk gate and books simulated fills. Runs until Ctrl-C or
//! `--duration-secs`.

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use vane_bins::common::{init_logging, print_stats, CommonArgs};
use vane_core::config::Config;
use vane_core::data::{run_producer, EventQueue, FeedParams, SyntheticFeed};
use vane_core::engine::{ExecutionLoop, LoopConfig};
use vane_core::execution::SimulatedGateway;
use vane_core::monitoring::EngineMetrics;
use vane_core::risk::RiskGate;
use vane_strategies::SpreadCapture;

fn main() -> Result<()> {
    let args = CommonArgs::parse();

    if !args.demo {
        println!("Run with --demo to test locally.");
        return Ok(());
    }

    let config = args.load_config()?;
    init_logging(&config)?;

    tracing::info!("=== Vane: SpreadCapture + SimulatedGateway ===");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?;

    runtime.block_on(run_demo(config, args.duration_secs, args.metrics))
}

async fn run_demo(config: Config, duration_secs: Option<u64>, show_metrics: bool) -> Result<()> {
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        ctrlc::set_handler(move || {
            tracing::info!("Received Ctrl-C, shutting down");
            cancel.cancel();
        })
        .context("Failed to install Ctrl-C handler")?;
    }

    let queue = EventQueue::shared(config.queue.capacity)?;
    let strategy = SpreadCapture::from_config(&config.engine)?;
    let gateway = Arc::new(SimulatedGateway::from_config(&config.gateway));
    let risk = RiskGate::new(config.risk.limits())?;
    let metrics = EngineMetrics::new()?;

    let mut engine = ExecutionLoop::new(
        queue.clone(),
        strategy,
        gateway,
        risk,
        LoopConfig::from(&config.engine),
    )?
    .with_metrics(metrics.clone());

    let params = FeedParams {
        symbol: config.feed.symbol.clone(),
        ..FeedParams::default()
    };
    let feed = match config.feed.seed {
        Some(seed) => SyntheticFeed::with_seed(params, seed),
        None => SyntheticFeed::new(params),
    };
    let producer = tokio::spawn(run_producer(
        feed,
        queue.clone(),
        config.feed.interval(),
        cancel.clone(),
    ));

    if let Some(secs) = duration_secs {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(secs)).await;
            tracing::info!("Demo duration elapsed ({}s)", secs);
            cancel.cancel();
        });
    }

    let result = engine.run(&cancel).await;

    // A halted loop must still stop the producer
    cancel.cancel();
    let produced = producer.await.context("Feed producer task failed")?;
    tracing::info!("Events produced: {}", produced);

    print_stats(engine.stats(), &engine.snapshot(), queue.evicted());

    if show_metrics {
        println!("{}", metrics.render()?);
    }

    result.map_err(Into::into)
}
