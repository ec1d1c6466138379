//! Common utilities for all binaries
//!
//! Shared initialization, CLI parsing, and reporting.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use vane_core::config::{Config, FailurePolicy};
use vane_core::engine::LoopStats;
use vane_core::risk::LedgerSnapshot;

/// Common CLI arguments for all binaries
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct CommonArgs {
    /// Run the local demo (synthetic feed + simulated gateway)
    #[arg(long)]
    pub demo: bool,

    /// TOML configuration file; `VANE__*` environment variables override it
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Stop after this many seconds instead of waiting for Ctrl-C
    #[arg(short, long)]
    pub duration_secs: Option<u64>,

    /// Log level (overrides the configuration file)
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    /// Print Prometheus metrics on exit
    #[arg(long)]
    pub metrics: bool,

    /// Seed the synthetic feed for a reproducible run
    #[arg(long)]
    pub seed: Option<u64>,

    /// What to do when the gateway times out or fails: skip or halt
    #[arg(long)]
    pub failure_policy: Option<FailurePolicy>,
}

impl CommonArgs {
    /// Load configuration and layer the command-line flags on top
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load(self.config.as_ref())?;

        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if self.json_logs {
            config.logging.json = true;
        }
        if let Some(seed) = self.seed {
            config.feed.seed = Some(seed);
        }
        if let Some(policy) = self.failure_policy {
            config.engine.failure_policy = policy;
        }

        Ok(config)
    }
}

/// Initialize tracing/logging
pub fn init_logging(config: &Config) -> Result<()> {
    vane_core::utils::logger::init_from_config(&config.logging)
}

/// Print final statistics
pub fn print_stats(stats: &LoopStats, ledger: &LedgerSnapshot, evicted: u64) {
    tracing::info!("=== Final Statistics ===");
    tracing::info!("Events processed: {}", stats.events);
    tracing::info!("Events evicted: {}", evicted);
    tracing::info!("Signals generated: {}", stats.signals);
    tracing::info!("Risk rejections: {}", stats.risk_rejections);
    tracing::info!("Orders sent: {}", stats.orders_sent);
    tracing::info!(
        "Fills: {} full, {} partial, {} rejected",
        stats.fills,
        stats.partial_fills,
        stats.order_rejections
    );
    tracing::info!("Gateway failures: {}", stats.gateway_failures);
    tracing::info!("Traded notional: {:.4}", ledger.traded_notional);
    tracing::info!("Realized PnL: {:.4}", ledger.pnl);

    for (symbol, position) in &ledger.positions {
        tracing::info!("Position {}: {}", symbol, position);
    }

    if stats.events > 0 {
        let signal_rate = (stats.signals as f64 / stats.events as f64) * 100.0;
        tracing::info!("Signal rate: {:.2}%", signal_rate);
    }
}
