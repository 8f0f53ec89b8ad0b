//! share_class_arb - Main Entry Point
//!
//! Runs the decision engine against recorded order books on the paper
//! exchange.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use share_class_arb::config::load_config;
use share_class_arb::{DecisionEngine, PaperExchange, ReplayExchange, Trader};

/// CLI arguments for the application
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long)]
    log_level: Option<String>,

    /// JSON-lines order-book recording to trade against
    #[arg(long, env = "APP_REPLAY")]
    replay: Option<PathBuf>,

    /// Stop after this many cycles (0 = until the input ends or Ctrl+C)
    #[arg(long)]
    max_cycles: Option<u64>,
}

fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load environment variables from .env file if present
    dotenvy::dotenv().ok();

    let mut config = load_config(Some(&args.config)).context("failed to load configuration")?;
    if let Some(max_cycles) = args.max_cycles {
        config.settings.max_cycles = max_cycles;
    }

    let level = parse_level(args.log_level.as_deref().unwrap_or(&config.settings.log_level));
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting share_class_arb");
    info!("Configuration file: {}", args.config);
    info!(
        instrument_a = %config.pair.instrument_a,
        instrument_b = %config.pair.instrument_b,
        position_limit = config.risk.position_limit,
        base_volume = config.risk.base_volume,
        edge_floor = %config.signal.edge_floor,
        smoothing = %config.signal.smoothing,
        "Engine parameters"
    );

    let Some(replay_path) = args.replay else {
        bail!("no market data source configured; pass --replay <FILE>");
    };

    let paper = PaperExchange::new([
        config.pair.instrument_a.clone(),
        config.pair.instrument_b.clone(),
    ])
    .with_position_limit(config.risk.position_limit);
    let exchange = ReplayExchange::from_path(&replay_path, paper)
        .with_context(|| format!("failed to load replay file {}", replay_path.display()))?;

    let engine = DecisionEngine::new(&config);
    let mut trader = Trader::new(exchange, engine, &config.settings);
    let stats = trader.run().await?;

    let pnl = trader.exchange().paper().pnl();
    info!(
        cycles = stats.cycles,
        trades = stats.trades,
        no_trades = stats.no_trades,
        errors = stats.errors,
        %pnl,
        "Replay finished"
    );

    Ok(())
}
