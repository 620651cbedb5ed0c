//! bribe-sim: replay bribe pool scenarios against in-memory collaborators.

mod scenario;

use bribe_pool::{PoolConfig, PoolState};
use bribe_types::ProceedsPolicy;
use bribe_utils::{format_duration, LogFormat};
use clap::Parser;
use std::path::PathBuf;

use anyhow::Context;
use scenario::{Scenario, Simulation};

#[derive(Parser)]
#[command(name = "bribe-sim", about = "Bribe pool scenario simulator")]
struct Cli {
    /// Path to a TOML pool configuration. Flags and env vars override it.
    #[arg(long, env = "BRIBE_CONFIG")]
    config: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "BRIBE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Emit logs as JSON lines.
    #[arg(long, env = "BRIBE_LOG_JSON")]
    log_json: bool,

    /// Auction window in seconds.
    #[arg(long, env = "BRIBE_AUCTION_DURATION")]
    auction_duration: Option<u64>,

    /// Inject only the raise over the previous bid instead of every full bid.
    #[arg(long)]
    increment_proceeds: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Replay a JSON scenario and print a JSON report.
    Run {
        /// Scenario file.
        scenario: PathBuf,

        /// Abort on the first failing step.
        #[arg(long)]
        strict: bool,

        /// Write the final pool state here (bincode).
        #[arg(long)]
        snapshot_out: Option<PathBuf>,
    },
    /// Print the effective configuration as TOML.
    Config,
    /// Summarize a snapshot written by `run --snapshot-out`.
    Inspect {
        snapshot: PathBuf,
    },
}

fn load_config(cli: &Cli) -> anyhow::Result<PoolConfig> {
    let mut config = match &cli.config {
        Some(path) => PoolConfig::from_toml_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => PoolConfig::default(),
    };
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if cli.log_json {
        config.log_format = LogFormat::Json;
    }
    if let Some(secs) = cli.auction_duration {
        config.params.auction_duration_secs = secs;
    }
    if cli.increment_proceeds {
        config.params.proceeds_policy = ProceedsPolicy::Increment;
    }
    config.validate()?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    bribe_utils::init_logging(config.log_format, &config.log_level)?;

    if let Some(path) = &cli.config {
        tracing::info!("Loaded config from {}", path.display());
    }
    tracing::info!(
        "{} ({}): auctions run {}, proceeds policy {:?}",
        config.name,
        config.symbol,
        format_duration(config.params.auction_duration_secs),
        config.params.proceeds_policy,
    );

    match cli.command {
        Command::Run {
            scenario,
            strict,
            snapshot_out,
        } => {
            let raw = std::fs::read_to_string(&scenario)
                .with_context(|| format!("reading {}", scenario.display()))?;
            let scenario: Scenario =
                serde_json::from_str(&raw).context("parsing scenario")?;

            let mut sim = Simulation::new(&config)?;
            sim.seed(&scenario)?;
            let outcomes = sim.replay(&scenario, strict)?;
            let failed = outcomes.iter().filter(|o| !o.ok).count();
            let report = sim.report(&scenario, outcomes)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            tracing::info!(steps = scenario.steps.len(), failed, "scenario finished");

            if let Some(path) = snapshot_out {
                let bytes = sim.pool.snapshot().to_bytes()?;
                std::fs::write(&path, bytes)
                    .with_context(|| format!("writing {}", path.display()))?;
                tracing::info!("Snapshot written to {}", path.display());
            }
        }
        Command::Config => {
            print!("{}", config.to_toml_string()?);
        }
        Command::Inspect { snapshot } => {
            let bytes = std::fs::read(&snapshot)
                .with_context(|| format!("reading {}", snapshot.display()))?;
            let state = PoolState::from_bytes(&bytes)?;
            let acc = state.rewards.accumulator();
            println!("{} ({}) held by {}", state.name, state.symbol, state.pool_account);
            println!(
                "shares: {} across {} holders",
                state.shares.total_shares(),
                state.shares.holder_count()
            );
            println!(
                "proceeds: {} injected, {} claimed, {} undistributed",
                acc.total_injected(),
                acc.total_claimed(),
                acc.undistributed()
            );
            for auction in state.auctions.iter() {
                println!(
                    "auction {}: {} bids, highest {} by {}, ends {}",
                    auction.proposal_id,
                    auction.bid_count,
                    auction.highest_bid,
                    auction
                        .highest_bidder
                        .as_ref()
                        .map(ToString::to_string)
                        .unwrap_or_else(|| "-".into()),
                    auction.end_time,
                );
            }
        }
    }

    Ok(())
}
