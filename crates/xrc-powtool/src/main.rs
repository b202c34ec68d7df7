#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

mod chain_file;
mod replay;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use std::env;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use xrc_consensus::{next_block_bits, HeaderChain, NetworkKind, NetworkParams, Target};

/// Tool configuration resolved from CLI/env/defaults.
#[derive(Parser, Debug)]
#[command(name = "xrc-powtool", version)]
struct Config {
    /// Network parameters to use: mainnet, testnet or regtest
    #[arg(long = "network", global = true)]
    network: Option<String>,
    /// Log filter, e.g. `info` or `xrc_consensus=trace`
    #[arg(long = "log-level", global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode compact bits and print the full target
    Bits {
        /// Compact bits as hex, e.g. 1d00ffff
        bits: String,
    },
    /// Print the bits the next block on top of a chain file must carry
    NextBits {
        /// Chain file (JSON)
        #[arg(long)]
        chain: PathBuf,
        /// Unix time of the next block
        #[arg(long)]
        time: u32,
    },
    /// Replay a chain file through the difficulty and spacing rules
    Check {
        /// Chain file (JSON)
        #[arg(long)]
        chain: PathBuf,
    },
}

#[derive(Debug)]
struct ResolvedConfig {
    params: NetworkParams,
    log_filter: String,
}

fn resolve_config(cli: &Config) -> Result<ResolvedConfig> {
    let network: NetworkKind = cli
        .network
        .clone()
        .or_else(|| env::var("XRC_NETWORK").ok())
        .unwrap_or_else(|| "mainnet".to_string())
        .parse()?;

    let log_filter = cli
        .log_level
        .clone()
        .or_else(|| env::var("XRC_LOG").ok())
        .unwrap_or_else(|| "info".to_string());

    Ok(ResolvedConfig {
        params: NetworkParams::for_kind(network),
        log_filter,
    })
}

fn init_tracing(filter: &str) -> Result<()> {
    let filter =
        EnvFilter::try_new(filter).with_context(|| format!("invalid log filter '{filter}'"))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("installing log subscriber: {e}"))?;

    debug!("logging initialized");
    Ok(())
}

/// Bits a block carrying `time` must have on top of the chain's tip.
fn next_bits(params: &NetworkParams, chain: &HeaderChain, time: u32) -> Result<u32> {
    let tip = chain
        .tip()
        .ok_or_else(|| anyhow!("chain file has no headers"))?;
    next_block_bits(params, tip, time)
        .with_context(|| format!("computing bits on top of height {}", tip.height()))
}

fn main() -> Result<()> {
    let cli = Config::parse();
    let cfg = resolve_config(&cli)?;
    init_tracing(&cfg.log_filter)?;
    info!(network = %cfg.params.kind, "xrc-powtool");

    match cli.command {
        Commands::Bits { bits } => {
            let bits = chain_file::parse_bits(&bits)?;
            let target = Target::from_compact(bits)?;
            println!("target    {target}");
            println!("canonical {:08x}", target.to_compact());
        }
        Commands::NextBits { chain, time } => {
            let chain = chain_file::load_chain(&chain)?;
            println!("{:08x}", next_bits(&cfg.params, &chain, time)?);
        }
        Commands::Check { chain } => {
            let chain = chain_file::load_chain(&chain)?;
            match replay::replay(&cfg.params, &chain) {
                Ok(checked) => println!("ok: {checked} headers checked"),
                Err(failure) => bail!(failure),
            }
        }
    }

    Ok(())
}
