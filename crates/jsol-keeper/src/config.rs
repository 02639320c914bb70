//! Command-line configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use jsol_vault_interface::constants::MIN_REBALANCE_INTERVAL_SECS;
use jsol_vault_interface::{VAULT_PROGRAM_ID, find_vault_pda};
use solana_keypair::Keypair;
use solana_pubkey::Pubkey;

use crate::keeper::KeeperConfig;

/// Default RPC endpoint.
pub const DEFAULT_RPC_URL: &str = "https://api.devnet.solana.com";

/// Default keeper keypair file.
pub const DEFAULT_KEYPAIR_PATH: &str = "~/.config/solana/id.json";

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "jsol-keeper")]
#[command(about = "Rebalance keeper and operator tools for the jSOL vault")]
#[command(version)]
pub struct Cli {
    /// JSON-RPC endpoint
    #[arg(long, global = true, env = "RPC_URL", default_value = DEFAULT_RPC_URL)]
    pub rpc_url: String,

    /// Keypair file that signs and pays for keeper transactions
    #[arg(long, global = true, env = "KEEPER_KEY_PATH", default_value = DEFAULT_KEYPAIR_PATH)]
    pub keypair: PathBuf,

    /// Vault program, defaults to the deployment compiled in
    #[arg(long, global = true)]
    pub program_id: Option<Pubkey>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Program the commands target.
    pub fn program_id(&self) -> Pubkey {
        self.program_id.unwrap_or(VAULT_PROGRAM_ID)
    }

    /// Vault state account of [`Cli::program_id`].
    pub fn vault_address(&self) -> Pubkey {
        find_vault_pda(&self.program_id()).0
    }
}

/// Keeper subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the keeper until interrupted
    Run(RunArgs),
    /// Run a single keeper tick and exit non-zero if it failed
    Tick(RunArgs),
    /// Show vault state, allocation drift and the keeper's decision
    Status {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
        /// Cooldown to evaluate the decision against
        #[arg(long, default_value_t = MIN_REBALANCE_INTERVAL_SECS)]
        cooldown_secs: i64,
    },
    /// Show a depositor's shares and pending withdrawals
    Position {
        /// Depositor wallet
        owner: Pubkey,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

/// Keeper timing.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Seconds between ticks
    #[arg(long, env = "KEEPER_INTERVAL_SECS", default_value_t = 600, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval_secs: u64,

    /// Minimum seconds between rebalances
    #[arg(long, default_value_t = MIN_REBALANCE_INTERVAL_SECS)]
    pub cooldown_secs: i64,

    /// Milliseconds between transaction status checks
    #[arg(long, default_value_t = 1_000)]
    pub status_poll_interval_ms: u64,

    /// Status checks before a rebalance counts as unconfirmed
    #[arg(long, default_value_t = 30)]
    pub status_poll_attempts: u32,

    /// Upper bound on any single RPC call, in seconds
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    pub request_timeout_secs: u64,
}

impl RunArgs {
    /// Keeper configuration targeting `program_id`.
    pub fn keeper_config(&self, program_id: Pubkey) -> KeeperConfig {
        KeeperConfig {
            program_id,
            interval: Duration::from_secs(self.interval_secs),
            cooldown_seconds: self.cooldown_secs,
            status_poll_interval: Duration::from_millis(self.status_poll_interval_ms),
            status_poll_attempts: self.status_poll_attempts,
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}

/// Expand a leading `~` against `$HOME`.
pub fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), std::env::var_os("HOME")) {
        (Ok(rest), Some(home)) => PathBuf::from(home).join(rest),
        _ => path.to_path_buf(),
    }
}

/// Load a keypair file in the Solana CLI format, a JSON array of 64 bytes.
///
/// # Errors
///
/// Fails if the file cannot be read or does not hold a valid keypair.
pub fn load_keypair(path: &Path) -> Result<Keypair> {
    let path = expand_home(path);
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read keypair file {}", path.display()))?;
    let bytes: Vec<u8> = serde_json::from_str(&contents)
        .with_context(|| format!("keypair file {} is not a JSON byte array", path.display()))?;
    Keypair::try_from(bytes.as_slice())
        .with_context(|| format!("keypair file {} does not hold a valid keypair", path.display()))
}
