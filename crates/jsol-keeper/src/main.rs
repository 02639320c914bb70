//! jSOL keeper binary.
//!
//! Commands:
//! - `jsol-keeper run` - Rebalance on an interval until Ctrl-C
//! - `jsol-keeper tick` - One tick, exit status reflects the outcome
//! - `jsol-keeper status` - Vault report
//! - `jsol-keeper position <owner>` - Depositor report

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use jsol_keeper::config::{Cli, Command, load_keypair};
use jsol_keeper::keeper::stop_on_signal;
use jsol_keeper::{Clock, Keeper, RpcChain, SystemClock, fetch_position, fetch_vault_report};
use jsol_vault_interface::NETWORK;
use serde::Serialize;
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let program_id = cli.program_id();
    let vault = cli.vault_address();
    let chain = Arc::new(RpcChain::new(cli.rpc_url.clone()));

    match &cli.command {
        Command::Run(args) | Command::Tick(args) => {
            let signer = load_keypair(&cli.keypair)?;
            let keeper = Keeper::new(
                chain.clone(),
                chain.clone(),
                SystemClock,
                signer,
                args.keeper_config(program_id),
            );
            info!(
                network = NETWORK,
                rpc_url = %chain.url(),
                %program_id,
                %vault,
                keeper = %keeper.signer_pubkey(),
                "keeper configured"
            );

            if matches!(cli.command, Command::Tick(_)) {
                let outcome = keeper.run_tick(&vault).await;
                println!("{outcome}");
                return Ok(if outcome.is_failure() {
                    ExitCode::FAILURE
                } else {
                    ExitCode::SUCCESS
                });
            }

            let (stop_tx, stop_rx) = watch::channel(false);
            tokio::spawn(stop_on_signal(tokio::signal::ctrl_c(), stop_tx));
            keeper.run(vault, stop_rx).await;
        }
        Command::Status {
            json,
            cooldown_secs,
        } => {
            let report = fetch_vault_report(&chain, &vault, SystemClock.now(), *cooldown_secs)
                .await
                .context("failed to build vault report")?;
            print_report(&report, *json)?;
        }
        Command::Position { owner, json } => {
            let report = fetch_position(&chain, &program_id, &vault, owner, SystemClock.now())
                .await
                .context("failed to build position report")?;
            print_report(&report, *json)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn print_report<T: Serialize + std::fmt::Display>(report: &T, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!("{report}");
    }
    Ok(())
}
