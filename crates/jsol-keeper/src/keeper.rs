//! Keeper loop.
//!
//! One tick is:
//!
//! ```text
//! fetch vault ─▶ decode ─▶ decide ─┬─▶ Blocked(gate)
//!                                  └─▶ submit rebalance ─▶ poll status ─▶ Triggered / Failed
//! ```
//!
//! Every I/O call is bounded by `request_timeout`, and confirmation polling by
//! `status_poll_attempts`. Nothing is retried inside a tick: the next tick
//! re-reads the vault and the cooldown and threshold gates make a repeat
//! submission harmless. Ticks run one after another on the loop's task, so at
//! most one rebalance is ever in flight.

use core::fmt;
use std::future::Future;
use std::time::Duration;

use jsol_vault_interface::constants::MIN_REBALANCE_INTERVAL_SECS;
use jsol_vault_interface::{
    Decision, MalformedReason, ProtocolId, VAULT_PROGRAM_ID, VaultClientError, decide,
    decode_vault_state, instructions,
};
use solana_keypair::Keypair;
use solana_pubkey::Pubkey;
use solana_signature::Signature;
use solana_signer::Signer;
use tokio::sync::watch;
use tokio::time::{MissedTickBehavior, sleep, timeout};
use tracing::{debug, error, info, warn};

use crate::chain::{ChainError, ChainReader, ChainWriter, Clock, TransactionStatus};
use crate::outcome::{NetworkFailure, SkipReason, TickError, TickOutcome};

/// Keeper timing and target.
#[derive(Clone, Debug)]
pub struct KeeperConfig {
    /// Vault program to rebalance
    pub program_id: Pubkey,
    /// Time between ticks
    pub interval: Duration,
    /// Minimum seconds between rebalances
    pub cooldown_seconds: i64,
    /// Time between transaction status checks
    pub status_poll_interval: Duration,
    /// Status checks before a submission counts as unconfirmed
    pub status_poll_attempts: u32,
    /// Upper bound on any single RPC call
    pub request_timeout: Duration,
}

impl Default for KeeperConfig {
    fn default() -> Self {
        Self {
            program_id: VAULT_PROGRAM_ID,
            interval: Duration::from_secs(600),
            cooldown_seconds: MIN_REBALANCE_INTERVAL_SECS,
            status_poll_interval: Duration::from_secs(1),
            status_poll_attempts: 30,
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Rebalance keeper for one vault deployment.
pub struct Keeper<R, W, C> {
    reader: R,
    writer: W,
    clock: C,
    signer: Keypair,
    config: KeeperConfig,
}

impl<R, W, C> Keeper<R, W, C>
where
    R: ChainReader,
    W: ChainWriter,
    C: Clock,
{
    /// Create a keeper that signs and pays with `signer`.
    pub fn new(reader: R, writer: W, clock: C, signer: Keypair, config: KeeperConfig) -> Self {
        Self {
            reader,
            writer,
            clock,
            signer,
            config,
        }
    }

    /// Address that signs the keeper's transactions.
    pub fn signer_pubkey(&self) -> Pubkey {
        self.signer.pubkey()
    }

    /// Run ticks every `interval` until `shutdown` turns `true` or its sender
    /// is dropped. Returns the number of ticks run.
    ///
    /// A tick that has started always runs to completion; the stop signal is
    /// only observed between ticks. Ticks that fall behind are delayed, not
    /// bunched up.
    pub async fn run(&self, vault: Pubkey, mut shutdown: watch::Receiver<bool>) -> u64 {
        let mut interval = tokio::time::interval(self.config.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            %vault,
            keeper = %self.signer.pubkey(),
            interval_secs = self.config.interval.as_secs(),
            cooldown_secs = self.config.cooldown_seconds,
            "keeper started"
        );

        let mut ticks = 0u64;
        loop {
            if *shutdown.borrow_and_update() {
                break;
            }
            tokio::select! {
                biased;
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow_and_update() {
                        break;
                    }
                    continue;
                }
                _ = interval.tick() => {}
            }
            self.run_tick(&vault).await;
            ticks += 1;
        }

        info!(%vault, ticks, "keeper stopped");
        ticks
    }

    /// Fetch, decide and, if triggered, rebalance. Logs exactly one outcome line.
    pub async fn run_tick(&self, vault: &Pubkey) -> TickOutcome {
        let outcome = self.evaluate(vault).await;
        log_outcome(vault, &outcome);
        outcome
    }

    async fn evaluate(&self, vault: &Pubkey) -> TickOutcome {
        let bytes = match self.bounded(self.reader.get_account_bytes(vault)).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return TickOutcome::Skipped(SkipReason::VaultMissing),
            Err(error) => return TickOutcome::Skipped(SkipReason::FetchFailed(error)),
        };

        let state = match decode_vault_state(&bytes) {
            Ok(state) => state,
            Err(error) => return TickOutcome::Failed(TickError::Malformed(error)),
        };

        let now = self.clock.now();
        let decision = decide(&state, now, self.config.cooldown_seconds);
        debug!(
            %vault,
            tvl = state.total_value_locked,
            shares = state.total_shares,
            now,
            %decision,
            "vault evaluated"
        );

        if let Decision::Triggered {
            protocol,
            deviation,
        } = decision
        {
            return self.rebalance(vault, protocol, deviation).await;
        }
        match decision.gate() {
            Some(gate) => TickOutcome::Blocked(gate),
            None => TickOutcome::Skipped(SkipReason::NotEvaluated),
        }
    }

    async fn rebalance(&self, vault: &Pubkey, protocol: ProtocolId, deviation: u16) -> TickOutcome {
        info!(%vault, %protocol, deviation, "submitting rebalance");
        let instruction = instructions::rebalance(&self.config.program_id, &self.signer.pubkey());

        let signature = match self
            .bounded(self.writer.submit_instruction(instruction, &self.signer))
            .await
        {
            Ok(signature) => signature,
            Err(error) => return TickOutcome::Failed(error.into()),
        };

        self.await_confirmation(signature).await
    }

    /// Poll until the transaction lands or the attempt budget runs out.
    ///
    /// Transport errors while polling do not end the wait; only a definite
    /// status does.
    async fn await_confirmation(&self, signature: Signature) -> TickOutcome {
        let attempts = self.config.status_poll_attempts;
        for attempt in 1..=attempts {
            sleep(self.config.status_poll_interval).await;
            match self
                .bounded(self.writer.get_transaction_status(&signature))
                .await
            {
                Ok(TransactionStatus::Confirmed) => return TickOutcome::Triggered(signature),
                Ok(TransactionStatus::Failed(reason)) => {
                    return TickOutcome::Failed(TickError::ChainRejected(reason));
                }
                Err(ChainError::Rejected(reason)) => {
                    return TickOutcome::Failed(TickError::ChainRejected(reason));
                }
                Ok(TransactionStatus::Pending) => {
                    debug!(%signature, attempt, "rebalance pending");
                }
                Err(error) => {
                    debug!(%signature, attempt, %error, "status check failed");
                }
            }
        }
        TickOutcome::Failed(TickError::NetworkTimeout(NetworkFailure::Unconfirmed {
            signature,
            attempts,
        }))
    }

    /// Apply the request timeout to a chain call.
    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, ChainError>>,
    ) -> Result<T, ChainError> {
        timeout(self.config.request_timeout, call)
            .await
            .unwrap_or(Err(ChainError::Timeout))
    }
}

/// Turn `true` on `stop` once `signal` resolves, for wiring Ctrl-C into
/// [`Keeper::run`].
///
/// If the signal cannot be listened for, the sender is held forever instead:
/// the loop keeps running and dropping `stop` would end it.
pub async fn stop_on_signal<E: fmt::Display>(
    signal: impl Future<Output = Result<(), E>>,
    stop: watch::Sender<bool>,
) {
    match signal.await {
        Ok(()) => {
            info!("interrupt received, stopping after the current tick");
            if stop.send(true).is_err() {
                debug!("keeper already stopped");
            }
        }
        Err(error) => {
            warn!(%error, "failed to listen for interrupt, keeper runs until killed");
            std::future::pending::<()>().await;
            drop(stop);
        }
    }
}

fn log_outcome(vault: &Pubkey, outcome: &TickOutcome) {
    match outcome {
        TickOutcome::Skipped(SkipReason::FetchFailed(error)) => {
            warn!(%vault, %error, "tick skipped: vault fetch failed");
        }
        TickOutcome::Skipped(reason) => {
            warn!(%vault, ?reason, "tick skipped");
        }
        TickOutcome::Blocked(gate) => {
            info!(%vault, gate = gate.name(), %gate, "rebalance not needed");
        }
        TickOutcome::Triggered(signature) => {
            info!(%vault, %signature, "rebalance confirmed");
        }
        TickOutcome::Failed(error @ TickError::Malformed(VaultClientError::MalformedAccount {
            len,
            reason,
            ..
        })) => {
            error!(
                %vault,
                error_class = error.error_class(),
                len,
                reason = %reason,
                expected = expected_len(reason),
                "tick failed: vault account malformed"
            );
        }
        TickOutcome::Failed(error) => {
            let transient = match error {
                TickError::ChainRejected(reason) => reason.is_transient(),
                TickError::NetworkTimeout(_) => true,
                TickError::Malformed(_) => false,
            };
            error!(
                %vault,
                error_class = error.error_class(),
                transient,
                %error,
                "tick failed"
            );
        }
    }
}

fn expected_len(reason: &MalformedReason) -> Option<usize> {
    match reason {
        MalformedReason::TooShort { expected } => Some(*expected),
        _ => None,
    }
}
