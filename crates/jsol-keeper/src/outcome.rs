//! Tick outcomes.

use core::fmt;

use jsol_vault_interface::{Gate, VaultClientError};
use solana_signature::Signature;

use crate::chain::{ChainError, RejectionReason};

/// Why a tick stopped before evaluating the vault.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// The vault account could not be fetched
    FetchFailed(ChainError),
    /// No account at the vault address
    VaultMissing,
    /// The decision was left `Idle`
    NotEvaluated,
}

/// Transport-side failure of a submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NetworkFailure {
    /// The RPC call failed
    Transport(String),
    /// The RPC call did not answer in time
    TimedOut,
    /// Sent, but not confirmed within the status poll budget
    Unconfirmed {
        /// Transaction that may still land
        signature: Signature,
        /// Status polls made
        attempts: u32,
    },
}

impl fmt::Display for NetworkFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(detail) => write!(f, "transport error: {detail}"),
            Self::TimedOut => f.write_str("request timed out"),
            Self::Unconfirmed {
                signature,
                attempts,
            } => write!(f, "{signature} unconfirmed after {attempts} status checks"),
        }
    }
}

/// Why a tick that reached the vault did not end in a confirmed rebalance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TickError {
    /// Vault bytes did not decode
    Malformed(VaultClientError),
    /// The program refused the rebalance
    ChainRejected(RejectionReason),
    /// Infrastructure trouble while submitting or confirming
    NetworkTimeout(NetworkFailure),
}

impl TickError {
    /// Stable label for the `error_class` log field.
    pub const fn error_class(&self) -> &'static str {
        match self {
            Self::Malformed(_) => "malformed_account",
            Self::ChainRejected(_) => "chain_rejected",
            Self::NetworkTimeout(_) => "network_timeout",
        }
    }
}

impl From<ChainError> for TickError {
    fn from(error: ChainError) -> Self {
        match error {
            ChainError::Rejected(reason) => Self::ChainRejected(reason),
            ChainError::Network(detail) => Self::NetworkTimeout(NetworkFailure::Transport(detail)),
            ChainError::Timeout => Self::NetworkTimeout(NetworkFailure::TimedOut),
        }
    }
}

impl fmt::Display for TickError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed(error) => write!(f, "{error}"),
            Self::ChainRejected(reason) => write!(f, "rejected on-chain: {reason}"),
            Self::NetworkTimeout(failure) => write!(f, "{failure}"),
        }
    }
}

/// Result of one keeper tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing evaluated
    Skipped(SkipReason),
    /// Evaluated, a gate held
    Blocked(Gate),
    /// Rebalance confirmed
    Triggered(Signature),
    /// Evaluated or submitted, and failed
    Failed(TickError),
}

impl TickOutcome {
    /// Whether the tick ended in a failure worth alerting on.
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

impl fmt::Display for TickOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skipped(SkipReason::FetchFailed(error)) => {
                write!(f, "skipped: vault fetch failed ({error})")
            }
            Self::Skipped(SkipReason::VaultMissing) => f.write_str("skipped: vault account not found"),
            Self::Skipped(SkipReason::NotEvaluated) => f.write_str("skipped: not evaluated"),
            Self::Blocked(gate) => write!(f, "blocked: {gate}"),
            Self::Triggered(signature) => write!(f, "rebalanced: {signature}"),
            Self::Failed(error) => write!(f, "failed ({}): {error}", error.error_class()),
        }
    }
}
