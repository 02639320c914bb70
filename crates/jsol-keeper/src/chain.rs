//! Chain collaborators.
//!
//! The keeper only touches the network through these traits so that ticks can
//! be driven against in-memory fakes. [`crate::rpc::RpcChain`] is the JSON-RPC
//! implementation.

use core::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use jsol_vault_interface::VaultProgramError;
use solana_instruction::Instruction;
use solana_instruction::error::InstructionError;
use solana_keypair::Keypair;
use solana_pubkey::Pubkey;
use solana_signature::Signature;
use solana_transaction_error::TransactionError;

// ============================================================================
// Errors
// ============================================================================

/// Why the chain refused a transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RejectionReason {
    /// A vault program error code
    Program(VaultProgramError),
    /// A custom error code the vault program does not declare
    Custom(u32),
    /// Any other transaction or instruction error, as reported
    Transaction(String),
}

impl RejectionReason {
    /// Classify a transaction error, decoding the vault's custom codes.
    pub fn from_transaction_error(error: &TransactionError) -> Self {
        match error {
            TransactionError::InstructionError(_, InstructionError::Custom(code)) => {
                match VaultProgramError::from_code(*code) {
                    Some(program_error) => Self::Program(program_error),
                    None => Self::Custom(*code),
                }
            }
            other => Self::Transaction(other.to_string()),
        }
    }

    /// Whether a later tick may succeed without operator action.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Program(error) => error.is_transient(),
            Self::Custom(_) | Self::Transaction(_) => false,
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Program(error) => write!(f, "program error {error}"),
            Self::Custom(code) => write!(f, "unknown custom program error {code}"),
            Self::Transaction(detail) => f.write_str(detail),
        }
    }
}

/// Failure of a chain call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChainError {
    /// The chain executed or simulated the transaction and refused it
    Rejected(RejectionReason),
    /// Transport failure: connection, HTTP, RPC node error
    Network(String),
    /// No answer within the request timeout
    Timeout,
}

impl fmt::Display for ChainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected(reason) => write!(f, "rejected: {reason}"),
            Self::Network(detail) => write!(f, "network error: {detail}"),
            Self::Timeout => f.write_str("request timed out"),
        }
    }
}

impl std::error::Error for ChainError {}

/// Status of a submitted transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransactionStatus {
    /// Not yet seen at the configured commitment
    Pending,
    /// Landed successfully
    Confirmed,
    /// Landed and failed
    Failed(RejectionReason),
}

// ============================================================================
// Collaborators
// ============================================================================

/// Reads raw account data.
pub trait ChainReader: Send + Sync {
    /// Raw data of the account at `address`, `None` if it does not exist.
    fn get_account_bytes(
        &self,
        address: &Pubkey,
    ) -> impl Future<Output = Result<Option<Vec<u8>>, ChainError>> + Send;
}

/// Submits transactions and reports on them.
pub trait ChainWriter: Send + Sync {
    /// Sign `instruction` with `signer` as fee payer and broadcast it.
    fn submit_instruction(
        &self,
        instruction: Instruction,
        signer: &Keypair,
    ) -> impl Future<Output = Result<Signature, ChainError>> + Send;

    /// Current status of a previously submitted transaction.
    fn get_transaction_status(
        &self,
        signature: &Signature,
    ) -> impl Future<Output = Result<TransactionStatus, ChainError>> + Send;
}

/// Wall-clock source, unix seconds.
pub trait Clock: Send + Sync {
    /// Current unix time in seconds.
    fn now(&self) -> i64;
}

/// [`Clock`] backed by the system time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(elapsed) => i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX),
            Err(before_epoch) => -i64::try_from(before_epoch.duration().as_secs()).unwrap_or(i64::MAX),
        }
    }
}

impl<T: ChainReader> ChainReader for Arc<T> {
    fn get_account_bytes(
        &self,
        address: &Pubkey,
    ) -> impl Future<Output = Result<Option<Vec<u8>>, ChainError>> + Send {
        (**self).get_account_bytes(address)
    }
}

impl<T: ChainWriter> ChainWriter for Arc<T> {
    fn submit_instruction(
        &self,
        instruction: Instruction,
        signer: &Keypair,
    ) -> impl Future<Output = Result<Signature, ChainError>> + Send {
        (**self).submit_instruction(instruction, signer)
    }

    fn get_transaction_status(
        &self,
        signature: &Signature,
    ) -> impl Future<Output = Result<TransactionStatus, ChainError>> + Send {
        (**self).get_transaction_status(signature)
    }
}

impl<T: Clock> Clock for Arc<T> {
    fn now(&self) -> i64 {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_codes_decode_to_program_errors() {
        let error = TransactionError::InstructionError(0, InstructionError::Custom(6018));
        let reason = RejectionReason::from_transaction_error(&error);
        assert_eq!(
            reason,
            RejectionReason::Program(VaultProgramError::RebalanceTooSoon)
        );
        assert!(reason.is_transient());
        assert_eq!(reason.to_string(), "program error RebalanceTooSoon (6018)");
    }

    #[test]
    fn test_unknown_and_non_custom_errors() {
        let unknown = TransactionError::InstructionError(0, InstructionError::Custom(42));
        assert_eq!(
            RejectionReason::from_transaction_error(&unknown),
            RejectionReason::Custom(42)
        );

        let reason = RejectionReason::from_transaction_error(&TransactionError::BlockhashNotFound);
        assert!(matches!(reason, RejectionReason::Transaction(_)));
        assert!(!reason.is_transient());
    }

    #[test]
    fn test_system_clock_is_after_2024() {
        assert!(SystemClock.now() > 1_704_067_200);
    }
}
