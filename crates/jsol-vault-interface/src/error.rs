//! Client-side and on-chain error types.

use core::fmt;

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::AccountKind;

/// Why a buffer was rejected by the codec.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MalformedReason {
    /// Buffer shorter than the fixed layout
    TooShort {
        /// Bytes the layout requires, discriminator included
        expected: usize,
    },
    /// Leading 8 bytes do not match the account's discriminator
    DiscriminatorMismatch,
    /// A boolean byte other than 0 or 1
    InvalidBool,
    /// `num_allocations` larger than the fixed slot array
    TooManyAllocations(u8),
    /// A live allocation slot names an unknown protocol
    UnknownProtocol(u8),
    /// Live allocation targets sum above 10 000 bps
    TargetSumExceeded(u32),
    /// Unknown withdrawal request status byte
    UnknownStatus(u8),
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort { expected } => write!(f, "expected at least {expected} bytes"),
            Self::DiscriminatorMismatch => f.write_str("discriminator mismatch"),
            Self::InvalidBool => f.write_str("boolean field is neither 0 nor 1"),
            Self::TooManyAllocations(n) => write!(f, "{n} allocations exceed the slot array"),
            Self::UnknownProtocol(p) => write!(f, "unknown protocol id {p}"),
            Self::TargetSumExceeded(sum) => write!(f, "target allocations sum to {sum} bps"),
            Self::UnknownStatus(s) => write!(f, "unknown withdrawal status {s}"),
        }
    }
}

/// Errors raised by the pure client core (codec, share math, allocations).
///
/// These are typed so callers never need to match on strings. I/O failures
/// live in the keeper crate and are converted into tick outcomes there.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VaultClientError {
    /// Structural decode failure. Not retried with the same bytes.
    MalformedAccount {
        /// Which record was being decoded
        kind: AccountKind,
        /// Raw buffer length, for diagnosis
        len: usize,
        /// What was wrong with it
        reason: MalformedReason,
    },
    /// The lookup returned no data (e.g. the user never deposited)
    AccountNotFound {
        /// Which record was looked up
        kind: AccountKind,
    },
    /// Deposit below the configured minimum
    BelowMinimum {
        /// Requested deposit in lamports
        amount: u64,
        /// Required minimum in lamports
        minimum: u64,
    },
    /// Deposit would push TVL over the vault's cap
    DepositCapExceeded {
        /// TVL after the deposit
        new_tvl: u64,
        /// Configured cap
        cap: u64,
    },
    /// Withdrawal larger than the user's share balance
    InsufficientShares {
        /// Shares requested
        requested: u64,
        /// Shares held
        available: u64,
    },
    /// Shares are outstanding but back zero assets
    ZeroExchangeRate,
    /// Intermediate or final value does not fit
    ArithmeticOverflow,
    /// Target allocations sum above 10 000 bps
    InvalidAllocationSum(u32),
    /// Vault circuit breaker is engaged
    VaultPaused,
}

impl VaultClientError {
    pub(crate) const fn malformed(kind: AccountKind, len: usize, reason: MalformedReason) -> Self {
        Self::MalformedAccount { kind, len, reason }
    }

    /// Whether this error means "no such account" rather than a real failure.
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::AccountNotFound { .. })
    }
}

impl fmt::Display for VaultClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedAccount { kind, len, reason } => {
                write!(f, "malformed {kind} account ({len} bytes): {reason}")
            }
            Self::AccountNotFound { kind } => write!(f, "{kind} account not found"),
            Self::BelowMinimum { amount, minimum } => {
                write!(f, "deposit of {amount} is below the minimum of {minimum}")
            }
            Self::DepositCapExceeded { new_tvl, cap } => {
                write!(f, "deposit would raise TVL to {new_tvl}, above the cap of {cap}")
            }
            Self::InsufficientShares {
                requested,
                available,
            } => write!(f, "requested {requested} shares but only {available} are held"),
            Self::ZeroExchangeRate => f.write_str("shares outstanding against zero assets"),
            Self::ArithmeticOverflow => f.write_str("arithmetic overflow"),
            Self::InvalidAllocationSum(sum) => {
                write!(f, "target allocations sum to {sum} bps, above 10000")
            }
            Self::VaultPaused => f.write_str("vault is paused"),
        }
    }
}

impl std::error::Error for VaultClientError {}

/// Custom error codes returned by the deployed vault program.
///
/// Anchor numbers custom errors from 6000 in declaration order. Clients match
/// on these instead of log strings to tell protocol rejections apart.
#[repr(u32)]
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, TryFromPrimitive, IntoPrimitive, strum::IntoStaticStr,
)]
pub enum VaultProgramError {
    // =========================================================================
    // Initialization
    // =========================================================================
    /// Vault has already been initialized
    AlreadyInitialized = 6000,
    /// Invalid authority provided
    InvalidAuthority = 6001,

    // =========================================================================
    // Allocation
    // =========================================================================
    /// Allocations must sum to exactly 10000 bps
    InvalidAllocationSum = 6002,
    /// Single protocol allocation above 5000 bps
    AllocationExceedsMax = 6003,
    /// Too many protocols configured
    TooManyProtocols = 6004,
    /// Duplicate protocol in allocation list
    DuplicateProtocol = 6005,

    // =========================================================================
    // Fees
    // =========================================================================
    /// Management fee above 100 bps
    ManagementFeeExceedsMax = 6006,
    /// Performance fee above 2000 bps
    PerformanceFeeExceedsMax = 6007,

    // =========================================================================
    // Deposits
    // =========================================================================
    /// Deposit below the minimum
    DepositBelowMinimum = 6008,
    /// Deposit would exceed the vault cap
    DepositCapExceeded = 6009,
    /// Vault is paused
    VaultPaused = 6010,
    /// Amount must be greater than zero
    ZeroAmount = 6011,

    // =========================================================================
    // Withdrawals
    // =========================================================================
    /// Insufficient shares for withdrawal
    InsufficientShares = 6012,
    /// Withdrawal request not found
    WithdrawRequestNotFound = 6013,
    /// Withdrawal request not yet mature
    WithdrawNotReady = 6014,
    /// Withdrawal request already completed or cancelled
    WithdrawAlreadyProcessed = 6015,
    /// Vault liquidity below the withdrawal amount
    InsufficientLiquidity = 6016,

    // =========================================================================
    // Rebalance
    // =========================================================================
    /// Deviation below the rebalance threshold
    RebalanceThresholdNotMet = 6017,
    /// Minimum interval between rebalances not elapsed
    RebalanceTooSoon = 6018,
    /// Slippage above the configured maximum
    SlippageExceeded = 6019,

    // =========================================================================
    // Oracle
    // =========================================================================
    /// Oracle price is stale
    StaleOraclePrice = 6020,
    /// Oracle price deviation too high
    OraclePriceDeviation = 6021,
    /// Invalid oracle account
    InvalidOracleAccount = 6022,
    /// Oracle not available
    OracleUnavailable = 6023,

    // =========================================================================
    // Authorization
    // =========================================================================
    /// Signer is not the vault authority
    Unauthorized = 6024,
    /// Operation not allowed in current vault state
    InvalidVaultState = 6025,

    // =========================================================================
    // Math
    // =========================================================================
    /// Arithmetic overflow
    MathOverflow = 6026,
    /// Arithmetic underflow
    MathUnderflow = 6027,
    /// Division by zero
    DivisionByZero = 6028,

    // =========================================================================
    // Protocol integration
    // =========================================================================
    /// LST protocol integration failed
    ProtocolIntegrationFailed = 6029,
    /// Protocol is not supported
    UnsupportedProtocol = 6030,
    /// Protocol is temporarily unavailable
    ProtocolUnavailable = 6031,

    // =========================================================================
    // Accounts
    // =========================================================================
    /// Account has invalid owner
    InvalidAccountOwner = 6032,
    /// Account is not initialized
    AccountNotInitialized = 6033,
    /// Invalid token mint
    InvalidMint = 6034,
}

impl VaultProgramError {
    /// Create from a custom program error code.
    pub fn from_code(code: u32) -> Option<Self> {
        Self::try_from(code).ok()
    }

    /// Error name as declared by the program.
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Rejections a later keeper tick may clear on its own once state moves on.
    pub const fn is_transient(self) -> bool {
        matches!(
            self,
            Self::RebalanceTooSoon
                | Self::RebalanceThresholdNotMet
                | Self::StaleOraclePrice
                | Self::OracleUnavailable
                | Self::ProtocolUnavailable
                | Self::SlippageExceeded
        )
    }
}

impl fmt::Display for VaultProgramError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), *self as u32)
    }
}
