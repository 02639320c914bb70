//! Protocol constants mirrored from the deployed vault program.
//!
//! All fee and allocation values are in basis points where 10000 bps = 100%.

// ============================================================================
// PDA Seeds
// ============================================================================

/// Seed for the vault state PDA
pub const VAULT_SEED: &[u8] = b"vault";

/// Seed for the share mint PDA
pub const SHARE_MINT_SEED: &[u8] = b"jsoli_mint";

/// Seed for the PDA holding the vault's SOL
pub const VAULT_SOL_SEED: &[u8] = b"vault_sol";

/// Seed for user account PDAs
pub const USER_ACCOUNT_SEED: &[u8] = b"user";

/// Seed for withdrawal request PDAs
pub const WITHDRAW_REQUEST_SEED: &[u8] = b"withdraw";

/// Seed for the fee collector PDA
pub const FEE_COLLECTOR_SEED: &[u8] = b"fees";

// ============================================================================
// Precision
// ============================================================================

/// Basis points denominator (100%)
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Fixed-point scale of the share price (1e9)
pub const SHARE_PRECISION: u64 = 1_000_000_000;

/// Seconds used to annualise the management fee
pub const SECONDS_PER_YEAR: i64 = 31_536_000;

// ============================================================================
// Limits
// ============================================================================

/// Minimum deposit: 0.1 SOL
pub const MIN_DEPOSIT_LAMPORTS: u64 = 100_000_000;

/// Shares withheld from the first depositor to pin the initial share price
pub const MINIMUM_INITIAL_SHARES: u64 = 1_000;

/// Fixed number of allocation slots in the vault account
pub const MAX_PROTOCOLS: usize = 10;

/// Maximum target allocation per protocol: 50%
pub const MAX_PROTOCOL_ALLOCATION_BPS: u16 = 5_000;

/// Delay between requesting and completing a withdrawal (3 days)
pub const UNSTAKING_DELAY_SECS: i64 = 259_200;

// ============================================================================
// Rebalance
// ============================================================================

/// Default rebalance threshold: 5% deviation from target
pub const DEFAULT_REBALANCE_THRESHOLD_BPS: u16 = 500;

/// Minimum time between rebalances enforced on-chain (1 hour)
pub const MIN_REBALANCE_INTERVAL_SECS: i64 = 3_600;

// ============================================================================
// Fees
// ============================================================================

/// Maximum management fee: 1%
pub const MAX_MANAGEMENT_FEE_BPS: u16 = 100;

/// Maximum performance fee: 20%
pub const MAX_PERFORMANCE_FEE_BPS: u16 = 2_000;
