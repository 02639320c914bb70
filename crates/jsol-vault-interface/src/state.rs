//! Typed vault account records.
//!
//! These are the structured views of the program's accounts. The byte layouts
//! they are decoded from live in [`crate::codec`]; nothing outside the codec
//! deals in offsets.

use core::fmt;

use num_enum::{IntoPrimitive, TryFromPrimitive};
use solana_pubkey::Pubkey;

// ============================================================================
// Enums
// ============================================================================

/// Which on-chain record a buffer is supposed to hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::IntoStaticStr)]
pub enum AccountKind {
    /// Vault singleton
    VaultState,
    /// Per-depositor position
    UserAccount,
    /// Pending withdrawal, addressed by `(owner, index)`
    WithdrawRequest,
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.into())
    }
}

/// Yield sources the vault can allocate to.
///
/// Stored on-chain as a single byte. Ordering follows the discriminant and is
/// used to break ties deterministically.
#[repr(u8)]
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    TryFromPrimitive,
    IntoPrimitive,
    strum::Display,
    strum::EnumIter,
)]
pub enum ProtocolId {
    /// Jito staked SOL (jitoSOL)
    Jito = 0,
    /// Marinade staked SOL (mSOL)
    Marinade = 1,
    /// BlazeStake SOL (bSOL)
    BlazeStake = 2,
    /// Lido staked SOL (stSOL)
    Lido = 3,
    /// Native stake accounts
    Native = 4,
    /// Jupiter staked SOL (JupSOL)
    Jupiter = 5,
}

/// Status of a withdrawal request.
#[repr(u8)]
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, TryFromPrimitive, IntoPrimitive, strum::Display,
)]
pub enum WithdrawStatus {
    /// Waiting for the unstaking period
    #[default]
    Pending = 0,
    /// Ready to be completed
    Ready = 1,
    /// Funds released
    Completed = 2,
    /// Cancelled before completion
    Cancelled = 3,
}

// ============================================================================
// Vault
// ============================================================================

/// Target and observed allocation for one protocol.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Allocation {
    /// The yield source
    pub protocol: ProtocolId,
    /// Target share of TVL in basis points
    pub target_bps: u16,
    /// Observed share of TVL in basis points.
    ///
    /// A snapshot written by the program at the last rebalance; advisory only.
    pub current_bps: u16,
    /// Lamports attributed to this protocol at the last update
    pub amount: u64,
}

/// Fee, threshold and circuit-breaker settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VaultConfig {
    /// Annual management fee, informational
    pub management_fee_bps: u16,
    /// Performance fee on gains above the high water mark, informational
    pub performance_fee_bps: u16,
    /// Minimum deviation that justifies a rebalance
    pub rebalance_threshold_bps: u16,
    /// Maximum slippage accepted while rebalancing
    pub max_slippage_bps: u16,
    /// TVL cap in lamports, 0 meaning unlimited
    pub deposit_cap: u64,
    /// Global halt flag
    pub is_paused: bool,
}

/// Raw bytes of one allocation slot.
pub type AllocationSlotBytes = [u8; 13];

/// Vault singleton, owned by the program and read-only from the client.
///
/// # Accounting
///
/// - `total_value_locked`: lamports under management
/// - `total_shares`: outstanding share supply
/// - `high_water_mark`: share price (scaled by `SHARE_PRECISION`) above
///   which performance fees accrue
///
/// # Allocations
///
/// The account has a fixed array of
/// [`MAX_PROTOCOLS`](crate::constants::MAX_PROTOCOLS) slots of which the
/// first `num_allocations` are live. Stale slots beyond that count are kept
/// as raw bytes in `inactive_slots` so that re-encoding is byte-exact; they
/// are never interpreted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VaultState {
    /// PDA bump seed
    pub bump: u8,
    /// Admin authority
    pub authority: Pubkey,
    /// Share token mint
    pub share_mint: Pubkey,
    /// Lamports under management
    pub total_value_locked: u64,
    /// Outstanding share supply
    pub total_shares: u64,
    /// Share price high water mark for performance fees
    pub high_water_mark: u64,
    /// Management fees accrued so far
    pub accrued_management_fees: u64,
    /// Performance fees accrued so far
    pub accrued_performance_fees: u64,
    /// Unix seconds of the last fee collection
    pub last_fee_collection: i64,
    /// Unix seconds of the last rebalance
    pub last_rebalance_timestamp: i64,
    /// Rebalances performed
    pub rebalance_count: u64,
    /// Unique depositors
    pub depositor_count: u64,
    /// Settings
    pub config: VaultConfig,
    /// Live allocation slots, in slot order
    pub allocations: Vec<Allocation>,
    /// Slots past the live count, verbatim
    pub inactive_slots: Vec<AllocationSlotBytes>,
    /// Reserved tail
    pub reserved: [u8; 128],
}

impl VaultState {
    /// Whether the circuit breaker is engaged.
    pub fn is_paused(&self) -> bool {
        self.config.is_paused
    }

    /// Fail with [`VaultPaused`](crate::VaultClientError::VaultPaused) when halted.
    #[inline]
    pub fn require_active(&self) -> Result<(), crate::VaultClientError> {
        if self.is_paused() {
            return Err(crate::VaultClientError::VaultPaused);
        }
        Ok(())
    }

    /// Rebalance threshold in basis points.
    pub fn rebalance_threshold_bps(&self) -> u16 {
        self.config.rebalance_threshold_bps
    }

    /// Deposit cap, `None` when unlimited.
    pub fn deposit_cap(&self) -> Option<u64> {
        match self.config.deposit_cap {
            0 => None,
            cap => Some(cap),
        }
    }
}

// ============================================================================
// User
// ============================================================================

/// Per-depositor position, at the PDA `["user", owner]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserAccount {
    /// PDA bump seed
    pub bump: u8,
    /// Depositor
    pub owner: Pubkey,
    /// Shares held (excluding shares locked in pending withdrawals)
    pub share_balance: u64,
    /// Lifetime lamports deposited
    pub total_deposited: u64,
    /// Lifetime lamports withdrawn
    pub total_withdrawn: u64,
    /// Unix seconds of the first deposit
    pub first_deposit: i64,
    /// Unix seconds of the last activity
    pub last_activity: i64,
    /// Outstanding withdrawal requests.
    ///
    /// Also the index of the next request's address; see
    /// [`crate::next_withdrawal_request_pda`]. Completing a request lowers the
    /// count but leaves its account in place, so this is a count and not an
    /// index bound: outstanding requests may sit at higher indices.
    pub pending_withdrawal_count: u8,
    /// Reserved tail
    pub reserved: [u8; 64],
}

impl UserAccount {
    /// Position of an address that has never deposited.
    pub fn empty(owner: Pubkey) -> Self {
        Self {
            bump: 0,
            owner,
            share_balance: 0,
            total_deposited: 0,
            total_withdrawn: 0,
            first_deposit: 0,
            last_activity: 0,
            pending_withdrawal_count: 0,
            reserved: [0; 64],
        }
    }
}

// ============================================================================
// Withdrawal
// ============================================================================

/// A pending withdrawal, at the PDA `["withdraw", owner, index]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WithdrawalRequest {
    /// PDA bump seed
    pub bump: u8,
    /// Requesting depositor
    pub owner: Pubkey,
    /// Shares being redeemed
    pub shares_requested: u64,
    /// Lamports value at request time; recomputed on completion
    pub estimated_lamports: u64,
    /// Unix seconds the request was created
    pub requested_at: i64,
    /// Unix seconds from which it can be completed
    pub ready_at: i64,
    /// Lifecycle status
    pub status: WithdrawStatus,
    /// Index used in the PDA seeds
    pub request_index: u64,
    /// Reserved tail
    pub reserved: [u8; 32],
}

impl WithdrawalRequest {
    /// Whether the request still holds shares, i.e. is neither completed nor
    /// cancelled.
    pub fn is_outstanding(&self) -> bool {
        matches!(self.status, WithdrawStatus::Pending | WithdrawStatus::Ready)
    }

    /// Whether the request can be completed at `now`.
    pub fn is_claimable(&self, now: i64) -> bool {
        matches!(self.status, WithdrawStatus::Pending | WithdrawStatus::Ready) && now >= self.ready_at
    }

    /// Seconds until the request matures, zero once it has.
    pub fn seconds_until_ready(&self, now: i64) -> i64 {
        self.ready_at.saturating_sub(now).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_ids_match_program_bytes() {
        assert_eq!(u8::from(ProtocolId::Jito), 0);
        assert_eq!(u8::from(ProtocolId::Jupiter), 5);
        assert_eq!(ProtocolId::try_from(3u8).ok(), Some(ProtocolId::Lido));
        assert!(ProtocolId::try_from(6u8).is_err());
        assert!(ProtocolId::Jito < ProtocolId::Marinade);
    }

    #[test]
    fn test_withdrawal_readiness() {
        let request = WithdrawalRequest {
            bump: 255,
            owner: Pubkey::new_from_array([7; 32]),
            shares_requested: 10,
            estimated_lamports: 10,
            requested_at: 1_000,
            ready_at: 2_000,
            status: WithdrawStatus::Pending,
            request_index: 0,
            reserved: [0; 32],
        };
        assert!(!request.is_claimable(1_999));
        assert!(request.is_claimable(2_000));
        assert_eq!(request.seconds_until_ready(1_500), 500);
        assert_eq!(request.seconds_until_ready(2_500), 0);

        let completed = WithdrawalRequest {
            status: WithdrawStatus::Completed,
            ..request
        };
        assert!(!completed.is_claimable(3_000));
        assert!(request.is_outstanding());
        assert!(!completed.is_outstanding());
    }
}
