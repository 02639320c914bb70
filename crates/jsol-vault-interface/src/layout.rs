//! Packed on-chain layouts.
//!
//! Mirrors of the Anchor accounts byte for byte, discriminator included.
//! Fields are read by value only: taking a reference into a packed struct is
//! undefined behaviour, so these never leave the codec.

use bytemuck::{Pod, Zeroable};

use crate::constants::MAX_PROTOCOLS;
use crate::discriminator::DISCRIMINATOR_LEN;

/// One allocation slot, 13 bytes.
#[repr(C, packed)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub(crate) struct AllocationLayout {
    pub protocol: u8,
    pub target_bps: u16,
    pub current_bps: u16,
    pub amount: u64,
}

/// `VaultConfig`, 17 bytes.
#[repr(C, packed)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub(crate) struct VaultConfigLayout {
    pub management_fee_bps: u16,
    pub performance_fee_bps: u16,
    pub rebalance_threshold_bps: u16,
    pub max_slippage_bps: u16,
    pub deposit_cap: u64,
    pub is_paused: u8,
}

/// `VaultState`, 421 bytes.
#[repr(C, packed)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub(crate) struct VaultStateLayout {
    pub discriminator: [u8; DISCRIMINATOR_LEN],
    pub bump: u8,
    pub authority: [u8; 32],
    pub share_mint: [u8; 32],
    pub total_value_locked: u64,
    pub total_shares: u64,
    pub high_water_mark: u64,
    pub accrued_management_fees: u64,
    pub accrued_performance_fees: u64,
    pub last_fee_collection: i64,
    pub last_rebalance_timestamp: i64,
    pub rebalance_count: u64,
    pub depositor_count: u64,
    pub config: VaultConfigLayout,
    pub num_allocations: u8,
    pub allocations: [AllocationLayout; MAX_PROTOCOLS],
    pub reserved: [u8; 128],
}

/// `UserAccount`, 146 bytes.
#[repr(C, packed)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub(crate) struct UserAccountLayout {
    pub discriminator: [u8; DISCRIMINATOR_LEN],
    pub bump: u8,
    pub owner: [u8; 32],
    pub share_balance: u64,
    pub total_deposited: u64,
    pub total_withdrawn: u64,
    pub first_deposit: i64,
    pub last_activity: i64,
    pub pending_withdrawal_count: u8,
    pub reserved: [u8; 64],
}

/// `WithdrawRequest`, 114 bytes.
#[repr(C, packed)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub(crate) struct WithdrawRequestLayout {
    pub discriminator: [u8; DISCRIMINATOR_LEN],
    pub bump: u8,
    pub owner: [u8; 32],
    pub shares: u64,
    pub estimated_lamports: u64,
    pub created_at: i64,
    pub ready_at: i64,
    pub status: u8,
    pub request_index: u64,
    pub reserved: [u8; 32],
}
