//! Account codec.
//!
//! Every record is decoded the same way: check the length against the fixed
//! layout, check the discriminator, copy the packed bytes out, then validate
//! the fields the layout cannot express (booleans, enum bytes, allocation
//! count and target sum). Buffers longer than the layout are accepted and the
//! excess ignored, as Anchor does.

use bytemuck::{Pod, Zeroable};
use solana_pubkey::Pubkey;

use crate::constants::{BPS_DENOMINATOR, MAX_PROTOCOLS};
use crate::discriminator::{DISCRIMINATOR_LEN, accounts};
use crate::layout::{
    AllocationLayout, UserAccountLayout, VaultConfigLayout, VaultStateLayout,
    WithdrawRequestLayout,
};
use crate::{
    AccountKind, Allocation, AllocationSlotBytes, MalformedReason, ProtocolId, UserAccount,
    VaultClientError, VaultConfig, VaultState, WithdrawStatus, WithdrawalRequest,
};

// ============================================================================
// AccountRecord
// ============================================================================

/// A vault account with a fixed on-chain layout.
pub trait AccountRecord: Sized {
    /// Which record this is, for error reporting
    const KIND: AccountKind;
    /// Leading 8 bytes of every account of this type
    const DISCRIMINATOR: [u8; DISCRIMINATOR_LEN];
    /// Layout size in bytes, discriminator included
    const LEN: usize;

    /// Decode from raw account data.
    ///
    /// # Errors
    ///
    /// [`VaultClientError::MalformedAccount`] when the bytes do not hold a
    /// valid record of this type.
    fn decode(data: &[u8]) -> Result<Self, VaultClientError>;

    /// Encode to exactly [`Self::LEN`] bytes.
    fn encode(&self) -> Vec<u8>;
}

/// Length check, discriminator check and an unaligned copy of the layout.
fn read_layout<T: Pod>(
    kind: AccountKind,
    discriminator: &[u8; DISCRIMINATOR_LEN],
    data: &[u8],
) -> Result<T, VaultClientError> {
    let expected = core::mem::size_of::<T>();
    let Some(bytes) = data.get(..expected) else {
        return Err(VaultClientError::malformed(
            kind,
            data.len(),
            MalformedReason::TooShort { expected },
        ));
    };
    if bytes[..DISCRIMINATOR_LEN] != discriminator[..] {
        return Err(VaultClientError::malformed(
            kind,
            data.len(),
            MalformedReason::DiscriminatorMismatch,
        ));
    }
    Ok(bytemuck::pod_read_unaligned(bytes))
}

fn decode_bool(byte: u8) -> Option<bool> {
    match byte {
        0 => Some(false),
        1 => Some(true),
        _ => None,
    }
}

// ============================================================================
// VaultState
// ============================================================================

impl AccountRecord for VaultState {
    const KIND: AccountKind = AccountKind::VaultState;
    const DISCRIMINATOR: [u8; DISCRIMINATOR_LEN] = accounts::VAULT_STATE;
    const LEN: usize = core::mem::size_of::<VaultStateLayout>();

    fn decode(data: &[u8]) -> Result<Self, VaultClientError> {
        let malformed = |reason| VaultClientError::malformed(Self::KIND, data.len(), reason);
        let raw: VaultStateLayout = read_layout(Self::KIND, &Self::DISCRIMINATOR, data)?;

        let config = raw.config;
        let is_paused =
            decode_bool(config.is_paused).ok_or(malformed(MalformedReason::InvalidBool))?;

        let num_allocations = raw.num_allocations;
        if usize::from(num_allocations) > MAX_PROTOCOLS {
            return Err(malformed(MalformedReason::TooManyAllocations(num_allocations)));
        }

        let slots = raw.allocations;
        let (live, stale) = slots.split_at(usize::from(num_allocations));

        let mut allocations = Vec::with_capacity(live.len());
        let mut target_sum: u32 = 0;
        for slot in live {
            let protocol_byte = slot.protocol;
            let protocol = ProtocolId::try_from(protocol_byte)
                .map_err(|_| malformed(MalformedReason::UnknownProtocol(protocol_byte)))?;
            let target_bps = slot.target_bps;
            target_sum += u32::from(target_bps);
            allocations.push(Allocation {
                protocol,
                target_bps,
                current_bps: slot.current_bps,
                amount: slot.amount,
            });
        }
        if u64::from(target_sum) > BPS_DENOMINATOR {
            return Err(malformed(MalformedReason::TargetSumExceeded(target_sum)));
        }

        let inactive_slots = stale
            .iter()
            .map(|slot| bytemuck::cast::<AllocationLayout, AllocationSlotBytes>(*slot))
            .collect();

        Ok(Self {
            bump: raw.bump,
            authority: Pubkey::new_from_array(raw.authority),
            share_mint: Pubkey::new_from_array(raw.share_mint),
            total_value_locked: raw.total_value_locked,
            total_shares: raw.total_shares,
            high_water_mark: raw.high_water_mark,
            accrued_management_fees: raw.accrued_management_fees,
            accrued_performance_fees: raw.accrued_performance_fees,
            last_fee_collection: raw.last_fee_collection,
            last_rebalance_timestamp: raw.last_rebalance_timestamp,
            rebalance_count: raw.rebalance_count,
            depositor_count: raw.depositor_count,
            config: VaultConfig {
                management_fee_bps: config.management_fee_bps,
                performance_fee_bps: config.performance_fee_bps,
                rebalance_threshold_bps: config.rebalance_threshold_bps,
                max_slippage_bps: config.max_slippage_bps,
                deposit_cap: config.deposit_cap,
                is_paused,
            },
            allocations,
            inactive_slots,
            reserved: raw.reserved,
        })
    }

    /// Live allocations fill the first slots, followed by the preserved
    /// inactive slots. Anything past [`MAX_PROTOCOLS`] entries is not written.
    fn encode(&self) -> Vec<u8> {
        let mut slots = [AllocationLayout::zeroed(); MAX_PROTOCOLS];
        let live = self.allocations.iter().map(|a| AllocationLayout {
            protocol: a.protocol.into(),
            target_bps: a.target_bps,
            current_bps: a.current_bps,
            amount: a.amount,
        });
        let stale = self
            .inactive_slots
            .iter()
            .map(|bytes| bytemuck::cast::<AllocationSlotBytes, AllocationLayout>(*bytes));
        for (slot, value) in slots.iter_mut().zip(live.chain(stale)) {
            *slot = value;
        }

        let raw = VaultStateLayout {
            discriminator: Self::DISCRIMINATOR,
            bump: self.bump,
            authority: self.authority.to_bytes(),
            share_mint: self.share_mint.to_bytes(),
            total_value_locked: self.total_value_locked,
            total_shares: self.total_shares,
            high_water_mark: self.high_water_mark,
            accrued_management_fees: self.accrued_management_fees,
            accrued_performance_fees: self.accrued_performance_fees,
            last_fee_collection: self.last_fee_collection,
            last_rebalance_timestamp: self.last_rebalance_timestamp,
            rebalance_count: self.rebalance_count,
            depositor_count: self.depositor_count,
            config: VaultConfigLayout {
                management_fee_bps: self.config.management_fee_bps,
                performance_fee_bps: self.config.performance_fee_bps,
                rebalance_threshold_bps: self.config.rebalance_threshold_bps,
                max_slippage_bps: self.config.max_slippage_bps,
                deposit_cap: self.config.deposit_cap,
                is_paused: u8::from(self.config.is_paused),
            },
            num_allocations: self.allocations.len().min(MAX_PROTOCOLS) as u8,
            allocations: slots,
            reserved: self.reserved,
        };
        bytemuck::bytes_of(&raw).to_vec()
    }
}

// ============================================================================
// UserAccount
// ============================================================================

impl AccountRecord for UserAccount {
    const KIND: AccountKind = AccountKind::UserAccount;
    const DISCRIMINATOR: [u8; DISCRIMINATOR_LEN] = accounts::USER_ACCOUNT;
    const LEN: usize = core::mem::size_of::<UserAccountLayout>();

    fn decode(data: &[u8]) -> Result<Self, VaultClientError> {
        let raw: UserAccountLayout = read_layout(Self::KIND, &Self::DISCRIMINATOR, data)?;
        Ok(Self {
            bump: raw.bump,
            owner: Pubkey::new_from_array(raw.owner),
            share_balance: raw.share_balance,
            total_deposited: raw.total_deposited,
            total_withdrawn: raw.total_withdrawn,
            first_deposit: raw.first_deposit,
            last_activity: raw.last_activity,
            pending_withdrawal_count: raw.pending_withdrawal_count,
            reserved: raw.reserved,
        })
    }

    fn encode(&self) -> Vec<u8> {
        let raw = UserAccountLayout {
            discriminator: Self::DISCRIMINATOR,
            bump: self.bump,
            owner: self.owner.to_bytes(),
            share_balance: self.share_balance,
            total_deposited: self.total_deposited,
            total_withdrawn: self.total_withdrawn,
            first_deposit: self.first_deposit,
            last_activity: self.last_activity,
            pending_withdrawal_count: self.pending_withdrawal_count,
            reserved: self.reserved,
        };
        bytemuck::bytes_of(&raw).to_vec()
    }
}

// ============================================================================
// WithdrawalRequest
// ============================================================================

impl AccountRecord for WithdrawalRequest {
    const KIND: AccountKind = AccountKind::WithdrawRequest;
    const DISCRIMINATOR: [u8; DISCRIMINATOR_LEN] = accounts::WITHDRAW_REQUEST;
    const LEN: usize = core::mem::size_of::<WithdrawRequestLayout>();

    fn decode(data: &[u8]) -> Result<Self, VaultClientError> {
        let raw: WithdrawRequestLayout = read_layout(Self::KIND, &Self::DISCRIMINATOR, data)?;
        let status_byte = raw.status;
        let status = WithdrawStatus::try_from(status_byte).map_err(|_| {
            VaultClientError::malformed(
                Self::KIND,
                data.len(),
                MalformedReason::UnknownStatus(status_byte),
            )
        })?;
        Ok(Self {
            bump: raw.bump,
            owner: Pubkey::new_from_array(raw.owner),
            shares_requested: raw.shares,
            estimated_lamports: raw.estimated_lamports,
            requested_at: raw.created_at,
            ready_at: raw.ready_at,
            status,
            request_index: raw.request_index,
            reserved: raw.reserved,
        })
    }

    fn encode(&self) -> Vec<u8> {
        let raw = WithdrawRequestLayout {
            discriminator: Self::DISCRIMINATOR,
            bump: self.bump,
            owner: self.owner.to_bytes(),
            shares: self.shares_requested,
            estimated_lamports: self.estimated_lamports,
            created_at: self.requested_at,
            ready_at: self.ready_at,
            status: self.status.into(),
            request_index: self.request_index,
            reserved: self.reserved,
        };
        bytemuck::bytes_of(&raw).to_vec()
    }
}

// ============================================================================
// Free functions
// ============================================================================

/// Decode the vault singleton.
///
/// # Errors
///
/// [`VaultClientError::MalformedAccount`] on a short buffer, a foreign
/// discriminator, a non 0/1 `is_paused`, more than [`MAX_PROTOCOLS`] live
/// allocations, an unknown protocol in a live slot, or live targets above
/// 10 000 bps.
pub fn decode_vault_state(data: &[u8]) -> Result<VaultState, VaultClientError> {
    VaultState::decode(data)
}

/// Decode a user position.
///
/// `None` means the lookup found no account, i.e. the owner never deposited.
///
/// # Errors
///
/// [`VaultClientError::AccountNotFound`] for `None`,
/// [`VaultClientError::MalformedAccount`] for bad bytes.
pub fn decode_user_account(data: Option<&[u8]>) -> Result<UserAccount, VaultClientError> {
    decode_optional(data)
}

/// Decode a withdrawal request.
///
/// # Errors
///
/// [`VaultClientError::AccountNotFound`] for `None`,
/// [`VaultClientError::MalformedAccount`] for bad bytes or an unknown status.
pub fn decode_withdrawal_request(
    data: Option<&[u8]>,
) -> Result<WithdrawalRequest, VaultClientError> {
    decode_optional(data)
}

fn decode_optional<T: AccountRecord>(data: Option<&[u8]>) -> Result<T, VaultClientError> {
    match data {
        Some(bytes) => T::decode(bytes),
        None => Err(VaultClientError::AccountNotFound { kind: T::KIND }),
    }
}

/// Encode the vault singleton.
pub fn encode_vault_state(state: &VaultState) -> Vec<u8> {
    state.encode()
}

/// Encode a user position.
pub fn encode_user_account(account: &UserAccount) -> Vec<u8> {
    account.encode()
}

/// Encode a withdrawal request.
pub fn encode_withdrawal_request(request: &WithdrawalRequest) -> Vec<u8> {
    request.encode()
}
