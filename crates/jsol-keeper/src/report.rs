//! Operator reports.
//!
//! Read-only views over the vault and a depositor's position, printable as
//! text or serialized to JSON with `serde`.

use core::fmt;

use jsol_vault_interface::math::{
    accrued_management_fee, accrued_performance_fee, share_price, shares_to_assets,
};
use jsol_vault_interface::{
    AccountKind, UserAccount, VaultClientError, VaultState, decide, decode_user_account,
    decode_vault_state, decode_withdrawal_request, find_user_account_pda,
    find_withdrawal_request_pda, rebalance_plan,
};
use serde::Serialize;
use solana_pubkey::Pubkey;

use crate::chain::{ChainError, ChainReader};

// ============================================================================
// Errors
// ============================================================================

/// Failure to build a report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReportError {
    /// Chain call failed
    Chain(ChainError),
    /// Account data or math failed
    Vault(VaultClientError),
}

impl From<ChainError> for ReportError {
    fn from(error: ChainError) -> Self {
        Self::Chain(error)
    }
}

impl From<VaultClientError> for ReportError {
    fn from(error: VaultClientError) -> Self {
        Self::Vault(error)
    }
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chain(error) => write!(f, "{error}"),
            Self::Vault(error) => write!(f, "{error}"),
        }
    }
}

impl std::error::Error for ReportError {}

// ============================================================================
// Vault
// ============================================================================

/// One row of the allocation table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AllocationReport {
    /// Protocol name
    pub protocol: String,
    /// Configured target
    pub target_bps: u16,
    /// Last recorded share of TVL
    pub current_bps: u16,
    /// `|current - target|`
    pub deviation_bps: u16,
    /// Lamports recorded against the protocol
    pub recorded_lamports: u64,
    /// Lamports at target
    pub target_lamports: u64,
    /// Lamports a rebalance would move in (positive) or out (negative)
    pub delta_lamports: i128,
}

/// Snapshot of the vault.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VaultReport {
    /// Vault account address
    pub address: String,
    /// Lamports under management
    pub total_value_locked: u64,
    /// Outstanding shares
    pub total_shares: u64,
    /// Lamports per share, scaled by 1e9
    pub share_price: u64,
    /// Performance fee high water mark, scaled by 1e9
    pub high_water_mark: u64,
    /// Whether the circuit breaker is engaged
    pub is_paused: bool,
    /// TVL cap, `None` if unlimited
    pub deposit_cap: Option<u64>,
    /// Unique depositors
    pub depositor_count: u64,
    /// Rebalances performed
    pub rebalance_count: u64,
    /// Unix seconds of the last rebalance
    pub last_rebalance_timestamp: i64,
    /// Minimum drift for a rebalance
    pub rebalance_threshold_bps: u16,
    /// Management fees collected so far
    pub accrued_management_fees: u64,
    /// Performance fees collected so far
    pub accrued_performance_fees: u64,
    /// Management fee that would be collected now
    pub pending_management_fee: u64,
    /// Performance fee that would be collected now
    pub pending_performance_fee: u64,
    /// Allocation table
    pub allocations: Vec<AllocationReport>,
    /// What the keeper would decide now
    pub decision: String,
}

/// Build the vault report for `now` and the keeper's cooldown.
///
/// # Errors
///
/// [`VaultClientError::ArithmeticOverflow`] on values that do not fit.
pub fn vault_report(
    address: &Pubkey,
    vault: &VaultState,
    now: i64,
    cooldown_seconds: i64,
) -> Result<VaultReport, VaultClientError> {
    let allocations = rebalance_plan(vault)?
        .into_iter()
        .map(|planned| AllocationReport {
            protocol: planned.protocol.to_string(),
            target_bps: planned.target_bps,
            current_bps: planned.current_bps,
            deviation_bps: planned.deviation_bps,
            recorded_lamports: planned.recorded_lamports,
            target_lamports: planned.target_lamports,
            delta_lamports: planned.delta_lamports,
        })
        .collect();

    Ok(VaultReport {
        address: address.to_string(),
        total_value_locked: vault.total_value_locked,
        total_shares: vault.total_shares,
        share_price: share_price(vault)?,
        high_water_mark: vault.high_water_mark,
        is_paused: vault.is_paused(),
        deposit_cap: vault.deposit_cap(),
        depositor_count: vault.depositor_count,
        rebalance_count: vault.rebalance_count,
        last_rebalance_timestamp: vault.last_rebalance_timestamp,
        rebalance_threshold_bps: vault.rebalance_threshold_bps(),
        accrued_management_fees: vault.accrued_management_fees,
        accrued_performance_fees: vault.accrued_performance_fees,
        pending_management_fee: accrued_management_fee(vault, now)?,
        pending_performance_fee: accrued_performance_fee(vault)?,
        allocations,
        decision: decide(vault, now, cooldown_seconds).to_string(),
    })
}

impl fmt::Display for VaultReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "vault            {}", self.address)?;
        writeln!(f, "tvl              {} lamports", self.total_value_locked)?;
        writeln!(f, "shares           {}", self.total_shares)?;
        writeln!(f, "share price      {} (1e9 = 1 SOL)", self.share_price)?;
        writeln!(f, "paused           {}", self.is_paused)?;
        match self.deposit_cap {
            Some(cap) => writeln!(f, "deposit cap      {cap} lamports")?,
            None => writeln!(f, "deposit cap      unlimited")?,
        }
        writeln!(f, "depositors       {}", self.depositor_count)?;
        writeln!(
            f,
            "rebalances       {} (last at {})",
            self.rebalance_count, self.last_rebalance_timestamp
        )?;
        writeln!(
            f,
            "fees             {} management, {} performance (pending {} / {})",
            self.accrued_management_fees,
            self.accrued_performance_fees,
            self.pending_management_fee,
            self.pending_performance_fee
        )?;
        writeln!(f, "threshold        {} bps", self.rebalance_threshold_bps)?;
        writeln!(
            f,
            "{:<12} {:>7} {:>7} {:>7} {:>20} {:>20}",
            "protocol", "target", "current", "drift", "target lamports", "delta"
        )?;
        for row in &self.allocations {
            writeln!(
                f,
                "{:<12} {:>7} {:>7} {:>7} {:>20} {:>20}",
                row.protocol,
                row.target_bps,
                row.current_bps,
                row.deviation_bps,
                row.target_lamports,
                row.delta_lamports
            )?;
        }
        write!(f, "decision         {}", self.decision)
    }
}

/// Fetch and decode the vault, then build its report.
///
/// # Errors
///
/// [`ReportError::Vault`] with `AccountNotFound` if the vault does not exist,
/// or any chain, decode or math failure.
pub async fn fetch_vault_report<R: ChainReader>(
    reader: &R,
    vault: &Pubkey,
    now: i64,
    cooldown_seconds: i64,
) -> Result<VaultReport, ReportError> {
    let state = fetch_vault(reader, vault).await?;
    Ok(vault_report(vault, &state, now, cooldown_seconds)?)
}

async fn fetch_vault<R: ChainReader>(reader: &R, vault: &Pubkey) -> Result<VaultState, ReportError> {
    let bytes = reader
        .get_account_bytes(vault)
        .await?
        .ok_or(VaultClientError::AccountNotFound {
            kind: AccountKind::VaultState,
        })?;
    Ok(decode_vault_state(&bytes)?)
}

// ============================================================================
// Position
// ============================================================================

/// One pending withdrawal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WithdrawalReport {
    /// Index in the request address seeds
    pub index: u8,
    /// Request account address
    pub address: String,
    /// Shares being redeemed
    pub shares: u64,
    /// Lamports estimated at request time
    pub estimated_lamports: u64,
    /// Unix seconds from which it can be completed
    pub ready_at: i64,
    /// Lifecycle status
    pub status: String,
    /// Whether `complete_withdraw` would succeed now
    pub claimable: bool,
}

/// A depositor's position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PositionReport {
    /// Depositor
    pub owner: String,
    /// User account address
    pub address: String,
    /// Whether the user account exists
    pub exists: bool,
    /// Free shares
    pub shares: u64,
    /// Lamports those shares are worth now, rounded down
    pub value_lamports: u64,
    /// Lifetime deposits
    pub total_deposited: u64,
    /// Lifetime withdrawals
    pub total_withdrawn: u64,
    /// Outstanding withdrawal requests, by index
    pub pending_withdrawals: Vec<WithdrawalReport>,
}

impl fmt::Display for PositionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "owner            {}", self.owner)?;
        if !self.exists {
            return write!(f, "no deposits");
        }
        writeln!(f, "shares           {}", self.shares)?;
        writeln!(f, "value            {} lamports", self.value_lamports)?;
        writeln!(
            f,
            "lifetime         {} deposited, {} withdrawn",
            self.total_deposited, self.total_withdrawn
        )?;
        write!(f, "pending          {}", self.pending_withdrawals.len())?;
        for request in &self.pending_withdrawals {
            write!(
                f,
                "\n  #{} {} shares, ~{} lamports, ready at {} ({}{})",
                request.index,
                request.shares,
                request.estimated_lamports,
                request.ready_at,
                request.status,
                if request.claimable { ", claimable" } else { "" }
            )?;
        }
        Ok(())
    }
}

/// Fetch a depositor's position and resolve its withdrawal requests through
/// their index-based addresses.
///
/// An owner who never deposited gets an empty position, not an error.
/// Completed requests keep their accounts while the user's counter drops, so
/// indices are scanned upward from 0, skipping missing, completed and
/// cancelled requests, until `pending_withdrawal_count` outstanding ones are
/// found or the index space is exhausted.
///
/// # Errors
///
/// Chain failures and malformed accounts.
pub async fn fetch_position<R: ChainReader>(
    reader: &R,
    program_id: &Pubkey,
    vault: &Pubkey,
    owner: &Pubkey,
    now: i64,
) -> Result<PositionReport, ReportError> {
    let state = fetch_vault(reader, vault).await?;
    let (user_address, _) = find_user_account_pda(program_id, owner);

    let data = reader.get_account_bytes(&user_address).await?;
    let (user, exists) = match decode_user_account(data.as_deref()) {
        Ok(user) => (user, true),
        Err(error) if error.is_not_found() => (UserAccount::empty(*owner), false),
        Err(error) => return Err(error.into()),
    };

    let wanted = usize::from(user.pending_withdrawal_count);
    let mut pending_withdrawals = Vec::with_capacity(wanted);
    for index in 0..=u8::MAX {
        if pending_withdrawals.len() >= wanted {
            break;
        }
        let (address, _) = find_withdrawal_request_pda(program_id, owner, index);
        let data = reader.get_account_bytes(&address).await?;
        let request = match decode_withdrawal_request(data.as_deref()) {
            Ok(request) => request,
            Err(error) if error.is_not_found() => continue,
            Err(error) => return Err(error.into()),
        };
        if !request.is_outstanding() {
            continue;
        }
        pending_withdrawals.push(WithdrawalReport {
            index,
            address: address.to_string(),
            shares: request.shares_requested,
            estimated_lamports: request.estimated_lamports,
            ready_at: request.ready_at,
            status: request.status.to_string(),
            claimable: request.is_claimable(now),
        });
    }

    Ok(PositionReport {
        owner: owner.to_string(),
        address: user_address.to_string(),
        exists,
        shares: user.share_balance,
        value_lamports: shares_to_assets(user.share_balance, &state)?,
        total_deposited: user.total_deposited,
        total_withdrawn: user.total_withdrawn,
        pending_withdrawals,
    })
}
