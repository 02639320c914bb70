//! Share math.
//!
//! Integer only. Products are taken in `u128` so that `u64 × u64` never
//! overflows, and every division floors. Flooring in both directions means a
//! deposit followed by a withdrawal can only lose dust to the vault, never
//! gain it:
//!
//! ```text
//! shares_to_assets(assets_to_shares(a)) <= a
//! ```

use crate::constants::{
    BPS_DENOMINATOR, MIN_DEPOSIT_LAMPORTS, MINIMUM_INITIAL_SHARES, SECONDS_PER_YEAR,
    SHARE_PRECISION, UNSTAKING_DELAY_SECS,
};
use crate::{UserAccount, VaultClientError, VaultState};

// ============================================================================
// Exchange rate
// ============================================================================

/// Assets per share as an exact rational.
///
/// `shares` is never zero: an empty vault is [`ExchangeRate::ONE`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExchangeRate {
    /// Numerator, lamports
    pub assets: u64,
    /// Denominator, shares
    pub shares: u64,
}

impl ExchangeRate {
    /// One lamport per share.
    pub const ONE: Self = Self {
        assets: 1,
        shares: 1,
    };

    /// Whether outstanding shares are backed by nothing.
    pub const fn is_zero(&self) -> bool {
        self.assets == 0
    }
}

/// Current assets per share of the vault.
///
/// `total_value_locked / total_shares` while shares are outstanding, exactly
/// one otherwise, whatever the TVL.
pub fn exchange_rate(vault: &VaultState) -> ExchangeRate {
    if vault.total_shares == 0 {
        return ExchangeRate::ONE;
    }
    ExchangeRate {
        assets: vault.total_value_locked,
        shares: vault.total_shares,
    }
}

/// `floor(value × numerator / denominator)` in `u128`.
fn mul_div_floor(value: u64, numerator: u64, denominator: u64) -> Result<u64, VaultClientError> {
    let result = (value as u128)
        .checked_mul(numerator as u128)
        .ok_or(VaultClientError::ArithmeticOverflow)?
        .checked_div(denominator as u128)
        .ok_or(VaultClientError::ZeroExchangeRate)?;
    u64::try_from(result).map_err(|_| VaultClientError::ArithmeticOverflow)
}

/// Shares worth `assets` lamports, rounded down.
///
/// # Errors
///
/// - [`VaultClientError::ZeroExchangeRate`] if shares are outstanding against
///   zero TVL
/// - [`VaultClientError::ArithmeticOverflow`] if the result exceeds `u64`
pub fn assets_to_shares(assets: u64, vault: &VaultState) -> Result<u64, VaultClientError> {
    let rate = exchange_rate(vault);
    if rate.is_zero() {
        return Err(VaultClientError::ZeroExchangeRate);
    }
    mul_div_floor(assets, rate.shares, rate.assets)
}

/// Lamports backing `shares`, rounded down.
///
/// With zero TVL and shares outstanding this is 0.
///
/// # Errors
///
/// [`VaultClientError::ArithmeticOverflow`] if the result exceeds `u64`.
pub fn shares_to_assets(shares: u64, vault: &VaultState) -> Result<u64, VaultClientError> {
    let rate = exchange_rate(vault);
    mul_div_floor(shares, rate.assets, rate.shares)
}

/// Share price in lamports, scaled by [`SHARE_PRECISION`].
///
/// # Errors
///
/// [`VaultClientError::ArithmeticOverflow`] if the price exceeds `u64`.
pub fn share_price(vault: &VaultState) -> Result<u64, VaultClientError> {
    let rate = exchange_rate(vault);
    mul_div_floor(SHARE_PRECISION, rate.assets, rate.shares)
}

// ============================================================================
// Deposit checks
// ============================================================================

/// Reject deposits below `minimum`.
///
/// # Errors
///
/// [`VaultClientError::BelowMinimum`] when `assets < minimum`.
#[inline]
pub fn assert_minimum_deposit(assets: u64, minimum: u64) -> Result<(), VaultClientError> {
    if assets < minimum {
        return Err(VaultClientError::BelowMinimum {
            amount: assets,
            minimum,
        });
    }
    Ok(())
}

/// Reject deposits that would push TVL past `cap`. A cap of 0 is unlimited.
///
/// # Errors
///
/// - [`VaultClientError::DepositCapExceeded`] above the cap
/// - [`VaultClientError::ArithmeticOverflow`] if TVL would overflow
pub fn check_deposit_cap(tvl: u64, deposit: u64, cap: u64) -> Result<(), VaultClientError> {
    let new_tvl = tvl
        .checked_add(deposit)
        .ok_or(VaultClientError::ArithmeticOverflow)?;
    if cap > 0 && new_tvl > cap {
        return Err(VaultClientError::DepositCapExceeded { new_tvl, cap });
    }
    Ok(())
}

/// Shares the program mints for a deposit.
///
/// The first deposit into an empty vault (no shares or no TVL) mints 1:1 less
/// [`MINIMUM_INITIAL_SHARES`] dead shares, which pins the initial price.
/// Later deposits follow [`assets_to_shares`].
///
/// # Errors
///
/// - [`VaultClientError::BelowMinimum`] if a first deposit does not exceed
///   the dead shares
/// - [`VaultClientError::ArithmeticOverflow`] on overflow
pub fn shares_to_mint(deposit: u64, vault: &VaultState) -> Result<u64, VaultClientError> {
    if vault.total_shares == 0 || vault.total_value_locked == 0 {
        if deposit <= MINIMUM_INITIAL_SHARES {
            return Err(VaultClientError::BelowMinimum {
                amount: deposit,
                minimum: MINIMUM_INITIAL_SHARES + 1,
            });
        }
        return Ok(deposit - MINIMUM_INITIAL_SHARES);
    }
    assets_to_shares(deposit, vault)
}

// ============================================================================
// Previews
// ============================================================================

/// What a deposit would do if submitted now.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DepositPreview {
    /// Lamports deposited
    pub amount: u64,
    /// Shares that would be minted
    pub shares: u64,
    /// Share price before the deposit, scaled by [`SHARE_PRECISION`]
    pub share_price: u64,
    /// TVL after the deposit
    pub new_tvl: u64,
}

/// Run the program's deposit checks client-side and compute the mint.
///
/// # Errors
///
/// [`VaultClientError::VaultPaused`], [`VaultClientError::BelowMinimum`],
/// [`VaultClientError::DepositCapExceeded`], or a math error, in the order
/// the program checks them.
pub fn preview_deposit(amount: u64, vault: &VaultState) -> Result<DepositPreview, VaultClientError> {
    assert_minimum_deposit(amount, MIN_DEPOSIT_LAMPORTS)?;
    vault.require_active()?;
    check_deposit_cap(vault.total_value_locked, amount, vault.config.deposit_cap)?;

    let shares = shares_to_mint(amount, vault)?;
    Ok(DepositPreview {
        amount,
        shares,
        share_price: share_price(vault)?,
        new_tvl: vault.total_value_locked + amount,
    })
}

/// What a withdrawal request would record if submitted now.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WithdrawalPreview {
    /// Shares redeemed
    pub shares: u64,
    /// Lamports value at the current rate; the program recomputes on completion
    pub estimated_lamports: u64,
    /// Unix seconds from which the request can be completed
    pub ready_at: i64,
}

/// Run the program's `request_withdraw` checks client-side.
///
/// # Errors
///
/// - [`VaultClientError::BelowMinimum`] for zero shares
/// - [`VaultClientError::VaultPaused`] while halted
/// - [`VaultClientError::InsufficientShares`] above the user's balance
pub fn preview_withdrawal(
    shares: u64,
    user: &UserAccount,
    vault: &VaultState,
    now: i64,
) -> Result<WithdrawalPreview, VaultClientError> {
    assert_minimum_deposit(shares, 1)?;
    vault.require_active()?;
    if shares > user.share_balance {
        return Err(VaultClientError::InsufficientShares {
            requested: shares,
            available: user.share_balance,
        });
    }
    Ok(WithdrawalPreview {
        shares,
        estimated_lamports: shares_to_assets(shares, vault)?,
        ready_at: now
            .checked_add(UNSTAKING_DELAY_SECS)
            .ok_or(VaultClientError::ArithmeticOverflow)?,
    })
}

// ============================================================================
// Fees
// ============================================================================

/// `floor(value × bps / 10 000)`.
///
/// # Errors
///
/// [`VaultClientError::ArithmeticOverflow`] only when `bps` exceeds 10 000.
pub fn bps_of(value: u64, bps: u16) -> Result<u64, VaultClientError> {
    mul_div_floor(value, u64::from(bps), BPS_DENOMINATOR)
}

/// Management fee accrued since the last collection, as the program would
/// compute it at `now`. Informational only.
///
/// ```text
/// fee = tvl × management_fee_bps × elapsed / (10 000 × SECONDS_PER_YEAR)
/// ```
///
/// # Errors
///
/// [`VaultClientError::ArithmeticOverflow`] if the fee exceeds `u64`.
pub fn accrued_management_fee(vault: &VaultState, now: i64) -> Result<u64, VaultClientError> {
    let elapsed = now.saturating_sub(vault.last_fee_collection).max(0) as u128;
    let fee = (vault.total_value_locked as u128)
        .checked_mul(vault.config.management_fee_bps as u128)
        .and_then(|v| v.checked_mul(elapsed))
        .ok_or(VaultClientError::ArithmeticOverflow)?
        / (BPS_DENOMINATOR as u128 * SECONDS_PER_YEAR as u128);
    u64::try_from(fee).map_err(|_| VaultClientError::ArithmeticOverflow)
}

/// Performance fee owed on share price gains above the high water mark.
/// Informational only.
///
/// # Errors
///
/// [`VaultClientError::ArithmeticOverflow`] on overflow.
pub fn accrued_performance_fee(vault: &VaultState) -> Result<u64, VaultClientError> {
    let price = share_price(vault)?;
    if price <= vault.high_water_mark {
        return Ok(0);
    }
    let gain = mul_div_floor(price - vault.high_water_mark, vault.total_shares, SHARE_PRECISION)?;
    bps_of(gain, vault.config.performance_fee_bps)
}
