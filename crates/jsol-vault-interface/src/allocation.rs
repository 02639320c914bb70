//! Allocation drift.
//!
//! Deviation is measured in basis points of TVL between the recorded
//! `current_bps` snapshot and the configured `target_bps`.

use crate::constants::BPS_DENOMINATOR;
use crate::math::bps_of;
use crate::{Allocation, ProtocolId, VaultClientError, VaultState};

/// `|current_bps - target_bps|`.
#[inline]
pub fn deviation(allocation: &Allocation) -> u16 {
    allocation.current_bps.abs_diff(allocation.target_bps)
}

/// Protocol with the largest deviation and that deviation.
///
/// Ties go to the lowest [`ProtocolId`] so the answer does not depend on slot
/// order. `None` when there are no allocations.
pub fn max_deviation(allocations: &[Allocation]) -> Option<(ProtocolId, u16)> {
    allocations
        .iter()
        .map(|a| (a.protocol, deviation(a)))
        .max_by(|(pa, da), (pb, db)| da.cmp(db).then_with(|| pb.cmp(pa)))
}

/// Sum of target allocations in basis points.
pub fn target_sum_bps(allocations: &[Allocation]) -> u32 {
    allocations.iter().map(|a| u32::from(a.target_bps)).sum()
}

/// Check targets do not add up to more than 100%.
///
/// # Errors
///
/// [`VaultClientError::InvalidAllocationSum`] above 10 000 bps.
pub fn validate_targets(allocations: &[Allocation]) -> Result<(), VaultClientError> {
    let sum = target_sum_bps(allocations);
    if u64::from(sum) > BPS_DENOMINATOR {
        return Err(VaultClientError::InvalidAllocationSum(sum));
    }
    Ok(())
}

/// Where one protocol's funds would move on the next rebalance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlannedMove {
    /// The yield source
    pub protocol: ProtocolId,
    /// Configured target
    pub target_bps: u16,
    /// Last recorded share of TVL
    pub current_bps: u16,
    /// `|current_bps - target_bps|`
    pub deviation_bps: u16,
    /// Lamports recorded against the protocol
    pub recorded_lamports: u64,
    /// `tvl × target_bps / 10 000`, what the program writes on rebalance
    pub target_lamports: u64,
    /// `target_lamports - recorded_lamports`; positive means inflow
    pub delta_lamports: i128,
}

/// Per-protocol targets the program would apply if rebalanced now.
///
/// For reporting; the keeper submits `rebalance` without arguments.
///
/// # Errors
///
/// [`VaultClientError::ArithmeticOverflow`] if a target exceeds `u64`.
pub fn rebalance_plan(vault: &VaultState) -> Result<Vec<PlannedMove>, VaultClientError> {
    vault
        .allocations
        .iter()
        .map(|a| {
            let target_lamports = bps_of(vault.total_value_locked, a.target_bps)?;
            Ok(PlannedMove {
                protocol: a.protocol,
                target_bps: a.target_bps,
                current_bps: a.current_bps,
                deviation_bps: deviation(a),
                recorded_lamports: a.amount,
                target_lamports,
                delta_lamports: i128::from(target_lamports) - i128::from(a.amount),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    fn allocation(protocol: ProtocolId, target_bps: u16, current_bps: u16) -> Allocation {
        Allocation {
            protocol,
            target_bps,
            current_bps,
            amount: 0,
        }
    }

    #[test_case(2_500, 2_600 => 100 ; "over target")]
    #[test_case(2_500, 2_400 => 100 ; "under target")]
    #[test_case(0, 10_000 => 10_000 ; "full swing")]
    #[test_case(5_000, 5_000 => 0 ; "on target")]
    fn test_deviation(target: u16, current: u16) -> u16 {
        deviation(&allocation(ProtocolId::Native, target, current))
    }

    #[test]
    fn test_max_deviation_empty() {
        assert_eq!(max_deviation(&[]), None);
    }

    #[test]
    fn test_max_deviation_tie_goes_to_lowest_protocol() {
        let allocations = [
            allocation(ProtocolId::Lido, 2_500, 2_400),
            allocation(ProtocolId::Marinade, 2_500, 2_600),
            allocation(ProtocolId::Jupiter, 2_500, 2_600),
            allocation(ProtocolId::BlazeStake, 2_500, 2_400),
        ];
        assert_eq!(
            max_deviation(&allocations),
            Some((ProtocolId::Marinade, 100))
        );

        let mut reversed = allocations;
        reversed.reverse();
        assert_eq!(max_deviation(&reversed), Some((ProtocolId::Marinade, 100)));
    }

    #[test]
    fn test_validate_targets() {
        let full = [
            allocation(ProtocolId::Jito, 5_000, 0),
            allocation(ProtocolId::Marinade, 5_000, 0),
        ];
        assert_eq!(target_sum_bps(&full), 10_000);
        assert_eq!(validate_targets(&full), Ok(()));

        let over = [
            allocation(ProtocolId::Jito, 5_000, 0),
            allocation(ProtocolId::Marinade, 5_001, 0),
        ];
        assert_eq!(
            validate_targets(&over),
            Err(VaultClientError::InvalidAllocationSum(10_001))
        );
    }
}
