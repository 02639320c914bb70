//! Rebalance decision.
//!
//! ```text
//!                      ┌──▶ PausedBlocked
//!                      ├──▶ CooldownBlocked { seconds_remaining }
//!   Idle ── decide ────┼──▶ ThresholdNotMet { max_deviation, threshold_bps }
//!                      └──▶ Triggered { protocol, deviation }
//! ```
//!
//! Gates are evaluated in that order and the first match wins, so a paused
//! vault never triggers whatever its cooldown or drift. The on-chain program
//! re-checks the same conditions; this only saves submitting transactions
//! that would be rejected.

use core::fmt;

use crate::allocation::max_deviation;
use crate::{ProtocolId, VaultState};

/// Result of evaluating the rebalance gates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Decision {
    /// Not evaluated yet
    #[default]
    Idle,
    /// Circuit breaker engaged
    PausedBlocked,
    /// Too soon after the last rebalance
    CooldownBlocked {
        /// Seconds until the cooldown ends
        seconds_remaining: i64,
    },
    /// Drift below the vault's threshold, or nothing allocated
    ThresholdNotMet {
        /// Largest deviation found, 0 without allocations
        max_deviation: u16,
        /// Threshold it was compared against
        threshold_bps: u16,
    },
    /// A rebalance should be submitted
    Triggered {
        /// Protocol with the largest drift
        protocol: ProtocolId,
        /// Its deviation in bps
        deviation: u16,
    },
}

/// The gate that blocked a rebalance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Gate {
    /// Vault paused
    Paused,
    /// Cooldown not elapsed
    Cooldown {
        /// Seconds until the cooldown ends
        seconds_remaining: i64,
    },
    /// Drift below threshold
    Threshold {
        /// Largest deviation found
        max_deviation: u16,
        /// Threshold it was compared against
        threshold_bps: u16,
    },
}

impl Gate {
    /// Short name for log fields.
    pub fn name(&self) -> &'static str {
        self.into()
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Paused => f.write_str("vault paused"),
            Self::Cooldown { seconds_remaining } => {
                write!(f, "cooldown, {seconds_remaining}s remaining")
            }
            Self::Threshold {
                max_deviation,
                threshold_bps,
            } => write!(f, "max deviation {max_deviation} bps below threshold {threshold_bps} bps"),
        }
    }
}

impl Decision {
    /// Whether a rebalance should be submitted.
    pub const fn is_triggered(&self) -> bool {
        matches!(self, Self::Triggered { .. })
    }

    /// The blocking gate, if any. `None` for `Idle` and `Triggered`.
    pub const fn gate(&self) -> Option<Gate> {
        match *self {
            Self::PausedBlocked => Some(Gate::Paused),
            Self::CooldownBlocked { seconds_remaining } => Some(Gate::Cooldown { seconds_remaining }),
            Self::ThresholdNotMet {
                max_deviation,
                threshold_bps,
            } => Some(Gate::Threshold {
                max_deviation,
                threshold_bps,
            }),
            Self::Idle | Self::Triggered { .. } => None,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Triggered {
                protocol,
                deviation,
            } => write!(f, "triggered by {protocol} ({deviation} bps)"),
            blocked => match blocked.gate() {
                Some(gate) => write!(f, "blocked: {gate}"),
                None => f.write_str("blocked"),
            },
        }
    }
}

/// Evaluate the rebalance gates for `vault` at `now`.
pub fn decide(vault: &VaultState, now: i64, cooldown_seconds: i64) -> Decision {
    if vault.is_paused() {
        return Decision::PausedBlocked;
    }

    let elapsed = now.saturating_sub(vault.last_rebalance_timestamp);
    if elapsed < cooldown_seconds {
        return Decision::CooldownBlocked {
            seconds_remaining: cooldown_seconds.saturating_sub(elapsed),
        };
    }

    let threshold_bps = vault.rebalance_threshold_bps();
    match max_deviation(&vault.allocations) {
        Some((protocol, deviation)) if deviation >= threshold_bps => {
            Decision::Triggered {
                protocol,
                deviation,
            }
        }
        Some((_, deviation)) => Decision::ThresholdNotMet {
            max_deviation: deviation,
            threshold_bps,
        },
        None => Decision::ThresholdNotMet {
            max_deviation: 0,
            threshold_bps,
        },
    }
}

#[cfg(test)]
mod tests {
    use solana_pubkey::Pubkey;
    use test_case::test_case;

    use super::*;
    use crate::{Allocation, VaultConfig};

    const T: i64 = 1_700_000_000;
    const COOLDOWN: i64 = 3_600;

    fn vault(threshold_bps: u16, allocations: &[(u16, u16)]) -> VaultState {
        let protocols = [
            ProtocolId::Jito,
            ProtocolId::Marinade,
            ProtocolId::BlazeStake,
            ProtocolId::Lido,
        ];
        VaultState {
            bump: 255,
            authority: Pubkey::new_from_array([1; 32]),
            share_mint: Pubkey::new_from_array([2; 32]),
            total_value_locked: 100_000_000_000,
            total_shares: 100_000_000_000,
            high_water_mark: 1_000_000_000,
            accrued_management_fees: 0,
            accrued_performance_fees: 0,
            last_fee_collection: T,
            last_rebalance_timestamp: T,
            rebalance_count: 3,
            depositor_count: 10,
            config: VaultConfig {
                management_fee_bps: 50,
                performance_fee_bps: 1_000,
                rebalance_threshold_bps: threshold_bps,
                max_slippage_bps: 100,
                deposit_cap: 0,
                is_paused: false,
            },
            allocations: allocations
                .iter()
                .zip(protocols)
                .map(|(&(target_bps, current_bps), protocol)| Allocation {
                    protocol,
                    target_bps,
                    current_bps,
                    amount: 0,
                })
                .collect(),
            inactive_slots: Vec::new(),
            reserved: [0; 128],
        }
    }

    const DRIFTED: [(u16, u16); 4] = [(2_500, 2_500), (2_500, 2_600), (2_500, 2_400), (2_500, 2_500)];

    #[test]
    fn test_idle_is_the_default() {
        assert_eq!(Decision::default(), Decision::Idle);
        assert_eq!(Decision::Idle.gate(), None);
    }

    #[test]
    fn test_pause_dominates() {
        let mut vault = vault(50, &DRIFTED);
        vault.config.is_paused = true;
        // cooldown elapsed and deviation above threshold
        assert_eq!(decide(&vault, T + 10 * COOLDOWN, COOLDOWN), Decision::PausedBlocked);
        // inside cooldown too
        assert_eq!(decide(&vault, T, COOLDOWN), Decision::PausedBlocked);
        assert_eq!(
            decide(&vault, T, COOLDOWN).gate(),
            Some(Gate::Paused)
        );
    }

    #[test_case(T + 3_599 => Decision::CooldownBlocked { seconds_remaining: 1 } ; "one second left")]
    #[test_case(T => Decision::CooldownBlocked { seconds_remaining: 3_600 } ; "just rebalanced")]
    #[test_case(T - 10 => Decision::CooldownBlocked { seconds_remaining: 3_610 } ; "clock behind chain")]
    #[test_case(T + 3_600 => Decision::Triggered { protocol: ProtocolId::Marinade, deviation: 100 } ; "cooldown over")]
    fn test_cooldown_boundary(now: i64) -> Decision {
        decide(&vault(50, &DRIFTED), now, COOLDOWN)
    }

    #[test]
    fn test_threshold_met_triggers_on_lowest_id() {
        let vault = vault(50, &DRIFTED);
        assert_eq!(
            max_deviation(&vault.allocations),
            Some((ProtocolId::Marinade, 100))
        );
        let decision = decide(&vault, T + COOLDOWN, COOLDOWN);
        assert!(decision.is_triggered());
        assert_eq!(decision.gate(), None);
    }

    #[test_case(150 => Decision::ThresholdNotMet { max_deviation: 100, threshold_bps: 150 } ; "above drift")]
    #[test_case(101 => Decision::ThresholdNotMet { max_deviation: 100, threshold_bps: 101 } ; "just above drift")]
    #[test_case(100 => Decision::Triggered { protocol: ProtocolId::Marinade, deviation: 100 } ; "equal to drift")]
    fn test_threshold(threshold_bps: u16) -> Decision {
        decide(&vault(threshold_bps, &DRIFTED), T + COOLDOWN, COOLDOWN)
    }

    #[test]
    fn test_no_allocations_never_triggers() {
        let vault = vault(0, &[]);
        assert_eq!(
            decide(&vault, T + COOLDOWN, COOLDOWN),
            Decision::ThresholdNotMet {
                max_deviation: 0,
                threshold_bps: 0
            }
        );
    }

    #[test]
    fn test_gate_names_and_display() {
        let blocked = Decision::CooldownBlocked {
            seconds_remaining: 1,
        };
        let gate = blocked.gate().unwrap();
        assert_eq!(gate.name(), "cooldown");
        assert_eq!(blocked.to_string(), "blocked: cooldown, 1s remaining");
        assert_eq!(
            Decision::Triggered {
                protocol: ProtocolId::Jito,
                deviation: 700
            }
            .to_string(),
            "triggered by Jito (700 bps)"
        );
    }
}
