//! Vault fixtures and keeper construction.

use std::sync::Arc;
use std::time::Duration;

use jsol_keeper::{Keeper, KeeperConfig};
use jsol_vault_interface::{
    Allocation, AllocationSlotBytes, ProtocolId, VaultConfig, VaultState, encode_vault_state,
    find_vault_pda,
};
use solana_keypair::Keypair;
use solana_pubkey::Pubkey;

use super::fakes::{FakeClock, FakeReader, FakeWriter};

/// Program the fixtures are derived from.
pub const PROGRAM_ID: Pubkey = Pubkey::new_from_array([42; 32]);

/// Last rebalance of the sample vault.
pub const LAST_REBALANCE: i64 = 1_700_000_000;

/// Cooldown the test keeper runs with.
pub const COOLDOWN: i64 = 3_600;

/// First instant the cooldown allows a rebalance.
pub const AFTER_COOLDOWN: i64 = LAST_REBALANCE + COOLDOWN;

pub fn vault_address() -> Pubkey {
    find_vault_pda(&PROGRAM_ID).0
}

pub fn keeper_keypair() -> Keypair {
    Keypair::new_from_array([7; 32])
}

/// 100 SOL vault at 1:1 with three allocations on target and a 500 bps
/// threshold.
pub fn sample_vault() -> VaultState {
    VaultState {
        bump: 254,
        authority: Pubkey::new_from_array([1; 32]),
        share_mint: Pubkey::new_from_array([2; 32]),
        total_value_locked: 100_000_000_000,
        total_shares: 100_000_000_000,
        high_water_mark: 1_000_000_000,
        accrued_management_fees: 0,
        accrued_performance_fees: 0,
        last_fee_collection: LAST_REBALANCE,
        last_rebalance_timestamp: LAST_REBALANCE,
        rebalance_count: 3,
        depositor_count: 12,
        config: VaultConfig {
            management_fee_bps: 50,
            performance_fee_bps: 1_000,
            rebalance_threshold_bps: 500,
            max_slippage_bps: 100,
            deposit_cap: 0,
            is_paused: false,
        },
        allocations: vec![
            allocation(ProtocolId::Jito, 5_000, 5_000),
            allocation(ProtocolId::Marinade, 3_000, 3_000),
            allocation(ProtocolId::BlazeStake, 2_000, 2_000),
        ],
        inactive_slots: vec![AllocationSlotBytes::default(); 7],
        reserved: [0; 128],
    }
}

pub fn allocation(protocol: ProtocolId, target_bps: u16, current_bps: u16) -> Allocation {
    Allocation {
        protocol,
        target_bps,
        current_bps,
        amount: 100_000_000_000 / 10_000 * u64::from(current_bps),
    }
}

/// Sample vault with Jito drifted 700 bps above target.
pub fn drifted_vault() -> VaultState {
    let mut vault = sample_vault();
    vault.allocations = vec![
        allocation(ProtocolId::Jito, 5_000, 5_700),
        allocation(ProtocolId::Marinade, 3_000, 2_300),
        allocation(ProtocolId::BlazeStake, 2_000, 2_000),
    ];
    vault
}

pub fn vault_bytes(vault: &VaultState) -> Vec<u8> {
    encode_vault_state(vault)
}

pub fn test_config() -> KeeperConfig {
    KeeperConfig {
        program_id: PROGRAM_ID,
        interval: Duration::from_secs(600),
        cooldown_seconds: COOLDOWN,
        status_poll_interval: Duration::from_secs(1),
        status_poll_attempts: 30,
        request_timeout: Duration::from_secs(30),
    }
}

pub type TestKeeper = Keeper<Arc<FakeReader>, Arc<FakeWriter>, Arc<FakeClock>>;

/// Keeper over shared fakes so the test can keep scripting and inspecting them.
pub fn keeper(
    reader: &Arc<FakeReader>,
    writer: &Arc<FakeWriter>,
    clock: &Arc<FakeClock>,
    config: KeeperConfig,
) -> TestKeeper {
    Keeper::new(
        reader.clone(),
        writer.clone(),
        clock.clone(),
        keeper_keypair(),
        config,
    )
}
