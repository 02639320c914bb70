//! Vault and position report tests.

mod common;

use common::*;
use jsol_keeper::{ChainError, ReportError, fetch_position, fetch_vault_report, vault_report};
use jsol_vault_interface::{
    AccountKind, UserAccount, VaultClientError, WithdrawStatus, WithdrawalRequest,
    encode_user_account, encode_withdrawal_request, find_user_account_pda,
    find_withdrawal_request_pda,
};
use solana_pubkey::Pubkey;

const OWNER: Pubkey = Pubkey::new_from_array([9; 32]);

#[test]
fn test_vault_report_lists_drift_and_decision() {
    let report = vault_report(&vault_address(), &drifted_vault(), AFTER_COOLDOWN, COOLDOWN).unwrap();

    assert_eq!(report.share_price, 1_000_000_000);
    assert_eq!(report.deposit_cap, None);
    assert_eq!(report.pending_management_fee, 57_077);
    assert_eq!(report.pending_performance_fee, 0);
    assert_eq!(report.decision, "triggered by Jito (700 bps)");

    let jito = &report.allocations[0];
    assert_eq!(jito.protocol, "Jito");
    assert_eq!(jito.deviation_bps, 700);
    assert_eq!(jito.target_lamports, 50_000_000_000);
    assert_eq!(jito.delta_lamports, -7_000_000_000);
    assert_eq!(report.allocations[1].delta_lamports, 7_000_000_000);
}

#[test]
fn test_vault_report_serializes_to_json() {
    let report = vault_report(&vault_address(), &sample_vault(), AFTER_COOLDOWN, COOLDOWN).unwrap();
    let json: serde_json::Value = serde_json::to_value(&report).unwrap();

    assert_eq!(json["total_value_locked"], 100_000_000_000u64);
    assert_eq!(json["deposit_cap"], serde_json::Value::Null);
    assert_eq!(json["allocations"].as_array().unwrap().len(), 3);
    assert_eq!(
        json["decision"],
        "blocked: max deviation 0 bps below threshold 500 bps"
    );
    assert!(report.to_string().contains("Marinade"));
}

#[tokio::test]
async fn test_missing_vault_report_is_not_found() {
    let reader = FakeReader::default();
    let error = fetch_vault_report(&reader, &vault_address(), AFTER_COOLDOWN, COOLDOWN)
        .await
        .unwrap_err();
    assert_eq!(
        error,
        ReportError::Vault(VaultClientError::AccountNotFound {
            kind: AccountKind::VaultState
        })
    );
}

#[tokio::test]
async fn test_vault_report_fetch_error_is_chain_error() {
    let reader = FakeReader::default();
    reader.fail_account(vault_address(), ChainError::Timeout);
    let error = fetch_vault_report(&reader, &vault_address(), AFTER_COOLDOWN, COOLDOWN)
        .await
        .unwrap_err();
    assert_eq!(error, ReportError::Chain(ChainError::Timeout));
}

#[tokio::test]
async fn test_unknown_owner_has_empty_position() {
    let reader = FakeReader::default();
    reader.set_account(vault_address(), vault_bytes(&sample_vault()));

    let position = fetch_position(&reader, &PROGRAM_ID, &vault_address(), &OWNER, AFTER_COOLDOWN)
        .await
        .unwrap();

    assert!(!position.exists);
    assert_eq!(position.shares, 0);
    assert!(position.pending_withdrawals.is_empty());
    assert!(position.to_string().ends_with("no deposits"));
}

fn request(index: u64, ready_at: i64, status: WithdrawStatus) -> WithdrawalRequest {
    WithdrawalRequest {
        bump: 255,
        owner: OWNER,
        shares_requested: 1_000_000_000,
        estimated_lamports: 1_000_000_000,
        requested_at: ready_at - 259_200,
        ready_at,
        status,
        request_index: index,
        reserved: [0; 32],
    }
}

#[tokio::test]
async fn test_position_resolves_requests_by_index() {
    let reader = FakeReader::default();
    reader.set_account(vault_address(), vault_bytes(&sample_vault()));

    let user = UserAccount {
        bump: 253,
        share_balance: 4_000_000_000,
        total_deposited: 5_000_000_000,
        first_deposit: LAST_REBALANCE,
        last_activity: LAST_REBALANCE,
        pending_withdrawal_count: 2,
        ..UserAccount::empty(OWNER)
    };
    let (user_address, _) = find_user_account_pda(&PROGRAM_ID, &OWNER);
    reader.set_account(user_address, encode_user_account(&user));

    // #0 matured, #1 missing, #2 still waiting.
    let (first, _) = find_withdrawal_request_pda(&PROGRAM_ID, &OWNER, 0);
    reader.set_account(
        first,
        encode_withdrawal_request(&request(0, AFTER_COOLDOWN - 1, WithdrawStatus::Pending)),
    );
    let (third, _) = find_withdrawal_request_pda(&PROGRAM_ID, &OWNER, 2);
    reader.set_account(
        third,
        encode_withdrawal_request(&request(2, AFTER_COOLDOWN + 60, WithdrawStatus::Pending)),
    );

    let position = fetch_position(&reader, &PROGRAM_ID, &vault_address(), &OWNER, AFTER_COOLDOWN)
        .await
        .unwrap();

    assert!(position.exists);
    assert_eq!(position.value_lamports, 4_000_000_000);
    let indices: Vec<u8> = position.pending_withdrawals.iter().map(|w| w.index).collect();
    assert_eq!(indices, vec![0, 2]);
    assert!(position.pending_withdrawals[0].claimable);
    assert!(!position.pending_withdrawals[1].claimable);
    assert_eq!(position.pending_withdrawals[0].address, first.to_string());
}

#[tokio::test]
async fn test_position_finds_pending_request_past_completed_one() {
    let reader = FakeReader::default();
    reader.set_account(vault_address(), vault_bytes(&sample_vault()));

    // Two requests were made, then #0 completed: the counter is back to 1
    // while the outstanding request keeps index 1.
    let user = UserAccount {
        share_balance: 2_000_000_000,
        pending_withdrawal_count: 1,
        ..UserAccount::empty(OWNER)
    };
    let (user_address, _) = find_user_account_pda(&PROGRAM_ID, &OWNER);
    reader.set_account(user_address, encode_user_account(&user));

    let (first, _) = find_withdrawal_request_pda(&PROGRAM_ID, &OWNER, 0);
    reader.set_account(
        first,
        encode_withdrawal_request(&request(0, AFTER_COOLDOWN - 10, WithdrawStatus::Completed)),
    );
    let (second, _) = find_withdrawal_request_pda(&PROGRAM_ID, &OWNER, 1);
    reader.set_account(
        second,
        encode_withdrawal_request(&request(1, AFTER_COOLDOWN + 60, WithdrawStatus::Pending)),
    );

    let position = fetch_position(&reader, &PROGRAM_ID, &vault_address(), &OWNER, AFTER_COOLDOWN)
        .await
        .unwrap();

    assert_eq!(position.pending_withdrawals.len(), 1);
    let pending = &position.pending_withdrawals[0];
    assert_eq!(pending.index, 1);
    assert_eq!(pending.address, second.to_string());
    assert_eq!(pending.status, "Pending");
    assert!(!pending.claimable);
    // vault, user, #0, #1: the scan stops once the counter is satisfied.
    assert_eq!(reader.reads(), 4);
}
