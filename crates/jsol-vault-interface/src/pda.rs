//! Program Derived Address (PDA) helpers
//!
//! Every vault account lives at a deterministic address:
//!
//! | Account | Seeds |
//! |---|---|
//! | vault | `["vault"]` |
//! | share mint | `["jsoli_mint"]` |
//! | vault SOL | `["vault_sol"]` |
//! | fee collector | `["fees"]` |
//! | user position | `["user", owner]` |
//! | withdrawal request | `["withdraw", owner, index as u8]` |
//!
//! Withdrawal requests are addressed by the owner's running
//! `pending_withdrawal_count`, not stored in a list: the count at request time
//! is the index, and the program bumps it exactly once per request.
//!
//! All functions take the program ID so a deployment other than the compiled
//! default can be targeted; pass [`VAULT_PROGRAM_ID`](crate::VAULT_PROGRAM_ID)
//! otherwise.

use solana_pubkey::Pubkey;

use crate::constants::{
    FEE_COLLECTOR_SEED, SHARE_MINT_SEED, USER_ACCOUNT_SEED, VAULT_SEED, VAULT_SOL_SEED,
    WITHDRAW_REQUEST_SEED,
};
use crate::{ASSOCIATED_TOKEN_PROGRAM_ID, TOKEN_PROGRAM_ID, UserAccount};

/// Vault singleton.
pub fn find_vault_pda(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[VAULT_SEED], program_id)
}

/// jSOLi share mint.
pub fn find_share_mint_pda(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[SHARE_MINT_SEED], program_id)
}

/// System account holding the vault's SOL.
pub fn find_vault_sol_pda(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[VAULT_SOL_SEED], program_id)
}

/// Fee collector.
pub fn find_fee_collector_pda(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[FEE_COLLECTOR_SEED], program_id)
}

/// Position of `owner`.
pub fn find_user_account_pda(program_id: &Pubkey, owner: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[USER_ACCOUNT_SEED, owner.as_ref()], program_id)
}

/// Withdrawal request number `index` of `owner`.
pub fn find_withdrawal_request_pda(program_id: &Pubkey, owner: &Pubkey, index: u8) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[WITHDRAW_REQUEST_SEED, owner.as_ref(), &index.to_le_bytes()],
        program_id,
    )
}

/// Address the user's next withdrawal request will be created at.
pub fn next_withdrawal_request_pda(program_id: &Pubkey, user: &UserAccount) -> (Pubkey, u8) {
    find_withdrawal_request_pda(program_id, &user.owner, user.pending_withdrawal_count)
}

/// SPL associated token account of `wallet` for `mint`.
pub fn find_associated_token_address(wallet: &Pubkey, mint: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(
        &[wallet.as_ref(), TOKEN_PROGRAM_ID.as_ref(), mint.as_ref()],
        &ASSOCIATED_TOKEN_PROGRAM_ID,
    )
    .0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VAULT_PROGRAM_ID;

    #[test]
    fn test_singletons_are_distinct_and_stable() {
        let (vault, vault_bump) = find_vault_pda(&VAULT_PROGRAM_ID);
        let (mint, _) = find_share_mint_pda(&VAULT_PROGRAM_ID);
        let (sol, _) = find_vault_sol_pda(&VAULT_PROGRAM_ID);
        let (fees, _) = find_fee_collector_pda(&VAULT_PROGRAM_ID);
        assert_ne!(vault, mint);
        assert_ne!(vault, sol);
        assert_ne!(sol, fees);
        assert_eq!(find_vault_pda(&VAULT_PROGRAM_ID), (vault, vault_bump));
        assert!(!vault.is_on_curve());
    }

    #[test]
    fn test_withdrawal_request_addresses_follow_the_counter() {
        let owner = Pubkey::new_from_array([5; 32]);
        let first = find_withdrawal_request_pda(&VAULT_PROGRAM_ID, &owner, 0);
        let second = find_withdrawal_request_pda(&VAULT_PROGRAM_ID, &owner, 1);
        assert_ne!(first.0, second.0);

        let mut user = UserAccount::empty(owner);
        assert_eq!(next_withdrawal_request_pda(&VAULT_PROGRAM_ID, &user), first);
        user.pending_withdrawal_count = 1;
        assert_eq!(next_withdrawal_request_pda(&VAULT_PROGRAM_ID, &user), second);

        let other = Pubkey::new_from_array([6; 32]);
        assert_ne!(find_withdrawal_request_pda(&VAULT_PROGRAM_ID, &other, 0).0, first.0);
    }

    #[test]
    fn test_user_account_pda_depends_on_program() {
        let owner = Pubkey::new_from_array([5; 32]);
        let other_program = Pubkey::new_from_array([42; 32]);
        assert_ne!(
            find_user_account_pda(&VAULT_PROGRAM_ID, &owner).0,
            find_user_account_pda(&other_program, &owner).0
        );
    }
}
