//! Instruction builders for the vault program.
//!
//! Instruction data is the Anchor layout:
//! `[discriminator: 8 bytes, args: Borsh]`. Account metas are listed in the
//! order the program declares them.

use solana_instruction::{AccountMeta, Instruction};
use solana_pubkey::Pubkey;

use crate::discriminator::{DISCRIMINATOR_LEN, instructions};
use crate::pda::{
    find_associated_token_address, find_share_mint_pda, find_user_account_pda, find_vault_pda,
    find_vault_sol_pda, find_withdrawal_request_pda,
};
use crate::{
    ASSOCIATED_TOKEN_PROGRAM_ID, PYTH_SOL_USD_PRICE_ID, RENT_SYSVAR_ID, SYSTEM_PROGRAM_ID,
    TOKEN_PROGRAM_ID,
};

// ============================================================================
// Instruction Data Builders
// ============================================================================

/// Data of an instruction with a single `u64` argument.
///
/// Layout: [discriminator: 8 bytes, value: u64 LE]
fn data_with_u64(discriminator: [u8; DISCRIMINATOR_LEN], value: u64) -> Vec<u8> {
    let mut data = Vec::with_capacity(DISCRIMINATOR_LEN + 8);
    data.extend_from_slice(&discriminator);
    data.extend_from_slice(&value.to_le_bytes());
    data
}

/// Account counts per instruction.
pub mod account_counts {
    /// `rebalance`: vault, rebalancer
    pub const REBALANCE: usize = 2;
    /// `deposit`: vault, mint, user ATA, user account, vault SOL, user,
    /// system, token, ATA program, rent, oracle
    pub const DEPOSIT: usize = 11;
    /// `request_withdraw`: vault, user account, request, user, system
    pub const REQUEST_WITHDRAW: usize = 5;
    /// `complete_withdraw`: vault, mint, user ATA, user account, request,
    /// vault SOL, user, token, system
    pub const COMPLETE_WITHDRAW: usize = 9;
}

// ============================================================================
// Builders
// ============================================================================

/// `rebalance`: reset allocations to target. Permissionless on-chain; the
/// program enforces pause, cooldown and threshold itself.
pub fn rebalance(program_id: &Pubkey, rebalancer: &Pubkey) -> Instruction {
    let (vault, _) = find_vault_pda(program_id);
    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(vault, false),
            AccountMeta::new_readonly(*rebalancer, true),
        ],
        data: instructions::REBALANCE.to_vec(),
    }
}

/// `deposit(amount)`: transfer SOL in and mint shares to the user's ATA.
pub fn deposit(program_id: &Pubkey, user: &Pubkey, amount: u64) -> Instruction {
    let (vault, _) = find_vault_pda(program_id);
    let (share_mint, _) = find_share_mint_pda(program_id);
    let (user_account, _) = find_user_account_pda(program_id, user);
    let (vault_sol, _) = find_vault_sol_pda(program_id);
    let user_ata = find_associated_token_address(user, &share_mint);

    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(vault, false),
            AccountMeta::new(share_mint, false),
            AccountMeta::new(user_ata, false),
            AccountMeta::new(user_account, false),
            AccountMeta::new(vault_sol, false),
            AccountMeta::new(*user, true),
            AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
            AccountMeta::new_readonly(TOKEN_PROGRAM_ID, false),
            AccountMeta::new_readonly(ASSOCIATED_TOKEN_PROGRAM_ID, false),
            AccountMeta::new_readonly(RENT_SYSVAR_ID, false),
            AccountMeta::new_readonly(PYTH_SOL_USD_PRICE_ID, false),
        ],
        data: data_with_u64(instructions::DEPOSIT, amount),
    }
}

/// `request_withdraw(shares)`.
///
/// `request_index` must be the user's current `pending_withdrawal_count`;
/// the program derives the request address from it.
pub fn request_withdraw(
    program_id: &Pubkey,
    user: &Pubkey,
    request_index: u8,
    shares: u64,
) -> Instruction {
    let (vault, _) = find_vault_pda(program_id);
    let (user_account, _) = find_user_account_pda(program_id, user);
    let (request, _) = find_withdrawal_request_pda(program_id, user, request_index);

    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new_readonly(vault, false),
            AccountMeta::new(user_account, false),
            AccountMeta::new(request, false),
            AccountMeta::new(*user, true),
            AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
        ],
        data: data_with_u64(instructions::REQUEST_WITHDRAW, shares),
    }
}

/// `complete_withdraw`: burn the request's shares and release SOL.
pub fn complete_withdraw(program_id: &Pubkey, user: &Pubkey, request_index: u8) -> Instruction {
    let (vault, _) = find_vault_pda(program_id);
    let (share_mint, _) = find_share_mint_pda(program_id);
    let (user_account, _) = find_user_account_pda(program_id, user);
    let (request, _) = find_withdrawal_request_pda(program_id, user, request_index);
    let (vault_sol, _) = find_vault_sol_pda(program_id);
    let user_ata = find_associated_token_address(user, &share_mint);

    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(vault, false),
            AccountMeta::new(share_mint, false),
            AccountMeta::new(user_ata, false),
            AccountMeta::new(user_account, false),
            AccountMeta::new(request, false),
            AccountMeta::new(vault_sol, false),
            AccountMeta::new(*user, true),
            AccountMeta::new_readonly(TOKEN_PROGRAM_ID, false),
            AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
        ],
        data: instructions::COMPLETE_WITHDRAW.to_vec(),
    }
}
