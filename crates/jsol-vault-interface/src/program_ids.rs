//! Program ID constants.
//!
//! The vault ID comes from the central `jsol-program-ids` crate and is chosen
//! at compile time by the network feature. The rest are fixed Solana programs
//! and accounts the vault's instructions reference.

use solana_pubkey::Pubkey;

// =============================================================================
// Program IDs
// =============================================================================

/// jSOL vault program ID for the selected network.
pub const VAULT_PROGRAM_ID: Pubkey =
    Pubkey::new_from_array(five8_const::decode_32_const(jsol_program_ids::JSOL_VAULT_ID));

/// System program.
pub const SYSTEM_PROGRAM_ID: Pubkey =
    Pubkey::new_from_array(five8_const::decode_32_const("11111111111111111111111111111111"));

/// SPL Token program.
pub const TOKEN_PROGRAM_ID: Pubkey = Pubkey::new_from_array(five8_const::decode_32_const(
    "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA",
));

/// SPL Associated Token Account program.
pub const ASSOCIATED_TOKEN_PROGRAM_ID: Pubkey = Pubkey::new_from_array(
    five8_const::decode_32_const("ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL"),
);

/// Rent sysvar.
pub const RENT_SYSVAR_ID: Pubkey = Pubkey::new_from_array(five8_const::decode_32_const(
    "SysvarRent111111111111111111111111111111111",
));

/// Pyth SOL/USD price account read by `deposit`.
pub const PYTH_SOL_USD_PRICE_ID: Pubkey = Pubkey::new_from_array(five8_const::decode_32_const(
    "H6ARHf6YXhGYeQfUzQNGk6rDNnLBQKrenN712K4AQJEG",
));

/// Network the vault ID was selected for.
pub const NETWORK: &str = jsol_program_ids::NETWORK;
