//! Discriminators for account and instruction identification.
//!
//! The vault program is built with Anchor, so every account starts with
//! `sha256("account:<Name>")[..8]` and every instruction's data starts with
//! `sha256("global:<snake_name>")[..8]`. The values are pinned here because
//! they are part of the wire contract; tests recompute them.

/// Discriminator length in bytes
pub const DISCRIMINATOR_LEN: usize = 8;

/// Account discriminators, `sha256("account:<Name>")[..8]`.
pub mod accounts {
    use super::DISCRIMINATOR_LEN;

    /// `account:VaultState`
    pub const VAULT_STATE: [u8; DISCRIMINATOR_LEN] = [228, 196, 82, 165, 98, 210, 235, 152];
    /// `account:UserAccount`
    pub const USER_ACCOUNT: [u8; DISCRIMINATOR_LEN] = [211, 33, 136, 16, 186, 110, 242, 127];
    /// `account:WithdrawRequest`
    pub const WITHDRAW_REQUEST: [u8; DISCRIMINATOR_LEN] = [186, 239, 174, 191, 189, 13, 47, 196];
}

/// Instruction discriminators, `sha256("global:<name>")[..8]`.
pub mod instructions {
    use super::DISCRIMINATOR_LEN;

    /// `global:rebalance`
    pub const REBALANCE: [u8; DISCRIMINATOR_LEN] = [108, 158, 77, 9, 210, 52, 88, 62];
    /// `global:deposit`
    pub const DEPOSIT: [u8; DISCRIMINATOR_LEN] = [242, 35, 198, 137, 82, 225, 242, 182];
    /// `global:request_withdraw`
    pub const REQUEST_WITHDRAW: [u8; DISCRIMINATOR_LEN] = [137, 95, 187, 96, 250, 138, 31, 182];
    /// `global:complete_withdraw`
    pub const COMPLETE_WITHDRAW: [u8; DISCRIMINATOR_LEN] = [172, 129, 141, 17, 95, 253, 251, 98];
}

#[cfg(test)]
mod tests {
    use sha2::{Digest, Sha256};
    use test_case::test_case;

    use super::*;

    fn anchor_discriminator(preimage: &str) -> [u8; DISCRIMINATOR_LEN] {
        let hash = Sha256::digest(preimage.as_bytes());
        let mut out = [0u8; DISCRIMINATOR_LEN];
        out.copy_from_slice(&hash[..DISCRIMINATOR_LEN]);
        out
    }

    #[test_case("account:VaultState", accounts::VAULT_STATE ; "vault state")]
    #[test_case("account:UserAccount", accounts::USER_ACCOUNT ; "user account")]
    #[test_case("account:WithdrawRequest", accounts::WITHDRAW_REQUEST ; "withdraw request")]
    #[test_case("global:rebalance", instructions::REBALANCE ; "rebalance")]
    #[test_case("global:deposit", instructions::DEPOSIT ; "deposit")]
    #[test_case("global:request_withdraw", instructions::REQUEST_WITHDRAW ; "request withdraw")]
    #[test_case("global:complete_withdraw", instructions::COMPLETE_WITHDRAW ; "complete withdraw")]
    fn test_discriminator_matches_preimage(preimage: &str, expected: [u8; DISCRIMINATOR_LEN]) {
        assert_eq!(anchor_discriminator(preimage), expected);
    }
}
