//! Single source of truth for the jSOL vault program ID.
//!
//! The ID is a `&'static str` so it can be decoded at compile time by
//! `five8_const` in the interface crate and printed as-is by operator tooling.
//!
//! # Feature Flags
//!
//! - `devnet` - Use the devnet deployment
//! - `mainnet` - Use the mainnet deployment (default)
//! - `localnet` - Use localnet addresses (same as mainnet)

#![no_std]

// =============================================================================
// jSOL Vault Program ID
// =============================================================================

/// jSOL vault program ID (devnet).
///
/// The deployment the keeper scripts were run against.
#[cfg(feature = "devnet")]
pub const JSOL_VAULT_ID: &str = "FQARiEHe31wCxwJHYwQxjqGryvXCFx4h2hJvPeQ7QgB8";

/// jSOL vault program ID (mainnet/localnet).
#[cfg(not(feature = "devnet"))]
pub const JSOL_VAULT_ID: &str = "EYJcdmSJEEtkTLHhgDCvGci1GgEthDe4RFn1tV2PoZu3";

/// Name of the network the program ID was selected for.
#[cfg(feature = "devnet")]
pub const NETWORK: &str = "devnet";

/// Name of the network the program ID was selected for.
#[cfg(all(not(feature = "devnet"), feature = "localnet"))]
pub const NETWORK: &str = "localnet";

/// Name of the network the program ID was selected for.
#[cfg(all(not(feature = "devnet"), not(feature = "localnet")))]
pub const NETWORK: &str = "mainnet";
