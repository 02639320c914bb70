//! jSOL Vault Interface
//!
//! Client-side view of the jSOL index vault: account layouts, share math,
//! allocation drift and the keeper's rebalance decision.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     jsol-vault (on-chain)                     │
//! │  • Holds SOL, mints jSOLi shares                              │
//! │  • Allocates across LST protocols                             │
//! │  • Enforces rebalance cooldown + threshold                    │
//! └──────────────────────────────────────────────────────────────┘
//!               ▲ account bytes              │ instructions
//!               │                            ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                 jsol-vault-interface (this crate)             │
//! │  codec → math / allocation → decision → instructions          │
//! └──────────────────────────────────────────────────────────────┘
//!               ▲                            │
//!               │                            ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                   jsol-keeper (I/O, scheduling)               │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything here is pure: functions take bytes, state and a timestamp and
//! return values. Network access, signing and scheduling live in the keeper.
//!
//! # Share Accounting
//!
//! ```text
//! shares = assets × total_shares / total_value_locked   (floor)
//! assets = shares × total_value_locked / total_shares   (floor)
//! ```
//!
//! Rounding always favors the vault. With no shares outstanding the rate is
//! exactly 1.
//!
//! # Modules
//!
//! - [`codec`]: Decode/encode of the vault's accounts
//! - [`math`]: Share/asset conversion and deposit/withdraw previews
//! - [`allocation`]: Per-protocol deviation and rebalance targets
//! - [`decision`]: Rebalance gate evaluation
//! - [`pda`]: Program-derived addresses
//! - [`instructions`]: Instruction builders
//! - [`discriminator`]: Account and instruction discriminators

pub mod allocation;
pub mod codec;
pub mod constants;
pub mod decision;
pub mod discriminator;
mod error;
pub mod instructions;
mod layout;
pub mod math;
pub mod pda;
mod program_ids;
mod state;

pub use allocation::{PlannedMove, deviation, max_deviation, rebalance_plan};
pub use codec::{
    AccountRecord, decode_user_account, decode_vault_state, decode_withdrawal_request,
    encode_user_account, encode_vault_state, encode_withdrawal_request,
};
pub use decision::{Decision, Gate, decide};
pub use error::*;
pub use math::ExchangeRate;
pub use pda::*;
pub use program_ids::*;
pub use state::*;
