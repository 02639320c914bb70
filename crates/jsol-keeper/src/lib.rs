//! jSOL Keeper
//!
//! Off-chain rebalance keeper for the jSOL vault, plus the read-only operator
//! views behind the `jsol-keeper` binary.
//!
//! # Tick
//!
//! ```text
//! ┌──────────┐  bytes   ┌────────────────────┐ Decision ┌──────────────┐
//! │  Chain   │ ───────▶ │ jsol-vault-        │ ───────▶ │   Keeper     │
//! │  Reader  │          │ interface (pure)   │          │  (this crate)│
//! └──────────┘          └────────────────────┘          └──────┬───────┘
//!                                                              │ rebalance
//!                                                              ▼
//!                                                       ┌──────────────┐
//!                                                       │ ChainWriter  │
//!                                                       └──────────────┘
//! ```
//!
//! The on-chain program re-checks both the cooldown and the threshold, so a
//! stale read can at worst produce a rejected transaction, which the next
//! tick absorbs.
//!
//! # Modules
//!
//! - [`chain`]: Reader/writer/clock traits and chain errors
//! - [`rpc`]: JSON-RPC implementation of the chain traits
//! - [`keeper`]: The tick and the periodic loop
//! - [`outcome`]: Tick outcomes and their error classes
//! - [`report`]: Vault and position reports
//! - [`config`]: Command-line arguments and keypair loading

pub mod chain;
pub mod config;
pub mod keeper;
pub mod outcome;
pub mod report;
pub mod rpc;

pub use chain::{
    ChainError, ChainReader, ChainWriter, Clock, RejectionReason, SystemClock, TransactionStatus,
};
pub use keeper::{Keeper, KeeperConfig};
pub use outcome::{NetworkFailure, SkipReason, TickError, TickOutcome};
pub use report::{
    PositionReport, ReportError, VaultReport, fetch_position, fetch_vault_report, vault_report,
};
pub use rpc::RpcChain;
