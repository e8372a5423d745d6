//! # Banking Core Library
//!
//! The logic behind the Synnax banking client, independent of any front-end.
//!
//! ## Modules
//! - `balance`: Fail-closed reading of the stable and yield-bearing token balances.
//! - `deposit`: The approve-then-supply state machine against the lending pool.
//! - `allocation`: Strategy selection, the 100% gate, normalization and rebalance drift.
//! - `session`: The demo/live flag and its confirmation guard.
//! - `catalog`: Static strategies and risk profiles.
//! - `account`: Figures shown on the account screens, per session mode.
//! - `copy_trading`: Trader catalog and copy tickets.
//! - `config`: Layered configuration (defaults, file, environment).
//! - `args`: Command-line arguments shared by binaries.
//! - `fs`: Data directory layout and atomic JSON persistence.

pub mod account;
pub mod allocation;
pub mod args;
pub mod balance;
pub mod catalog;
pub mod config;
pub mod copy_trading;
pub mod deposit;
pub mod fs;
pub mod session;
pub mod units;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;
