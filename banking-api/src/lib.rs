//! # Banking API
//!
//! Shared vocabulary for the Synnax banking client.
//!
//! ## Modules
//! - `model`: Strategies, portfolios, balances, session mode, traders and deposit states.
//! - `traits`: Capabilities the core consumes (chain reads/writes, wallet, confirmation, mode storage).
//! - `error`: The user-facing error kinds and the chain adapter error.

pub mod error;
pub mod model;
pub mod traits;

pub use error::{BankingError, ChainError, Result};
pub use model::account::{BalanceState, LiveBalances};
pub use model::chain::{GasSettings, NativeCurrency, NetworkParams, SupplyCall, TxReceipt};
pub use model::deposit::{DepositReceipt, DepositState};
pub use model::portfolio::{Portfolio, PortfolioEntry};
pub use model::session::SessionMode;
pub use model::strategy::{BankingType, RiskTier, Strategy, StrategyId};
pub use model::trader::{MonthlyPnl, Trader};
pub use traits::chain::{ChainReader, ChainWriter};
pub use traits::confirm::Confirmer;
pub use traits::mode_store::ModeStore;
pub use traits::wallet::Wallet;

pub use alloy_primitives::{Address, TxHash, U256};

