//! Chain adapters implementing the banking chain and wallet traits.
//!
//! - `evm`: JSON-RPC provider with a local signer, built on alloy.
//! - `paper`: in-memory ledger for running the client without a node.

pub mod evm;
pub mod paper;

pub use evm::EvmChain;
pub use paper::{PaperChain, PAPER_ACCOUNT};

use banking::traits::chain::{ChainReader, ChainWriter};
use banking::traits::wallet::Wallet;

/// Everything the client needs from a chain, as one object-safe bound.
pub trait BankingChain: ChainReader + ChainWriter + Wallet {}

impl<T: ChainReader + ChainWriter + Wallet + ?Sized> BankingChain for T {}
