use alloy_primitives::{TxHash, U256};
use thiserror::Error;

/// User-facing error kinds raised by the banking operations.
///
/// Every kind is caught at the boundary of the operation that raised it and
/// rendered as a message; none of them are retried automatically.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BankingError {
    /// Missing or malformed user input (asset, amount, strategy id).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The requested amount exceeds the caller's token balance (raw units).
    #[error("Insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance { requested: U256, available: U256 },

    /// The connected chain is not the configured one.
    #[error("Not connected to the expected network (chainId {expected}, got {actual})")]
    NetworkMismatch { expected: u64, actual: u64 },

    /// No connected wallet address yet.
    #[error("Wallet not ready: connect a wallet first")]
    WalletNotReady,

    /// A read call reverted or the node was unreachable.
    #[error("Failed to fetch balances: {0}")]
    ReadFailure(String),

    /// The approval transaction could not be submitted or mined.
    #[error("Approval failed: {0}")]
    ApprovalFailed(String),

    /// The supply transaction could not be submitted or mined.
    #[error("Supply failed: {0}")]
    SupplyFailed(String),

    /// No active strategy carries a positive weight.
    #[error("No active allocation: select at least one strategy with a positive weight")]
    NoActiveAllocation,

    /// The active weights do not add up to exactly 100.
    #[error("Allocations total {0}%, adjust them to total 100%")]
    AllocationIncomplete(u32),

    /// A deposit is already running for this caller.
    #[error("A deposit is already in progress")]
    DepositInProgress,

    /// The session flag could not be persisted or loaded.
    #[error("Storage error: {0}")]
    Storage(String),
}

/// A specialized Result type for banking operations.
pub type Result<T> = std::result::Result<T, BankingError>;

/// Errors reported by chain adapters.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChainError {
    /// Transport or JSON-RPC failure.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// The contract call reverted.
    #[error("Call reverted: {0}")]
    Reverted(String),

    /// The transaction was mined with a failed status.
    #[error("Transaction {0} reverted")]
    TxReverted(TxHash),

    /// No receipt within the allotted time.
    #[error("Timed out waiting for transaction {0}")]
    Timeout(TxHash),

    /// The wallet refused the request (user rejection, no signer, ...).
    #[error("Wallet rejected request: {0}")]
    Rejected(String),

    /// The wallet does not know the requested chain (EIP-3085 code 4902).
    #[error("Unrecognized chain {0}")]
    UnrecognizedChain(u64),
}
