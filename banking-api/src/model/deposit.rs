use crate::error::BankingError;
use crate::model::chain::TxReceipt;
use alloy_primitives::{Address, TxHash, U256};
use std::fmt;

/// Stages of a single deposit into the lending pool.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DepositState {
    #[default]
    Idle,
    Validating,
    AwaitingApproval,
    ApprovalPending(TxHash),
    Supplying,
    SupplyPending(TxHash),
    Confirmed,
    Error(BankingError),
}

impl fmt::Display for DepositState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DepositState::Idle => write!(f, "Idle"),
            DepositState::Validating => write!(f, "Validating"),
            DepositState::AwaitingApproval => write!(f, "AwaitingApproval"),
            DepositState::ApprovalPending(tx) => write!(f, "ApprovalPending({})", tx),
            DepositState::Supplying => write!(f, "Supplying"),
            DepositState::SupplyPending(tx) => write!(f, "SupplyPending({})", tx),
            DepositState::Confirmed => write!(f, "Confirmed"),
            DepositState::Error(e) => write!(f, "Error({})", e),
        }
    }
}

/// Summary of a confirmed deposit.
#[derive(Debug, Clone, PartialEq)]
pub struct DepositReceipt {
    pub asset: Address,
    pub depositor: Address,
    /// Amount in token base units.
    pub amount: U256,
    pub decimals: u8,
    pub approval: TxReceipt,
    pub supply: TxReceipt,
}
