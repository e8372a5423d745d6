//! Figures shown on the account screens.
//!
//! Demo mode renders a fixed sample account. Live mode derives everything
//! from the last balance fetch and never falls back to sample numbers.

use alloy_primitives::Address;
use banking::model::account::BalanceState;
use banking::model::session::SessionMode;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::session::SessionState;

pub const DEMO_CURRENT_BALANCE: f64 = 25_847.32;
pub const DEMO_SAVINGS_BALANCE: f64 = 18_650.00;
pub const DEMO_CREDIT_LIMIT: f64 = 10_000.0;
pub const DEMO_CREDIT_USED: f64 = 2_450.0;
pub const DEMO_TOTAL_DEPOSITS: f64 = 44_497.32;

/// Share of the yield-bearing balance extended as credit in live mode.
pub const LIVE_CREDIT_RATIO: f64 = 0.5;

/// A single displayed amount.
#[derive(Debug, Clone, PartialEq)]
pub enum Figure {
    Value(f64),
    Loading,
    Unavailable(String),
}

impl Figure {
    pub fn value(&self) -> Option<f64> {
        match self {
            Figure::Value(v) => Some(*v),
            _ => None,
        }
    }

    fn map(&self, f: impl FnOnce(f64) -> f64) -> Figure {
        match self {
            Figure::Value(v) => Figure::Value(f(*v)),
            other => other.clone(),
        }
    }
}

impl fmt::Display for Figure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Figure::Value(v) => write!(f, "${:.2}", v),
            Figure::Loading => write!(f, "loading..."),
            Figure::Unavailable(reason) => write!(f, "unavailable ({})", reason),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Purchase,
    Deposit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardTransaction {
    pub merchant: String,
    /// Negative for spending.
    pub amount: f64,
    pub date: String,
    pub kind: TransactionKind,
}

impl CardTransaction {
    fn new(merchant: &str, amount: f64, date: &str, kind: TransactionKind) -> Self {
        Self {
            merchant: merchant.to_string(),
            amount,
            date: date.to_string(),
            kind,
        }
    }
}

pub fn demo_transactions() -> Vec<CardTransaction> {
    use TransactionKind::*;
    vec![
        CardTransaction::new("Amazon", -89.99, "2025-06-18", Purchase),
        CardTransaction::new("Starbucks", -12.50, "2025-06-17", Purchase),
        CardTransaction::new("Deposit", 1000.0, "2025-06-16", Deposit),
        CardTransaction::new("Uber", -25.75, "2025-06-15", Purchase),
        CardTransaction::new("Deposit", 500.0, "2025-06-14", Deposit),
    ]
}

#[derive(Debug, Clone, PartialEq)]
pub struct AccountOverview {
    pub mode: SessionMode,
    pub current_balance: Figure,
    pub savings_balance: Figure,
    pub credit_limit: Figure,
    pub credit_used: Figure,
    pub available_credit: Figure,
    pub total_deposits: Figure,
    pub transactions: Vec<CardTransaction>,
}

impl AccountOverview {
    pub fn build(session: &SessionState, balances: &BalanceState) -> Self {
        match session.mode() {
            SessionMode::Demo => Self::demo(),
            SessionMode::Live => Self::live(balances),
        }
    }

    fn demo() -> Self {
        Self {
            mode: SessionMode::Demo,
            current_balance: Figure::Value(DEMO_CURRENT_BALANCE),
            savings_balance: Figure::Value(DEMO_SAVINGS_BALANCE),
            credit_limit: Figure::Value(DEMO_CREDIT_LIMIT),
            credit_used: Figure::Value(DEMO_CREDIT_USED),
            available_credit: Figure::Value(DEMO_CREDIT_LIMIT - DEMO_CREDIT_USED),
            total_deposits: Figure::Value(DEMO_TOTAL_DEPOSITS),
            transactions: demo_transactions(),
        }
    }

    fn live(balances: &BalanceState) -> Self {
        let (stable, yield_bearing) = match balances {
            BalanceState::Ready(b) => (Figure::Value(b.stable), Figure::Value(b.yield_bearing)),
            BalanceState::Loading => (Figure::Loading, Figure::Loading),
            BalanceState::Idle => {
                let reason = "balances not fetched".to_string();
                (Figure::Unavailable(reason.clone()), Figure::Unavailable(reason))
            }
            BalanceState::Failed(msg) => {
                (Figure::Unavailable(msg.clone()), Figure::Unavailable(msg.clone()))
            }
        };

        let credit_limit = yield_bearing.map(|y| y * LIVE_CREDIT_RATIO);
        let credit_used = credit_limit.map(|_| 0.0);
        let total_deposits = match balances.balances() {
            Some(b) => Figure::Value(b.total()),
            None => stable.clone(),
        };

        Self {
            mode: SessionMode::Live,
            current_balance: stable,
            savings_balance: yield_bearing,
            available_credit: credit_limit.clone(),
            credit_limit,
            credit_used,
            total_deposits,
            transactions: Vec::new(),
        }
    }
}

/// `0x1234...abcd` form of an address.
pub fn shorten_address(address: &Address) -> String {
    let full = address.to_string();
    format!("{}...{}", &full[..6], &full[full.len() - 4..])
}
