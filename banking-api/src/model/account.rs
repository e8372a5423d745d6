use serde::{Deserialize, Serialize};

/// Display values of the two on-chain balances.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LiveBalances {
    /// Stable asset (USDC) held in the wallet.
    pub stable: f64,
    /// Yield-bearing receipt token (aUSDC) held in the wallet.
    pub yield_bearing: f64,
}

impl LiveBalances {
    pub fn new(stable: f64, yield_bearing: f64) -> Self {
        Self {
            stable,
            yield_bearing,
        }
    }

    pub fn total(&self) -> f64 {
        self.stable + self.yield_bearing
    }
}

/// Outcome of the last balance fetch.
///
/// There is no "stale" variant: a failed fetch drops whatever was shown before.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum BalanceState {
    /// Nothing fetched yet.
    #[default]
    Idle,
    /// A fetch is outstanding.
    Loading,
    Ready(LiveBalances),
    Failed(String),
}

impl BalanceState {
    pub fn balances(&self) -> Option<&LiveBalances> {
        match self {
            BalanceState::Ready(b) => Some(b),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            BalanceState::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}
