use crate::model::strategy::Strategy;
use serde::{Deserialize, Serialize};

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// A strategy snapshot with the money assigned to it.
///
/// `amount` and `normalized_allocation` are kept unrounded; use the
/// `display_*` accessors for the 2 dp / 1 dp figures shown to users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioEntry {
    strategy: Strategy,
    amount: f64,
    normalized_allocation: f64,
}

impl PortfolioEntry {
    pub fn new(strategy: Strategy, amount: f64, normalized_allocation: f64) -> Self {
        Self {
            strategy,
            amount,
            normalized_allocation,
        }
    }

    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn set_amount(&mut self, amount: f64) {
        self.amount = amount;
    }

    pub fn normalized_allocation(&self) -> f64 {
        self.normalized_allocation
    }

    /// Amount rounded to cents.
    pub fn display_amount(&self) -> f64 {
        round_to(self.amount, 2)
    }

    /// Allocation rounded to one decimal place.
    pub fn display_allocation(&self) -> f64 {
        round_to(self.normalized_allocation, 1)
    }
}

/// The result of one "generate portfolio" action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    entries: Vec<PortfolioEntry>,
    deposit_total: f64,
}

impl Portfolio {
    pub fn new(entries: Vec<PortfolioEntry>, deposit_total: f64) -> Self {
        Self {
            entries,
            deposit_total,
        }
    }

    pub fn entries(&self) -> &[PortfolioEntry] {
        &self.entries
    }

    pub fn entries_mut(&mut self) -> &mut [PortfolioEntry] {
        &mut self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Deposit figure the portfolio was generated from.
    pub fn deposit_total(&self) -> f64 {
        self.deposit_total
    }

    /// Current value of all entries (drifts away from the deposit after a rebalance).
    pub fn total_value(&self) -> f64 {
        self.entries.iter().map(|e| e.amount).sum()
    }

    /// APY weighted by each entry's current amount. Entries whose APY cannot be
    /// parsed contribute nothing.
    pub fn weighted_apy(&self) -> f64 {
        let total = self.total_value();
        if total <= 0.0 {
            return 0.0;
        }
        self.entries
            .iter()
            .filter_map(|e| e.strategy.apy_percent().map(|apy| apy * e.amount / total))
            .sum()
    }

    /// Expected yield over one year at the weighted APY.
    pub fn projected_annual_yield(&self) -> f64 {
        self.total_value() * self.weighted_apy() / 100.0
    }
}
