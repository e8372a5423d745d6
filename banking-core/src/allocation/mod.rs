//! Strategy selection editing, the 100% gate, and proportional normalization.
//!
//! The gate (`ensure_fully_allocated`) and the normalizer (`normalize`) are
//! independent: the normalizer rescales any positive weight set, the gate is
//! the confirmation step the investor must pass before a portfolio is built.

use banking::model::portfolio::{Portfolio, PortfolioEntry};
use banking::model::strategy::{Strategy, StrategyId};
use banking::BankingError;
use log::{debug, info};

pub mod rebalance;

pub use rebalance::rebalance;

/// Weight total the gate requires.
pub const FULL_ALLOCATION: u32 = 100;

/// Sum of the weights of the active strategies.
pub fn total_active_weight(strategies: &[Strategy]) -> u32 {
    strategies
        .iter()
        .filter(|s| s.is_active())
        .map(|s| s.weight() as u32)
        .sum()
}

/// Rejects a selection whose active weights do not sum to exactly 100.
pub fn ensure_fully_allocated(strategies: &[Strategy]) -> Result<(), BankingError> {
    let total = total_active_weight(strategies);
    if total != FULL_ALLOCATION {
        return Err(BankingError::AllocationIncomplete(total));
    }
    Ok(())
}

/// Splits `deposit_total` across the active strategies in proportion to their weights.
///
/// Amounts and allocations are left unrounded so the entries add up to the
/// deposit and to 100 exactly (up to float error).
pub fn normalize(strategies: &[Strategy], deposit_total: f64) -> Result<Portfolio, BankingError> {
    if !deposit_total.is_finite() || deposit_total <= 0.0 {
        return Err(BankingError::InvalidInput(format!(
            "deposit total must be a positive amount, got {}",
            deposit_total
        )));
    }

    let total_weight = total_active_weight(strategies);
    if total_weight == 0 {
        return Err(BankingError::NoActiveAllocation);
    }
    let total_weight = total_weight as f64;

    let entries: Vec<PortfolioEntry> = strategies
        .iter()
        .filter(|s| s.is_active())
        .map(|s| {
            let weight = s.weight() as f64;
            PortfolioEntry::new(
                s.clone(),
                deposit_total * weight / total_weight,
                100.0 * weight / total_weight,
            )
        })
        .collect();

    debug!(
        "Normalized {} strategies over total weight {}",
        entries.len(),
        total_weight
    );
    Ok(Portfolio::new(entries, deposit_total))
}

/// Parses the deposit typed by the investor.
pub fn parse_deposit(raw: &str) -> Result<f64, BankingError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(BankingError::InvalidInput("deposit amount is required".into()));
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
        _ => Err(BankingError::InvalidInput(format!(
            "'{}' is not a valid deposit amount",
            raw
        ))),
    }
}

/// The strategies currently offered to the investor, editable in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrategySelection {
    strategies: Vec<Strategy>,
}

impl StrategySelection {
    pub fn new(strategies: Vec<Strategy>) -> Self {
        Self { strategies }
    }

    pub fn strategies(&self) -> &[Strategy] {
        &self.strategies
    }

    pub fn active(&self) -> impl Iterator<Item = &Strategy> {
        self.strategies.iter().filter(|s| s.is_active())
    }

    /// Total weight across active strategies, as shown next to the editor.
    pub fn total_allocation(&self) -> u32 {
        total_active_weight(&self.strategies)
    }

    fn find_mut(&mut self, id: &StrategyId) -> Result<&mut Strategy, BankingError> {
        self.strategies
            .iter_mut()
            .find(|s| s.id() == id)
            .ok_or_else(|| BankingError::InvalidInput(format!("unknown strategy '{}'", id)))
    }

    /// Flips a strategy between active and inactive; returns the new flag.
    pub fn toggle(&mut self, id: &StrategyId) -> Result<bool, BankingError> {
        let strategy = self.find_mut(id)?;
        let active = !strategy.is_active();
        strategy.set_active(active);
        Ok(active)
    }

    /// Sets a weight from raw user text.
    ///
    /// Only the leading integer counts ("70.5" is 70, "abc" is 0). Negatives
    /// clamp to 0 and values above 100 clamp to 100. Inactive strategies
    /// cannot be edited.
    pub fn set_weight(&mut self, id: &StrategyId, raw: &str) -> Result<u8, BankingError> {
        let strategy = self.find_mut(id)?;
        if !strategy.is_active() {
            return Err(BankingError::InvalidInput(format!(
                "strategy '{}' is deselected",
                id
            )));
        }
        let parsed = leading_integer(raw).clamp(0, 100);
        strategy.set_weight(parsed as u32);
        Ok(strategy.weight())
    }

    /// Validates the raw deposit, applies the 100% gate, then normalizes.
    pub fn generate_portfolio(&self, raw_deposit: &str) -> Result<Portfolio, BankingError> {
        let deposit = parse_deposit(raw_deposit)?;
        ensure_fully_allocated(&self.strategies)?;
        let portfolio = normalize(&self.strategies, deposit)?;
        info!(
            "Generated portfolio of {} entries for deposit {:.2}",
            portfolio.len(),
            deposit
        );
        Ok(portfolio)
    }
}

/// Integer value of the optional sign and digits at the start of `raw`.
fn leading_integer(raw: &str) -> i64 {
    let raw = raw.trim_start();
    let (negative, rest) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..end];
    if digits.is_empty() {
        return 0;
    }
    let value = digits.parse::<i64>().unwrap_or(i64::MAX);
    if negative {
        -value
    } else {
        value
    }
}
