use banking::model::portfolio::Portfolio;
use log::info;
use rand::Rng;

/// Lower bound of the simulated market drift factor.
pub const DRIFT_MIN: f64 = 0.98;
/// Upper bound of the simulated market drift factor.
pub const DRIFT_MAX: f64 = 1.02;

/// Simulates market drift: every amount is scaled by its own factor drawn
/// uniformly from `[DRIFT_MIN, DRIFT_MAX]`.
pub fn rebalance<R: Rng + ?Sized>(portfolio: &mut Portfolio, rng: &mut R) {
    for entry in portfolio.entries_mut() {
        let factor = rng.gen_range(DRIFT_MIN..=DRIFT_MAX);
        entry.set_amount(entry.amount() * factor);
    }
    info!(
        "Rebalanced portfolio, value now {:.2}",
        portfolio.total_value()
    );
}
