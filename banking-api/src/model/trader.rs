use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPnl {
    pub month: String,
    pub pnl: f64,
}

/// A trader that can be copied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trader {
    pub id: u32,
    pub name: String,
    pub username: String,
    pub monthly_pnl: f64,
    pub total_pnl: f64,
    pub sharpe_ratio: f64,
    /// Percentage of winning trades, 0 to 100.
    pub win_rate: u8,
    pub total_trades: u32,
    pub followers: u64,
    pub min_copy_amount: f64,
    pub max_copy_amount: f64,
    pub strategy: String,
    pub risk_level: String,
    pub is_verified: bool,
    pub is_active: bool,
    #[serde(default)]
    pub performance: Vec<MonthlyPnl>,
    #[serde(default)]
    pub link: Option<String>,
}

impl Trader {
    /// Two-letter avatar derived from the name ("Alex Chen" -> "AC").
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|w| w.chars().next())
            .take(2)
            .collect::<String>()
            .to_uppercase()
    }

    pub fn accepts(&self, amount: f64) -> bool {
        amount >= self.min_copy_amount && amount <= self.max_copy_amount
    }
}
