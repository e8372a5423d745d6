//! Copy-trading catalog and tickets.

use banking::model::session::SessionMode;
use banking::model::trader::{MonthlyPnl, Trader};
use banking::BankingError;
use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

struct TraderSeed {
    id: u32,
    name: &'static str,
    username: &'static str,
    monthly_pnl: f64,
    total_pnl: f64,
    sharpe_ratio: f64,
    win_rate: u8,
    total_trades: u32,
    followers: u64,
    copy_range: (f64, f64),
    strategy: &'static str,
    risk_level: &'static str,
    is_verified: bool,
    is_active: bool,
    performance: [f64; 6],
    link: Option<&'static str>,
}

const MONTHS: [&str; 6] = ["Jan", "Feb", "Mar", "Apr", "May", "Jun"];

impl TraderSeed {
    fn build(&self) -> Trader {
        Trader {
            id: self.id,
            name: self.name.to_string(),
            username: self.username.to_string(),
            monthly_pnl: self.monthly_pnl,
            total_pnl: self.total_pnl,
            sharpe_ratio: self.sharpe_ratio,
            win_rate: self.win_rate,
            total_trades: self.total_trades,
            followers: self.followers,
            min_copy_amount: self.copy_range.0,
            max_copy_amount: self.copy_range.1,
            strategy: self.strategy.to_string(),
            risk_level: self.risk_level.to_string(),
            is_verified: self.is_verified,
            is_active: self.is_active,
            performance: MONTHS
                .iter()
                .zip(self.performance)
                .map(|(month, pnl)| MonthlyPnl {
                    month: month.to_string(),
                    pnl,
                })
                .collect(),
            link: self.link.map(str::to_string),
        }
    }
}

const DEMO_TRADERS: [TraderSeed; 4] = [
    TraderSeed {
        id: 1,
        name: "Alex Chen",
        username: "@alex_crypto",
        monthly_pnl: 2847.50,
        total_pnl: 15680.25,
        sharpe_ratio: 2.8,
        win_rate: 78,
        total_trades: 156,
        followers: 1247,
        copy_range: (100.0, 10_000.0),
        strategy: "Momentum Trading",
        risk_level: "Medium",
        is_verified: true,
        is_active: true,
        performance: [1200.0, -450.0, 2100.0, 1800.0, 3200.0, 2847.0],
        link: None,
    },
    TraderSeed {
        id: 2,
        name: "Sarah Williams",
        username: "@sarah_defi",
        monthly_pnl: 1890.75,
        total_pnl: 8920.50,
        sharpe_ratio: 3.2,
        win_rate: 85,
        total_trades: 89,
        followers: 892,
        copy_range: (250.0, 5_000.0),
        strategy: "DeFi Yield Farming",
        risk_level: "Low",
        is_verified: true,
        is_active: true,
        performance: [800.0, 1200.0, 950.0, 1400.0, 1600.0, 1890.0],
        link: None,
    },
    TraderSeed {
        id: 3,
        name: "Mike Rodriguez",
        username: "@mike_scalper",
        monthly_pnl: 4250.00,
        total_pnl: 22450.75,
        sharpe_ratio: 1.9,
        win_rate: 65,
        total_trades: 342,
        followers: 2156,
        copy_range: (500.0, 15_000.0),
        strategy: "High-Frequency Scalping",
        risk_level: "High",
        is_verified: true,
        is_active: true,
        performance: [2800.0, -1200.0, 4500.0, 3200.0, 5800.0, 4250.0],
        link: None,
    },
    TraderSeed {
        id: 4,
        name: "Emma Thompson",
        username: "@emma_arbitrage",
        monthly_pnl: 1650.25,
        total_pnl: 9870.00,
        sharpe_ratio: 4.1,
        win_rate: 92,
        total_trades: 67,
        followers: 567,
        copy_range: (100.0, 3_000.0),
        strategy: "Arbitrage & MEV",
        risk_level: "Low",
        is_verified: true,
        is_active: false,
        performance: [1200.0, 1400.0, 1100.0, 1600.0, 1800.0, 1650.0],
        link: None,
    },
];

const LIVE_TRADER: TraderSeed = TraderSeed {
    id: 99,
    name: "James Wynn",
    username: "@jameswynnreal",
    monthly_pnl: -100_000_000.0,
    total_pnl: 0.0,
    sharpe_ratio: -3.14,
    win_rate: 50,
    total_trades: 0,
    followers: 500_000,
    copy_range: (1.0, 10_000_000_000.0),
    strategy: "Speculative Trading",
    risk_level: "Very High",
    is_verified: false,
    is_active: true,
    performance: [0.0; 6],
    link: Some("https://x.com/jameswynnreal?lang=en"),
};

/// Traders offered in the given mode.
pub fn traders_for(mode: SessionMode) -> Vec<Trader> {
    match mode {
        SessionMode::Demo => DEMO_TRADERS.iter().map(TraderSeed::build).collect(),
        SessionMode::Live => vec![LIVE_TRADER.build()],
    }
}

pub fn find_trader(mode: SessionMode, id: u32) -> Option<Trader> {
    traders_for(mode).into_iter().find(|t| t.id == id)
}

/// Monthly PnL is quoted per 10 000 copied.
pub fn expected_monthly_return(amount: f64, monthly_pnl: f64) -> f64 {
    amount * monthly_pnl / 10_000.0
}

/// A request to mirror a trader's positions with a fixed amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CopyTradeTicket {
    pub id: Uuid,
    pub trader_id: u32,
    pub trader_name: String,
    pub amount: f64,
    pub expected_monthly_return: f64,
    pub opened_at: DateTime<Utc>,
}

impl CopyTradeTicket {
    pub fn open(trader: &Trader, raw_amount: &str) -> Result<Self, BankingError> {
        if !trader.is_active {
            return Err(BankingError::InvalidInput(format!(
                "{} is not accepting copiers",
                trader.name
            )));
        }

        let amount: f64 = raw_amount
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|a| a.is_finite())
            .ok_or_else(|| {
                BankingError::InvalidInput(format!("'{}' is not a valid amount", raw_amount.trim()))
            })?;
        if !trader.accepts(amount) {
            return Err(BankingError::InvalidInput(format!(
                "amount must be between {:.2} and {:.2}",
                trader.min_copy_amount, trader.max_copy_amount
            )));
        }

        let ticket = Self {
            id: Uuid::new_v4(),
            trader_id: trader.id,
            trader_name: trader.name.clone(),
            amount,
            expected_monthly_return: expected_monthly_return(amount, trader.monthly_pnl),
            opened_at: Utc::now(),
        };
        info!(
            "Copy ticket {} opened: {:.2} on {} ({})",
            ticket.id, amount, trader.name, trader.username
        );
        Ok(ticket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_per_mode() {
        let demo = traders_for(SessionMode::Demo);
        assert_eq!(demo.len(), 4);
        assert_eq!(demo[0].initials(), "AC");
        assert_eq!(demo[2].performance[1].pnl, -1200.0);

        let live = traders_for(SessionMode::Live);
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].id, 99);
        assert!(live[0].link.is_some());
    }

    #[test]
    fn test_open_ticket() {
        let alex = find_trader(SessionMode::Demo, 1).unwrap();
        let ticket = CopyTradeTicket::open(&alex, "1000").unwrap();
        assert_eq!(ticket.trader_id, 1);
        assert!((ticket.expected_monthly_return - 284.75).abs() < 1e-9);
    }

    #[test]
    fn test_open_ticket_rejections() {
        let sarah = find_trader(SessionMode::Demo, 2).unwrap();
        for raw in ["", "abc", "100", "5000.01", "inf"] {
            assert!(
                matches!(CopyTradeTicket::open(&sarah, raw), Err(BankingError::InvalidInput(_))),
                "{:?} should be rejected",
                raw
            );
        }
        assert!(CopyTradeTicket::open(&sarah, "250").is_ok());

        let emma = find_trader(SessionMode::Demo, 4).unwrap();
        assert!(CopyTradeTicket::open(&emma, "500").is_err());
    }
}
