use banking::model::session::SessionMode;
use banking::model::strategy::{BankingType, RiskTier};
use banking_core::args::CommonArgs;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "synnax")]
#[command(about = "Synnax banking client: accounts, Aave deposits, strategy portfolios and copy trading")]
pub struct Cli {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Use the offline paper chain instead of the configured RPC endpoint
    #[arg(long, global = true)]
    pub paper: bool,

    /// Print machine-readable JSON where supported
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the session mode, or switch it
    Mode {
        /// Target mode (demo or live)
        target: Option<SessionMode>,
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Show the account overview for the current mode
    Account,
    /// Read the stable and yield-bearing balances from the chain (live mode only)
    Balances,
    /// Supply an asset to the lending pool
    Deposit {
        /// Amount in token units, e.g. 25.5
        #[arg(short, long)]
        amount: String,
        /// Token to deposit (defaults to the configured stable asset)
        #[arg(long)]
        asset: Option<String>,
    },
    /// Build a strategy portfolio for a deposit
    Invest {
        /// conventional or islamic
        #[arg(short, long, default_value = "conventional")]
        banking: BankingType,
        /// low, medium or high (conservative, balanced, aggressive)
        #[arg(short, long, default_value = "medium")]
        risk: RiskTier,
        /// Total amount to allocate
        #[arg(short, long)]
        amount: String,
        /// Deselect a strategy by id (repeatable)
        #[arg(long = "toggle", value_name = "ID")]
        toggles: Vec<String>,
        /// Override a weight, as ID=WEIGHT (repeatable)
        #[arg(long = "weight", value_name = "ID=WEIGHT")]
        weights: Vec<String>,
        /// Apply one round of simulated market drift
        #[arg(long)]
        rebalance: bool,
    },
    /// List traders available for copying
    Traders,
    /// Open a copy-trading ticket
    Copy {
        /// Trader id
        #[arg(short, long)]
        trader: u32,
        /// Amount to copy with
        #[arg(short, long)]
        amount: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_invest() {
        let cli = Cli::parse_from([
            "synnax",
            "--paper",
            "invest",
            "--banking",
            "islamic",
            "--risk",
            "aggressive",
            "--amount",
            "1000",
            "--weight",
            "salam=30",
            "--toggle",
            "musharaka",
        ]);
        assert!(cli.paper);
        match cli.command {
            Commands::Invest {
                banking,
                risk,
                weights,
                toggles,
                ..
            } => {
                assert_eq!(banking, BankingType::Islamic);
                assert_eq!(risk, RiskTier::High);
                assert_eq!(weights, vec!["salam=30".to_string()]);
                assert_eq!(toggles, vec!["musharaka".to_string()]);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_mode() {
        let cli = Cli::parse_from(["synnax", "mode", "live", "--yes", "--data-dir", "/tmp/s"]);
        assert_eq!(cli.common.get_data_dir(), std::path::PathBuf::from("/tmp/s"));
        assert!(matches!(
            cli.command,
            Commands::Mode {
                target: Some(SessionMode::Live),
                yes: true
            }
        ));
    }
}
