use anyhow::{anyhow, bail, Context, Result};
use banking::model::session::SessionMode;
use banking::model::strategy::{BankingType, RiskTier, StrategyId};
use banking::traits::confirm::Confirmer;
use banking::traits::wallet::Wallet;
use banking::{Address, BalanceState, U256};
use banking_core::account::AccountOverview;
use banking_core::allocation::{rebalance, StrategySelection};
use banking_core::balance::{BalanceReader, BalanceReaderConfig, BalanceTracker};
use banking_core::catalog::{risk_profile, strategies_for};
use banking_core::config::BankingConfig;
use banking_core::copy_trading::{find_trader, traders_for, CopyTradeTicket};
use banking_core::deposit::{DepositWorkflow, DepositWorkflowConfig};
use banking_core::fs::PathManager;
use banking_core::session::{FileModeStore, ModeTransition, SessionState};
use chain_gateway::{BankingChain, EvmChain, PaperChain, PAPER_ACCOUNT};
use clap::Parser;
use log::info;
use std::sync::Arc;

mod args;
mod prompt;
mod render;

use args::{Cli, Commands};
use prompt::{AssumeYes, StdinConfirmer};

const PRIVATE_KEY_ENV: &str = "SYNNAX_PRIVATE_KEY";
const PAPER_LEDGER_FILE: &str = "paper_ledger.json";
/// 1 000 USDC in base units.
const PAPER_STARTING_BALANCE: u64 = 1_000_000_000;

type Chain = Arc<dyn BankingChain>;

struct App {
    cli: Cli,
    config: BankingConfig,
    paths: PathManager,
    store: FileModeStore,
    session: SessionState,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let paths = PathManager::from_args(&cli.common);
    paths
        .ensure_dirs()
        .context("Failed to create config/data directories")?;
    let config = BankingConfig::load(&paths.config_file())?;
    let store = FileModeStore::new(paths.session_file());
    let session = SessionState::load(&store);
    info!(
        "Synnax starting in {} mode on chain {}",
        session.mode(),
        config.network.chain_id
    );

    let mut app = App {
        cli,
        config,
        paths,
        store,
        session,
    };
    if let Err(e) = app.run().await {
        eprintln!("ERROR: {:#}", e);
        std::process::exit(1);
    }
    Ok(())
}

impl App {
    async fn run(&mut self) -> Result<()> {
        if let Commands::Mode { target, yes } = self.cli.command {
            return self.mode(target, yes);
        }

        match &self.cli.command {
            Commands::Mode { .. } => Ok(()),
            Commands::Account => self.account().await,
            Commands::Balances => self.balances().await,
            Commands::Deposit { amount, asset } => self.deposit(amount, asset.as_deref()).await,
            Commands::Invest {
                banking,
                risk,
                amount,
                toggles,
                weights,
                rebalance,
            } => self.invest(*banking, *risk, amount, toggles, weights, *rebalance),
            Commands::Traders => self.traders(),
            Commands::Copy { trader, amount } => self.copy(*trader, amount),
        }
    }

    fn mode(&mut self, target: Option<SessionMode>, yes: bool) -> Result<()> {
        let Some(target) = target else {
            println!("{}", self.session.mode());
            return Ok(());
        };

        let confirmer: &dyn Confirmer = if yes { &AssumeYes } else { &StdinConfirmer };
        match self.session.request_mode(target, confirmer, &self.store)? {
            ModeTransition::Unchanged => println!("Already in {} mode", target),
            ModeTransition::Declined => println!("Staying in {} mode", self.session.mode()),
            ModeTransition::Switched { from, to } => println!("Switched from {} to {} mode", from, to),
        }
        Ok(())
    }

    async fn account(&self) -> Result<()> {
        if !self.session.is_live() {
            let overview = AccountOverview::build(&self.session, &BalanceState::Idle);
            render::print_overview(&overview, None);
            return Ok(());
        }

        let chain = self.connect().await?;
        let owner = chain.address();
        let mut tracker = self.tracker(chain);
        let state = tracker.refresh(owner).await;
        let overview = AccountOverview::build(&self.session, state);
        render::print_overview(&overview, owner);
        Ok(())
    }

    async fn balances(&self) -> Result<()> {
        require_live(&self.session, "balances")?;
        let chain = self.connect().await?;
        let owner = chain.address().ok_or_else(|| anyhow!("Wallet not ready"))?;
        let balances = self
            .tracker(chain)
            .reader()
            .read_balances(Some(owner))
            .await?;
        render::print_balances(&balances, owner);
        Ok(())
    }

    async fn deposit(&self, amount: &str, asset: Option<&str>) -> Result<()> {
        let asset: Address = match asset {
            Some(raw) => raw
                .parse()
                .map_err(|e| anyhow!("Invalid asset address '{}': {}", raw, e))?,
            None => self.config.contracts.stable_asset,
        };

        let chain = self.connect().await?;
        let workflow = DepositWorkflow::new(chain.clone(), DepositWorkflowConfig::from(&self.config));
        let mut tracker = self.tracker(chain);

        let receipt = workflow.deposit(Some(asset), amount, &mut tracker).await?;
        render::print_receipt(&receipt, &self.config.network.explorer_url);
        if let Some(balances) = tracker.state().balances() {
            println!();
            render::print_balances(balances, receipt.depositor);
        }
        Ok(())
    }

    fn invest(
        &self,
        banking: BankingType,
        risk: RiskTier,
        amount: &str,
        toggles: &[String],
        weights: &[String],
        drift: bool,
    ) -> Result<()> {
        let profile = risk_profile(risk);
        let mut selection = StrategySelection::new(strategies_for(banking, risk, self.session.mode()));

        for id in toggles {
            selection.toggle(&StrategyId::new(id.as_str()))?;
        }
        for spec in weights {
            let (id, weight) = spec
                .split_once('=')
                .ok_or_else(|| anyhow!("Expected ID=WEIGHT, got '{}'", spec))?;
            selection.set_weight(&StrategyId::new(id.trim()), weight)?;
        }

        let mut portfolio = selection.generate_portfolio(amount)?;
        if drift {
            rebalance(&mut portfolio, &mut rand::thread_rng());
        }

        if self.cli.json {
            println!("{}", serde_json::to_string_pretty(&portfolio)?);
        } else {
            println!(
                "{} {} portfolio ({}, {})",
                profile.name, banking, profile.description, profile.expected_return
            );
            println!();
            render::print_portfolio(&portfolio);
        }
        Ok(())
    }

    fn traders(&self) -> Result<()> {
        let traders = traders_for(self.session.mode());
        if self.cli.json {
            println!("{}", serde_json::to_string_pretty(&traders)?);
        } else {
            render::print_traders(&traders);
        }
        Ok(())
    }

    fn copy(&self, trader_id: u32, amount: &str) -> Result<()> {
        let trader = find_trader(self.session.mode(), trader_id)
            .ok_or_else(|| anyhow!("No trader #{} in {} mode", trader_id, self.session.mode()))?;
        let ticket = CopyTradeTicket::open(&trader, amount)?;
        if self.cli.json {
            println!("{}", serde_json::to_string_pretty(&ticket)?);
        } else {
            render::print_ticket(&ticket);
        }
        Ok(())
    }

    /// Builds the chain adapter and logs the wallet in.
    async fn connect(&self) -> Result<Chain> {
        let chain: Chain = if self.cli.paper {
            let ledger = self.paths.data_dir().join(PAPER_LEDGER_FILE);
            let paper = PaperChain::new(self.config.network.chain_id, PAPER_ACCOUNT)
                .with_receipt_token(
                    self.config.contracts.stable_asset,
                    self.config.contracts.yield_bearing_asset,
                )
                .with_balance(
                    self.config.contracts.stable_asset,
                    PAPER_ACCOUNT,
                    U256::from(PAPER_STARTING_BALANCE),
                )
                .persist_to(&ledger)
                .with_context(|| format!("Failed to open paper ledger {}", ledger.display()))?;
            Arc::new(paper)
        } else {
            let key = std::env::var(PRIVATE_KEY_ENV).ok();
            if key.is_none() {
                info!("{} not set, connecting read-only", PRIVATE_KEY_ENV);
            }
            Arc::new(EvmChain::connect(&self.config.network.rpc_url, key.as_deref())?)
        };

        match chain.login().await {
            Ok(address) => info!("Wallet connected: {}", address),
            Err(e) if self.cli.paper => bail!("Paper wallet login failed: {}", e),
            Err(e) => info!("Wallet not connected: {}", e),
        }
        Ok(chain)
    }

    fn tracker(&self, chain: Chain) -> BalanceTracker<Chain> {
        BalanceTracker::new(BalanceReader::new(chain, BalanceReaderConfig::from(&self.config)))
    }
}

/// Chain figures are only shown in live mode; demo mode never touches the chain.
fn require_live(session: &SessionState, command: &str) -> Result<()> {
    if !session.is_live() {
        bail!(
            "'{}' reads on-chain balances and needs live mode (run `synnax mode live`)",
            command
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use banking_core::testing::MemoryModeStore;

    #[test]
    fn test_chain_reads_need_live_mode() {
        let demo = SessionState::load(&MemoryModeStore::new());
        let err = require_live(&demo, "balances").unwrap_err();
        assert!(err.to_string().contains("live mode"));

        let live = SessionState::load(&MemoryModeStore::with_mode(SessionMode::Live));
        assert!(require_live(&live, "balances").is_ok());
    }
}
