//! Reads the stable and yield-bearing balances of the connected account.
//!
//! The reader never retries and the tracker fails closed: if either token
//! read fails, both displayed balances are cleared.

use alloy_primitives::Address;
use banking::model::account::{BalanceState, LiveBalances};
use banking::traits::chain::ChainReader;
use banking::BankingError;
use log::{info, warn};

use crate::config::BankingConfig;
use crate::units::format_units;

/// Token addresses and network expectations used by the reader.
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceReaderConfig {
    pub expected_chain_id: u64,
    pub stable_asset: Address,
    pub yield_bearing_asset: Address,
    pub decimals_fallback: u8,
}

impl From<&BankingConfig> for BalanceReaderConfig {
    fn from(config: &BankingConfig) -> Self {
        Self {
            expected_chain_id: config.network.chain_id,
            stable_asset: config.contracts.stable_asset,
            yield_bearing_asset: config.contracts.yield_bearing_asset,
            decimals_fallback: config.decimals_fallback,
        }
    }
}

pub struct BalanceReader<C> {
    chain: C,
    config: BalanceReaderConfig,
}

impl<C: ChainReader> BalanceReader<C> {
    pub fn new(chain: C, config: BalanceReaderConfig) -> Self {
        Self { chain, config }
    }

    pub fn config(&self) -> &BalanceReaderConfig {
        &self.config
    }

    /// Reads both balances for `owner`.
    ///
    /// The network id is checked before any token call so a wrong chain can
    /// never produce a plausible-looking zero balance.
    pub async fn read_balances(&self, owner: Option<Address>) -> Result<LiveBalances, BankingError> {
        let owner = owner.ok_or(BankingError::WalletNotReady)?;

        let chain_id = self
            .chain
            .chain_id()
            .await
            .map_err(|e| BankingError::ReadFailure(format!("network id: {}", e)))?;
        if chain_id != self.config.expected_chain_id {
            return Err(BankingError::NetworkMismatch {
                expected: self.config.expected_chain_id,
                actual: chain_id,
            });
        }

        let stable = self
            .read_token(self.config.stable_asset, owner, "stable asset")
            .await?;
        let yield_bearing = self
            .read_token(self.config.yield_bearing_asset, owner, "yield-bearing asset")
            .await?;

        Ok(LiveBalances::new(stable, yield_bearing))
    }

    async fn read_token(&self, token: Address, owner: Address, label: &str) -> Result<f64, BankingError> {
        let decimals = match self.chain.decimals(token).await {
            Ok(d) => d,
            Err(e) => {
                warn!(
                    "{} decimals() failed ({}), falling back to {}",
                    label, e, self.config.decimals_fallback
                );
                self.config.decimals_fallback
            }
        };

        let raw = self
            .chain
            .balance_of(token, owner)
            .await
            .map_err(|e| BankingError::ReadFailure(format!("{} balanceOf: {}", label, e)))?;

        format_units(raw, decimals)
            .map_err(|e| BankingError::ReadFailure(format!("{} balance: {}", label, e)))
    }
}

/// Holds the last balance fetch outcome for display.
pub struct BalanceTracker<C> {
    reader: BalanceReader<C>,
    state: BalanceState,
}

impl<C: ChainReader> BalanceTracker<C> {
    pub fn new(reader: BalanceReader<C>) -> Self {
        Self {
            reader,
            state: BalanceState::Idle,
        }
    }

    pub fn state(&self) -> &BalanceState {
        &self.state
    }

    pub fn reader(&self) -> &BalanceReader<C> {
        &self.reader
    }

    /// Re-reads balances. The state is `Loading` while the read is outstanding,
    /// then either `Ready` or `Failed`, never a mix of old values and an error.
    pub async fn refresh(&mut self, owner: Option<Address>) -> &BalanceState {
        self.state = BalanceState::Loading;
        self.state = match self.reader.read_balances(owner).await {
            Ok(balances) => {
                info!(
                    "Balances refreshed: stable {:.2}, yield-bearing {:.2}",
                    balances.stable, balances.yield_bearing
                );
                BalanceState::Ready(balances)
            }
            Err(e) => {
                warn!("Balance refresh failed: {}", e);
                BalanceState::Failed(e.to_string())
            }
        };
        &self.state
    }
}
