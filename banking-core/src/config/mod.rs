//! Layered configuration for the banking client.
//!
//! Values are resolved in order: built-in Base mainnet defaults, then the
//! optional `synnax.toml` in the config directory, then `SYNNAX__*`
//! environment variables (`SYNNAX__NETWORK__CHAIN_ID=84532`).

use alloy_primitives::{address, Address};
use anyhow::{Context, Result};
use banking::model::chain::{GasSettings, NativeCurrency, NetworkParams};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const ENV_PREFIX: &str = "SYNNAX";
const ENV_SEPARATOR: &str = "__";
const WEI_PER_GWEI: f64 = 1_000_000_000.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub chain_id: u64,
    pub chain_name: String,
    pub rpc_url: String,
    pub explorer_url: String,
    pub currency_name: String,
    pub currency_symbol: String,
    pub currency_decimals: u8,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            chain_id: 8453,
            chain_name: "Base Mainnet".to_string(),
            rpc_url: "https://mainnet.base.org".to_string(),
            explorer_url: "https://basescan.org".to_string(),
            currency_name: "Ethereum".to_string(),
            currency_symbol: "ETH".to_string(),
            currency_decimals: 18,
        }
    }
}

impl NetworkConfig {
    /// Parameters handed to the wallet when switching or adding the network.
    pub fn params(&self) -> NetworkParams {
        NetworkParams {
            chain_id: self.chain_id,
            chain_name: self.chain_name.clone(),
            native_currency: NativeCurrency {
                name: self.currency_name.clone(),
                symbol: self.currency_symbol.clone(),
                decimals: self.currency_decimals,
            },
            rpc_urls: vec![self.rpc_url.clone()],
            block_explorer_urls: vec![self.explorer_url.clone()],
        }
    }
}

/// Contract addresses on the configured network (Aave V3 on Base by default).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractsConfig {
    /// Stable asset (USDC).
    pub stable_asset: Address,
    /// Yield-bearing receipt token of the stable asset (aBasUSDC).
    pub yield_bearing_asset: Address,
    /// Lending pool accepting `supply`.
    pub pool: Address,
}

impl Default for ContractsConfig {
    fn default() -> Self {
        Self {
            stable_asset: address!("0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913"),
            yield_bearing_asset: address!("0x4e65fe4dba92790696d040ac24aa414708f5c0ab"),
            pool: address!("0xA238Dd80C259a72e81d7e4664a9801593F98d1c5"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepositConfig {
    pub approval_gas_limit: u64,
    pub supply_gas_limit: u64,
    /// Legacy gas price for the supply transaction; 0 lets the provider estimate.
    pub supply_gas_price_gwei: f64,
    pub confirmations: u64,
    pub receipt_timeout_secs: u64,
    pub referral_code: u16,
}

impl Default for DepositConfig {
    fn default() -> Self {
        Self {
            approval_gas_limit: 200_000,
            supply_gas_limit: 300_000,
            supply_gas_price_gwei: 0.1,
            confirmations: 1,
            receipt_timeout_secs: 120,
            referral_code: 0,
        }
    }
}

impl DepositConfig {
    pub fn approval_gas(&self) -> GasSettings {
        GasSettings {
            gas_limit: self.approval_gas_limit,
            gas_price_wei: None,
        }
    }

    pub fn supply_gas(&self) -> GasSettings {
        let price = (self.supply_gas_price_gwei * WEI_PER_GWEI).round();
        GasSettings {
            gas_limit: self.supply_gas_limit,
            gas_price_wei: (price > 0.0).then_some(price as u128),
        }
    }

    pub fn receipt_timeout(&self) -> Duration {
        Duration::from_secs(self.receipt_timeout_secs)
    }
}

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BankingConfig {
    pub network: NetworkConfig,
    pub contracts: ContractsConfig,
    pub deposit: DepositConfig,
    /// Decimals assumed when a token's `decimals()` call fails during balance reads.
    pub decimals_fallback: u8,
}

impl Default for BankingConfig {
    fn default() -> Self {
        Self {
            network: NetworkConfig::default(),
            contracts: ContractsConfig::default(),
            deposit: DepositConfig::default(),
            decimals_fallback: 6,
        }
    }
}

impl BankingConfig {
    /// Loads the configuration, layering `file` (if present) and the environment
    /// over the defaults.
    pub fn load(file: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(file).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read configuration from {}", file.display()))?;

        settings
            .try_deserialize()
            .context("Invalid configuration values")
    }
}
