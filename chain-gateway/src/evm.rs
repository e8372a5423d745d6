use alloy::network::{EthereumWallet, ReceiptResponse};
use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use alloy::sol;
use alloy::transports::http::reqwest::Url;
use alloy::transports::TransportError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use banking::model::chain::{GasSettings, NetworkParams, SupplyCall, TxReceipt};
use banking::traits::chain::{ChainReader, ChainWriter};
use banking::traits::wallet::Wallet;
use banking::ChainError;
use log::{debug, info};
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    contract IErc20 {
        function balanceOf(address account) external view returns (uint256);
        function decimals() external view returns (uint8);
        function approve(address spender, uint256 amount) external returns (bool);
    }
}

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    contract IPool {
        function supply(address asset, uint256 amount, address onBehalfOf, uint16 referralCode) external;
    }
}

/// EIP-1193 user rejection.
const USER_REJECTED: i64 = 4001;
/// EIP-3085: the wallet has not added the chain.
const UNRECOGNIZED_CHAIN: i64 = 4902;
const METHOD_NOT_FOUND: i64 = -32601;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// JSON-RPC chain access, signing with a local private key when one is given.
///
/// Without a key the adapter is read-only: `login` fails and writes are
/// rejected.
pub struct EvmChain {
    provider: DynProvider,
    signer: Option<Address>,
    authenticated: AtomicBool,
    poll_interval: Duration,
}

impl EvmChain {
    pub fn connect(rpc_url: &str, private_key: Option<&str>) -> Result<Self> {
        let url = Url::parse(rpc_url).with_context(|| format!("Invalid RPC URL '{}'", rpc_url))?;

        let (provider, signer) = match private_key {
            Some(key) => {
                let signer: PrivateKeySigner = key
                    .trim()
                    .parse()
                    .map_err(|e| anyhow::anyhow!("Invalid private key: {e}"))?;
                let address = signer.address();
                let provider = ProviderBuilder::new()
                    .wallet(EthereumWallet::from(signer))
                    .connect_http(url)
                    .erased();
                (provider, Some(address))
            }
            None => (ProviderBuilder::new().connect_http(url).erased(), None),
        };

        info!(
            "EVM adapter connected to {} ({})",
            rpc_url,
            if signer.is_some() { "signing" } else { "read-only" }
        );
        Ok(Self {
            provider,
            signer,
            authenticated: AtomicBool::new(false),
            poll_interval: DEFAULT_POLL_INTERVAL,
        })
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    fn require_signer(&self) -> Result<Address, ChainError> {
        self.signer
            .ok_or_else(|| ChainError::Rejected("no private key configured".into()))
    }

    async fn wallet_request(
        &self,
        method: &'static str,
        params: serde_json::Value,
    ) -> Result<(), TransportError> {
        self.provider
            .raw_request::<_, serde_json::Value>(method.into(), vec![params])
            .await
            .map(|_| ())
    }
}

fn transport_error(context: &str, e: TransportError) -> ChainError {
    match e.as_error_resp() {
        Some(payload) if payload.code == USER_REJECTED => {
            ChainError::Rejected(format!("{}: {}", context, payload.message))
        }
        Some(payload) if payload.message.contains("revert") => {
            ChainError::Reverted(format!("{}: {}", context, payload.message))
        }
        _ => ChainError::Rpc(format!("{}: {}", context, e)),
    }
}

fn contract_error(context: &str, e: alloy::contract::Error) -> ChainError {
    match e {
        alloy::contract::Error::TransportError(e) => transport_error(context, e),
        other => ChainError::Reverted(format!("{}: {}", context, other)),
    }
}

#[async_trait]
impl ChainReader for EvmChain {
    async fn chain_id(&self) -> Result<u64, ChainError> {
        self.provider
            .get_chain_id()
            .await
            .map_err(|e| transport_error("eth_chainId", e))
    }

    async fn decimals(&self, token: Address) -> Result<u8, ChainError> {
        IErc20::new(token, &self.provider)
            .decimals()
            .call()
            .await
            .map_err(|e| contract_error("decimals()", e))
    }

    async fn balance_of(&self, token: Address, owner: Address) -> Result<U256, ChainError> {
        IErc20::new(token, &self.provider)
            .balanceOf(owner)
            .call()
            .await
            .map_err(|e| contract_error("balanceOf()", e))
    }
}

#[async_trait]
impl ChainWriter for EvmChain {
    async fn approve(
        &self,
        token: Address,
        spender: Address,
        amount: U256,
        gas: GasSettings,
    ) -> Result<TxHash, ChainError> {
        self.require_signer()?;
        let token = IErc20::new(token, &self.provider);
        let mut builder = token.approve(spender, amount).gas(gas.gas_limit);
        if let Some(price) = gas.gas_price_wei {
            builder = builder.gas_price(price);
        }
        let pending = builder
            .send()
            .await
            .map_err(|e| contract_error("approve()", e))?;
        let tx = *pending.tx_hash();
        info!("approve() submitted: {}", tx);
        Ok(tx)
    }

    async fn supply(
        &self,
        pool: Address,
        call: SupplyCall,
        gas: GasSettings,
    ) -> Result<TxHash, ChainError> {
        self.require_signer()?;
        let pool = IPool::new(pool, &self.provider);
        let mut builder = pool
            .supply(call.asset, call.amount, call.on_behalf_of, call.referral_code)
            .gas(gas.gas_limit);
        if let Some(price) = gas.gas_price_wei {
            builder = builder.gas_price(price);
        }
        let pending = builder
            .send()
            .await
            .map_err(|e| contract_error("supply()", e))?;
        let tx = *pending.tx_hash();
        info!("supply() submitted: {}", tx);
        Ok(tx)
    }

    async fn wait_for_receipt(
        &self,
        tx: TxHash,
        confirmations: u64,
    ) -> Result<TxReceipt, ChainError> {
        loop {
            let receipt = self
                .provider
                .get_transaction_receipt(tx)
                .await
                .map_err(|e| transport_error("eth_getTransactionReceipt", e))?;

            if let Some(receipt) = receipt {
                let mined_in = receipt.block_number();
                let confirmed = match mined_in {
                    Some(block) if confirmations > 1 => {
                        let head = self
                            .provider
                            .get_block_number()
                            .await
                            .map_err(|e| transport_error("eth_blockNumber", e))?;
                        head + 1 >= block + confirmations
                    }
                    _ => true,
                };
                if confirmed {
                    return Ok(TxReceipt {
                        tx_hash: tx,
                        block_number: mined_in,
                        success: receipt.status(),
                    });
                }
            }

            debug!("Waiting for {} ({} confirmations)", tx, confirmations);
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

#[async_trait]
impl Wallet for EvmChain {
    fn is_ready(&self) -> bool {
        true
    }

    fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::Acquire)
    }

    fn address(&self) -> Option<Address> {
        if self.is_authenticated() {
            self.signer
        } else {
            None
        }
    }

    async fn login(&self) -> Result<Address, ChainError> {
        let address = self.require_signer()?;
        self.authenticated.store(true, Ordering::Release);
        Ok(address)
    }

    async fn logout(&self) -> Result<(), ChainError> {
        self.authenticated.store(false, Ordering::Release);
        Ok(())
    }

    async fn switch_network(&self, network: &NetworkParams) -> Result<(), ChainError> {
        let params = json!({ "chainId": network.hex_chain_id() });
        match self.wallet_request("wallet_switchEthereumChain", params).await {
            Ok(()) => Ok(()),
            Err(e) => match e.as_error_resp().map(|p| p.code) {
                Some(UNRECOGNIZED_CHAIN) => Err(ChainError::UnrecognizedChain(network.chain_id)),
                Some(METHOD_NOT_FOUND) => Err(ChainError::Rejected(
                    "endpoint cannot switch networks, point the RPC URL at the expected chain".into(),
                )),
                _ => Err(transport_error("wallet_switchEthereumChain", e)),
            },
        }
    }

    async fn add_network(&self, network: &NetworkParams) -> Result<(), ChainError> {
        let params = json!({
            "chainId": network.hex_chain_id(),
            "chainName": network.chain_name,
            "nativeCurrency": network.native_currency,
            "rpcUrls": network.rpc_urls,
            "blockExplorerUrls": network.block_explorer_urls,
        });
        self.wallet_request("wallet_addEthereumChain", params)
            .await
            .map_err(|e| transport_error("wallet_addEthereumChain", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Anvil's first development key.
    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[tokio::test]
    async fn test_login_requires_key() {
        let read_only = EvmChain::connect("http://127.0.0.1:8545", None).unwrap();
        assert!(matches!(read_only.login().await, Err(ChainError::Rejected(_))));
        assert_eq!(read_only.address(), None);

        let signing = EvmChain::connect("http://127.0.0.1:8545", Some(DEV_KEY)).unwrap();
        assert_eq!(signing.address(), None);
        let address = signing.login().await.unwrap();
        assert_eq!(
            address,
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".parse::<Address>().unwrap()
        );
        assert_eq!(signing.address(), Some(address));
    }

    #[test]
    fn test_rejects_bad_inputs() {
        assert!(EvmChain::connect("not a url", None).is_err());
        assert!(EvmChain::connect("http://127.0.0.1:8545", Some("0x1234")).is_err());
    }
}
