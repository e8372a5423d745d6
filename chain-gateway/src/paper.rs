use alloy::primitives::{address, keccak256, Address, TxHash, U256};
use anyhow::Result;
use async_trait::async_trait;
use banking::model::chain::{GasSettings, NetworkParams, SupplyCall, TxReceipt};
use banking::traits::chain::{ChainReader, ChainWriter};
use banking::traits::wallet::Wallet;
use banking::ChainError;
use banking_core::fs::{load_state, save_state};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

/// Account the paper wallet signs as.
pub const PAPER_ACCOUNT: Address = address!("0x5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allowance {
    pub token: Address,
    pub owner: Address,
    pub spender: Address,
    pub amount: U256,
}

/// Token balances and allowances of the simulated chain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaperLedger {
    pub chain_id: u64,
    pub block: u64,
    /// token -> owner -> base units
    pub balances: BTreeMap<Address, BTreeMap<Address, U256>>,
    pub allowances: Vec<Allowance>,
}

impl PaperLedger {
    fn balance(&self, token: Address, owner: Address) -> U256 {
        self.balances
            .get(&token)
            .and_then(|owners| owners.get(&owner))
            .copied()
            .unwrap_or_default()
    }

    fn set_balance(&mut self, token: Address, owner: Address, amount: U256) {
        self.balances.entry(token).or_default().insert(owner, amount);
    }

    fn allowance(&self, token: Address, owner: Address, spender: Address) -> U256 {
        self.allowances
            .iter()
            .find(|a| a.token == token && a.owner == owner && a.spender == spender)
            .map(|a| a.amount)
            .unwrap_or_default()
    }

    fn set_allowance(&mut self, token: Address, owner: Address, spender: Address, amount: U256) {
        match self
            .allowances
            .iter_mut()
            .find(|a| a.token == token && a.owner == owner && a.spender == spender)
        {
            Some(existing) => existing.amount = amount,
            None => self.allowances.push(Allowance {
                token,
                owner,
                spender,
                amount,
            }),
        }
    }

    /// Mines a block holding one transaction and returns its hash.
    fn mine(&mut self) -> (TxHash, u64) {
        self.block += 1;
        let tx = keccak256([self.chain_id.to_be_bytes(), self.block.to_be_bytes()].concat());
        (tx, self.block)
    }
}

/// Offline chain that settles every transaction immediately.
///
/// Supplying an asset with a registered receipt token mints that token 1:1 to
/// the beneficiary. When a ledger path is set the ledger is saved after every
/// mined transaction.
pub struct PaperChain {
    account: Address,
    decimals: u8,
    receipt_tokens: HashMap<Address, Address>,
    ledger: Mutex<PaperLedger>,
    receipts: Mutex<HashMap<TxHash, TxReceipt>>,
    ledger_path: Option<PathBuf>,
    authenticated: AtomicBool,
}

impl PaperChain {
    pub fn new(chain_id: u64, account: Address) -> Self {
        Self {
            account,
            decimals: 6,
            receipt_tokens: HashMap::new(),
            ledger: Mutex::new(PaperLedger {
                chain_id,
                ..Default::default()
            }),
            receipts: Mutex::new(HashMap::new()),
            ledger_path: None,
            authenticated: AtomicBool::new(false),
        }
    }

    pub fn with_decimals(mut self, decimals: u8) -> Self {
        self.decimals = decimals;
        self
    }

    pub fn with_receipt_token(mut self, asset: Address, receipt_token: Address) -> Self {
        self.receipt_tokens.insert(asset, receipt_token);
        self
    }

    pub fn with_balance(self, token: Address, owner: Address, amount: U256) -> Self {
        self.lock().set_balance(token, owner, amount);
        self
    }

    /// Backs the ledger by a JSON file. An existing file replaces the seeded
    /// ledger; otherwise the seed is written out.
    pub fn persist_to(mut self, path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        match load_state::<PaperLedger>(&path)? {
            Some(ledger) => {
                info!("Loaded paper ledger from {:?} (block {})", path, ledger.block);
                *self.lock() = ledger;
            }
            None => save_state(&path, &*self.lock())?,
        }
        self.ledger_path = Some(path);
        Ok(self)
    }

    pub fn account(&self) -> Address {
        self.account
    }

    pub fn ledger(&self) -> PaperLedger {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, PaperLedger> {
        self.ledger.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn settle(&self, ledger: &mut PaperLedger, success: bool) -> Result<TxHash, ChainError> {
        let (tx, block) = ledger.mine();
        if let Some(path) = &self.ledger_path {
            save_state(path, &*ledger).map_err(|e| ChainError::Rpc(format!("{:#}", e)))?;
        }
        self.receipts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(
                tx,
                TxReceipt {
                    tx_hash: tx,
                    block_number: Some(block),
                    success,
                },
            );
        Ok(tx)
    }

    fn signer(&self) -> Result<Address, ChainError> {
        if self.is_authenticated() {
            Ok(self.account)
        } else {
            Err(ChainError::Rejected("paper wallet is not logged in".into()))
        }
    }
}

#[async_trait]
impl ChainReader for PaperChain {
    async fn chain_id(&self) -> Result<u64, ChainError> {
        Ok(self.lock().chain_id)
    }

    async fn decimals(&self, _token: Address) -> Result<u8, ChainError> {
        Ok(self.decimals)
    }

    async fn balance_of(&self, token: Address, owner: Address) -> Result<U256, ChainError> {
        Ok(self.lock().balance(token, owner))
    }
}

#[async_trait]
impl ChainWriter for PaperChain {
    async fn approve(
        &self,
        token: Address,
        spender: Address,
        amount: U256,
        _gas: GasSettings,
    ) -> Result<TxHash, ChainError> {
        let owner = self.signer()?;
        let mut ledger = self.lock();
        ledger.set_allowance(token, owner, spender, amount);
        self.settle(&mut ledger, true)
    }

    async fn supply(
        &self,
        pool: Address,
        call: SupplyCall,
        _gas: GasSettings,
    ) -> Result<TxHash, ChainError> {
        let owner = self.signer()?;
        let mut ledger = self.lock();

        let allowance = ledger.allowance(call.asset, owner, pool);
        let held = ledger.balance(call.asset, owner);
        if allowance < call.amount || held < call.amount {
            warn!(
                "Paper supply reverted: amount {}, allowance {}, balance {}",
                call.amount, allowance, held
            );
            return self.settle(&mut ledger, false);
        }

        ledger.set_allowance(call.asset, owner, pool, allowance - call.amount);
        ledger.set_balance(call.asset, owner, held - call.amount);
        let pool_held = ledger.balance(call.asset, pool);
        ledger.set_balance(call.asset, pool, pool_held + call.amount);
        if let Some(receipt_token) = self.receipt_tokens.get(&call.asset).copied() {
            let minted = ledger.balance(receipt_token, call.on_behalf_of);
            ledger.set_balance(receipt_token, call.on_behalf_of, minted + call.amount);
        }
        self.settle(&mut ledger, true)
    }

    async fn wait_for_receipt(
        &self,
        tx: TxHash,
        _confirmations: u64,
    ) -> Result<TxReceipt, ChainError> {
        self.receipts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&tx)
            .copied()
            .ok_or_else(|| ChainError::Rpc(format!("unknown transaction {}", tx)))
    }
}

#[async_trait]
impl Wallet for PaperChain {
    fn is_ready(&self) -> bool {
        true
    }

    fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::Acquire)
    }

    fn address(&self) -> Option<Address> {
        self.is_authenticated().then_some(self.account)
    }

    async fn login(&self) -> Result<Address, ChainError> {
        self.authenticated.store(true, Ordering::Release);
        Ok(self.account)
    }

    async fn logout(&self) -> Result<(), ChainError> {
        self.authenticated.store(false, Ordering::Release);
        Ok(())
    }

    async fn switch_network(&self, network: &NetworkParams) -> Result<(), ChainError> {
        if self.lock().chain_id == network.chain_id {
            Ok(())
        } else {
            Err(ChainError::UnrecognizedChain(network.chain_id))
        }
    }

    async fn add_network(&self, network: &NetworkParams) -> Result<(), ChainError> {
        self.lock().chain_id = network.chain_id;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GAS: GasSettings = GasSettings {
        gas_limit: 300_000,
        gas_price_wei: None,
    };

    fn setup() -> (PaperChain, Address, Address, Address) {
        let account = Address::repeat_byte(0x5a);
        let usdc = Address::repeat_byte(0x01);
        let ausdc = Address::repeat_byte(0x02);
        let chain = PaperChain::new(8453, account)
            .with_receipt_token(usdc, ausdc)
            .with_balance(usdc, account, U256::from(1_000_000_000u64));
        (chain, account, usdc, ausdc)
    }

    #[tokio::test]
    async fn test_supply_mints_receipt_token() {
        let (chain, account, usdc, ausdc) = setup();
        let pool = Address::repeat_byte(0x03);
        chain.login().await.unwrap();

        let amount = U256::from(250_000_000u64);
        let approve = chain.approve(usdc, pool, amount, GAS).await.unwrap();
        assert!(chain.wait_for_receipt(approve, 1).await.unwrap().success);

        let call = SupplyCall {
            asset: usdc,
            amount,
            on_behalf_of: account,
            referral_code: 0,
        };
        let supply = chain.supply(pool, call, GAS).await.unwrap();
        let receipt = chain.wait_for_receipt(supply, 1).await.unwrap();
        assert!(receipt.success);
        assert_eq!(receipt.block_number, Some(2));

        assert_eq!(chain.balance_of(usdc, account).await.unwrap(), U256::from(750_000_000u64));
        assert_eq!(chain.balance_of(ausdc, account).await.unwrap(), amount);
        assert_eq!(chain.ledger().allowance(usdc, account, pool), U256::ZERO);
    }

    #[tokio::test]
    async fn test_supply_without_allowance_reverts() {
        let (chain, account, usdc, _) = setup();
        chain.login().await.unwrap();

        let call = SupplyCall {
            asset: usdc,
            amount: U256::from(1u64),
            on_behalf_of: account,
            referral_code: 0,
        };
        let tx = chain.supply(Address::repeat_byte(0x03), call, GAS).await.unwrap();
        assert!(!chain.wait_for_receipt(tx, 1).await.unwrap().success);
        assert_eq!(chain.balance_of(usdc, account).await.unwrap(), U256::from(1_000_000_000u64));
    }

    #[tokio::test]
    async fn test_writes_need_login() {
        let (chain, _, usdc, _) = setup();
        assert_eq!(chain.address(), None);
        let err = chain
            .approve(usdc, Address::ZERO, U256::from(1u64), GAS)
            .await
            .unwrap_err();
        assert!(matches!(err, ChainError::Rejected(_)));
    }

    #[tokio::test]
    async fn test_ledger_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("paper_ledger.json");
        let pool = Address::repeat_byte(0x03);

        let (chain, _, usdc, _) = setup();
        let chain = chain.persist_to(&path).unwrap();
        chain.login().await.unwrap();
        chain
            .approve(usdc, pool, U256::from(42u64), GAS)
            .await
            .unwrap();

        // A fresh seed is ignored once a ledger exists on disk.
        let reopened = PaperChain::new(8453, Address::repeat_byte(0x5a))
            .persist_to(&path)
            .unwrap();
        let ledger = reopened.ledger();
        assert_eq!(ledger.block, 1);
        assert_eq!(
            ledger.allowance(usdc, Address::repeat_byte(0x5a), pool),
            U256::from(42u64)
        );
    }
}
