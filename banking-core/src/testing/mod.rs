//! In-memory doubles for tests. Enabled by the `test-utils` feature.

use alloy_primitives::{Address, TxHash, U256};
use async_trait::async_trait;
use banking::model::chain::{GasSettings, NetworkParams, SupplyCall, TxReceipt};
use banking::model::session::SessionMode;
use banking::traits::chain::{ChainReader, ChainWriter};
use banking::traits::confirm::Confirmer;
use banking::traits::mode_store::ModeStore;
use banking::traits::wallet::Wallet;
use banking::{BankingError, ChainError};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// Failures that can be injected into a [`MockChain`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Failure {
    ChainId,
    Decimals,
    BalanceOf,
    Approve,
    ApprovalReverted,
    Supply,
    SupplyReverted,
    /// `wait_for_receipt` never resolves.
    StallReceipts,
    SwitchNetwork,
    AddNetwork,
}

#[derive(Debug, Clone, Copy)]
enum PendingTx {
    Approval,
    Supply,
}

#[derive(Default)]
struct MockState {
    chain_id: u64,
    known_chains: HashSet<u64>,
    address: Option<Address>,
    decimals: HashMap<Address, u8>,
    balances: HashMap<(Address, Address), U256>,
    allowances: HashMap<(Address, Address, Address), U256>,
    receipt_tokens: HashMap<Address, Address>,
    failures: HashSet<Failure>,
    calls: HashMap<&'static str, usize>,
    pending: HashMap<TxHash, PendingTx>,
    log: Vec<&'static str>,
    nonce: u64,
}

/// Scriptable chain, wallet and token ledger.
///
/// Every trait call is counted by method name, so tests can assert that a
/// rejected operation never reached the chain.
pub struct MockChain {
    state: Mutex<MockState>,
}

impl MockChain {
    pub fn new(chain_id: u64) -> Self {
        let state = MockState {
            chain_id,
            known_chains: HashSet::from([chain_id]),
            ..Default::default()
        };
        Self {
            state: Mutex::new(state),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn with_address(self, address: Address) -> Self {
        self.lock().address = Some(address);
        self
    }

    pub fn with_decimals(self, token: Address, decimals: u8) -> Self {
        self.lock().decimals.insert(token, decimals);
        self
    }

    pub fn with_balance(self, token: Address, owner: Address, amount: U256) -> Self {
        self.lock().balances.insert((token, owner), amount);
        self
    }

    /// A confirmed supply of `asset` mints `receipt_token` 1:1 to the beneficiary.
    pub fn with_receipt_token(self, asset: Address, receipt_token: Address) -> Self {
        self.lock().receipt_tokens.insert(asset, receipt_token);
        self
    }

    /// Lets the wallet switch to `chain_id` without adding it first.
    pub fn with_known_chain(self, chain_id: u64) -> Self {
        self.lock().known_chains.insert(chain_id);
        self
    }

    pub fn failing(self, failure: Failure) -> Self {
        self.inject(failure);
        self
    }

    pub fn inject(&self, failure: Failure) {
        self.lock().failures.insert(failure);
    }

    pub fn clear(&self, failure: Failure) {
        self.lock().failures.remove(&failure);
    }

    pub fn set_chain_id(&self, chain_id: u64) {
        self.lock().chain_id = chain_id;
    }

    pub fn set_balance(&self, token: Address, owner: Address, amount: U256) {
        self.lock().balances.insert((token, owner), amount);
    }

    pub fn balance(&self, token: Address, owner: Address) -> U256 {
        self.lock()
            .balances
            .get(&(token, owner))
            .copied()
            .unwrap_or_default()
    }

    pub fn allowance(&self, token: Address, owner: Address, spender: Address) -> U256 {
        self.lock()
            .allowances
            .get(&(token, owner, spender))
            .copied()
            .unwrap_or_default()
    }

    /// Number of calls made to `method`.
    pub fn calls(&self, method: &str) -> usize {
        self.lock().calls.get(method).copied().unwrap_or(0)
    }

    /// Total calls across every method.
    pub fn total_calls(&self) -> usize {
        self.lock().calls.values().sum()
    }

    /// Method names in call order.
    pub fn call_log(&self) -> Vec<&'static str> {
        self.lock().log.clone()
    }

    fn record(&self, method: &'static str) -> MutexGuard<'_, MockState> {
        let mut state = self.lock();
        *state.calls.entry(method).or_insert(0) += 1;
        state.log.push(method);
        state
    }
}

impl MockState {
    fn fails(&self, failure: Failure) -> bool {
        self.failures.contains(&failure)
    }

    fn next_tx(&mut self, kind: PendingTx) -> TxHash {
        self.nonce += 1;
        let tx = TxHash::from(U256::from(self.nonce).to_be_bytes::<32>());
        self.pending.insert(tx, kind);
        tx
    }

    fn signer(&self) -> Result<Address, ChainError> {
        self.address
            .ok_or_else(|| ChainError::Rejected("no connected account".into()))
    }
}

#[async_trait]
impl ChainReader for MockChain {
    async fn chain_id(&self) -> Result<u64, ChainError> {
        let state = self.record("chain_id");
        if state.fails(Failure::ChainId) {
            return Err(ChainError::Rpc("connection refused".into()));
        }
        Ok(state.chain_id)
    }

    async fn decimals(&self, token: Address) -> Result<u8, ChainError> {
        let state = self.record("decimals");
        if state.fails(Failure::Decimals) {
            return Err(ChainError::Reverted("decimals()".into()));
        }
        Ok(state.decimals.get(&token).copied().unwrap_or(6))
    }

    async fn balance_of(&self, token: Address, owner: Address) -> Result<U256, ChainError> {
        let state = self.record("balance_of");
        if state.fails(Failure::BalanceOf) {
            return Err(ChainError::Reverted("balanceOf(address)".into()));
        }
        Ok(state.balances.get(&(token, owner)).copied().unwrap_or_default())
    }
}

#[async_trait]
impl ChainWriter for MockChain {
    async fn approve(
        &self,
        token: Address,
        spender: Address,
        amount: U256,
        _gas: GasSettings,
    ) -> Result<TxHash, ChainError> {
        let mut state = self.record("approve");
        if state.fails(Failure::Approve) {
            return Err(ChainError::Rejected("user denied transaction signature".into()));
        }
        let owner = state.signer()?;
        if !state.fails(Failure::ApprovalReverted) {
            state.allowances.insert((token, owner, spender), amount);
        }
        Ok(state.next_tx(PendingTx::Approval))
    }

    async fn supply(
        &self,
        pool: Address,
        call: SupplyCall,
        _gas: GasSettings,
    ) -> Result<TxHash, ChainError> {
        let mut state = self.record("supply");
        if state.fails(Failure::Supply) {
            return Err(ChainError::Rejected("user denied transaction signature".into()));
        }
        let owner = state.signer()?;
        let allowance = state
            .allowances
            .get(&(call.asset, owner, pool))
            .copied()
            .unwrap_or_default();
        if allowance < call.amount {
            return Err(ChainError::Reverted("ERC20: insufficient allowance".into()));
        }

        if !state.fails(Failure::SupplyReverted) {
            state.allowances.insert((call.asset, owner, pool), allowance - call.amount);
            let held = state
                .balances
                .get(&(call.asset, owner))
                .copied()
                .unwrap_or_default();
            state
                .balances
                .insert((call.asset, owner), held.saturating_sub(call.amount));
            if let Some(receipt_token) = state.receipt_tokens.get(&call.asset).copied() {
                let minted = state
                    .balances
                    .get(&(receipt_token, call.on_behalf_of))
                    .copied()
                    .unwrap_or_default();
                state
                    .balances
                    .insert((receipt_token, call.on_behalf_of), minted + call.amount);
            }
        }
        Ok(state.next_tx(PendingTx::Supply))
    }

    async fn wait_for_receipt(
        &self,
        tx: TxHash,
        _confirmations: u64,
    ) -> Result<TxReceipt, ChainError> {
        let outcome = {
            let state = self.record("wait_for_receipt");
            if state.fails(Failure::StallReceipts) {
                None
            } else {
                let kind = state
                    .pending
                    .get(&tx)
                    .copied()
                    .ok_or_else(|| ChainError::Rpc(format!("unknown transaction {}", tx)))?;
                let reverted = match kind {
                    PendingTx::Approval => state.fails(Failure::ApprovalReverted),
                    PendingTx::Supply => state.fails(Failure::SupplyReverted),
                };
                Some((!reverted, state.nonce))
            }
        };

        match outcome {
            Some((success, block)) => Ok(TxReceipt {
                tx_hash: tx,
                block_number: Some(block),
                success,
            }),
            None => std::future::pending().await,
        }
    }
}

#[async_trait]
impl Wallet for MockChain {
    fn is_ready(&self) -> bool {
        true
    }

    fn is_authenticated(&self) -> bool {
        self.lock().address.is_some()
    }

    fn address(&self) -> Option<Address> {
        self.lock().address
    }

    async fn login(&self) -> Result<Address, ChainError> {
        let mut state = self.record("login");
        let address = *state.address.get_or_insert(Address::repeat_byte(0xAA));
        Ok(address)
    }

    async fn logout(&self) -> Result<(), ChainError> {
        self.record("logout").address = None;
        Ok(())
    }

    async fn switch_network(&self, network: &NetworkParams) -> Result<(), ChainError> {
        let mut state = self.record("switch_network");
        if state.fails(Failure::SwitchNetwork) {
            return Err(ChainError::Rejected("user rejected the request".into()));
        }
        if !state.known_chains.contains(&network.chain_id) {
            return Err(ChainError::UnrecognizedChain(network.chain_id));
        }
        state.chain_id = network.chain_id;
        Ok(())
    }

    async fn add_network(&self, network: &NetworkParams) -> Result<(), ChainError> {
        let mut state = self.record("add_network");
        if state.fails(Failure::AddNetwork) {
            return Err(ChainError::Rejected("user rejected the request".into()));
        }
        state.known_chains.insert(network.chain_id);
        state.chain_id = network.chain_id;
        Ok(())
    }
}

/// Session flag storage shared between clones, as a reload would see it.
#[derive(Debug, Clone, Default)]
pub struct MemoryModeStore {
    value: Arc<Mutex<Option<SessionMode>>>,
    failing: Arc<AtomicBool>,
}

impl MemoryModeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mode: SessionMode) -> Self {
        let store = Self::default();
        *store.value.lock().unwrap_or_else(|e| e.into_inner()) = Some(mode);
        store
    }

    /// Makes every later load and save fail.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn stored(&self) -> Option<SessionMode> {
        *self.value.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ModeStore for MemoryModeStore {
    fn load(&self) -> Result<Option<SessionMode>, BankingError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(BankingError::Storage("store unavailable".into()));
        }
        Ok(self.stored())
    }

    fn save(&self, mode: SessionMode) -> Result<(), BankingError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(BankingError::Storage("store unavailable".into()));
        }
        *self.value.lock().unwrap_or_else(|e| e.into_inner()) = Some(mode);
        Ok(())
    }
}

/// Answers confirmation prompts from a script; declines once it runs out.
#[derive(Debug, Default)]
pub struct ScriptedConfirmer {
    answers: Mutex<VecDeque<bool>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedConfirmer {
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn accepting() -> Self {
        Self::new([true])
    }

    pub fn declining() -> Self {
        Self::new([false])
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Confirmer for ScriptedConfirmer {
    fn confirm(&self, prompt: &str) -> bool {
        self.prompts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(prompt.to_string());
        self.answers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or(false)
    }
}
