//! Deposit into the lending pool as an explicit state machine.
//!
//! `Idle -> Validating -> AwaitingApproval -> ApprovalPending -> Supplying ->
//! SupplyPending -> Confirmed`, with `Error` reachable from every
//! non-terminal state. The approval receipt is awaited before the supply call
//! is built, and nothing is retried: a failure ends the run and the caller has
//! to start a new one. A supply failure after a confirmed approval leaves that
//! allowance outstanding.

use alloy_primitives::{Address, TxHash};
use banking::model::chain::{GasSettings, NetworkParams, SupplyCall, TxReceipt};
use banking::model::deposit::{DepositReceipt, DepositState};
use banking::traits::chain::{ChainReader, ChainWriter};
use banking::traits::wallet::Wallet;
use banking::{BankingError, ChainError};
use log::{info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::balance::BalanceTracker;
use crate::config::BankingConfig;
use crate::units::{parse_units, validate_decimal};

#[derive(Debug, Clone, PartialEq)]
pub struct DepositWorkflowConfig {
    pub network: NetworkParams,
    pub pool: Address,
    pub approval_gas: GasSettings,
    pub supply_gas: GasSettings,
    pub confirmations: u64,
    pub receipt_timeout: Duration,
    pub referral_code: u16,
}

impl From<&BankingConfig> for DepositWorkflowConfig {
    fn from(config: &BankingConfig) -> Self {
        Self {
            network: config.network.params(),
            pool: config.contracts.pool,
            approval_gas: config.deposit.approval_gas(),
            supply_gas: config.deposit.supply_gas(),
            confirmations: config.deposit.confirmations,
            receipt_timeout: config.deposit.receipt_timeout(),
            referral_code: config.deposit.referral_code,
        }
    }
}

/// Clears the in-flight flag when a run ends, however it ends.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct DepositWorkflow<C> {
    chain: C,
    config: DepositWorkflowConfig,
    state: Mutex<DepositState>,
    history: Mutex<Vec<DepositState>>,
    in_flight: AtomicBool,
}

impl<C> DepositWorkflow<C>
where
    C: ChainReader + ChainWriter + Wallet,
{
    pub fn new(chain: C, config: DepositWorkflowConfig) -> Self {
        Self {
            chain,
            config,
            state: Mutex::new(DepositState::Idle),
            history: Mutex::new(vec![DepositState::Idle]),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Current stage of the last (or running) deposit.
    pub fn state(&self) -> DepositState {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Every stage visited by the last (or running) deposit, starting at `Idle`.
    pub fn history(&self) -> Vec<DepositState> {
        self.history
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    fn transition(&self, next: DepositState) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        info!("Deposit: {} -> {}", *state, next);
        *state = next.clone();
        self.history
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(next);
    }

    fn reset(&self) {
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) = DepositState::Idle;
        *self.history.lock().unwrap_or_else(|e| e.into_inner()) = vec![DepositState::Idle];
    }

    /// Deposits `amount` (human units) of `asset` into the pool for the
    /// connected account, then refreshes `balances`.
    ///
    /// Fails with `DepositInProgress` if another deposit is running on this
    /// workflow; the running deposit is left untouched.
    pub async fn deposit<R: ChainReader>(
        &self,
        asset: Option<Address>,
        amount: &str,
        balances: &mut BalanceTracker<R>,
    ) -> Result<DepositReceipt, BankingError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("Deposit rejected: another deposit is in flight");
            return Err(BankingError::DepositInProgress);
        }
        let _guard = InFlightGuard(&self.in_flight);

        self.reset();
        match self.run(asset, amount).await {
            Ok(receipt) => {
                self.transition(DepositState::Confirmed);
                balances.refresh(Some(receipt.depositor)).await;
                Ok(receipt)
            }
            Err(e) => {
                warn!("Deposit failed: {}", e);
                self.transition(DepositState::Error(e.clone()));
                Err(e)
            }
        }
    }

    async fn run(&self, asset: Option<Address>, amount: &str) -> Result<DepositReceipt, BankingError> {
        self.transition(DepositState::Validating);
        let (asset, amount) = validate_request(asset, amount)?;

        let depositor = self.chain.address().ok_or(BankingError::WalletNotReady)?;
        self.ensure_network().await?;

        let decimals = self
            .chain
            .decimals(asset)
            .await
            .map_err(|e| BankingError::ReadFailure(format!("decimals: {}", e)))?;
        let available = self
            .chain
            .balance_of(asset, depositor)
            .await
            .map_err(|e| BankingError::ReadFailure(format!("balanceOf: {}", e)))?;

        let requested = parse_units(amount, decimals)?;
        if requested.is_zero() {
            return Err(BankingError::InvalidInput(format!(
                "{} is below the token's smallest unit",
                amount
            )));
        }
        if requested > available {
            return Err(BankingError::InsufficientBalance {
                requested,
                available,
            });
        }

        self.transition(DepositState::AwaitingApproval);
        info!("Approving {} units of {} for pool {}", requested, asset, self.config.pool);
        let approve_tx = self
            .chain
            .approve(asset, self.config.pool, requested, self.config.approval_gas)
            .await
            .map_err(|e| BankingError::ApprovalFailed(e.to_string()))?;
        self.transition(DepositState::ApprovalPending(approve_tx));
        let approval = self
            .await_receipt(approve_tx)
            .await
            .map_err(|e| BankingError::ApprovalFailed(e.to_string()))?;

        self.transition(DepositState::Supplying);
        let call = SupplyCall {
            asset,
            amount: requested,
            on_behalf_of: depositor,
            referral_code: self.config.referral_code,
        };
        let supply_tx = self
            .chain
            .supply(self.config.pool, call, self.config.supply_gas)
            .await
            .map_err(|e| BankingError::SupplyFailed(e.to_string()))?;
        self.transition(DepositState::SupplyPending(supply_tx));
        let supply = self
            .await_receipt(supply_tx)
            .await
            .map_err(|e| BankingError::SupplyFailed(e.to_string()))?;

        info!("Deposit of {} units of {} confirmed in {}", requested, asset, supply.tx_hash);
        Ok(DepositReceipt {
            asset,
            depositor,
            amount: requested,
            decimals,
            approval,
            supply,
        })
    }

    /// Switches (or adds) the configured network when the wallet is elsewhere.
    async fn ensure_network(&self) -> Result<(), BankingError> {
        let expected = self.config.network.chain_id;
        let actual = self
            .chain
            .chain_id()
            .await
            .map_err(|e| BankingError::ReadFailure(format!("network id: {}", e)))?;
        if actual == expected {
            return Ok(());
        }

        warn!("Connected to chain {}, asking wallet to switch to {}", actual, expected);
        let mismatch = BankingError::NetworkMismatch { expected, actual };
        match self.chain.switch_network(&self.config.network).await {
            Ok(()) => {}
            Err(ChainError::UnrecognizedChain(_)) => {
                info!("Wallet does not know chain {}, adding it", expected);
                if let Err(e) = self.chain.add_network(&self.config.network).await {
                    warn!("Adding network failed: {}", e);
                    return Err(mismatch);
                }
            }
            Err(e) => {
                warn!("Network switch failed: {}", e);
                return Err(mismatch);
            }
        }

        let now = self
            .chain
            .chain_id()
            .await
            .map_err(|e| BankingError::ReadFailure(format!("network id: {}", e)))?;
        if now != expected {
            return Err(BankingError::NetworkMismatch {
                expected,
                actual: now,
            });
        }
        Ok(())
    }

    /// Waits for `tx` within the configured timeout; a stall surfaces as
    /// `ChainError::Timeout`, a mined revert as `ChainError::TxReverted`.
    async fn await_receipt(&self, tx: TxHash) -> Result<TxReceipt, ChainError> {
        let receipt = tokio::time::timeout(
            self.config.receipt_timeout,
            self.chain.wait_for_receipt(tx, self.config.confirmations),
        )
        .await
        .map_err(|_| ChainError::Timeout(tx))??;

        if !receipt.success {
            return Err(ChainError::TxReverted(tx));
        }
        Ok(receipt)
    }
}

/// Checks asset and amount before anything touches the chain.
fn validate_request(asset: Option<Address>, amount: &str) -> Result<(Address, &str), BankingError> {
    let asset = asset.ok_or_else(|| BankingError::InvalidInput("asset is required".into()))?;
    let amount = amount.trim();
    if amount.is_empty() {
        return Err(BankingError::InvalidInput("amount is required".into()));
    }
    match amount.parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => {}
        _ => {
            return Err(BankingError::InvalidInput(format!(
                "'{}' is not a valid amount",
                amount
            )))
        }
    }
    validate_decimal(amount)?;
    Ok((asset, amount))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_request() {
        let asset = Some(Address::repeat_byte(1));
        assert!(validate_request(asset, "10.5").is_ok());
        assert!(validate_request(None, "10").is_err());
        for bad in ["", "  ", "0", "-5", "abc", "1e3", "NaN"] {
            assert!(
                matches!(validate_request(asset, bad), Err(BankingError::InvalidInput(_))),
                "{:?} should be rejected",
                bad
            );
        }
    }
}
