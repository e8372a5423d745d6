use crate::error::ChainError;
use crate::model::chain::{GasSettings, SupplyCall, TxReceipt};
use alloy_primitives::{Address, TxHash, U256};
use async_trait::async_trait;
use std::sync::Arc;

/// Read-only calls against the chain.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Identifier of the network the provider is connected to.
    async fn chain_id(&self) -> Result<u64, ChainError>;

    /// ERC-20 `decimals()`.
    async fn decimals(&self, token: Address) -> Result<u8, ChainError>;

    /// ERC-20 `balanceOf(owner)` in base units.
    async fn balance_of(&self, token: Address, owner: Address) -> Result<U256, ChainError>;
}

/// Transaction submission and confirmation.
#[async_trait]
pub trait ChainWriter: Send + Sync {
    /// Submits ERC-20 `approve(spender, amount)` and returns the transaction hash.
    async fn approve(
        &self,
        token: Address,
        spender: Address,
        amount: U256,
        gas: GasSettings,
    ) -> Result<TxHash, ChainError>;

    /// Submits the lending pool `supply(asset, amount, onBehalfOf, referralCode)`.
    async fn supply(
        &self,
        pool: Address,
        call: SupplyCall,
        gas: GasSettings,
    ) -> Result<TxHash, ChainError>;

    /// Waits until `tx` is mined with at least `confirmations` blocks on top.
    ///
    /// Implementations return the receipt even when the transaction reverted;
    /// callers inspect `TxReceipt::success`.
    async fn wait_for_receipt(&self, tx: TxHash, confirmations: u64)
    -> Result<TxReceipt, ChainError>;
}

#[async_trait]
impl<T: ChainReader + ?Sized> ChainReader for Arc<T> {
    async fn chain_id(&self) -> Result<u64, ChainError> {
        (**self).chain_id().await
    }

    async fn decimals(&self, token: Address) -> Result<u8, ChainError> {
        (**self).decimals(token).await
    }

    async fn balance_of(&self, token: Address, owner: Address) -> Result<U256, ChainError> {
        (**self).balance_of(token, owner).await
    }
}

#[async_trait]
impl<T: ChainWriter + ?Sized> ChainWriter for Arc<T> {
    async fn approve(
        &self,
        token: Address,
        spender: Address,
        amount: U256,
        gas: GasSettings,
    ) -> Result<TxHash, ChainError> {
        (**self).approve(token, spender, amount, gas).await
    }

    async fn supply(
        &self,
        pool: Address,
        call: SupplyCall,
        gas: GasSettings,
    ) -> Result<TxHash, ChainError> {
        (**self).supply(pool, call, gas).await
    }

    async fn wait_for_receipt(
        &self,
        tx: TxHash,
        confirmations: u64,
    ) -> Result<TxReceipt, ChainError> {
        (**self).wait_for_receipt(tx, confirmations).await
    }
}
