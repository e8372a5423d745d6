use crate::error::ChainError;
use crate::model::chain::NetworkParams;
use alloy_primitives::Address;
use async_trait::async_trait;
use std::sync::Arc;

/// Authentication and account capability provided by the wallet.
#[async_trait]
pub trait Wallet: Send + Sync {
    /// The provider finished initialising.
    fn is_ready(&self) -> bool;

    fn is_authenticated(&self) -> bool;

    /// Connected account, if any.
    fn address(&self) -> Option<Address>;

    async fn login(&self) -> Result<Address, ChainError>;

    async fn logout(&self) -> Result<(), ChainError>;

    /// Asks the wallet to switch to `network`.
    ///
    /// Returns `ChainError::UnrecognizedChain` when the wallet does not know it.
    async fn switch_network(&self, network: &NetworkParams) -> Result<(), ChainError>;

    /// Asks the wallet to register `network`.
    async fn add_network(&self, network: &NetworkParams) -> Result<(), ChainError>;
}

#[async_trait]
impl<T: Wallet + ?Sized> Wallet for Arc<T> {
    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }

    fn is_authenticated(&self) -> bool {
        (**self).is_authenticated()
    }

    fn address(&self) -> Option<Address> {
        (**self).address()
    }

    async fn login(&self) -> Result<Address, ChainError> {
        (**self).login().await
    }

    async fn logout(&self) -> Result<(), ChainError> {
        (**self).logout().await
    }

    async fn switch_network(&self, network: &NetworkParams) -> Result<(), ChainError> {
        (**self).switch_network(network).await
    }

    async fn add_network(&self, network: &NetworkParams) -> Result<(), ChainError> {
        (**self).add_network(network).await
    }
}
