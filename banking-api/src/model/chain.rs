use alloy_primitives::{Address, TxHash, U256};
use serde::{Deserialize, Serialize};

/// Native currency descriptor used when asking a wallet to add a network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Parameters of the network the client expects to talk to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkParams {
    pub chain_id: u64,
    pub chain_name: String,
    pub native_currency: NativeCurrency,
    pub rpc_urls: Vec<String>,
    pub block_explorer_urls: Vec<String>,
}

impl NetworkParams {
    /// Hex chain id as wallets expect it ("0x2105" for 8453).
    pub fn hex_chain_id(&self) -> String {
        format!("{:#x}", self.chain_id)
    }
}

/// Gas parameters attached to a submitted transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasSettings {
    pub gas_limit: u64,
    /// Legacy gas price in wei; `None` lets the provider estimate.
    pub gas_price_wei: Option<u128>,
}

/// Arguments of the lending pool `supply` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupplyCall {
    pub asset: Address,
    pub amount: U256,
    pub on_behalf_of: Address,
    pub referral_code: u16,
}

/// Minimal view of a mined transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_chain_id() {
        let params = NetworkParams {
            chain_id: 8453,
            chain_name: "Base Mainnet".into(),
            native_currency: NativeCurrency {
                name: "Ethereum".into(),
                symbol: "ETH".into(),
                decimals: 18,
            },
            rpc_urls: vec![],
            block_explorer_urls: vec![],
        };
        assert_eq!(params.hex_chain_id(), "0x2105");
    }
}
