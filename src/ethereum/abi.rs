use alloy::{json_abi::JsonAbi, primitives::Address};

use crate::config::ContractConfig;
use crate::error::{ClientError, Result};
use crate::ethereum::utils;

/// Canonical BAYC contract on Ethereum mainnet.
pub const BAYC_ADDRESS: &str = "0xBC4CA0EdA7647A8aB7C2061c2E118A18a936f13D";

/// Minimal ABI covering only the read-only functions this tool calls.
pub const BAYC_MINIMAL_ABI: &str = r#"[
  {"inputs": [], "name": "owner", "outputs": [{"internalType": "address", "name": "", "type": "address"}], "stateMutability": "view", "type": "function"},
  {"inputs": [], "name": "totalSupply", "outputs": [{"internalType": "uint256", "name": "", "type": "uint256"}], "stateMutability": "view", "type": "function"},
  {"inputs": [], "name": "symbol", "outputs": [{"internalType": "string", "name": "", "type": "string"}], "stateMutability": "view", "type": "function"},
  {"inputs": [{"internalType": "uint256", "name": "tokenId", "type": "uint256"}], "name": "tokenURI", "outputs": [{"internalType": "string", "name": "", "type": "string"}], "stateMutability": "view", "type": "function"},
  {"inputs": [{"internalType": "uint256", "name": "tokenId", "type": "uint256"}], "name": "ownerOf", "outputs": [{"internalType": "address", "name": "", "type": "address"}], "stateMutability": "view", "type": "function"}
]"#;

/// A contract address paired with the interface used to talk to it.
#[derive(Debug, Clone)]
pub struct ContractDescriptor {
    pub label: String,
    pub address: Address,
    pub abi: JsonAbi,
}

impl ContractDescriptor {
    pub fn new(label: impl Into<String>, address: &str, abi_json: &str) -> Result<Self> {
        let address = utils::validate_address(address)?;
        let abi: JsonAbi = serde_json::from_str(abi_json)
            .map_err(|e| ClientError::Abi(format!("Failed to parse ABI JSON: {}", e)))?;

        Ok(Self {
            label: label.into(),
            address,
            abi,
        })
    }

    #[cfg(test)]
    pub fn bayc() -> Result<Self> {
        Self::new("BAYC", BAYC_ADDRESS, BAYC_MINIMAL_ABI)
    }

    /// Descriptor for the configured contract, using the minimal BAYC interface.
    pub fn from_config(config: &ContractConfig) -> Result<Self> {
        Self::new(config.label.clone(), &config.address, BAYC_MINIMAL_ABI)
    }

    pub fn function(&self, name: &str) -> Result<&alloy::json_abi::Function> {
        self.abi
            .functions()
            .find(|f| f.name == name)
            .ok_or_else(|| {
                let available: Vec<String> =
                    self.abi.functions().map(|f| f.name.clone()).collect();
                ClientError::UnknownMethod {
                    method: name.to_string(),
                    available: if available.is_empty() {
                        "(the contract interface contains no functions)".to_string()
                    } else {
                        available.join(", ")
                    },
                }
            })
    }
}
