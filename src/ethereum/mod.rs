pub mod abi;
pub mod contract;
pub mod provider;
pub mod utils;

#[cfg(test)]
pub mod mock;

use alloy::primitives::{Address, Bytes, U256};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::error::Result;

/// Read-only surface of an Ethereum JSON-RPC node.
///
/// Orchestration code talks to the chain only through this trait, so it can be
/// exercised against an in-memory node in tests.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Cheapest request that proves the endpoint answers (`eth_blockNumber`).
    async fn check_connection(&self) -> Result<u64>;

    async fn chain_id(&self) -> Result<u64>;

    async fn latest_block(&self) -> Result<BlockRecord>;

    async fn balance_of(&self, address: Address) -> Result<U256>;

    /// Executes `eth_call` against `to` and returns the raw return data.
    async fn call(&self, to: Address, calldata: Bytes) -> Result<Bytes>;
}

/// A block as returned by the node, kept in its JSON-RPC shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockRecord(pub Value);

impl BlockRecord {
    pub fn number(&self) -> Option<u64> {
        let raw = self.0.get("number")?.as_str()?;
        u64::from_str_radix(raw.trim_start_matches("0x"), 16).ok()
    }

    pub fn hash(&self) -> Option<&str> {
        self.0.get("hash")?.as_str()
    }

    pub fn transaction_count(&self) -> usize {
        self.0
            .get("transactions")
            .and_then(Value::as_array)
            .map_or(0, Vec::len)
    }
}

impl fmt::Display for BlockRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Decoded return value of a contract view function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewValue {
    Address(Address),
    Uint(U256),
    String(String),
    Bool(bool),
    Bytes(Vec<u8>),
}

#[cfg(test)]
impl ViewValue {
    pub fn as_address(&self) -> Option<Address> {
        match self {
            Self::Address(addr) => Some(*addr),
            _ => None,
        }
    }

    pub fn as_uint(&self) -> Option<U256> {
        match self {
            Self::Uint(num) => Some(*num),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for ViewValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address(addr) => f.write_str(&addr.to_checksum(None)),
            Self::Uint(num) => write!(f, "{}", num),
            Self::String(s) => f.write_str(s),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Bytes(bytes) => write!(f, "0x{}", hex::encode(bytes)),
        }
    }
}
