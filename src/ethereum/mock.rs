//! In-memory `ChainClient` used by unit tests.

use alloy::{
    dyn_abi::{DynSolValue, FunctionExt},
    primitives::{Address, Bytes, U256},
};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;

use super::{abi::ContractDescriptor, contract, BlockRecord, ChainClient};
use crate::error::{ClientError, Result};

#[derive(Debug)]
pub struct MockChain {
    reachable: bool,
    chain_id: u64,
    block: Value,
    balances: HashMap<Address, U256>,
    calls: HashMap<(Address, Bytes), std::result::Result<Bytes, String>>,
    log: Mutex<Vec<String>>,
}

impl MockChain {
    pub fn new() -> Self {
        Self {
            reachable: true,
            chain_id: 1,
            block: json!({
                "number": "0x1312d00",
                "hash": "0x5e6f1c1b1a7bd6a3d4b7e4a8f7e1a3e5c2b4d6f8a0c2e4f6a8b0c2d4e6f8a0b2",
                "timestamp": "0x6553f100",
                "transactions": []
            }),
            balances: HashMap::new(),
            calls: HashMap::new(),
            log: Mutex::new(Vec::new()),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            reachable: false,
            ..Self::new()
        }
    }

    pub fn with_balance(mut self, address: Address, wei: U256) -> Self {
        self.balances.insert(address, wei);
        self
    }

    pub fn with_view(
        mut self,
        descriptor: &ContractDescriptor,
        function_name: &str,
        parameters: &[Value],
        output: DynSolValue,
    ) -> Self {
        let function = descriptor.function(function_name).unwrap();
        let calldata = contract::encode_function_call(function, parameters).unwrap();
        let returned = function.abi_encode_output(&[output]).unwrap();
        self.calls
            .insert((descriptor.address, calldata), Ok(returned.into()));
        self
    }

    pub fn with_revert(
        mut self,
        descriptor: &ContractDescriptor,
        function_name: &str,
        parameters: &[Value],
        reason: &str,
    ) -> Self {
        let function = descriptor.function(function_name).unwrap();
        let calldata = contract::encode_function_call(function, parameters).unwrap();
        self.calls
            .insert((descriptor.address, calldata), Err(reason.to_string()));
        self
    }

    /// Requests seen so far, as JSON-RPC method names.
    pub fn requests(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests().iter().filter(|m| *m == "eth_call").count()
    }

    fn record(&self, method: &str) -> Result<()> {
        self.log.lock().unwrap().push(method.to_string());
        if self.reachable {
            Ok(())
        } else {
            Err(ClientError::Transport(
                "error sending request: Connection refused".to_string(),
            ))
        }
    }
}

#[async_trait]
impl ChainClient for MockChain {
    async fn check_connection(&self) -> Result<u64> {
        self.record("eth_blockNumber")?;
        Ok(20_000_000)
    }

    async fn chain_id(&self) -> Result<u64> {
        self.record("eth_chainId")?;
        Ok(self.chain_id)
    }

    async fn latest_block(&self) -> Result<BlockRecord> {
        self.record("eth_getBlockByNumber")?;
        Ok(BlockRecord(self.block.clone()))
    }

    async fn balance_of(&self, address: Address) -> Result<U256> {
        self.record("eth_getBalance")?;
        Ok(self.balances.get(&address).copied().unwrap_or_default())
    }

    async fn call(&self, to: Address, calldata: Bytes) -> Result<Bytes> {
        self.record("eth_call")?;
        match self.calls.get(&(to, calldata)) {
            Some(Ok(data)) => Ok(data.clone()),
            Some(Err(reason)) => Err(ClientError::RemoteCall {
                method: "eth_call".to_string(),
                reason: reason.clone(),
            }),
            None => Ok(Bytes::new()),
        }
    }
}
