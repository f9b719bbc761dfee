use alloy::{
    eips::BlockNumberOrTag,
    primitives::{Address, Bytes, U256},
    providers::{Provider, ProviderBuilder, RootProvider},
    rpc::types::{BlockTransactionsKind, TransactionRequest},
    transports::{
        http::{reqwest::Url, Client, Http},
        RpcError, TransportErrorKind,
    },
};
use async_trait::async_trait;
use tracing::debug;

use super::{utils, BlockRecord, ChainClient};
use crate::error::{ClientError, Result};

/// `ChainClient` backed by an alloy HTTP provider bound to a single endpoint.
#[derive(Debug, Clone)]
pub struct AlloyClient {
    provider: RootProvider<Http<Client>>,
}

impl AlloyClient {
    /// Builds the HTTP provider. No request is sent until the first call.
    pub fn new(rpc_url: &str) -> Result<Self> {
        let url = Url::parse(rpc_url.trim()).map_err(|e| ClientError::Connection {
            reason: format!("invalid RPC URL: {}", e),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::Connection {
                reason: format!("unsupported URL scheme '{}'", url.scheme()),
            });
        }

        let provider = ProviderBuilder::new().on_http(url);

        Ok(Self { provider })
    }
}

fn transport_error(e: RpcError<TransportErrorKind>) -> ClientError {
    ClientError::Transport(utils::interpret_rpc_error(&e.to_string()))
}

#[async_trait]
impl ChainClient for AlloyClient {
    async fn check_connection(&self) -> Result<u64> {
        self.provider.get_block_number().await.map_err(|e| {
            debug!("Connection check failed: {}", e);
            transport_error(e)
        })
    }

    async fn chain_id(&self) -> Result<u64> {
        self.provider.get_chain_id().await.map_err(transport_error)
    }

    async fn latest_block(&self) -> Result<BlockRecord> {
        let block = self
            .provider
            .get_block_by_number(BlockNumberOrTag::Latest, BlockTransactionsKind::Hashes)
            .await
            .map_err(transport_error)?
            .ok_or_else(|| ClientError::MissingBlock("latest".to_string()))?;

        let value = serde_json::to_value(&block)
            .map_err(|e| ClientError::Transport(format!("Failed to serialize block: {}", e)))?;

        Ok(BlockRecord(value))
    }

    async fn balance_of(&self, address: Address) -> Result<U256> {
        debug!("eth_getBalance {}", address);
        self.provider
            .get_balance(address)
            .await
            .map_err(transport_error)
    }

    async fn call(&self, to: Address, calldata: Bytes) -> Result<Bytes> {
        let call_request = TransactionRequest::default().to(to).input(calldata.into());

        self.provider.call(&call_request).await.map_err(|e| {
            match e.as_error_resp() {
                Some(payload) if utils::is_execution_revert(payload.code, &payload.message) => {
                    ClientError::RemoteCall {
                        method: "eth_call".to_string(),
                        reason: utils::interpret_rpc_error(&payload.message),
                    }
                }
                _ => transport_error(e),
            }
        })
    }
}
