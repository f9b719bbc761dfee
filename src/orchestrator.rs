use alloy::primitives::U256;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{ClientError, Result};
use crate::ethereum::{
    abi::ContractDescriptor, contract, provider::AlloyClient, utils, BlockRecord, ChainClient,
    ViewValue,
};

/// Owns the connection to a node that has answered the connectivity check.
///
/// The only way to get one is through [`Orchestrator::connect`] or
/// [`establish_connection`], so every request it issues happens after a
/// successful connectivity check.
#[derive(Debug)]
pub struct Orchestrator<C> {
    client: C,
}

/// Connects to `endpoint` over HTTP(S) and checks that it answers.
pub async fn establish_connection(endpoint: &str) -> Result<Orchestrator<AlloyClient>> {
    let client = AlloyClient::new(endpoint)?;
    Orchestrator::connect(client).await
}

impl<C: ChainClient> Orchestrator<C> {
    pub async fn connect(client: C) -> Result<Self> {
        let head = client
            .check_connection()
            .await
            .map_err(|e| ClientError::Connection {
                reason: e.to_string(),
            })?;

        match client.chain_id().await {
            Ok(chain_id) => info!("Connected to chain {} at block {}", chain_id, head),
            Err(e) => debug!("Could not read chain id: {}", e),
        }

        Ok(Self { client })
    }

    /// Re-runs the connectivity check against the node.
    pub async fn is_connected(&self) -> bool {
        match self.client.check_connection().await {
            Ok(_) => true,
            Err(e) => {
                debug!("Connection check failed: {}", e);
                false
            }
        }
    }

    pub async fn fetch_latest_block(&self) -> Result<BlockRecord> {
        let block = self.client.latest_block().await?;
        debug!(
            "Latest block {:?} {:?} ({} transactions)",
            block.number(),
            block.hash(),
            block.transaction_count()
        );
        Ok(block)
    }

    /// Balance in wei. `address` may be in any letter case.
    pub async fn fetch_balance(&self, address: &str) -> Result<U256> {
        let address = utils::validate_address(address)?;
        debug!("Fetching balance of {}", address.to_checksum(None));

        self.client.balance_of(address).await
    }

    pub async fn call_contract_view(
        &self,
        descriptor: &ContractDescriptor,
        method_name: &str,
        args: &[Value],
    ) -> Result<ViewValue> {
        contract::call_view_function(&self.client, descriptor, method_name, args).await
    }
}
