use anyhow::{Context, Result};
use serde_json::json;
use std::io::Write;
use tracing::info;

use crate::config::QueryConfig;
use crate::ethereum::{abi::ContractDescriptor, utils, ChainClient};
use crate::orchestrator::Orchestrator;

/// Prints connectivity, latest block, wallet balance and the five contract
/// views to `out`, one line each, stopping at the first error.
pub async fn run<C, W>(
    orchestrator: &Orchestrator<C>,
    descriptor: &ContractDescriptor,
    query: &QueryConfig,
    out: &mut W,
) -> Result<()>
where
    C: ChainClient,
    W: Write,
{
    let label = &descriptor.label;
    let token_id = query.token_id;

    writeln!(out, "Connected: {}", orchestrator.is_connected().await)?;

    let block = orchestrator
        .fetch_latest_block()
        .await
        .context("Failed to fetch latest block")?;
    writeln!(out, "Latest block: {}", block)?;

    info!("Wallet: {}", utils::to_checksum_address(&query.wallet)?);
    let balance = orchestrator
        .fetch_balance(&query.wallet)
        .await
        .context("Failed to fetch wallet balance")?;
    writeln!(out, "Wallet balance (Wei): {}", balance)?;

    info!("Querying {} at {}", label, descriptor.address);
    let views = [
        ("owner", Vec::new(), format!("{} owner", label)),
        ("totalSupply", Vec::new(), format!("{} total supply", label)),
        ("symbol", Vec::new(), format!("{} symbol", label)),
        (
            "tokenURI",
            vec![json!(token_id)],
            format!("{} tokenURI({})", label, token_id),
        ),
        (
            "ownerOf",
            vec![json!(token_id)],
            format!("{} ownerOf({})", label, token_id),
        ),
    ];

    for (method, args, line_label) in views {
        let value = orchestrator
            .call_contract_view(descriptor, method, &args)
            .await
            .with_context(|| format!("Failed to query {}", line_label))?;
        writeln!(out, "{}: {}", line_label, value)?;
    }

    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::ethereum::mock::MockChain;
    use alloy::{
        dyn_abi::DynSolValue,
        primitives::{Address, U256},
    };

    fn full_chain(descriptor: &ContractDescriptor, query: &QueryConfig) -> MockChain {
        let owner: Address = "0xaba7161a7fb69c88e16ed9f455ce62b791ee4d03".parse().unwrap();
        let holder: Address = "0x2b2a4d4e3b8a3c1c5a3e4b1f8c1e3a9e2f8d6c1a".parse().unwrap();
        let wallet: Address = query.wallet.parse().unwrap();
        let token = [json!(query.token_id)];

        MockChain::new()
            .with_balance(wallet, U256::from(5u64))
            .with_view(descriptor, "owner", &[], DynSolValue::Address(owner))
            .with_view(
                descriptor,
                "totalSupply",
                &[],
                DynSolValue::Uint(U256::from(10_000u64), 256),
            )
            .with_view(descriptor, "symbol", &[], DynSolValue::String("BAYC".into()))
            .with_view(
                descriptor,
                "tokenURI",
                &token,
                DynSolValue::String(String::new()),
            )
            .with_view(descriptor, "ownerOf", &token, DynSolValue::Address(holder))
    }

    #[tokio::test]
    async fn test_report_lines_in_order() {
        let descriptor = ContractDescriptor::bayc().unwrap();
        let query = QueryConfig::default();
        let orchestrator = Orchestrator::connect(full_chain(&descriptor, &query))
            .await
            .unwrap();

        let mut out = Vec::new();
        run(&orchestrator, &descriptor, &query, &mut out)
            .await
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], "Connected: true");
        assert!(lines[1].starts_with("Latest block: {"));
        assert_eq!(lines[2], "Wallet balance (Wei): 5");
        assert_eq!(
            lines[3],
            "BAYC owner: 0xaBA7161A7fb69c88e16ED9f455CE62B791EE4D03"
        );
        assert_eq!(lines[4], "BAYC total supply: 10000");
        assert_eq!(lines[5], "BAYC symbol: BAYC");
        // an empty value still gets its line
        assert_eq!(lines[6], "BAYC tokenURI(2321): ");
        assert!(lines[7].starts_with("BAYC ownerOf(2321): 0x"));
        assert_eq!(lines[7].len(), "BAYC ownerOf(2321): ".len() + 42);
    }

    #[tokio::test]
    async fn test_report_zero_balance_still_printed() {
        let descriptor = ContractDescriptor::bayc().unwrap();
        let query = QueryConfig {
            wallet: "0x0000000000000000000000000000000000000001".to_string(),
            token_id: 2321,
        };
        let mut chain = full_chain(&descriptor, &QueryConfig::default());
        chain = chain.with_balance(query.wallet.parse().unwrap(), U256::ZERO);
        let orchestrator = Orchestrator::connect(chain).await.unwrap();

        let mut out = Vec::new();
        run(&orchestrator, &descriptor, &query, &mut out)
            .await
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Wallet balance (Wei): 0\n"));
        assert_eq!(text.lines().count(), 8);
    }

    #[tokio::test]
    async fn test_report_stops_at_first_failure() {
        let descriptor = ContractDescriptor::bayc().unwrap();
        let query = QueryConfig::default();
        let chain = full_chain(&descriptor, &query).with_revert(
            &descriptor,
            "tokenURI",
            &[json!(query.token_id)],
            "execution reverted: URI query for nonexistent token",
        );
        let orchestrator = Orchestrator::connect(chain).await.unwrap();

        let mut out = Vec::new();
        let err = run(&orchestrator, &descriptor, &query, &mut out)
            .await
            .unwrap_err();

        let client_error = err.downcast_ref::<ClientError>().unwrap();
        assert!(client_error.is_remote_call());

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 6);
        assert!(!text.contains("ownerOf"));
    }
}
