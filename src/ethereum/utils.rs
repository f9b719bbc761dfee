use alloy::primitives::Address;
use std::str::FromStr;

use crate::error::{ClientError, Result};

/// Validates an Ethereum address in any letter case and parses it.
pub fn validate_address(address: &str) -> Result<Address> {
    let address = address.trim();
    let invalid = |reason: &str| ClientError::InvalidAddress {
        address: address.to_string(),
        reason: reason.to_string(),
    };

    if address.is_empty() {
        return Err(invalid("address cannot be empty"));
    }

    if !address.starts_with("0x") && !address.starts_with("0X") {
        return Err(invalid("Ethereum addresses must start with '0x'"));
    }

    if address.len() != 42 {
        return Err(invalid(
            "Ethereum addresses must be exactly 42 characters (0x + 40 hex characters)",
        ));
    }

    if !address[2..].chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid("contains non-hexadecimal characters"));
    }

    Address::from_str(&address[2..]).map_err(|e| invalid(&e.to_string()))
}

/// Returns the EIP-55 mixed-case form of `address`.
pub fn to_checksum_address(address: &str) -> Result<String> {
    Ok(validate_address(address)?.to_checksum(None))
}

/// JSON-RPC error code geth and most providers use for a reverted `eth_call`.
pub const EXECUTION_REVERTED_CODE: i64 = 3;

/// True when a JSON-RPC error object reports that the call itself reverted,
/// as opposed to a provider-side failure such as a rate limit.
pub fn is_execution_revert(code: i64, message: &str) -> bool {
    code == EXECUTION_REVERTED_CODE || message.to_ascii_lowercase().contains("revert")
}

/// Creates user-friendly error messages for common RPC errors
pub fn interpret_rpc_error(error: &str) -> String {
    if error.contains("execution reverted") {
        format!(
            "The contract function reverted execution ({}), the token may not exist or a requirement was not met",
            error
        )
    } else if error.contains("connection refused")
        || error.contains("Connection refused")
        || error.contains("network unreachable")
    {
        "Network error: Cannot connect to RPC endpoint".to_string()
    } else if error.contains("timeout") || error.contains("timed out") {
        "Network error: Request timed out, the RPC endpoint may be overloaded or unreachable"
            .to_string()
    } else if error.contains("401") || error.contains("403") || error.contains("invalid project id") {
        "Authentication error: The RPC endpoint rejected the request credentials".to_string()
    } else if error.contains("rate limit") || error.contains("429") {
        "Rate limit error: Too many requests to the RPC endpoint, try again later or use a different endpoint".to_string()
    } else if error.contains("method not found") {
        "RPC error: The requested method is not supported by this RPC endpoint".to_string()
    } else {
        format!("RPC error: {}", error)
    }
}
