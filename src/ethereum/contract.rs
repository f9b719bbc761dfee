use alloy::{
    dyn_abi::{DynSolValue, FunctionExt, JsonAbiExt},
    json_abi::Function,
    primitives::{Bytes, U256},
};
use serde_json::Value;
use std::str::FromStr;
use tracing::debug;

use super::{abi::ContractDescriptor, utils, ChainClient, ViewValue};
use crate::error::{ClientError, Result};

/// Calls a read-only function of `descriptor` and decodes its single output.
pub async fn call_view_function<C: ChainClient + ?Sized>(
    client: &C,
    descriptor: &ContractDescriptor,
    function_name: &str,
    parameters: &[Value],
) -> Result<ViewValue> {
    let function = descriptor.function(function_name)?;

    let calldata = encode_function_call(function, parameters)?;
    debug!(
        "eth_call {}.{} to {} with calldata 0x{}",
        descriptor.label,
        function_name,
        descriptor.address,
        hex::encode(&calldata)
    );

    let result_bytes = client
        .call(descriptor.address, calldata)
        .await
        .map_err(|e| match e {
            ClientError::RemoteCall { reason, .. } => ClientError::RemoteCall {
                method: function.signature(),
                reason,
            },
            other => other,
        })?;

    if result_bytes.is_empty() {
        return Err(ClientError::RemoteCall {
            method: function.signature(),
            reason: format!(
                "call returned no data; is there a contract at {} on this network?",
                descriptor.address
            ),
        });
    }

    decode_function_result(function, &result_bytes)
}

/// Encode positional parameters for a contract call
pub fn encode_function_call(function: &Function, parameters: &[Value]) -> Result<Bytes> {
    if parameters.len() != function.inputs.len() {
        return Err(ClientError::ArgumentMismatch {
            method: function.signature(),
            expected: function.inputs.len(),
            got: parameters.len(),
        });
    }

    let mut inputs = Vec::with_capacity(parameters.len());
    for (i, (param_value, input)) in parameters.iter().zip(&function.inputs).enumerate() {
        let value = json_to_dyn_sol_value(param_value, &input.ty).map_err(|reason| {
            ClientError::InvalidArgument {
                index: i + 1,
                ty: input.ty.clone(),
                reason,
            }
        })?;
        inputs.push(value);
    }

    let encoded = function
        .abi_encode_input(&inputs)
        .map_err(|e| ClientError::Abi(format!("Failed to encode function inputs: {}", e)))?;

    Ok(encoded.into())
}

/// Decode function call result
pub fn decode_function_result(function: &Function, result_bytes: &Bytes) -> Result<ViewValue> {
    let decoded = function
        .abi_decode_output(result_bytes, false)
        .map_err(|e| {
            ClientError::Abi(format!(
                "Failed to decode output of '{}' (raw 0x{}): {}",
                function.name,
                hex::encode(result_bytes),
                e
            ))
        })?;

    match decoded.as_slice() {
        [value] => dyn_sol_value_to_view(value),
        values => Err(ClientError::Abi(format!(
            "Expected a single return value from '{}', got {}",
            function.name,
            values.len()
        ))),
    }
}

/// Convert JSON value to DynSolValue based on expected Solidity type
fn json_to_dyn_sol_value(value: &Value, sol_type: &str) -> std::result::Result<DynSolValue, String> {
    match sol_type {
        "address" => {
            let addr_str = value.as_str().ok_or("Address must be a string")?;
            let address = utils::validate_address(addr_str).map_err(|e| e.to_string())?;
            Ok(DynSolValue::Address(address))
        }
        ty if ty.starts_with("uint") => {
            let bits = ty[4..].parse::<usize>().unwrap_or(256);
            let num = match value {
                Value::Number(n) => n
                    .as_u64()
                    .map(U256::from)
                    .ok_or_else(|| format!("Invalid uint value: {}", n))?,
                Value::String(s) => match s.strip_prefix("0x") {
                    Some(hex_digits) => U256::from_str_radix(hex_digits, 16),
                    None => U256::from_str(s),
                }
                .map_err(|_| format!("Invalid uint string: {}", s))?,
                _ => return Err("Uint must be a number or string".to_string()),
            };
            Ok(DynSolValue::Uint(num, bits))
        }
        "string" => {
            let s = value.as_str().ok_or("String parameter must be a string")?;
            Ok(DynSolValue::String(s.to_string()))
        }
        "bool" => {
            let b = value.as_bool().ok_or("Bool parameter must be a boolean")?;
            Ok(DynSolValue::Bool(b))
        }
        "bytes" => {
            let hex_str = value.as_str().ok_or("Bytes must be a hex string")?;
            let bytes = hex::decode(hex_str.trim_start_matches("0x"))
                .map_err(|_| format!("Invalid hex string: {}", hex_str))?;
            Ok(DynSolValue::Bytes(bytes))
        }
        _ => Err(format!("Unsupported Solidity type: {}", sol_type)),
    }
}

fn dyn_sol_value_to_view(value: &DynSolValue) -> Result<ViewValue> {
    match value {
        DynSolValue::Address(addr) => Ok(ViewValue::Address(*addr)),
        DynSolValue::Uint(num, _) => Ok(ViewValue::Uint(*num)),
        DynSolValue::String(s) => Ok(ViewValue::String(s.clone())),
        DynSolValue::Bool(b) => Ok(ViewValue::Bool(*b)),
        DynSolValue::Bytes(bytes) => Ok(ViewValue::Bytes(bytes.clone())),
        DynSolValue::FixedBytes(word, size) => Ok(ViewValue::Bytes(word[..*size].to_vec())),
        _ => Err(ClientError::Abi(format!(
            "Unsupported return type: {:?}",
            value
        ))),
    }
}
