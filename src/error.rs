use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Unable to connect to Ethereum provider ({reason}). Check INFURA_HTTPS_URI.")]
    Connection { reason: String },

    #[error("Contract call '{method}' failed: {reason}")]
    RemoteCall { method: String, reason: String },

    #[error("Invalid Ethereum address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Function '{method}' not found in contract interface. Available functions: {available}")]
    UnknownMethod { method: String, available: String },

    #[error("Parameter count mismatch for function '{method}': expected {expected}, got {got}")]
    ArgumentMismatch {
        method: String,
        expected: usize,
        got: usize,
    },

    #[error("Invalid parameter #{index} of type '{ty}': {reason}")]
    InvalidArgument {
        index: usize,
        ty: String,
        reason: String,
    },

    #[error("ABI error: {0}")]
    Abi(String),

    #[error("{0}")]
    Transport(String),

    #[error("Provider returned no block for '{0}'")]
    MissingBlock(String),
}

impl ClientError {
    /// True for failures the node reported for a specific `eth_call`.
    #[cfg(test)]
    pub fn is_remote_call(&self) -> bool {
        matches!(self, Self::RemoteCall { .. })
    }

    #[cfg(test)]
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
