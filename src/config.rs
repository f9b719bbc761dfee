use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

use crate::ethereum::abi::BAYC_ADDRESS;

/// Environment variable holding the HTTPS JSON-RPC endpoint.
pub const PROVIDER_URL_ENV: &str = "INFURA_HTTPS_URI";

/// Used when no endpoint is configured; fails the connectivity check.
pub const PLACEHOLDER_RPC_URL: &str = "<your Infura HTTPs URI>";

pub const DEFAULT_WALLET: &str = "0x85F34591e36b86E3c7417A9a3551A0DFe1A71b37";
pub const DEFAULT_TOKEN_ID: u64 = 2321;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub provider: ProviderConfig,
    pub contract: ContractConfig,
    pub query: QueryConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub rpc_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractConfig {
    pub label: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    pub wallet: String,
    pub token_id: u64,
}

/// Values given on the command line; each one replaces its config entry.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub rpc_url: Option<String>,
    pub wallet: Option<String>,
    pub token_id: Option<u64>,
    pub contract: Option<String>,
    pub label: Option<String>,
}

/// Report prefix used when `--contract` points elsewhere and no `--label` is given.
pub const GENERIC_CONTRACT_LABEL: &str = "Contract";

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            rpc_url: PLACEHOLDER_RPC_URL.to_string(),
        }
    }
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            label: "BAYC".to_string(),
            address: BAYC_ADDRESS.to_string(),
        }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            wallet: DEFAULT_WALLET.to_string(),
            token_id: DEFAULT_TOKEN_ID,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub async fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {:?}: {}", path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {:?}: {}", path, e))?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    #[cfg(test)]
    pub async fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)
            .map_err(|e| anyhow!("Failed to serialize config: {}", e))?;

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).await.map_err(|e| {
                    anyhow!("Failed to create config directory {:?}: {}", parent, e)
                })?;
            }
        }

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {:?}: {}", path, e))?;

        Ok(())
    }

    /// Load configuration with fallback to default, then apply the environment
    pub async fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Self {
        let mut config = match path {
            Some(path) => match Self::load_from_file(path).await {
                Ok(config) => {
                    tracing::info!("Loaded configuration from file");
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to load config file, using defaults: {}", e);
                    Self::default()
                }
            },
            None => Self::default(),
        };

        config.apply_env_vars();
        config
    }

    fn apply_env_vars(&mut self) {
        self.apply_env(|key| std::env::var(key).ok());
    }

    /// Applies overrides from `lookup`, which maps variable names to values.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup(PROVIDER_URL_ENV).filter(|url| !url.trim().is_empty()) {
            Some(url) => {
                tracing::debug!("Using {} for the RPC endpoint", PROVIDER_URL_ENV);
                self.provider.rpc_url = url;
            }
            None if self.uses_placeholder_endpoint() => {
                tracing::warn!(
                    "No RPC endpoint configured, set the {} environment variable",
                    PROVIDER_URL_ENV
                );
            }
            None => {}
        }
    }

    /// Applies command-line values on top of file and environment settings.
    pub fn apply_overrides(&mut self, overrides: CliOverrides) {
        if let Some(rpc_url) = overrides.rpc_url {
            self.provider.rpc_url = rpc_url;
        }
        if let Some(wallet) = overrides.wallet {
            self.query.wallet = wallet;
        }
        if let Some(token_id) = overrides.token_id {
            self.query.token_id = token_id;
        }
        if let Some(contract) = overrides.contract {
            // the configured label describes the configured contract only
            if !contract.trim().eq_ignore_ascii_case(self.contract.address.trim()) {
                self.contract.label = GENERIC_CONTRACT_LABEL.to_string();
            }
            self.contract.address = contract;
        }
        if let Some(label) = overrides.label {
            self.contract.label = label;
        }
    }

    pub fn uses_placeholder_endpoint(&self) -> bool {
        self.provider.rpc_url == PLACEHOLDER_RPC_URL
            || self.provider.rpc_url.contains("YOUR_PROJECT_ID")
    }

    /// Get default config file path
    pub fn default_config_path() -> Result<std::path::PathBuf> {
        let config_dir =
            dirs::config_dir().ok_or_else(|| anyhow!("Could not determine config directory"))?;
        Ok(config_dir.join("bayc-reader").join("config.toml"))
    }

    /// Generate a sample configuration file
    pub fn generate_sample() -> String {
        let sample_config = r#"# bayc-reader configuration file

[provider]
# HTTPS JSON-RPC endpoint. The INFURA_HTTPS_URI environment variable and the
# --rpc-url flag take precedence over this value.
rpc_url = "https://mainnet.infura.io/v3/YOUR_PROJECT_ID"

[contract]
# Prefix used on report lines
label = "BAYC"
address = "0xBC4CA0EdA7647A8aB7C2061c2E118A18a936f13D"

[query]
wallet = "0x85F34591e36b86E3c7417A9a3551A0DFe1A71b37"
token_id = 2321
"#;
        sample_config.to_string()
    }
}
