//! Application configuration.
//!
//! Loaded once at startup and passed by reference to whatever needs it;
//! nothing here is global or mutable after construction.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Emulator,
    Testnet,
    Mainnet,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChainConfig {
    #[serde(default = "default_access_node")]
    pub access_node: String,
    #[serde(default = "default_wallet_discovery")]
    pub wallet_discovery: String,
    #[serde(default)]
    pub network: Network,
    /// Contract name → account address, e.g. `QuoteNFT → 0xf8d6e0586b0a20c7`.
    #[serde(default = "default_contracts")]
    pub contracts: BTreeMap<String, String>,
}

const EMULATOR_SERVICE_ACCOUNT: &str = "0xf8d6e0586b0a20c7";
const EMULATOR_FLOW_TOKEN: &str = "0x0ae53cb6e3f42a79";

fn default_access_node() -> String { "http://localhost:8888".to_string() }
fn default_wallet_discovery() -> String { "http://localhost:8701/fcl/authn".to_string() }

fn default_contracts() -> BTreeMap<String, String> {
    [
        ("QuoteNFT", EMULATOR_SERVICE_ACCOUNT),
        ("NonFungibleToken", EMULATOR_SERVICE_ACCOUNT),
        ("MetadataViews", EMULATOR_SERVICE_ACCOUNT),
        ("FlowToken", EMULATOR_FLOW_TOKEN),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            access_node: default_access_node(),
            wallet_discovery: default_wallet_discovery(),
            network: Network::default(),
            contracts: default_contracts(),
        }
    }
}

impl ChainConfig {
    pub fn contract_address(&self, name: &str) -> Option<&str> {
        self.contracts.get(name).map(String::as_str)
    }

    /// Replace `0x<ContractName>` placeholders in a cadence body with the
    /// configured addresses.
    pub fn resolve_imports(&self, cadence: &str) -> String {
        // Longest names first so no placeholder is a prefix of a later one.
        let mut names: Vec<_> = self.contracts.keys().collect();
        names.sort_by_key(|n| std::cmp::Reverse(n.len()));

        names.into_iter().fold(cadence.to_string(), |acc, name| {
            acc.replace(&format!("0x{name}"), &self.contracts[name])
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AppDetails {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_description")]
    pub description: String,
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default)]
    pub icon: Option<String>,
}

fn default_title() -> String { "Quote NFT Generator".to_string() }
fn default_description() -> String {
    "Generate and mint inspirational quotes as NFTs on Flow".to_string()
}
fn default_url() -> String { "http://localhost:3000".to_string() }

impl Default for AppDetails {
    fn default() -> Self {
        Self {
            title: default_title(),
            description: default_description(),
            url: default_url(),
            icon: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default)]
    pub chain: ChainConfig,
    #[serde(default)]
    pub app: AppDetails,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

fn default_output_dir() -> PathBuf { PathBuf::from(".") }
fn default_log_level() -> String { "warn".to_string() }

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            chain: ChainConfig::default(),
            app: AppDetails::default(),
            output_dir: default_output_dir(),
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

impl AppConfig {
    /// Read and validate a JSON config file. Missing keys take defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("accessNode", &self.chain.access_node),
            ("walletDiscovery", &self.chain.wallet_discovery),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("{field} cannot be empty")));
            }
        }
        for (name, address) in &self.chain.contracts {
            if !is_account_address(address) {
                return Err(ConfigError::Invalid(format!(
                    "contract {name} has malformed address {address:?}"
                )));
            }
        }
        Ok(())
    }
}

/// `0x` followed by exactly 16 hex digits.
pub fn is_account_address(value: &str) -> bool {
    value
        .strip_prefix("0x")
        .map(|hex| hex.len() == 16 && hex.chars().all(|c| c.is_ascii_hexdigit()))
        .unwrap_or(false)
}
