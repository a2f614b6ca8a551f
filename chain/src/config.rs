//! Chain configuration with TOML file support.

use agora_types::{ActionName, Principal, TokenAmount};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::ChainError;

/// Configuration for a governance chain.
///
/// Can be loaded from a TOML file via [`ChainConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Principal that deploys the `auth`, `token` and `voting` contracts.
    #[serde(default = "default_deployer")]
    pub deployer: Principal,

    /// Where the chain state snapshot is persisted between runs.
    #[serde(default = "default_state_path")]
    pub state_path: PathBuf,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// State applied at height 0, before the first block.
    #[serde(default)]
    pub genesis: GenesisConfig,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GenesisConfig {
    #[serde(default)]
    pub balances: Vec<GenesisBalance>,

    #[serde(default)]
    pub grants: Vec<GenesisGrant>,
}

/// Tokens minted to `principal` at genesis.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenesisBalance {
    pub principal: Principal,
    pub amount: TokenAmount,
}

/// A capability granted by the deployer at genesis.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenesisGrant {
    pub grantee: Principal,
    /// A full principal, or a bare contract name (`voting`) of the deployer.
    pub target: String,
    pub action: ActionName,
}

impl GenesisGrant {
    /// Resolve `target` against the deployer.
    pub fn target_principal(&self, deployer: &Principal) -> Result<Principal, ChainError> {
        if self.target.contains(Principal::CONTRACT_SEPARATOR) {
            Ok(Principal::parse(self.target.as_str())?)
        } else {
            Ok(Principal::contract(deployer, &self.target)?)
        }
    }
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_deployer() -> Principal {
    Principal::new("ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM")
}

fn default_state_path() -> PathBuf {
    PathBuf::from("./agora_state.bin")
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl ChainConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ChainError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ChainError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ChainError> {
        toml::from_str(s).map_err(|e| ChainError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ChainError> {
        toml::to_string_pretty(self).map_err(|e| ChainError::Config(e.to_string()))
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            deployer: default_deployer(),
            state_path: default_state_path(),
            log_format: default_log_format(),
            log_level: default_log_level(),
            genesis: GenesisConfig::default(),
        }
    }
}
