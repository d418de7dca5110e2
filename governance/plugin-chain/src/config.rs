//! Plugin chain configuration

use {
    crate::error::{PluginChainError, PluginChainResult},
    serde_derive::{Deserialize, Serialize},
    solana_program::pubkey::Pubkey,
    std::{fs::File, path::Path, str::FromStr, time::Duration},
};

/// Default SPL Governance program id
pub const DEFAULT_GOVERNANCE_PROGRAM_ID: &str = "GovER5Lthms3bLBqWub97yVrMmEogzX7xNjdXpPPCVZw";

/// Default JSON RPC url
pub const DEFAULT_JSON_RPC_URL: &str = "http://localhost:8899";

/// Default timeout of a single ledger read
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 10_000;

/// Plugin chain configuration
///
/// Stored as YAML, the same format the Solana CLI config uses. Missing fields take defaults
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginChainConfig {
    /// JSON RPC url of the cluster
    pub json_rpc_url: String,

    /// spl-governance program owning the realms
    pub governance_program_id: String,

    /// Timeout of a single ledger read in milliseconds
    pub read_timeout_ms: u64,

    /// Names of the registered plugins in chain order
    pub plugins: Vec<String>,
}

impl Default for PluginChainConfig {
    fn default() -> Self {
        Self {
            json_rpc_url: DEFAULT_JSON_RPC_URL.to_string(),
            governance_program_id: DEFAULT_GOVERNANCE_PROGRAM_ID.to_string(),
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
            plugins: vec![],
        }
    }
}

impl PluginChainConfig {
    /// Loads the config from a YAML file
    pub fn load<P: AsRef<Path>>(config_file: P) -> PluginChainResult<Self> {
        let file = File::open(config_file.as_ref()).map_err(|e| {
            PluginChainError::Config(format!("{}: {}", config_file.as_ref().display(), e))
        })?;
        let config: Self =
            serde_yaml::from_reader(file).map_err(|e| PluginChainError::Config(e.to_string()))?;
        config.validate()?;

        Ok(config)
    }

    /// Parses the config from a YAML string
    pub fn from_yaml_str(yaml: &str) -> PluginChainResult<Self> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| PluginChainError::Config(e.to_string()))?;
        config.validate()?;

        Ok(config)
    }

    /// Returns the governance program id
    pub fn governance_program_id(&self) -> PluginChainResult<Pubkey> {
        Pubkey::from_str(&self.governance_program_id).map_err(|e| {
            PluginChainError::Config(format!(
                "governance_program_id {}: {}",
                self.governance_program_id, e
            ))
        })
    }

    /// Returns the timeout of a single ledger read
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    fn validate(&self) -> PluginChainResult<()> {
        self.governance_program_id()?;

        if self.read_timeout_ms == 0 {
            return Err(PluginChainError::Config(
                "read_timeout_ms must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
