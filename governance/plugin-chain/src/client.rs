//! Ledger client interface used to read plugin and governance accounts

use {
    crate::{
        config::PluginChainConfig,
        error::{PluginChainError, PluginChainResult},
    },
    async_trait::async_trait,
    log::debug,
    solana_client::nonblocking::rpc_client::RpcClient,
    solana_sdk::{account::Account, pubkey::Pubkey},
    std::{fmt, sync::Arc, time::Duration},
};

/// Error returned by a ProgramClient implementation
pub type ProgramClientError = Box<dyn std::error::Error + Send + Sync>;
/// Result of a ProgramClient read
pub type ProgramClientResult<T> = Result<T, ProgramClientError>;

/// Generic read interface to the ledger the plugins and governance program live on
#[async_trait]
pub trait ProgramClient: Send + Sync {
    /// Returns the account at the given address or None if it doesn't exist
    async fn get_account(&self, address: Pubkey) -> ProgramClientResult<Option<Account>>;
}

/// Program client for the nonblocking `RpcClient` from crate `solana-client`
pub struct ProgramRpcClient {
    client: Arc<RpcClient>,
}

impl fmt::Debug for ProgramRpcClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgramRpcClient")
            .field("url", &self.client.url())
            .finish()
    }
}

impl ProgramRpcClient {
    /// Creates the client over an existing RpcClient
    pub fn new(client: Arc<RpcClient>) -> Self {
        Self { client }
    }

    /// Creates the client connected to the configured JSON RPC url
    pub fn new_from_config(config: &PluginChainConfig) -> Self {
        Self::new(Arc::new(RpcClient::new(config.json_rpc_url.clone())))
    }
}

#[async_trait]
impl ProgramClient for ProgramRpcClient {
    async fn get_account(&self, address: Pubkey) -> ProgramClientResult<Option<Account>> {
        self.client
            .get_account_with_commitment(&address, self.client.commitment())
            .await
            .map(|response| response.value)
            .map_err(Into::into)
    }
}

/// Ledger reader shared by the chain operations
///
/// Every read is bounded by `read_timeout`. Read failures and timeouts are both reported as
/// `PluginChainError::Transport` and are never retried here
#[derive(Clone)]
pub struct PluginChainClient {
    client: Arc<dyn ProgramClient>,
    read_timeout: Duration,
}

impl fmt::Debug for PluginChainClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginChainClient")
            .field("read_timeout", &self.read_timeout)
            .finish()
    }
}

impl PluginChainClient {
    /// Creates the reader bounding every read by `read_timeout`
    pub fn new(client: Arc<dyn ProgramClient>, read_timeout: Duration) -> Self {
        Self {
            client,
            read_timeout,
        }
    }

    /// Creates the reader with the configured read timeout
    pub fn new_from_config(client: Arc<dyn ProgramClient>, config: &PluginChainConfig) -> Self {
        Self::new(client, config.read_timeout())
    }

    /// Returns the timeout applied to every read
    pub fn read_timeout(&self) -> Duration {
        self.read_timeout
    }

    /// Reads the account at the given address, None if it doesn't exist
    pub async fn get_account(&self, address: &Pubkey) -> PluginChainResult<Option<Account>> {
        debug!("reading account {}", address);

        match tokio::time::timeout(self.read_timeout, self.client.get_account(*address)).await {
            Ok(result) => result.map_err(|e| PluginChainError::Transport(e.to_string())),
            Err(_) => Err(PluginChainError::Transport(format!(
                "read of {} timed out after {:?}",
                address, self.read_timeout
            ))),
        }
    }

    /// Reads the account at the given address and fails with NotFound if it doesn't exist
    pub async fn get_existing_account(&self, address: &Pubkey) -> PluginChainResult<Account> {
        self.get_account(address)
            .await?
            .ok_or(PluginChainError::NotFound(*address))
    }

    /// Returns true if an account exists at the given address
    pub async fn account_exists(&self, address: &Pubkey) -> PluginChainResult<bool> {
        Ok(self.get_account(address).await?.is_some())
    }
}
