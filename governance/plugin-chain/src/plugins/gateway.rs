//! Gatekeeping plugin adapter
//!
//! Passes the input weight through unchanged if the wallet holds an active gateway token issued for
//! the gatekeeper network configured in the plugin's Registrar. The max voter weight is never gated

use {
    crate::{
        client::PluginChainClient,
        error::{PluginChainError, PluginChainResult},
        registrar::fetch_plugin_registrar,
        weight::{PluginDescriptor, VoterWeightPlugin},
    },
    async_trait::async_trait,
    borsh::{BorshDeserialize, BorshSerialize},
    log::debug,
    solana_program::{
        clock::UnixTimestamp,
        pubkey::{Pubkey, PUBKEY_BYTES},
    },
    spl_governance_tools::error::GovernanceToolsError,
    std::sync::Arc,
};

/// Civic gateway program which issues gateway tokens
pub const GATEWAY_PROGRAM_ID: Pubkey =
    solana_program::pubkey!("gatem74V238djXdzWnJf94Wo1DcnuGkfijbf3AuBhfs");

/// Size of the gateway plugin Registrar configuration, the gatekeeper network
pub const GATEWAY_REGISTRAR_CONFIG_LEN: usize = PUBKEY_BYTES;

/// State of a gateway token
#[derive(Clone, Copy, Debug, PartialEq, Eq, BorshDeserialize, BorshSerialize)]
pub enum GatewayTokenState {
    /// Valid, the holder passes the gate
    Active,

    /// Temporarily suspended by the gatekeeper
    Frozen,

    /// Permanently invalidated
    Revoked,
}

/// Gateway token account issued by the gateway program
#[derive(Clone, Debug, PartialEq, Eq, BorshDeserialize, BorshSerialize)]
pub struct GatewayToken {
    /// Feature flags of the token
    pub features: u8,

    /// Token the gateway token is derived from, if any
    pub parent_gateway_token: Option<Pubkey>,

    /// Wallet the token is issued to
    pub owner_wallet: Pubkey,

    /// Identity account of the owner, if any
    pub owner_identity: Option<Pubkey>,

    /// Gatekeeper network the token belongs to
    pub gatekeeper_network: Pubkey,

    /// Gatekeeper which issued the token
    pub issuing_gatekeeper: Pubkey,

    /// Current state
    pub state: GatewayTokenState,

    /// Unix timestamp the token expires at, None if it never expires
    pub expire_time: Option<UnixTimestamp>,
}

/// Gatekeeping plugin
#[derive(Clone, Debug)]
pub struct GatewayPlugin {
    client: PluginChainClient,
    program_id: Pubkey,
    gateway_program_id: Pubkey,
    gateway_token: Option<Pubkey>,
}

impl GatewayPlugin {
    /// Creates the plugin deployed at `program_id` for the wallet holding `gateway_token`
    pub fn new(
        client: PluginChainClient,
        program_id: &Pubkey,
        gateway_token: Option<Pubkey>,
    ) -> Self {
        Self {
            client,
            program_id: *program_id,
            gateway_program_id: GATEWAY_PROGRAM_ID,
            gateway_token,
        }
    }

    /// Overrides the program issuing gateway tokens
    pub fn with_gateway_program_id(mut self, gateway_program_id: &Pubkey) -> Self {
        self.gateway_program_id = *gateway_program_id;
        self
    }

    /// Returns the wallet's gateway token, the credential of the update instruction
    pub fn gateway_token(&self) -> Option<&Pubkey> {
        self.gateway_token.as_ref()
    }

    /// Returns the chain descriptor of the plugin
    ///
    /// The descriptor requires the gateway token as credential and carries the Registrar layout
    pub fn into_descriptor(self, name: &str) -> PluginDescriptor {
        let program_id = self.program_id;

        PluginDescriptor::new(name, &program_id, Arc::new(self))
            .with_required_credential()
            .with_registrar_config_len(GATEWAY_REGISTRAR_CONFIG_LEN)
    }

    /// Returns the gatekeeper network configured in the plugin's Registrar
    pub async fn get_gatekeeper_network(
        &self,
        realm: &Pubkey,
        governing_token_mint: &Pubkey,
    ) -> PluginChainResult<Pubkey> {
        let registrar = fetch_plugin_registrar(
            &self.client,
            &self.program_id,
            GATEWAY_REGISTRAR_CONFIG_LEN,
            realm,
            governing_token_mint,
        )
        .await?;

        Pubkey::try_from(registrar.plugin_config.as_slice()).map_err(|_| {
            PluginChainError::PluginComputation(format!(
                "registrar of plugin {} has no gatekeeper network",
                self.program_id
            ))
        })
    }
}

#[async_trait]
impl VoterWeightPlugin for GatewayPlugin {
    async fn calculate_voter_weight(
        &self,
        wallet: &Pubkey,
        realm: &Pubkey,
        governing_token_mint: &Pubkey,
        input_voter_weight: u64,
    ) -> PluginChainResult<Option<u64>> {
        let gateway_token_address = self.gateway_token.ok_or_else(|| {
            PluginChainError::MissingCredential(format!("no gateway token found for {}", wallet))
        })?;

        let Some(account) = self.client.get_account(&gateway_token_address).await? else {
            debug!("gateway token {} doesn't exist", gateway_token_address);
            return Ok(None);
        };

        if account.owner != self.gateway_program_id {
            return Err(PluginChainError::PluginComputation(format!(
                "gateway token {} is not issued by {}",
                gateway_token_address, self.gateway_program_id
            )));
        }

        let gateway_token = GatewayToken::deserialize(&mut account.data.as_slice()).map_err(|_| {
            PluginChainError::InvalidAccountData {
                address: gateway_token_address,
                reason: GovernanceToolsError::InvalidAccountData,
            }
        })?;

        if gateway_token.owner_wallet != *wallet {
            return Err(PluginChainError::PluginComputation(format!(
                "gateway token {} is not issued to {}",
                gateway_token_address, wallet
            )));
        }

        let gatekeeper_network = self
            .get_gatekeeper_network(realm, governing_token_mint)
            .await?;

        if gateway_token.gatekeeper_network != gatekeeper_network {
            return Err(PluginChainError::PluginComputation(format!(
                "gateway token {} is not issued for gatekeeper network {}",
                gateway_token_address, gatekeeper_network
            )));
        }

        // Expiry is enforced by the plugin program against the cluster clock
        if gateway_token.state != GatewayTokenState::Active {
            return Err(PluginChainError::PluginComputation(format!(
                "gateway token {} is {:?}",
                gateway_token_address, gateway_token.state
            )));
        }

        Ok(Some(input_voter_weight))
    }

    async fn calculate_max_voter_weight(
        &self,
        _realm: &Pubkey,
        _governing_token_mint: &Pubkey,
        input_max_voter_weight: u64,
    ) -> PluginChainResult<Option<u64>> {
        Ok(Some(input_max_voter_weight))
    }
}
