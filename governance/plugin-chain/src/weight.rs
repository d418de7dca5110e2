//! Voter weight reduction over an ordered chain of plugins
//!
//! Each plugin receives the weight produced by its predecessor. Errors raised by a plugin are
//! recorded as data in `CalculatedWeight` and stop the chain, they are never returned to the caller

use {
    crate::{
        client::PluginChainClient,
        error::{PluginChainError, PluginChainResult, PLUGIN_FAILED_TO_CALCULATE_VOTER_WEIGHT},
        realm::{
            calculate_mint_max_voter_weight, get_governing_token_deposit_amount,
            get_governing_token_mint_supply, MintMaxVoterWeightSource, RealmContext,
        },
    },
    async_trait::async_trait,
    log::{debug, info, warn},
    solana_program::pubkey::Pubkey,
    std::{fmt, sync::Arc},
};

/// Weight transformation implemented by a voter weight plugin
///
/// `Ok(None)` signals the plugin couldn't calculate the weight without raising an error.
/// Both `Ok(None)` and `Err` veto the calculation
#[async_trait]
pub trait VoterWeightPlugin: Send + Sync {
    /// Calculates the wallet's voter weight from the weight produced by the predecessor
    async fn calculate_voter_weight(
        &self,
        wallet: &Pubkey,
        realm: &Pubkey,
        governing_token_mint: &Pubkey,
        input_voter_weight: u64,
    ) -> PluginChainResult<Option<u64>>;

    /// Calculates the realm's max voter weight from the max weight produced by the predecessor
    async fn calculate_max_voter_weight(
        &self,
        realm: &Pubkey,
        governing_token_mint: &Pubkey,
        input_max_voter_weight: u64,
    ) -> PluginChainResult<Option<u64>>;
}

/// A plugin in the chain
#[derive(Clone)]
pub struct PluginDescriptor {
    /// Name of the plugin, unique within a chain
    pub name: String,

    /// Program id of the plugin
    pub program_id: Pubkey,

    /// True if the plugin requires an eligibility credential (e.g. a gateway token) to update
    /// voter weight
    pub requires_credential: bool,

    /// Size of the plugin specific configuration stored in its Registrar ahead of the predecessor
    pub registrar_config_len: usize,

    /// Weight calculation of the plugin
    pub plugin: Arc<dyn VoterWeightPlugin>,
}

impl fmt::Debug for PluginDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginDescriptor")
            .field("name", &self.name)
            .field("program_id", &self.program_id)
            .field("requires_credential", &self.requires_credential)
            .field("registrar_config_len", &self.registrar_config_len)
            .finish()
    }
}

impl PluginDescriptor {
    /// Creates a descriptor of a plugin without credential and Registrar configuration
    pub fn new(name: &str, program_id: &Pubkey, plugin: Arc<dyn VoterWeightPlugin>) -> Self {
        Self {
            name: name.to_string(),
            program_id: *program_id,
            requires_credential: false,
            registrar_config_len: 0,
            plugin,
        }
    }

    /// Marks the plugin as requiring an eligibility credential
    pub fn with_required_credential(mut self) -> Self {
        self.requires_credential = true;
        self
    }

    /// Sets the size of the plugin specific configuration stored in the plugin's Registrar
    pub fn with_registrar_config_len(mut self, registrar_config_len: usize) -> Self {
        self.registrar_config_len = registrar_config_len;
        self
    }
}

/// Contribution of a single plugin to the calculated weight
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoterWeightPluginDetail {
    /// Name of the plugin
    pub plugin_name: String,

    /// Weight produced by the plugin, None if it failed
    pub plugin_weight: Option<u64>,

    /// Error raised by the plugin
    pub error: Option<PluginChainError>,
}

/// Result of a weight calculation
///
/// `value` None is terminal and always comes with a detail entry carrying the error
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CalculatedWeight {
    /// Final weight, None if a plugin vetoed the calculation
    pub value: Option<u64>,

    /// Contributions of the invoked plugins in chain order
    pub details: Vec<VoterWeightPluginDetail>,
}

impl CalculatedWeight {
    /// Starting weight before any plugin is applied
    pub fn new(starting_weight: u64) -> Self {
        Self {
            value: Some(starting_weight),
            details: vec![],
        }
    }

    /// Returns the detail of the plugin which vetoed the calculation
    pub fn failed_plugin(&self) -> Option<&VoterWeightPluginDetail> {
        self.details.iter().find(|detail| detail.error.is_some())
    }

    /// Records the result of the plugin and makes its weight the input of the next plugin
    fn apply_plugin_result(&mut self, plugin_name: &str, result: PluginChainResult<Option<u64>>) {
        let (plugin_weight, error) = match result {
            Ok(Some(weight)) => (Some(weight), None),
            Ok(None) => (
                None,
                Some(PluginChainError::PluginComputation(
                    PLUGIN_FAILED_TO_CALCULATE_VOTER_WEIGHT.to_string(),
                )),
            ),
            Err(error) => (None, Some(error)),
        };

        if let Some(error) = &error {
            warn!("plugin {} vetoed weight calculation: {}", plugin_name, error);
        } else {
            debug!("plugin {} weight: {:?}", plugin_name, plugin_weight);
        }

        self.value = plugin_weight;
        self.details.push(VoterWeightPluginDetail {
            plugin_name: plugin_name.to_string(),
            plugin_weight,
            error,
        });
    }
}

#[derive(Clone, Copy, Debug)]
enum WeightKind {
    VoterWeight,
    MaxVoterWeight,
}

async fn reduce_weight(
    realm_context: &RealmContext,
    plugins: &[PluginDescriptor],
    starting_weight: u64,
    weight_kind: WeightKind,
) -> CalculatedWeight {
    info!(
        "calculating {:?} for realm {} starting at {}",
        weight_kind, realm_context.realm, starting_weight
    );

    let mut calculated_weight = CalculatedWeight::new(starting_weight);

    for plugin in plugins {
        // The veto is terminal, the remaining plugins are not invoked
        let Some(input_weight) = calculated_weight.value else {
            break;
        };

        let result = match weight_kind {
            WeightKind::VoterWeight => {
                plugin
                    .plugin
                    .calculate_voter_weight(
                        &realm_context.wallet,
                        &realm_context.realm,
                        &realm_context.governing_token_mint,
                        input_weight,
                    )
                    .await
            }
            WeightKind::MaxVoterWeight => {
                plugin
                    .plugin
                    .calculate_max_voter_weight(
                        &realm_context.realm,
                        &realm_context.governing_token_mint,
                        input_weight,
                    )
                    .await
            }
        };

        calculated_weight.apply_plugin_result(&plugin.name, result);
    }

    calculated_weight
}

/// Calculates the wallet's voter weight by applying the plugins in order to the base weight
pub async fn calculate_voter_weight(
    realm_context: &RealmContext,
    plugins: &[PluginDescriptor],
    base_voter_weight: u64,
) -> CalculatedWeight {
    reduce_weight(
        realm_context,
        plugins,
        base_voter_weight,
        WeightKind::VoterWeight,
    )
    .await
}

/// Calculates the realm's max voter weight by applying the plugins in order to the base supply
pub async fn calculate_max_voter_weight(
    realm_context: &RealmContext,
    plugins: &[PluginDescriptor],
    base_max_voter_weight: u64,
) -> CalculatedWeight {
    reduce_weight(
        realm_context,
        plugins,
        base_max_voter_weight,
        WeightKind::MaxVoterWeight,
    )
    .await
}

/// Calculates the wallet's voter weight starting from its governing token deposit
///
/// Errors reading the TokenOwnerRecord are returned, plugin errors are recorded in the result
pub async fn calculate_voter_weight_from_deposit(
    client: &PluginChainClient,
    realm_context: &RealmContext,
    plugins: &[PluginDescriptor],
) -> PluginChainResult<CalculatedWeight> {
    let deposit_amount = get_governing_token_deposit_amount(client, realm_context).await?;

    Ok(calculate_voter_weight(realm_context, plugins, deposit_amount).await)
}

/// Calculates the realm's max voter weight starting from the governing token mint supply
///
/// Errors reading the mint are returned, plugin errors are recorded in the result
pub async fn calculate_max_voter_weight_from_supply(
    client: &PluginChainClient,
    realm_context: &RealmContext,
    plugins: &[PluginDescriptor],
    max_voter_weight_source: &MintMaxVoterWeightSource,
) -> PluginChainResult<CalculatedWeight> {
    let mint_supply =
        get_governing_token_mint_supply(client, &realm_context.governing_token_mint).await?;
    let base_max_voter_weight =
        calculate_mint_max_voter_weight(mint_supply, max_voter_weight_source);

    Ok(calculate_max_voter_weight(realm_context, plugins, base_max_voter_weight).await)
}
