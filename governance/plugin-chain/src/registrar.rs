//! Registrar resolution of a plugin configured for a realm

use {
    crate::{
        address::get_registrar_address,
        client::PluginChainClient,
        error::{PluginChainError, PluginChainResult},
        realm::RealmContext,
    },
    log::debug,
    solana_program::pubkey::Pubkey,
    spl_governance_addin_api::registrar::Registrar,
    spl_governance_tools::{account::get_account_data_with, error::GovernanceToolsError},
};

/// State of a plugin link in the chain, recomputed from the Registrar on every call
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChainLinkState {
    /// The plugin has no Registrar for the realm
    Unconfigured,

    /// The plugin has a Registrar. The predecessor is None for the first plugin in the chain
    Configured {
        /// Plugin whose VoterWeightRecord feeds this plugin
        predecessor: Option<Pubkey>,
    },
}

/// Fetches the Registrar of the plugin for the realm and governing token mint
///
/// `registrar_config_len` is the size of the plugin specific configuration stored ahead of the
/// predecessor. Performs exactly one ledger read. Fails with NotFound if the plugin is not
/// configured for the realm
pub async fn fetch_plugin_registrar(
    client: &PluginChainClient,
    program_id: &Pubkey,
    registrar_config_len: usize,
    realm: &Pubkey,
    governing_token_mint: &Pubkey,
) -> PluginChainResult<Registrar> {
    let (registrar_address, _) = get_registrar_address(realm, governing_token_mint, program_id);

    debug!(
        "fetching registrar {} of plugin {}",
        registrar_address, program_id
    );

    let account = client.get_existing_account(&registrar_address).await?;

    let registrar = get_account_data_with(program_id, &account.owner, &account.data, |buf| {
        Registrar::deserialize_with_config_len(buf, registrar_config_len)
    })
    .map_err(|reason| PluginChainError::InvalidAccountData {
        address: registrar_address,
        reason,
    })?;

    if registrar.realm != *realm || registrar.governing_token_mint != *governing_token_mint {
        return Err(PluginChainError::InvalidAccountData {
            address: registrar_address,
            reason: GovernanceToolsError::InvalidAccountData,
        });
    }

    Ok(registrar)
}

/// Fetches the Registrar of the plugin for the realm
///
/// The Registrar must belong to the realm's governance program
pub async fn fetch_registrar(
    client: &PluginChainClient,
    program_id: &Pubkey,
    registrar_config_len: usize,
    realm_context: &RealmContext,
) -> PluginChainResult<Registrar> {
    let registrar = fetch_plugin_registrar(
        client,
        program_id,
        registrar_config_len,
        &realm_context.realm,
        &realm_context.governing_token_mint,
    )
    .await?;

    if registrar.governance_program_id != realm_context.governance_program_id {
        let (registrar_address, _) = get_registrar_address(
            &realm_context.realm,
            &realm_context.governing_token_mint,
            program_id,
        );

        return Err(PluginChainError::InvalidAccountData {
            address: registrar_address,
            reason: GovernanceToolsError::InvalidAccountData,
        });
    }

    Ok(registrar)
}

/// Fetches the Registrar of the plugin for the realm, None if the plugin is not configured
pub async fn try_fetch_registrar(
    client: &PluginChainClient,
    program_id: &Pubkey,
    registrar_config_len: usize,
    realm_context: &RealmContext,
) -> PluginChainResult<Option<Registrar>> {
    match fetch_registrar(client, program_id, registrar_config_len, realm_context).await {
        Ok(registrar) => Ok(Some(registrar)),
        Err(PluginChainError::NotFound(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Returns the plugin preceding the given plugin in the chain, None if it's the first one
pub async fn get_predecessor_program_id(
    client: &PluginChainClient,
    program_id: &Pubkey,
    registrar_config_len: usize,
    realm_context: &RealmContext,
) -> PluginChainResult<Option<Pubkey>> {
    let registrar =
        fetch_registrar(client, program_id, registrar_config_len, realm_context).await?;

    Ok(registrar.previous_voter_weight_plugin_program_id)
}

/// Returns the current link state of the plugin for the realm
pub async fn get_chain_link_state(
    client: &PluginChainClient,
    program_id: &Pubkey,
    registrar_config_len: usize,
    realm_context: &RealmContext,
) -> PluginChainResult<ChainLinkState> {
    let registrar =
        try_fetch_registrar(client, program_id, registrar_config_len, realm_context).await?;

    Ok(match registrar {
        None => ChainLinkState::Unconfigured,
        Some(registrar) => ChainLinkState::Configured {
            predecessor: registrar.previous_voter_weight_plugin_program_id,
        },
    })
}
