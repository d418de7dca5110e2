//! Predecessor chain walking
//!
//! The chain is stored on the ledger as a singly linked list of Registrar predecessor pointers.
//! Each call walks exactly one hop

use {
    crate::{
        address::{get_max_voter_weight_record_address, get_voter_weight_record_address},
        client::PluginChainClient,
        error::PluginChainResult,
        realm::RealmContext,
        registrar::get_predecessor_program_id,
    },
    log::debug,
    solana_program::pubkey::Pubkey,
};

/// Returns the address of the account feeding the given plugin its input voter weight
///
/// This is the VoterWeightRecord of the predecessor plugin, or the wallet's TokenOwnerRecord if the
/// plugin is the first in the chain. `registrar_config_len` is the size of the plugin's Registrar
/// configuration. A plugin without a Registrar fails with NotFound and never falls
/// back to the TokenOwnerRecord
pub async fn resolve_input_voter_weight_address(
    client: &PluginChainClient,
    program_id: &Pubkey,
    registrar_config_len: usize,
    realm_context: &RealmContext,
) -> PluginChainResult<Pubkey> {
    let predecessor_program_id =
        get_predecessor_program_id(client, program_id, registrar_config_len, realm_context).await?;

    let input_address = match predecessor_program_id {
        Some(predecessor_program_id) => {
            get_voter_weight_record_address(
                &realm_context.realm,
                &realm_context.governing_token_mint,
                &realm_context.wallet,
                &predecessor_program_id,
            )
            .0
        }
        None => realm_context.get_token_owner_record_address(),
    };

    debug!(
        "input voter weight of plugin {} is {}",
        program_id, input_address
    );

    Ok(input_address)
}

/// Returns the address of the account feeding the given plugin its input max voter weight
///
/// This is the MaxVoterWeightRecord of the predecessor plugin, or the governing token mint if the
/// plugin is the first in the chain
pub async fn resolve_input_max_voter_weight_address(
    client: &PluginChainClient,
    program_id: &Pubkey,
    registrar_config_len: usize,
    realm_context: &RealmContext,
) -> PluginChainResult<Pubkey> {
    let predecessor_program_id =
        get_predecessor_program_id(client, program_id, registrar_config_len, realm_context).await?;

    Ok(match predecessor_program_id {
        Some(predecessor_program_id) => {
            get_max_voter_weight_record_address(
                &realm_context.realm,
                &realm_context.governing_token_mint,
                &predecessor_program_id,
            )
            .0
        }
        None => realm_context.governing_token_mint,
    })
}
