//! Plugin adapter returning the weight a plugin already stored on the ledger

use {
    crate::{
        address::{get_max_voter_weight_record_address, get_voter_weight_record_address},
        client::PluginChainClient,
        error::{PluginChainError, PluginChainResult},
        weight::VoterWeightPlugin,
    },
    async_trait::async_trait,
    log::debug,
    solana_program::pubkey::Pubkey,
    spl_governance_addin_api::{
        max_voter_weight::MaxVoterWeightRecord, voter_weight::VoterWeightRecord,
    },
    spl_governance_tools::account::get_account_data,
};

/// Reads the plugin's VoterWeightRecord and MaxVoterWeightRecord
///
/// The stored weight already includes the predecessor's input so the input weight is not used.
/// A missing record yields no weight
#[derive(Clone, Debug)]
pub struct OnChainWeightPlugin {
    client: PluginChainClient,
    program_id: Pubkey,
}

impl OnChainWeightPlugin {
    /// Creates the adapter reading the records of the plugin deployed at `program_id`
    pub fn new(client: PluginChainClient, program_id: &Pubkey) -> Self {
        Self {
            client,
            program_id: *program_id,
        }
    }
}

#[async_trait]
impl VoterWeightPlugin for OnChainWeightPlugin {
    async fn calculate_voter_weight(
        &self,
        wallet: &Pubkey,
        realm: &Pubkey,
        governing_token_mint: &Pubkey,
        _input_voter_weight: u64,
    ) -> PluginChainResult<Option<u64>> {
        let (voter_weight_record_address, _) =
            get_voter_weight_record_address(realm, governing_token_mint, wallet, &self.program_id);

        let Some(account) = self.client.get_account(&voter_weight_record_address).await? else {
            debug!("voter weight record {} doesn't exist", voter_weight_record_address);
            return Ok(None);
        };

        let voter_weight_record =
            get_account_data::<VoterWeightRecord>(&self.program_id, &account.owner, &account.data)
                .map_err(|reason| PluginChainError::InvalidAccountData {
                    address: voter_weight_record_address,
                    reason,
                })?;

        if !voter_weight_record.is_for(realm, governing_token_mint, wallet) {
            return Err(PluginChainError::PluginComputation(format!(
                "voter weight record {} is not for the realm, mint and wallet",
                voter_weight_record_address
            )));
        }

        Ok(Some(voter_weight_record.voter_weight))
    }

    async fn calculate_max_voter_weight(
        &self,
        realm: &Pubkey,
        governing_token_mint: &Pubkey,
        _input_max_voter_weight: u64,
    ) -> PluginChainResult<Option<u64>> {
        let (max_voter_weight_record_address, _) =
            get_max_voter_weight_record_address(realm, governing_token_mint, &self.program_id);

        let Some(account) = self.client.get_account(&max_voter_weight_record_address).await? else {
            debug!(
                "max voter weight record {} doesn't exist",
                max_voter_weight_record_address
            );
            return Ok(None);
        };

        let max_voter_weight_record = get_account_data::<MaxVoterWeightRecord>(
            &self.program_id,
            &account.owner,
            &account.data,
        )
        .map_err(|reason| PluginChainError::InvalidAccountData {
            address: max_voter_weight_record_address,
            reason,
        })?;

        if !max_voter_weight_record.is_for(realm, governing_token_mint) {
            return Err(PluginChainError::PluginComputation(format!(
                "max voter weight record {} is not for the realm and mint",
                max_voter_weight_record_address
            )));
        }

        Ok(Some(max_voter_weight_record.max_voter_weight))
    }
}
