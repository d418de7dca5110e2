//! Instructions of chainable voter weight plugins
//!
//! The builders only assemble instructions. Signing and submitting them is left to the caller

use {
    crate::{
        address::{
            get_max_voter_weight_record_address, get_registrar_address,
            get_voter_weight_record_address,
        },
        chain::{resolve_input_max_voter_weight_address, resolve_input_voter_weight_address},
        client::PluginChainClient,
        error::{PluginChainError, PluginChainResult},
        realm::RealmContext,
        weight::PluginDescriptor,
    },
    log::debug,
    solana_program::{
        instruction::{AccountMeta, Instruction},
        pubkey::Pubkey,
        system_program,
    },
};

/// Instructions supported by chainable voter weight plugins
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VoterWeightPluginInstruction {
    /// Creates VoterWeightRecord owned by the plugin
    ///
    /// 0. `[]` Registrar
    /// 1. `[writable]` VoterWeightRecord. PDA seeds: ['voter-weight-record', realm, mint, owner]
    /// 2. `[writable, signer]` Payer
    /// 3. `[]` System
    CreateVoterWeightRecord {
        /// The voter the record is created for
        governing_token_owner: Pubkey,
    },

    /// Creates MaxVoterWeightRecord owned by the plugin
    ///
    /// 0. `[]` Registrar
    /// 1. `[writable]` MaxVoterWeightRecord. PDA seeds: ['max-voter-weight-record', realm, mint]
    /// 2. `[writable, signer]` Payer
    /// 3. `[]` System
    CreateMaxVoterWeightRecord,

    /// Updates VoterWeightRecord from the input voter weight
    ///
    /// 0. `[]` Registrar
    /// 1. `[writable]` VoterWeightRecord
    /// 2. `[]` Input voter weight. Predecessor's VoterWeightRecord or TokenOwnerRecord
    /// 3. `[]` Optional eligibility credential (gateway token)
    UpdateVoterWeightRecord,

    /// Updates MaxVoterWeightRecord from the input max voter weight
    ///
    /// 0. `[]` Registrar
    /// 1. `[writable]` MaxVoterWeightRecord
    /// 2. `[]` Input max voter weight. Predecessor's MaxVoterWeightRecord or governing token mint
    UpdateMaxVoterWeightRecord,

    /// Configures the Registrar of the plugin
    ///
    /// 0. `[writable]` Registrar
    /// 1. `[]` Realm
    /// 2. `[signer]` Realm authority
    /// 3..n `[]` Plugin specific configuration accounts
    /// n+1. `[]` Optional predecessor plugin program
    ConfigureRegistrar {
        /// True if the plugin reads its input from a predecessor plugin
        use_previous_voter_weight_plugin: bool,
    },
}

impl VoterWeightPluginInstruction {
    /// Returns sha256("global:<instruction_name>")[..8]
    pub fn sighash(&self) -> [u8; 8] {
        match self {
            VoterWeightPluginInstruction::CreateVoterWeightRecord { .. } => {
                [0xb8, 0xf9, 0x85, 0xb2, 0x58, 0x98, 0xfa, 0xba]
            }
            VoterWeightPluginInstruction::CreateMaxVoterWeightRecord => {
                [0xb6, 0x46, 0xf3, 0x77, 0xa2, 0xb0, 0x26, 0xf8]
            }
            VoterWeightPluginInstruction::UpdateVoterWeightRecord => {
                [0x2d, 0xb9, 0x03, 0x24, 0x6d, 0xbe, 0x73, 0xa9]
            }
            VoterWeightPluginInstruction::UpdateMaxVoterWeightRecord => {
                [0x67, 0xaf, 0xc9, 0xfb, 0x02, 0x09, 0xfb, 0xb3]
            }
            VoterWeightPluginInstruction::ConfigureRegistrar { .. } => {
                [0xfc, 0x8e, 0xf0, 0x81, 0xeb, 0xb4, 0x0e, 0x73]
            }
        }
    }

    /// Packs the instruction into sighash followed by the Borsh encoded arguments
    pub fn pack(&self) -> Vec<u8> {
        let mut data = self.sighash().to_vec();

        match self {
            VoterWeightPluginInstruction::CreateVoterWeightRecord {
                governing_token_owner,
            } => data.extend_from_slice(governing_token_owner.as_ref()),
            VoterWeightPluginInstruction::ConfigureRegistrar {
                use_previous_voter_weight_plugin,
            } => data.push(u8::from(*use_previous_voter_weight_plugin)),
            VoterWeightPluginInstruction::CreateMaxVoterWeightRecord
            | VoterWeightPluginInstruction::UpdateVoterWeightRecord
            | VoterWeightPluginInstruction::UpdateMaxVoterWeightRecord => {}
        }

        data
    }
}

/// Creates CreateVoterWeightRecord instruction
pub fn create_voter_weight_record(
    program_id: &Pubkey,
    // Accounts
    registrar: &Pubkey,
    voter_weight_record: &Pubkey,
    payer: &Pubkey,
    // Args
    governing_token_owner: &Pubkey,
) -> Instruction {
    let accounts = vec![
        AccountMeta::new_readonly(*registrar, false),
        AccountMeta::new(*voter_weight_record, false),
        AccountMeta::new(*payer, true),
        AccountMeta::new_readonly(system_program::id(), false),
    ];

    let instruction = VoterWeightPluginInstruction::CreateVoterWeightRecord {
        governing_token_owner: *governing_token_owner,
    };

    Instruction {
        program_id: *program_id,
        accounts,
        data: instruction.pack(),
    }
}

/// Creates CreateMaxVoterWeightRecord instruction
pub fn create_max_voter_weight_record(
    program_id: &Pubkey,
    // Accounts
    registrar: &Pubkey,
    max_voter_weight_record: &Pubkey,
    payer: &Pubkey,
) -> Instruction {
    let accounts = vec![
        AccountMeta::new_readonly(*registrar, false),
        AccountMeta::new(*max_voter_weight_record, false),
        AccountMeta::new(*payer, true),
        AccountMeta::new_readonly(system_program::id(), false),
    ];

    Instruction {
        program_id: *program_id,
        accounts,
        data: VoterWeightPluginInstruction::CreateMaxVoterWeightRecord.pack(),
    }
}

/// Creates UpdateVoterWeightRecord instruction
pub fn update_voter_weight_record(
    program_id: &Pubkey,
    // Accounts
    registrar: &Pubkey,
    voter_weight_record: &Pubkey,
    input_voter_weight: &Pubkey,
    credential: Option<&Pubkey>,
) -> Instruction {
    let mut accounts = vec![
        AccountMeta::new_readonly(*registrar, false),
        AccountMeta::new(*voter_weight_record, false),
        AccountMeta::new_readonly(*input_voter_weight, false),
    ];

    if let Some(credential) = credential {
        accounts.push(AccountMeta::new_readonly(*credential, false));
    }

    Instruction {
        program_id: *program_id,
        accounts,
        data: VoterWeightPluginInstruction::UpdateVoterWeightRecord.pack(),
    }
}

/// Creates UpdateMaxVoterWeightRecord instruction
pub fn update_max_voter_weight_record(
    program_id: &Pubkey,
    // Accounts
    registrar: &Pubkey,
    max_voter_weight_record: &Pubkey,
    input_max_voter_weight: &Pubkey,
) -> Instruction {
    let accounts = vec![
        AccountMeta::new_readonly(*registrar, false),
        AccountMeta::new(*max_voter_weight_record, false),
        AccountMeta::new_readonly(*input_max_voter_weight, false),
    ];

    Instruction {
        program_id: *program_id,
        accounts,
        data: VoterWeightPluginInstruction::UpdateMaxVoterWeightRecord.pack(),
    }
}

/// Creates ConfigureRegistrar instruction
///
/// The predecessor plugin, if any, is passed as the last account
pub fn configure_registrar(
    program_id: &Pubkey,
    // Accounts
    realm: &Pubkey,
    governing_token_mint: &Pubkey,
    realm_authority: &Pubkey,
    plugin_config_accounts: &[AccountMeta],
    // Args
    predecessor_program_id: Option<&Pubkey>,
) -> Instruction {
    let (registrar, _) = get_registrar_address(realm, governing_token_mint, program_id);

    let mut accounts = vec![
        AccountMeta::new(registrar, false),
        AccountMeta::new_readonly(*realm, false),
        AccountMeta::new_readonly(*realm_authority, true),
    ];
    accounts.extend_from_slice(plugin_config_accounts);

    if let Some(predecessor_program_id) = predecessor_program_id {
        accounts.push(AccountMeta::new_readonly(*predecessor_program_id, false));
    }

    let instruction = VoterWeightPluginInstruction::ConfigureRegistrar {
        use_previous_voter_weight_plugin: predecessor_program_id.is_some(),
    };

    Instruction {
        program_id: *program_id,
        accounts,
        data: instruction.pack(),
    }
}

fn assert_credential_supplied(
    plugin: &PluginDescriptor,
    credential: Option<&Pubkey>,
) -> PluginChainResult<()> {
    if plugin.requires_credential && credential.is_none() {
        return Err(PluginChainError::MissingCredential(format!(
            "plugin {} requires a credential to update voter weight",
            plugin.name
        )));
    }

    Ok(())
}

/// Builds the UpdateVoterWeightRecord instruction of the plugin for the wallet
///
/// The credential is checked before any account is resolved
pub async fn build_update_voter_weight_record_instruction(
    client: &PluginChainClient,
    plugin: &PluginDescriptor,
    realm_context: &RealmContext,
    credential: Option<&Pubkey>,
) -> PluginChainResult<Instruction> {
    assert_credential_supplied(plugin, credential)?;

    let (registrar, _) = get_registrar_address(
        &realm_context.realm,
        &realm_context.governing_token_mint,
        &plugin.program_id,
    );
    let (voter_weight_record, _) = get_voter_weight_record_address(
        &realm_context.realm,
        &realm_context.governing_token_mint,
        &realm_context.wallet,
        &plugin.program_id,
    );
    let input_voter_weight = resolve_input_voter_weight_address(
        client,
        &plugin.program_id,
        plugin.registrar_config_len,
        realm_context,
    )
    .await?;

    Ok(update_voter_weight_record(
        &plugin.program_id,
        &registrar,
        &voter_weight_record,
        &input_voter_weight,
        credential.filter(|_| plugin.requires_credential),
    ))
}

/// Builds the UpdateMaxVoterWeightRecord instruction of the plugin
pub async fn build_update_max_voter_weight_record_instruction(
    client: &PluginChainClient,
    plugin: &PluginDescriptor,
    realm_context: &RealmContext,
) -> PluginChainResult<Instruction> {
    let (registrar, _) = get_registrar_address(
        &realm_context.realm,
        &realm_context.governing_token_mint,
        &plugin.program_id,
    );
    let (max_voter_weight_record, _) = get_max_voter_weight_record_address(
        &realm_context.realm,
        &realm_context.governing_token_mint,
        &plugin.program_id,
    );
    let input_max_voter_weight = resolve_input_max_voter_weight_address(
        client,
        &plugin.program_id,
        plugin.registrar_config_len,
        realm_context,
    )
    .await?;

    Ok(update_max_voter_weight_record(
        &plugin.program_id,
        &registrar,
        &max_voter_weight_record,
        &input_max_voter_weight,
    ))
}

/// Builds the instructions refreshing the wallet's voter weight across the whole chain
///
/// For every plugin in chain order the VoterWeightRecord is created if it doesn't exist yet
/// and then updated
pub async fn build_voter_weight_instructions(
    client: &PluginChainClient,
    plugins: &[PluginDescriptor],
    realm_context: &RealmContext,
    payer: &Pubkey,
    credential: Option<&Pubkey>,
) -> PluginChainResult<Vec<Instruction>> {
    for plugin in plugins {
        assert_credential_supplied(plugin, credential)?;
    }

    let mut instructions = vec![];

    for plugin in plugins {
        let (voter_weight_record, _) = get_voter_weight_record_address(
            &realm_context.realm,
            &realm_context.governing_token_mint,
            &realm_context.wallet,
            &plugin.program_id,
        );

        if !client.account_exists(&voter_weight_record).await? {
            debug!(
                "creating voter weight record {} of plugin {}",
                voter_weight_record, plugin.name
            );

            let (registrar, _) = get_registrar_address(
                &realm_context.realm,
                &realm_context.governing_token_mint,
                &plugin.program_id,
            );
            instructions.push(create_voter_weight_record(
                &plugin.program_id,
                &registrar,
                &voter_weight_record,
                payer,
                &realm_context.wallet,
            ));
        }

        instructions.push(
            build_update_voter_weight_record_instruction(client, plugin, realm_context, credential)
                .await?,
        );
    }

    Ok(instructions)
}

/// Builds the instructions refreshing the realm's max voter weight across the whole chain
pub async fn build_max_voter_weight_instructions(
    client: &PluginChainClient,
    plugins: &[PluginDescriptor],
    realm_context: &RealmContext,
    payer: &Pubkey,
) -> PluginChainResult<Vec<Instruction>> {
    let mut instructions = vec![];

    for plugin in plugins {
        let (max_voter_weight_record, _) = get_max_voter_weight_record_address(
            &realm_context.realm,
            &realm_context.governing_token_mint,
            &plugin.program_id,
        );

        if !client.account_exists(&max_voter_weight_record).await? {
            let (registrar, _) = get_registrar_address(
                &realm_context.realm,
                &realm_context.governing_token_mint,
                &plugin.program_id,
            );
            instructions.push(create_max_voter_weight_record(
                &plugin.program_id,
                &registrar,
                &max_voter_weight_record,
                payer,
            ));
        }

        instructions.push(
            build_update_max_voter_weight_record_instruction(client, plugin, realm_context).await?,
        );
    }

    Ok(instructions)
}
