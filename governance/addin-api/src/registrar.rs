//! Registrar layout shared by chainable voter weight plugins

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{program_pack::IsInitialized, pubkey::Pubkey};
use std::io::{Error, ErrorKind, Write};

/// Registrar account
///
/// Every chainable plugin stores a Registrar per (realm, governing_token_mint). The realm fields
/// come first, followed by the plugin specific configuration (gatekeeper network, curve
/// coefficients etc.) and then the predecessor plugin. The size of the configuration differs per
/// plugin so the Registrar can only be deserialized when the configuration size is known
///
/// Account PDA seeds: ['registrar', realm, governing_token_mint]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Registrar {
    /// Registrar discriminator sha256("account:Registrar")[..8]
    pub account_discriminator: [u8; 8],

    /// spl-governance program the realm belongs to
    pub governance_program_id: Pubkey,

    /// Realm of the Registrar
    pub realm: Pubkey,

    /// Governing token mint the Registrar is for
    pub governing_token_mint: Pubkey,

    /// Plugin specific configuration, opaque to the chain
    pub plugin_config: Vec<u8>,

    /// The plugin whose VoterWeightRecord feeds this plugin
    /// None if the plugin is the first in the chain and reads the TokenOwnerRecord
    pub previous_voter_weight_plugin_program_id: Option<Pubkey>,
}

impl Registrar {
    /// sha256("account:Registrar")[..8]
    pub const ACCOUNT_DISCRIMINATOR: [u8; 8] = [0xc1, 0xca, 0xcd, 0x33, 0x4e, 0xa8, 0x96, 0x80];

    /// Deserializes a Registrar whose plugin configuration takes `plugin_config_len` bytes
    ///
    /// Bytes following the predecessor (reserved space) are not read
    pub fn deserialize_with_config_len(
        buf: &mut &[u8],
        plugin_config_len: usize,
    ) -> Result<Self, Error> {
        let account_discriminator = <[u8; 8]>::deserialize(buf)?;
        let governance_program_id = Pubkey::deserialize(buf)?;
        let realm = Pubkey::deserialize(buf)?;
        let governing_token_mint = Pubkey::deserialize(buf)?;

        if buf.len() < plugin_config_len {
            return Err(Error::new(
                ErrorKind::InvalidData,
                "Registrar plugin configuration is truncated",
            ));
        }
        let (plugin_config, rest) = buf.split_at(plugin_config_len);
        *buf = rest;

        let previous_voter_weight_plugin_program_id = Option::<Pubkey>::deserialize(buf)?;

        Ok(Self {
            account_discriminator,
            governance_program_id,
            realm,
            governing_token_mint,
            plugin_config: plugin_config.to_vec(),
            previous_voter_weight_plugin_program_id,
        })
    }
}

impl BorshSerialize for Registrar {
    fn serialize<W: Write>(&self, writer: &mut W) -> Result<(), Error> {
        self.account_discriminator.serialize(writer)?;
        self.governance_program_id.serialize(writer)?;
        self.realm.serialize(writer)?;
        self.governing_token_mint.serialize(writer)?;
        // The configuration is stored inline without a length prefix
        writer.write_all(&self.plugin_config)?;
        self.previous_voter_weight_plugin_program_id.serialize(writer)
    }
}

impl IsInitialized for Registrar {
    fn is_initialized(&self) -> bool {
        self.account_discriminator == Registrar::ACCOUNT_DISCRIMINATOR
    }
}
