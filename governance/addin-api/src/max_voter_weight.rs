//! Max voter weight record shared by all plugins of a chain
//!
//! Each plugin stores the max voter weight it produced here and the next plugin reads it as input

use borsh::{BorshDeserialize, BorshSchema, BorshSerialize};
use solana_program::{clock::Slot, program_pack::IsInitialized, pubkey::Pubkey};

/// MaxVoterWeightRecord account
/// Holds a plugin's max voter weight for a realm and governing token mint
#[derive(Clone, Debug, PartialEq, Eq, BorshDeserialize, BorshSerialize, BorshSchema)]
pub struct MaxVoterWeightRecord {
    /// Account discriminator, see `MaxVoterWeightRecord::ACCOUNT_DISCRIMINATOR`
    pub account_discriminator: [u8; 8],

    /// The Realm the MaxVoterWeightRecord belongs to
    pub realm: Pubkey,

    /// Community or council mint of the realm
    pub governing_token_mint: Pubkey,

    /// Max voter weight produced by the plugin
    pub max_voter_weight: u64,

    /// Slot the weight expires at, None if it never expires
    pub max_voter_weight_expiry: Option<Slot>,

    /// Reserved space for future versions
    pub reserved: [u8; 8],
}

impl MaxVoterWeightRecord {
    /// sha256("account:MaxVoterWeightRecord")[..8]
    pub const ACCOUNT_DISCRIMINATOR: [u8; 8] = *b"9d5ff297";

    /// Returns true if the record belongs to the given realm and mint
    pub fn is_for(&self, realm: &Pubkey, governing_token_mint: &Pubkey) -> bool {
        self.realm == *realm && self.governing_token_mint == *governing_token_mint
    }
}

impl IsInitialized for MaxVoterWeightRecord {
    fn is_initialized(&self) -> bool {
        self.account_discriminator == MaxVoterWeightRecord::ACCOUNT_DISCRIMINATOR
    }
}
