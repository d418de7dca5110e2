//! Voter weight record shared by all plugins of a chain

use borsh::{BorshDeserialize, BorshSchema, BorshSerialize};
use solana_program::{clock::Slot, program_pack::IsInitialized, pubkey::Pubkey};

/// The governance action VoterWeight is evaluated for
#[derive(Clone, Debug, PartialEq, Eq, BorshDeserialize, BorshSerialize, BorshSchema)]
pub enum VoterWeightAction {
    /// Cast vote for a proposal. Target: Proposal
    CastVote,

    /// Comment a proposal. Target: Proposal
    CommentProposal,

    /// Create Governance within a realm. Target: Realm
    CreateGovernance,

    /// Create a proposal for a governance. Target: Governance
    CreateProposal,

    /// Signs off a proposal for a governance. Target: Proposal
    SignOffProposal,
}

/// VoterWeightRecord account
/// Plugins in a chain read the record of their predecessor as their input weight
#[derive(Clone, Debug, PartialEq, Eq, BorshDeserialize, BorshSerialize, BorshSchema)]
pub struct VoterWeightRecord {
    /// Account discriminator, see `VoterWeightRecord::ACCOUNT_DISCRIMINATOR`
    pub account_discriminator: [u8; 8],

    /// The Realm the VoterWeightRecord belongs to
    pub realm: Pubkey,

    /// Governing Token Mint the VoterWeightRecord is associated with
    pub governing_token_mint: Pubkey,

    /// The owner of the governing token and voter
    pub governing_token_owner: Pubkey,

    /// Voter weight produced by the plugin
    pub voter_weight: u64,

    /// Slot the weight expires at, None if it never expires
    pub voter_weight_expiry: Option<Slot>,

    /// The governance action the voter's weight pertains to
    pub weight_action: Option<VoterWeightAction>,

    /// The target the voter's weight action pertains to
    pub weight_action_target: Option<Pubkey>,

    /// Reserved space for future versions
    pub reserved: [u8; 8],
}

impl VoterWeightRecord {
    /// sha256("account:VoterWeightRecord")[..8]
    pub const ACCOUNT_DISCRIMINATOR: [u8; 8] = *b"2ef99b4b";

    /// Returns true if the record belongs to the given realm, mint and voter
    pub fn is_for(
        &self,
        realm: &Pubkey,
        governing_token_mint: &Pubkey,
        governing_token_owner: &Pubkey,
    ) -> bool {
        self.realm == *realm
            && self.governing_token_mint == *governing_token_mint
            && self.governing_token_owner == *governing_token_owner
    }
}

impl IsInitialized for VoterWeightRecord {
    fn is_initialized(&self) -> bool {
        self.account_discriminator == VoterWeightRecord::ACCOUNT_DISCRIMINATOR
    }
}
