//! Program derived addresses of the plugin chain accounts
//!
//! All addresses are program derived addresses and never collide with a keypair controlled account

use {
    crate::error::{PluginChainError, PluginChainResult},
    solana_program::pubkey::{Pubkey, PUBKEY_BYTES},
};

/// Seed prefix of the plugin Registrar PDA
pub const REGISTRAR_SEED: &[u8] = b"registrar";

/// Seed prefix of the plugin VoterWeightRecord PDA
pub const VOTER_WEIGHT_RECORD_SEED: &[u8] = b"voter-weight-record";

/// Seed prefix of the plugin MaxVoterWeightRecord PDA
pub const MAX_VOTER_WEIGHT_RECORD_SEED: &[u8] = b"max-voter-weight-record";

/// Seed prefix of the spl-governance PDAs
pub const PROGRAM_AUTHORITY_SEED: &[u8] = b"governance";

/// Namespace of a plugin account address
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SeedNamespace {
    /// Registrar. Seeds: [realm, mint]
    Registrar,

    /// VoterWeightRecord. Seeds: [realm, mint, wallet]
    VoterWeightRecord,

    /// MaxVoterWeightRecord. Seeds: [realm, mint]
    MaxVoterWeightRecord,
}

impl SeedNamespace {
    /// Returns the namespace tag used as the first seed
    pub fn tag(&self) -> &'static [u8] {
        match self {
            SeedNamespace::Registrar => REGISTRAR_SEED,
            SeedNamespace::VoterWeightRecord => VOTER_WEIGHT_RECORD_SEED,
            SeedNamespace::MaxVoterWeightRecord => MAX_VOTER_WEIGHT_RECORD_SEED,
        }
    }

    /// Returns true if the wallet is part of the seeds
    pub fn requires_wallet(&self) -> bool {
        matches!(self, SeedNamespace::VoterWeightRecord)
    }
}

/// Derives the address of a plugin account for the given namespace
///
/// The wallet must be given for VoterWeightRecord only
pub fn derive_address(
    namespace: SeedNamespace,
    realm: &Pubkey,
    governing_token_mint: &Pubkey,
    wallet: Option<&Pubkey>,
    program_id: &Pubkey,
) -> PluginChainResult<(Pubkey, u8)> {
    let mut seeds: Vec<&[u8]> = vec![
        namespace.tag(),
        realm.as_ref(),
        governing_token_mint.as_ref(),
    ];

    match (namespace.requires_wallet(), wallet) {
        (true, Some(wallet)) => seeds.push(wallet.as_ref()),
        (false, None) => {}
        (true, None) => {
            return Err(PluginChainError::InvalidSeed(format!(
                "{:?} address requires a wallet",
                namespace
            )))
        }
        (false, Some(_)) => {
            return Err(PluginChainError::InvalidSeed(format!(
                "{:?} address doesn't take a wallet",
                namespace
            )))
        }
    }

    Pubkey::try_find_program_address(&seeds, program_id).ok_or_else(|| {
        PluginChainError::InvalidSeed(format!("no viable bump seed for {:?}", namespace))
    })
}

/// Derives the address of a plugin account from raw identifiers
///
/// Fails with InvalidSeed if any identifier isn't exactly 32 bytes long
pub fn derive_address_from_bytes(
    namespace: SeedNamespace,
    realm: &[u8],
    governing_token_mint: &[u8],
    wallet: Option<&[u8]>,
    program_id: &[u8],
) -> PluginChainResult<(Pubkey, u8)> {
    let realm = parse_identifier("realm", realm)?;
    let governing_token_mint = parse_identifier("governing_token_mint", governing_token_mint)?;
    let wallet = wallet
        .map(|wallet| parse_identifier("wallet", wallet))
        .transpose()?;
    let program_id = parse_identifier("program_id", program_id)?;

    derive_address(
        namespace,
        &realm,
        &governing_token_mint,
        wallet.as_ref(),
        &program_id,
    )
}

/// Parses a 32 byte identifier
pub fn parse_identifier(name: &str, bytes: &[u8]) -> PluginChainResult<Pubkey> {
    if bytes.len() != PUBKEY_BYTES {
        return Err(PluginChainError::InvalidSeed(format!(
            "{} must be {} bytes, got {}",
            name,
            PUBKEY_BYTES,
            bytes.len()
        )));
    }

    let mut key = [0u8; 32];
    key.copy_from_slice(bytes);

    Ok(Pubkey::new_from_array(key))
}

/// Returns Registrar PDA seeds
pub fn get_registrar_address_seeds<'a>(
    realm: &'a Pubkey,
    governing_token_mint: &'a Pubkey,
) -> [&'a [u8]; 3] {
    [REGISTRAR_SEED, realm.as_ref(), governing_token_mint.as_ref()]
}

/// Returns Registrar PDA address and bump
pub fn get_registrar_address(
    realm: &Pubkey,
    governing_token_mint: &Pubkey,
    program_id: &Pubkey,
) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &get_registrar_address_seeds(realm, governing_token_mint),
        program_id,
    )
}

/// Returns VoterWeightRecord PDA seeds
pub fn get_voter_weight_record_address_seeds<'a>(
    realm: &'a Pubkey,
    governing_token_mint: &'a Pubkey,
    governing_token_owner: &'a Pubkey,
) -> [&'a [u8]; 4] {
    [
        VOTER_WEIGHT_RECORD_SEED,
        realm.as_ref(),
        governing_token_mint.as_ref(),
        governing_token_owner.as_ref(),
    ]
}

/// Returns VoterWeightRecord PDA address and bump
pub fn get_voter_weight_record_address(
    realm: &Pubkey,
    governing_token_mint: &Pubkey,
    governing_token_owner: &Pubkey,
    program_id: &Pubkey,
) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &get_voter_weight_record_address_seeds(realm, governing_token_mint, governing_token_owner),
        program_id,
    )
}

/// Returns MaxVoterWeightRecord PDA seeds
pub fn get_max_voter_weight_record_address_seeds<'a>(
    realm: &'a Pubkey,
    governing_token_mint: &'a Pubkey,
) -> [&'a [u8]; 3] {
    [
        MAX_VOTER_WEIGHT_RECORD_SEED,
        realm.as_ref(),
        governing_token_mint.as_ref(),
    ]
}

/// Returns MaxVoterWeightRecord PDA address and bump
pub fn get_max_voter_weight_record_address(
    realm: &Pubkey,
    governing_token_mint: &Pubkey,
    program_id: &Pubkey,
) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &get_max_voter_weight_record_address_seeds(realm, governing_token_mint),
        program_id,
    )
}

/// Returns TokenOwnerRecord PDA seeds
pub fn get_token_owner_record_address_seeds<'a>(
    realm: &'a Pubkey,
    governing_token_mint: &'a Pubkey,
    governing_token_owner: &'a Pubkey,
) -> [&'a [u8]; 4] {
    [
        PROGRAM_AUTHORITY_SEED,
        realm.as_ref(),
        governing_token_mint.as_ref(),
        governing_token_owner.as_ref(),
    ]
}

/// Returns TokenOwnerRecord PDA address
/// The TokenOwnerRecord is owned by the governance program and is the head of every plugin chain
pub fn get_token_owner_record_address(
    governance_program_id: &Pubkey,
    realm: &Pubkey,
    governing_token_mint: &Pubkey,
    governing_token_owner: &Pubkey,
) -> Pubkey {
    Pubkey::find_program_address(
        &get_token_owner_record_address_seeds(realm, governing_token_mint, governing_token_owner),
        governance_program_id,
    )
    .0
}
