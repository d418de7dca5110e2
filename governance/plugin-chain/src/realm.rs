//! Realm context and the base weights a plugin chain starts from

use {
    crate::{
        address::get_token_owner_record_address,
        client::PluginChainClient,
        error::{PluginChainError, PluginChainResult},
    },
    borsh::{BorshDeserialize, BorshSchema, BorshSerialize},
    log::debug,
    solana_program::{program_pack::IsInitialized, program_pack::Pack, pubkey::Pubkey},
    spl_governance_tools::{account::get_account_data, error::GovernanceToolsError},
    spl_token::state::Mint,
};

/// Identifies whose voting power is calculated and against which governing token
/// The context is immutable for the duration of a calculation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RealmContext {
    /// spl-governance program which owns the realm
    pub governance_program_id: Pubkey,

    /// The realm
    pub realm: Pubkey,

    /// Governing token mint the voting power is calculated for, the community mint for most realms
    pub governing_token_mint: Pubkey,

    /// The voter
    pub wallet: Pubkey,
}

impl RealmContext {
    /// Creates the context of the wallet's calculation in the realm
    pub fn new(
        governance_program_id: &Pubkey,
        realm: &Pubkey,
        governing_token_mint: &Pubkey,
        wallet: &Pubkey,
    ) -> Self {
        Self {
            governance_program_id: *governance_program_id,
            realm: *realm,
            governing_token_mint: *governing_token_mint,
            wallet: *wallet,
        }
    }

    /// Returns the address of the wallet's TokenOwnerRecord, the head of the plugin chain
    pub fn get_token_owner_record_address(&self) -> Pubkey {
        get_token_owner_record_address(
            &self.governance_program_id,
            &self.realm,
            &self.governing_token_mint,
            &self.wallet,
        )
    }
}

/// spl-governance account type of TokenOwnerRecord V1
pub const TOKEN_OWNER_RECORD_V1_ACCOUNT_TYPE: u8 = 2;

/// spl-governance account type of TokenOwnerRecord V2
pub const TOKEN_OWNER_RECORD_V2_ACCOUNT_TYPE: u8 = 17;

/// Leading fields of the spl-governance TokenOwnerRecord account
/// Account PDA seeds: ['governance', realm, token_mint, token_owner ]
#[derive(Clone, Debug, PartialEq, Eq, BorshDeserialize, BorshSerialize, BorshSchema)]
pub struct TokenOwnerRecordHeader {
    /// Governance account type
    pub account_type: u8,

    /// The Realm the TokenOwnerRecord belongs to
    pub realm: Pubkey,

    /// Governing Token Mint the TokenOwnerRecord holds deposit for
    pub governing_token_mint: Pubkey,

    /// The owner of the deposited governing SPL Tokens
    pub governing_token_owner: Pubkey,

    /// The amount of governing tokens deposited into the Realm
    pub governing_token_deposit_amount: u64,
}

impl IsInitialized for TokenOwnerRecordHeader {
    fn is_initialized(&self) -> bool {
        self.account_type == TOKEN_OWNER_RECORD_V1_ACCOUNT_TYPE
            || self.account_type == TOKEN_OWNER_RECORD_V2_ACCOUNT_TYPE
    }
}

/// Returns the amount of governing tokens the wallet deposited into the realm
///
/// A wallet without a TokenOwnerRecord never deposited and has no base voting power
pub async fn get_governing_token_deposit_amount(
    client: &PluginChainClient,
    realm_context: &RealmContext,
) -> PluginChainResult<u64> {
    let token_owner_record_address = realm_context.get_token_owner_record_address();

    let Some(account) = client.get_account(&token_owner_record_address).await? else {
        debug!(
            "no token owner record {} for wallet {}",
            token_owner_record_address, realm_context.wallet
        );
        return Ok(0);
    };

    let token_owner_record = get_account_data::<TokenOwnerRecordHeader>(
        &realm_context.governance_program_id,
        &account.owner,
        &account.data,
    )
    .map_err(|reason| PluginChainError::InvalidAccountData {
        address: token_owner_record_address,
        reason,
    })?;

    Ok(token_owner_record.governing_token_deposit_amount)
}

/// Returns the supply of the governing token mint
pub async fn get_governing_token_mint_supply(
    client: &PluginChainClient,
    governing_token_mint: &Pubkey,
) -> PluginChainResult<u64> {
    let account = client.get_existing_account(governing_token_mint).await?;

    let mint = Mint::unpack(&account.data).map_err(|_| PluginChainError::InvalidAccountData {
        address: *governing_token_mint,
        reason: GovernanceToolsError::InvalidAccountData,
    })?;

    Ok(mint.supply)
}

/// The source of max vote weight used for voter weight calculations
#[derive(Clone, Copy, Debug, PartialEq, Eq, BorshDeserialize, BorshSerialize, BorshSchema)]
pub enum MintMaxVoterWeightSource {
    /// Fraction (10^10 precision) of the governing mint supply is used as max vote weight
    /// The default is 100% (10^10) to use all available mint supply for voting
    SupplyFraction(u64),

    /// Absolute value, irrelevant of the actual mint supply
    Absolute(u64),
}

impl MintMaxVoterWeightSource {
    /// Base for mint supply fraction calculation
    pub const SUPPLY_FRACTION_BASE: u64 = 10_000_000_000;

    /// 100% of mint supply
    pub const FULL_SUPPLY_FRACTION: MintMaxVoterWeightSource =
        MintMaxVoterWeightSource::SupplyFraction(MintMaxVoterWeightSource::SUPPLY_FRACTION_BASE);

    /// Returns true if the full mint supply is used
    pub fn is_full_supply(&self) -> bool {
        *self == MintMaxVoterWeightSource::FULL_SUPPLY_FRACTION
    }
}

impl Default for MintMaxVoterWeightSource {
    fn default() -> Self {
        MintMaxVoterWeightSource::FULL_SUPPLY_FRACTION
    }
}

/// Returns the max voter weight for the given mint supply, rounded down
pub fn calculate_mint_max_voter_weight(
    mint_supply: u64,
    max_voter_weight_source: &MintMaxVoterWeightSource,
) -> u64 {
    match max_voter_weight_source {
        MintMaxVoterWeightSource::SupplyFraction(fraction) => {
            if max_voter_weight_source.is_full_supply() {
                return mint_supply;
            }

            let max_voter_weight = (mint_supply as u128)
                .checked_mul(*fraction as u128)
                .map(|weight| weight / MintMaxVoterWeightSource::SUPPLY_FRACTION_BASE as u128)
                .unwrap_or(u128::MAX);

            u64::try_from(max_voter_weight).unwrap_or(u64::MAX)
        }
        MintMaxVoterWeightSource::Absolute(value) => *value,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_calculate_mint_max_voter_weight_with_full_supply() {
        // Act
        let max_voter_weight =
            calculate_mint_max_voter_weight(1_000, &MintMaxVoterWeightSource::default());

        // Assert
        assert_eq!(max_voter_weight, 1_000);
    }

    #[test]
    fn test_calculate_mint_max_voter_weight_with_supply_fraction_rounds_down() {
        // Arrange
        // 33.33333333%
        let source = MintMaxVoterWeightSource::SupplyFraction(3_333_333_333);

        // Act
        let max_voter_weight = calculate_mint_max_voter_weight(100, &source);

        // Assert
        assert_eq!(max_voter_weight, 33);
    }

    #[test]
    fn test_calculate_mint_max_voter_weight_with_large_supply() {
        // Arrange
        let source = MintMaxVoterWeightSource::SupplyFraction(5_000_000_000);

        // Act
        let max_voter_weight = calculate_mint_max_voter_weight(u64::MAX, &source);

        // Assert
        assert_eq!(max_voter_weight, u64::MAX / 2);
    }

    #[test]
    fn test_calculate_mint_max_voter_weight_with_absolute_value() {
        // Act
        let max_voter_weight =
            calculate_mint_max_voter_weight(100, &MintMaxVoterWeightSource::Absolute(7));

        // Assert
        assert_eq!(max_voter_weight, 7);
    }

    #[test]
    fn test_token_owner_record_address_is_owned_by_governance_program() {
        // Arrange
        let realm_context = RealmContext::new(
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
        );

        // Act
        let address = realm_context.get_token_owner_record_address();

        // Assert
        assert_eq!(
            address,
            get_token_owner_record_address(
                &realm_context.governance_program_id,
                &realm_context.realm,
                &realm_context.governing_token_mint,
                &realm_context.wallet,
            )
        );
    }
}
