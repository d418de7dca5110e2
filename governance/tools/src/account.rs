//! General purpose account utility functions

use borsh::BorshDeserialize;
use solana_program::{program_pack::IsInitialized, pubkey::Pubkey};
use std::io::Error;

use crate::error::GovernanceToolsError;

/// Deserializes account data and asserts the account is initialized
///
/// Only the leading bytes required by `T` are read. Trailing bytes are ignored so
/// a shared header can be read from accounts which extend it with their own fields
pub fn get_account_data_unchecked<T: BorshDeserialize + IsInitialized>(
    data: &[u8],
) -> Result<T, GovernanceToolsError> {
    deserialize_account_data(data, |buf| T::deserialize(buf))
}

/// Deserializes account data and checks the account is owned by the given program
pub fn get_account_data<T: BorshDeserialize + IsInitialized>(
    owner_program_id: &Pubkey,
    account_owner: &Pubkey,
    data: &[u8],
) -> Result<T, GovernanceToolsError> {
    get_account_data_with(owner_program_id, account_owner, data, |buf| {
        T::deserialize(buf)
    })
}

/// Deserializes account data with the given deserializer and checks the account owner
///
/// Used for accounts whose layout depends on parameters not stored in the account itself
pub fn get_account_data_with<T, F>(
    owner_program_id: &Pubkey,
    account_owner: &Pubkey,
    data: &[u8],
    deserialize: F,
) -> Result<T, GovernanceToolsError>
where
    T: IsInitialized,
    F: FnOnce(&mut &[u8]) -> Result<T, Error>,
{
    if account_owner != owner_program_id {
        return Err(GovernanceToolsError::InvalidAccountOwner);
    }

    deserialize_account_data(data, deserialize)
}

fn deserialize_account_data<T, F>(data: &[u8], deserialize: F) -> Result<T, GovernanceToolsError>
where
    T: IsInitialized,
    F: FnOnce(&mut &[u8]) -> Result<T, Error>,
{
    if data.is_empty() {
        return Err(GovernanceToolsError::AccountNotInitialized);
    }

    let mut buf = data;
    let account_data =
        deserialize(&mut buf).map_err(|_| GovernanceToolsError::InvalidAccountData)?;

    if !account_data.is_initialized() {
        return Err(GovernanceToolsError::AccountNotInitialized);
    }

    Ok(account_data)
}
