//! Error types

use thiserror::Error;

/// Errors that may be returned by the Governance tools
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum GovernanceToolsError {
    /// Account is owned by a program other than the expected one
    #[error("Invalid account owner")]
    InvalidAccountOwner,

    /// Account data carries no valid discriminator or account type
    #[error("Account not initialized")]
    AccountNotInitialized,

    /// Account data could not be deserialized into the expected layout
    #[error("Invalid account data")]
    InvalidAccountData,
}
