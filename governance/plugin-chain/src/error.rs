//! Error types

use solana_program::pubkey::Pubkey;
use spl_governance_tools::error::GovernanceToolsError;
use thiserror::Error;

/// Generic error recorded when a plugin returns no weight without raising an error
pub const PLUGIN_FAILED_TO_CALCULATE_VOTER_WEIGHT: &str = "Plugin failed to calculate voter weight";

/// Errors that may be returned by the plugin chain
///
/// Address derivation, registrar resolution and transport errors are returned to the caller.
/// Errors raised by a plugin while calculating weight are recorded in `CalculatedWeight` instead
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum PluginChainError {
    /// Seed identifier is malformed or no program address exists for the seeds
    #[error("Invalid seed: {0}")]
    InvalidSeed(String),

    /// Account doesn't exist at the derived address
    #[error("Account not found: {0}")]
    NotFound(Pubkey),

    /// Ledger read failed or timed out. Retryable by the caller
    #[error("Transport error: {0}")]
    Transport(String),

    /// Plugin failed or vetoed the weight calculation
    #[error("{0}")]
    PluginComputation(String),

    /// Plugin requires an eligibility credential which wasn't supplied
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    /// Account exists but its data doesn't match the expected layout or owner
    #[error("Invalid account data {address}: {reason}")]
    InvalidAccountData {
        /// Address of the account
        address: Pubkey,
        /// Reason the data was rejected
        reason: GovernanceToolsError,
    },

    /// Plugin name is not registered
    #[error("Unknown plugin: {0}")]
    UnknownPlugin(String),

    /// Plugin name is already registered
    #[error("Plugin already registered: {0}")]
    DuplicatePlugin(String),

    /// Configuration can't be loaded or is invalid
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl PluginChainError {
    /// Returns true if the error is a transient ledger failure the caller may retry
    pub fn is_retryable(&self) -> bool {
        matches!(self, PluginChainError::Transport(_))
    }
}

/// Result type of the plugin chain operations
pub type PluginChainResult<T> = Result<T, PluginChainError>;
