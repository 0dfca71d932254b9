//! Error types for config-vault.

/// Result type alias for config-vault operations.
pub type Result<T> = std::result::Result<T, VaultError>;

/// Errors that can occur when reading configuration or talking to the vault.
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    /// A raw key did not follow the `namespace/item` format.
    #[error("Invalid key format: {0}")]
    InvalidKeyFormat(String),

    /// A subscription filter pattern could not be compiled.
    #[error("Invalid filter pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The filter string as supplied at registration.
        pattern: String,
        /// Why compilation rejected it.
        reason: String,
    },

    /// The vault could not be reached.
    #[error("Failed to connect to the vault: {0}")]
    Connection(String),

    /// The vault is reachable but locked.
    #[error("The vault is locked; unlock it before using this service")]
    Locked,

    /// The vault returned a body that could not be decoded.
    #[error("Failed to decode vault response: {0}")]
    Deserialize(String),

    /// Runtime options could not be loaded.
    #[error("Failed to load options: {0}")]
    InvalidOptions(String),
}
