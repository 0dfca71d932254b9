//! Backing-store client for the secrets vault.
//!
//! Speaks the `bw serve` style REST API: folders are configuration
//! namespaces, secure-note items inside them are configuration values.

mod client;
mod models;

pub use client::{HttpVaultClient, HttpVaultClientBuilder, VaultClient};
pub use models::{VaultFolder, VaultItem, VaultListData, VaultResponse};
