//! Key/value configuration reads over the vault.

use crate::error::{Result, VaultError};
use crate::key::ConfigKey;
use crate::vault::VaultClient;
use std::collections::HashMap;
use std::sync::Arc;

/// Resolves hierarchical keys to vault values.
///
/// Stateless per call: every read goes straight to the vault client, and
/// vault errors propagate unchanged. Item names are matched
/// case-insensitively, the way the vault itself treats them.
///
/// # Examples
///
/// ```rust,no_run
/// use config_vault::store::ConfigStore;
/// use config_vault::vault::HttpVaultClient;
/// use std::sync::Arc;
///
/// # async fn example() -> config_vault::error::Result<()> {
/// let client = Arc::new(HttpVaultClient::new("http://localhost:8087")?);
/// let store = ConfigStore::new(client);
///
/// if let Some(host) = store.get("production/database/host").await? {
///     println!("db host: {host}");
/// }
/// # Ok(())
/// # }
/// ```
pub struct ConfigStore<C> {
    client: Arc<C>,
}

impl<C: VaultClient> ConfigStore<C> {
    /// Create a store over the given vault client.
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Get a configuration value by hierarchical key.
    ///
    /// Returns `None` when the namespace or the item does not exist, or the
    /// matched item has no note text.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::InvalidKeyFormat`] for malformed keys; vault
    /// errors propagate unchanged.
    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let key = ConfigKey::parse(key)?;

        let Some(folder) = self.client.folder_by_name(key.namespace()).await? else {
            return Ok(None);
        };

        let items = self.client.items_in_folder(&folder.id).await?;
        Ok(items
            .into_iter()
            .find(|item| item.name.eq_ignore_ascii_case(key.item()))
            .and_then(|item| item.notes))
    }

    /// Check whether a configuration key exists.
    ///
    /// # Errors
    ///
    /// Same conditions as [`ConfigStore::get`].
    pub async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }

    /// List all configuration entries under a namespace, keyed by item name
    /// (case preserved as stored). Items with no value are skipped; an
    /// unknown namespace yields an empty map.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::InvalidKeyFormat`] for an empty namespace;
    /// vault errors propagate unchanged.
    pub async fn list(&self, namespace: &str) -> Result<HashMap<String, String>> {
        if namespace.trim().is_empty() {
            return Err(VaultError::InvalidKeyFormat(
                "namespace cannot be empty".to_string(),
            ));
        }

        let Some(folder) = self.client.folder_by_name(namespace).await? else {
            return Ok(HashMap::new());
        };

        let items = self.client.items_in_folder(&folder.id).await?;
        Ok(items
            .into_iter()
            .filter_map(|item| {
                let name = item.name;
                item.notes
                    .filter(|notes| !notes.is_empty())
                    .map(|notes| (name, notes))
            })
            .collect())
    }
}

impl<C> Clone for ConfigStore<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
        }
    }
}
