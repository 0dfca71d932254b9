//! The vault client trait and its HTTP implementation.

use crate::error::{Result, VaultError};
use crate::vault::models::{VaultFolder, VaultItem, VaultListData, VaultResponse};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Read contract against the backing vault.
///
/// The rest of the crate only consumes this trait; tests substitute an
/// in-memory implementation for the HTTP client.
#[async_trait]
pub trait VaultClient: Send + Sync + 'static {
    /// List all folders (configuration namespaces).
    async fn folders(&self) -> Result<Vec<VaultFolder>>;

    /// List the secure-note items in a folder.
    async fn items_in_folder(&self, folder_id: &str) -> Result<Vec<VaultItem>>;

    /// Fetch a single item by id, `None` when the vault does not know it.
    async fn item_by_id(&self, id: &str) -> Result<Option<VaultItem>>;

    /// Whether the vault is currently unlocked and usable. Any failure to
    /// reach the vault or to read its status reports `false`.
    async fn is_unlocked(&self) -> bool;

    /// Find a folder by name, case-insensitively.
    async fn folder_by_name(&self, name: &str) -> Result<Option<VaultFolder>> {
        let folders = self.folders().await?;
        Ok(folders
            .into_iter()
            .find(|folder| folder.name.eq_ignore_ascii_case(name)))
    }
}

/// Vault client over the `bw serve` REST API.
///
/// # Examples
///
/// ```rust,no_run
/// use config_vault::vault::HttpVaultClient;
/// use std::time::Duration;
///
/// # fn example() -> config_vault::error::Result<()> {
/// let client = HttpVaultClient::builder()
///     .with_base_url("http://localhost:8087")
///     .with_timeout(Duration::from_secs(5))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct HttpVaultClient {
    base_url: String,
    client: Client,
}

impl HttpVaultClient {
    /// Create a new builder for constructing an HTTP vault client.
    pub fn builder() -> HttpVaultClientBuilder {
        HttpVaultClientBuilder::new()
    }

    /// Create a client against the given base URL with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::builder().with_base_url(base_url).build()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| VaultError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(VaultError::Connection(format!(
                "vault returned status {status}"
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| VaultError::Deserialize(e.to_string()))
    }
}

#[async_trait]
impl VaultClient for HttpVaultClient {
    async fn folders(&self) -> Result<Vec<VaultFolder>> {
        let response: VaultResponse<VaultListData<VaultFolder>> =
            self.get_json("list/object/folders").await?;

        Ok(response.data.map(|list| list.data).unwrap_or_default())
    }

    async fn items_in_folder(&self, folder_id: &str) -> Result<Vec<VaultItem>> {
        let response: VaultResponse<VaultListData<VaultItem>> = self
            .get_json(&format!("list/object/items?folderid={folder_id}"))
            .await?;

        let items = response.data.map(|list| list.data).unwrap_or_default();
        Ok(items
            .into_iter()
            .filter(|item| item.kind == VaultItem::SECURE_NOTE)
            .collect())
    }

    async fn item_by_id(&self, id: &str) -> Result<Option<VaultItem>> {
        let response: VaultResponse<VaultItem> =
            self.get_json(&format!("object/item/{id}")).await?;

        Ok(if response.success { response.data } else { None })
    }

    async fn is_unlocked(&self) -> bool {
        let response = match self.client.get(self.url("status")).send().await {
            Ok(response) => response,
            Err(e) => {
                debug!(error = %e, "vault status probe failed");
                return false;
            }
        };

        if !response.status().is_success() {
            return false;
        }

        match response.text().await {
            Ok(body) => body
                .to_ascii_lowercase()
                .contains(r#""status":"unlocked""#),
            Err(_) => false,
        }
    }
}

/// Builder for constructing an [`HttpVaultClient`].
pub struct HttpVaultClientBuilder {
    base_url: Option<String>,
    timeout: Duration,
}

impl HttpVaultClientBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(10),
        }
    }

    /// Set the base URL of the vault REST API (e.g. `http://localhost:8087`).
    ///
    /// A trailing slash is stripped.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the per-request timeout. Default is 10 seconds.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns an error if no base URL was provided or the HTTP client
    /// cannot be constructed.
    pub fn build(self) -> Result<HttpVaultClient> {
        let base_url = self.base_url.ok_or_else(|| {
            VaultError::Connection("base URL is required for HttpVaultClient".to_string())
        })?;

        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| VaultError::Connection(format!("failed to create HTTP client: {e}")))?;

        Ok(HttpVaultClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }
}

impl Default for HttpVaultClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let client = HttpVaultClient::builder()
            .with_base_url("http://localhost:8087/")
            .with_timeout(Duration::from_secs(5))
            .build()
            .unwrap();

        assert_eq!(client.base_url, "http://localhost:8087");
        assert_eq!(client.url("status"), "http://localhost:8087/status");
    }

    #[test]
    fn test_builder_requires_base_url() {
        assert!(HttpVaultClientBuilder::new().build().is_err());
    }
}
