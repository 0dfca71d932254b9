//! Runtime options for the service.

use crate::error::{Result, VaultError};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Options controlling the vault connection and the notification pipeline.
///
/// All fields have defaults, so a missing options file yields a usable
/// configuration pointing at a local vault.
///
/// # Examples
///
/// ```rust,no_run
/// use config_vault::options::VaultConfigOptions;
/// use std::path::Path;
///
/// # fn example() -> config_vault::error::Result<()> {
/// // config.toml plus CONFIG_VAULT_* environment overrides.
/// let options = VaultConfigOptions::load(Some(Path::new("config.toml")))?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VaultConfigOptions {
    /// Base URL of the vault REST API.
    pub vault_base_url: String,
    /// Poll interval for change detection in seconds. Zero or negative
    /// disables polling.
    pub polling_interval_secs: i64,
    /// Heartbeat period in seconds.
    pub heartbeat_interval_secs: u64,
    /// Per-subscriber delivery queue capacity.
    pub queue_capacity: usize,
    /// API keys accepted by transport adapters. Unused inside the crate.
    pub api_keys: Vec<String>,
}

impl Default for VaultConfigOptions {
    fn default() -> Self {
        Self {
            vault_base_url: "http://localhost:8087".to_string(),
            polling_interval_secs: 30,
            heartbeat_interval_secs: 30,
            queue_capacity: 100,
            api_keys: Vec::new(),
        }
    }
}

impl VaultConfigOptions {
    /// Load options from an optional file, with `CONFIG_VAULT_*` environment
    /// variables taking precedence (e.g. `CONFIG_VAULT_POLLING_INTERVAL_SECS`).
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::InvalidOptions`] when the file cannot be read
    /// or a value does not deserialize.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }
        builder = builder.add_source(config::Environment::with_prefix("CONFIG_VAULT"));

        builder
            .build()
            .and_then(|settings| settings.try_deserialize())
            .map_err(|e| VaultError::InvalidOptions(e.to_string()))
    }

    /// The poll interval as a duration; `None` when polling is disabled.
    pub fn poll_interval(&self) -> Option<Duration> {
        u64::try_from(self.polling_interval_secs)
            .ok()
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// The heartbeat period as a duration.
    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_secs)
    }
}
