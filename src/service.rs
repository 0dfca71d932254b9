//! The service facade wiring the store, poller, and broadcaster together.

use crate::error::Result;
use crate::options::VaultConfigOptions;
use crate::store::ConfigStore;
use crate::vault::{HttpVaultClient, VaultClient};
use crate::watch::poller::{ChangePoller, RevisionSnapshot};
use crate::watch::{EventBroadcaster, Subscription};
use arc_swap::ArcSwap;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// A running configuration service.
///
/// Owns the background poll loop and the heartbeat timer, and exposes the
/// read operations and the subscription API. Create one with
/// [`ConfigVault::builder`] (HTTP vault) or [`ConfigVault::start`] (any
/// [`VaultClient`], e.g. a fake in tests).
///
/// Both background tasks run until [`ConfigVault::shutdown`] is called.
///
/// # Examples
///
/// ```rust,no_run
/// use config_vault::prelude::*;
///
/// # async fn example() -> Result<()> {
/// let service = ConfigVault::builder()
///     .with_vault_url("http://localhost:8087")
///     .with_poll_interval_secs(30)
///     .build()?;
///
/// let mut subscription = service.subscribe(Some("production/**"))?;
/// while let Some(event) = subscription.recv().await {
///     println!("{event:?}");
/// }
/// # Ok(())
/// # }
/// ```
pub struct ConfigVault<C> {
    client: Arc<C>,
    store: ConfigStore<C>,
    broadcaster: EventBroadcaster,
    snapshot: Arc<ArcSwap<RevisionSnapshot>>,
    cancel: CancellationToken,
}

impl ConfigVault<HttpVaultClient> {
    /// Create a new builder for a service backed by the HTTP vault client.
    pub fn builder() -> ConfigVaultBuilder {
        ConfigVaultBuilder::new()
    }
}

impl<C: VaultClient> ConfigVault<C> {
    /// Start the service over the given vault client.
    ///
    /// Spawns the poll loop (a zero poll interval disables it without any
    /// vault access) and the heartbeat timer. Must be called within a Tokio
    /// runtime.
    pub fn start(client: C, options: &VaultConfigOptions) -> Self {
        let client = Arc::new(client);
        let broadcaster = EventBroadcaster::new(options.queue_capacity);
        let cancel = CancellationToken::new();

        let poller = ChangePoller::new(
            Arc::clone(&client),
            broadcaster.clone(),
            options.poll_interval().unwrap_or(Duration::ZERO),
        );
        let snapshot = poller.snapshot_handle();
        tokio::spawn(poller.run(cancel.child_token()));

        tokio::spawn(
            broadcaster
                .clone()
                .run_heartbeats(options.heartbeat_interval(), cancel.child_token()),
        );

        Self {
            store: ConfigStore::new(Arc::clone(&client)),
            client,
            broadcaster,
            snapshot,
            cancel,
        }
    }

    /// Get a configuration value by hierarchical key.
    ///
    /// # Errors
    ///
    /// See [`ConfigStore::get`].
    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        self.store.get(key).await
    }

    /// Check whether a configuration key exists.
    ///
    /// # Errors
    ///
    /// See [`ConfigStore::exists`].
    pub async fn exists(&self, key: &str) -> Result<bool> {
        self.store.exists(key).await
    }

    /// List all configuration entries under a namespace.
    ///
    /// # Errors
    ///
    /// See [`ConfigStore::list`].
    pub async fn list(&self, namespace: &str) -> Result<HashMap<String, String>> {
        self.store.list(namespace).await
    }

    /// Register a subscriber with an optional key filter.
    ///
    /// # Errors
    ///
    /// See [`EventBroadcaster::register`].
    pub fn subscribe(&self, filter: Option<&str>) -> Result<Subscription> {
        self.broadcaster.register(filter)
    }

    /// Whether the vault is reachable and unlocked.
    pub async fn is_healthy(&self) -> bool {
        self.client.is_unlocked().await
    }

    /// The keys currently tracked by the change detector, in sorted order.
    pub fn tracked_keys(&self) -> Vec<String> {
        self.snapshot.load().keys().cloned().collect()
    }

    /// Number of currently registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.broadcaster.subscriber_count()
    }

    /// Stop the service: signal the poll loop and heartbeat timer to exit
    /// and close every subscriber queue so consumers observe end-of-stream.
    pub fn shutdown(&self) {
        self.cancel.cancel();
        self.broadcaster.close_all();
    }
}

/// Builder for constructing a [`ConfigVault`] service over HTTP.
///
/// Options are resolved in order: an options file (if given), then explicit
/// setter overrides.
pub struct ConfigVaultBuilder {
    options_file: Option<PathBuf>,
    vault_url: Option<String>,
    poll_interval_secs: Option<i64>,
    heartbeat_interval_secs: Option<u64>,
    queue_capacity: Option<usize>,
}

impl ConfigVaultBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            options_file: None,
            vault_url: None,
            poll_interval_secs: None,
            heartbeat_interval_secs: None,
            queue_capacity: None,
        }
    }

    /// Read base options from a file (TOML, YAML, or JSON), with
    /// `CONFIG_VAULT_*` environment overrides.
    pub fn with_options_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.options_file = Some(path.into());
        self
    }

    /// Set the vault base URL.
    pub fn with_vault_url(mut self, url: impl Into<String>) -> Self {
        self.vault_url = Some(url.into());
        self
    }

    /// Set the poll interval in seconds. Zero disables change detection.
    pub fn with_poll_interval_secs(mut self, secs: i64) -> Self {
        self.poll_interval_secs = Some(secs);
        self
    }

    /// Set the heartbeat period in seconds.
    pub fn with_heartbeat_interval_secs(mut self, secs: u64) -> Self {
        self.heartbeat_interval_secs = Some(secs);
        self
    }

    /// Set the per-subscriber queue capacity.
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = Some(capacity);
        self
    }

    /// Build and start the service. Must be called within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the options file cannot be loaded or the HTTP
    /// client cannot be constructed.
    pub fn build(self) -> Result<ConfigVault<HttpVaultClient>> {
        let mut options = match &self.options_file {
            Some(path) => VaultConfigOptions::load(Some(path))?,
            None => VaultConfigOptions::default(),
        };

        if let Some(url) = self.vault_url {
            options.vault_base_url = url;
        }
        if let Some(secs) = self.poll_interval_secs {
            options.polling_interval_secs = secs;
        }
        if let Some(secs) = self.heartbeat_interval_secs {
            options.heartbeat_interval_secs = secs;
        }
        if let Some(capacity) = self.queue_capacity {
            options.queue_capacity = capacity;
        }

        let client = HttpVaultClient::new(&options.vault_base_url)?;
        Ok(ConfigVault::start(client, &options))
    }
}

impl Default for ConfigVaultBuilder {
    fn default() -> Self {
        Self::new()
    }
}
