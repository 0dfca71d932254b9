//! # config-vault
//!
//! Versioned key/value configuration store backed by a secrets vault, with
//! change polling and filtered subscriber notifications.
//!
//! ## Overview
//!
//! `config-vault` treats a secrets vault (a `bw serve` style REST API) as a
//! hierarchical configuration store: folders are namespaces, secure-note
//! items are values. On top of the read operations it runs a
//! change-detection pipeline:
//!
//! - a background poller snapshots every item's revision timestamp and
//!   diffs consecutive snapshots to find added, modified, and removed keys,
//! - a broadcaster fans each change set out to subscribers, filtered by
//!   per-subscriber glob patterns (`*` within a segment, `**` across
//!   segments),
//! - each subscriber drains a bounded drop-oldest queue, so a slow consumer
//!   only ever loses its own oldest events,
//! - an independent heartbeat timer keeps long-lived connections alive.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use config_vault::prelude::*;
//!
//! # async fn example() -> Result<()> {
//! let service = ConfigVault::builder()
//!     .with_vault_url("http://localhost:8087")
//!     .with_poll_interval_secs(30)
//!     .build()?;
//!
//! // Read-path operations.
//! let host = service.get("production/database/host").await?;
//! println!("db host: {host:?}");
//!
//! // Change notifications, filtered to one namespace.
//! let mut subscription = service.subscribe(Some("production/**"))?;
//! while let Some(event) = subscription.recv().await {
//!     println!("event: {event:?}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Delivery model
//!
//! Delivery is per-subscriber FIFO and lossy under load: queues never block
//! the producer, and overflow silently evicts the oldest undelivered event.
//! There is no change history and no exactly-once guarantee.

#![warn(missing_docs, rust_2024_compatibility)]
#![deny(unsafe_code)]

pub mod error;
pub mod key;
pub mod options;
pub mod service;
pub mod sse;
pub mod store;
pub mod vault;
pub mod watch;

/// Convenient re-exports for common usage patterns.
pub mod prelude {
    pub use crate::error::{Result, VaultError};
    pub use crate::key::ConfigKey;
    pub use crate::options::VaultConfigOptions;
    pub use crate::service::{ConfigVault, ConfigVaultBuilder};
    pub use crate::store::ConfigStore;
    pub use crate::vault::{HttpVaultClient, VaultClient};
    pub use crate::watch::{ChangeSet, OutboundEvent, Subscription};
}
