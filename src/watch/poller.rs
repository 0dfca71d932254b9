//! Periodic change detection against the vault.

use crate::error::Result;
use crate::vault::VaultClient;
use crate::watch::broadcaster::EventBroadcaster;
use crate::watch::event::ChangeSet;
use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Point-in-time mapping of every known `namespace/item` key to its
/// last-seen revision timestamp.
pub type RevisionSnapshot = BTreeMap<String, DateTime<Utc>>;

/// Background poller that diffs vault revisions and feeds the broadcaster.
///
/// The poller owns the revision snapshot. On each cycle it rescans every
/// folder, computes the set of added, modified, and removed keys against
/// the previous snapshot, replaces the snapshot wholesale, and hands any
/// non-empty change set to the broadcaster. The first successful scan only
/// establishes the baseline and is never emitted.
///
/// Scan failures are logged and skipped; the loop itself only exits on
/// cancellation.
pub struct ChangePoller<C> {
    client: Arc<C>,
    broadcaster: EventBroadcaster,
    interval: Duration,
    snapshot: Arc<ArcSwap<RevisionSnapshot>>,
}

impl<C: VaultClient> ChangePoller<C> {
    /// Create a poller. An interval of zero disables polling entirely.
    pub fn new(client: Arc<C>, broadcaster: EventBroadcaster, interval: Duration) -> Self {
        Self {
            client,
            broadcaster,
            interval,
            snapshot: Arc::new(ArcSwap::from_pointee(RevisionSnapshot::new())),
        }
    }

    /// Handle for reading the latest snapshot without locking.
    ///
    /// The snapshot is replaced atomically once per successful cycle;
    /// readers never observe a partially-updated state.
    pub fn snapshot_handle(&self) -> Arc<ArcSwap<RevisionSnapshot>> {
        Arc::clone(&self.snapshot)
    }

    /// Run the poll loop until `cancel` fires.
    ///
    /// Returns immediately when the poll interval is zero, without touching
    /// the vault.
    pub async fn run(self, cancel: CancellationToken) {
        if self.interval.is_zero() {
            info!("configuration polling is disabled");
            return;
        }

        info!(
            interval_secs = self.interval.as_secs(),
            "starting configuration change polling"
        );

        let mut baseline_loaded = self.try_load_baseline().await;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("configuration change polling stopped");
                    return;
                }
                _ = tokio::time::sleep(self.interval) => {}
            }

            if !baseline_loaded {
                baseline_loaded = self.try_load_baseline().await;
                continue;
            }

            if let Err(e) = self.check_for_changes().await {
                error!(error = %e, "error checking for configuration changes");
            }
        }
    }

    /// Full scan establishing the baseline. Nothing is emitted for it.
    async fn try_load_baseline(&self) -> bool {
        match self.scan().await {
            Ok(snapshot) => {
                debug!(count = snapshot.len(), "loaded configuration revisions");
                self.snapshot.store(Arc::new(snapshot));
                true
            }
            Err(e) => {
                error!(error = %e, "failed to load configuration revisions");
                false
            }
        }
    }

    async fn scan(&self) -> Result<RevisionSnapshot> {
        let mut revisions = RevisionSnapshot::new();
        for folder in self.client.folders().await? {
            for item in self.client.items_in_folder(&folder.id).await? {
                revisions.insert(format!("{}/{}", folder.name, item.name), item.revision_date);
            }
        }
        Ok(revisions)
    }

    async fn check_for_changes(&self) -> Result<()> {
        let old = self.snapshot.load_full();

        let mut changed_keys = Vec::new();
        let mut new_snapshot = RevisionSnapshot::new();

        for folder in self.client.folders().await? {
            for item in self.client.items_in_folder(&folder.id).await? {
                let key = format!("{}/{}", folder.name, item.name);

                match old.get(&key) {
                    Some(old_revision) if item.revision_date <= *old_revision => {}
                    _ => changed_keys.push(key.clone()),
                }

                new_snapshot.insert(key, item.revision_date);
            }
        }

        // A key that vanished counts as changed too; consumers cannot tell
        // deletion from modification at this layer.
        for key in old.keys() {
            if !new_snapshot.contains_key(key) {
                changed_keys.push(key.clone());
            }
        }

        self.snapshot.store(Arc::new(new_snapshot));

        if !changed_keys.is_empty() {
            info!(
                count = changed_keys.len(),
                keys = ?changed_keys,
                "detected configuration changes"
            );
            self.broadcaster.broadcast_changes(&ChangeSet {
                keys: changed_keys,
                detected_at: Utc::now(),
            });
        }

        Ok(())
    }
}
