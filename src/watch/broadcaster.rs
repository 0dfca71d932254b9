//! Fan-out of change and heartbeat events to registered subscribers.

use crate::error::Result;
use crate::watch::event::{ChangeSet, OutboundEvent};
use crate::watch::pattern::KeyPattern;
use crate::watch::queue::EventQueue;
use crate::watch::subscriber::{SubscriberState, Subscription};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use uuid::Uuid;

/// Registry of subscribers plus the delivery logic feeding their queues.
///
/// Registration, unregistration, and broadcast may all run concurrently;
/// the registry tolerates subscribers appearing and disappearing while a
/// broadcast is iterating. Delivery never blocks: each subscriber's queue
/// drops its own oldest events under load.
///
/// # Examples
///
/// ```rust
/// use config_vault::watch::EventBroadcaster;
///
/// # fn example() -> config_vault::error::Result<()> {
/// let broadcaster = EventBroadcaster::new(100);
/// let subscription = broadcaster.register(Some("production/**"))?;
/// assert_eq!(subscription.filter(), Some("production/**"));
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct EventBroadcaster {
    subscribers: Arc<DashMap<Uuid, Arc<SubscriberState>>>,
    capacity: usize,
}

impl EventBroadcaster {
    /// Create a broadcaster whose subscriber queues hold `capacity` events.
    pub fn new(capacity: usize) -> Self {
        Self {
            subscribers: Arc::new(DashMap::new()),
            capacity,
        }
    }

    /// Register a new subscriber with an optional key filter.
    ///
    /// An absent or empty filter matches every key.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::VaultError::InvalidPattern`] when the filter
    /// does not compile.
    pub fn register(&self, filter: Option<&str>) -> Result<Subscription> {
        let filter = filter
            .filter(|pattern| !pattern.is_empty())
            .map(KeyPattern::compile)
            .transpose()?;

        let id = Uuid::new_v4();
        let state = Arc::new(SubscriberState {
            filter,
            queue: EventQueue::new(self.capacity),
        });
        self.subscribers.insert(id, Arc::clone(&state));

        info!(
            subscriber = %id,
            filter = state.filter.as_ref().map(KeyPattern::as_str).unwrap_or("(all)"),
            "subscriber connected"
        );

        Ok(Subscription::new(id, state, Arc::clone(&self.subscribers)))
    }

    /// Remove a subscriber and close its queue. The consumer drains any
    /// buffered events and then observes end-of-stream.
    pub fn unregister(&self, id: &Uuid) {
        if let Some((_, state)) = self.subscribers.remove(id) {
            state.queue.close();
            info!(subscriber = %id, "subscriber disconnected");
        }
    }

    /// Deliver a change set to every subscriber whose filter matches at
    /// least one key. Each subscriber receives only its matched keys,
    /// stamped with the original detection time.
    pub fn broadcast_changes(&self, change_set: &ChangeSet) {
        for entry in self.subscribers.iter() {
            let matched: Vec<String> = change_set
                .keys
                .iter()
                .filter(|key| entry.value().matches(key))
                .cloned()
                .collect();

            if matched.is_empty() {
                continue;
            }

            entry.value().queue.push(OutboundEvent::ConfigChanged {
                keys: matched,
                timestamp: change_set.detected_at,
            });
        }

        debug!(
            subscribers = self.subscribers.len(),
            keys = change_set.keys.len(),
            "broadcast config-changed"
        );
    }

    /// Deliver a heartbeat to every subscriber. Heartbeats bypass filters.
    pub fn broadcast_heartbeat(&self, timestamp: DateTime<Utc>) {
        for entry in self.subscribers.iter() {
            entry
                .value()
                .queue
                .push(OutboundEvent::Heartbeat { timestamp });
        }
    }

    /// Drive heartbeats on a fixed period until cancelled.
    ///
    /// Runs independently of the poll loop; transports use the heartbeats
    /// to keep long-lived connections alive.
    pub async fn run_heartbeats(self, period: Duration, cancel: CancellationToken) {
        if period.is_zero() {
            debug!("heartbeats are disabled");
            return;
        }

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("heartbeat timer stopped");
                    return;
                }
                _ = tokio::time::sleep(period) => {}
            }
            self.broadcast_heartbeat(Utc::now());
        }
    }

    /// Close every subscriber queue and clear the registry. Consumers
    /// observe end-of-stream after draining.
    pub fn close_all(&self) {
        for entry in self.subscribers.iter() {
            entry.value().queue.close();
        }
        self.subscribers.clear();
    }

    /// Number of currently registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn change_set(keys: &[&str]) -> ChangeSet {
        ChangeSet {
            keys: keys.iter().map(|k| k.to_string()).collect(),
            detected_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_broadcast_filters_per_subscriber() {
        let broadcaster = EventBroadcaster::new(100);
        let mut production = broadcaster.register(Some("production/**")).unwrap();
        let mut staging = broadcaster.register(Some("staging/**")).unwrap();

        broadcaster.broadcast_changes(&change_set(&[
            "production/database/host",
            "production/cache/url",
        ]));

        match production.recv().await {
            Some(OutboundEvent::ConfigChanged { keys, .. }) => {
                assert_eq!(keys, vec!["production/database/host", "production/cache/url"]);
            }
            other => panic!("unexpected event: {other:?}"),
        }

        // The staging subscriber got nothing for this cycle.
        broadcaster.unregister(&staging.id());
        assert!(staging.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_broadcast_carries_only_matched_keys() {
        let broadcaster = EventBroadcaster::new(100);
        let mut subscription = broadcaster.register(Some("*/database/*")).unwrap();

        broadcaster.broadcast_changes(&change_set(&[
            "production/database/host",
            "production/cache/url",
        ]));

        match subscription.recv().await {
            Some(OutboundEvent::ConfigChanged { keys, timestamp }) => {
                assert_eq!(keys, vec!["production/database/host"]);
                assert_eq!(
                    timestamp,
                    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
                );
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unfiltered_subscriber_receives_everything() {
        let broadcaster = EventBroadcaster::new(100);
        let mut subscription = broadcaster.register(None).unwrap();

        broadcaster.broadcast_changes(&change_set(&["a/b", "c/d"]));

        match subscription.recv().await {
            Some(OutboundEvent::ConfigChanged { keys, .. }) => {
                assert_eq!(keys, vec!["a/b", "c/d"]);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_heartbeats_bypass_filters() {
        let broadcaster = EventBroadcaster::new(100);
        let mut subscription = broadcaster.register(Some("never/matches")).unwrap();

        broadcaster.broadcast_heartbeat(Utc::now());

        assert!(matches!(
            subscription.recv().await,
            Some(OutboundEvent::Heartbeat { .. })
        ));
    }

    #[tokio::test]
    async fn test_register_rejects_bad_pattern() {
        // Compilation goes through regex::escape, so any filter string is
        // structurally valid; empty filters degrade to match-all instead.
        let broadcaster = EventBroadcaster::new(100);
        let subscription = broadcaster.register(Some("")).unwrap();
        assert_eq!(subscription.filter(), None);
    }

    #[tokio::test]
    async fn test_drop_unregisters() {
        let broadcaster = EventBroadcaster::new(100);
        let subscription = broadcaster.register(None).unwrap();
        assert_eq!(broadcaster.subscriber_count(), 1);

        drop(subscription);
        assert_eq!(broadcaster.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_close_all_ends_streams() {
        let broadcaster = EventBroadcaster::new(100);
        let mut subscription = broadcaster.register(None).unwrap();
        broadcaster.broadcast_heartbeat(Utc::now());

        broadcaster.close_all();
        assert_eq!(broadcaster.subscriber_count(), 0);

        // Buffered heartbeat drains first, then end-of-stream.
        assert!(subscription.recv().await.is_some());
        assert!(subscription.recv().await.is_none());
    }
}
