//! Events flowing from the change detector to subscribers.

use chrono::{DateTime, Utc};

/// The keys found changed in one poll cycle.
///
/// Produced once per cycle by the poller, consumed once by the broadcaster.
/// A removed key appears here exactly like a modified one; consumers cannot
/// distinguish the two from the event alone.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeSet {
    /// Fully-qualified `namespace/item` keys. Order is deterministic within
    /// a cycle: scan order for added/modified keys, then removed keys in
    /// snapshot order.
    pub keys: Vec<String>,
    /// When the change was detected.
    pub detected_at: DateTime<Utc>,
}

/// An event delivered through a subscriber queue.
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundEvent {
    /// One or more configuration keys changed.
    ConfigChanged {
        /// The changed keys that matched the subscriber's filter.
        keys: Vec<String>,
        /// Detection time of the originating poll cycle.
        timestamp: DateTime<Utc>,
    },
    /// Periodic keep-alive, never filtered.
    Heartbeat {
        /// Emission time.
        timestamp: DateTime<Utc>,
    },
}
