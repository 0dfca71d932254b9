//! Subscriber handles.

use crate::watch::event::OutboundEvent;
use crate::watch::pattern::KeyPattern;
use crate::watch::queue::EventQueue;
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Per-subscriber state shared between the registry and the handle.
pub(crate) struct SubscriberState {
    pub(crate) filter: Option<KeyPattern>,
    pub(crate) queue: EventQueue,
}

impl SubscriberState {
    /// Whether a key passes this subscriber's filter. No filter matches
    /// every key.
    pub(crate) fn matches(&self, key: &str) -> bool {
        self.filter.as_ref().is_none_or(|pattern| pattern.matches(key))
    }
}

/// A registered subscriber: an id, an optional key filter, and a bounded
/// delivery queue.
///
/// One transport connection owns one `Subscription` and drains it with
/// [`Subscription::recv`] until it yields `None`. Dropping the handle
/// unregisters the subscriber and closes its queue.
pub struct Subscription {
    id: Uuid,
    state: Arc<SubscriberState>,
    registry: Arc<DashMap<Uuid, Arc<SubscriberState>>>,
}

impl Subscription {
    pub(crate) fn new(
        id: Uuid,
        state: Arc<SubscriberState>,
        registry: Arc<DashMap<Uuid, Arc<SubscriberState>>>,
    ) -> Self {
        Self {
            id,
            state,
            registry,
        }
    }

    /// Opaque subscriber id.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The filter string this subscriber registered with, if any.
    pub fn filter(&self) -> Option<&str> {
        self.state.filter.as_ref().map(KeyPattern::as_str)
    }

    /// Receive the next event for this subscriber.
    ///
    /// Suspends until an event is available. Returns `None` once the
    /// subscriber has been unregistered (or the service shut down) and all
    /// buffered events were drained.
    pub async fn recv(&mut self) -> Option<OutboundEvent> {
        self.state.queue.recv().await
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.registry.remove(&self.id);
        self.state.queue.close();
    }
}
