//! Bounded drop-oldest delivery queues.

use crate::watch::event::OutboundEvent;
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::sync::Notify;

/// A bounded FIFO that evicts its oldest entry instead of blocking the
/// producer.
///
/// This is the delivery buffer between the broadcaster and one subscriber's
/// consumer: pushes are synchronous and never wait, so a slow consumer only
/// loses its own oldest undelivered events. Closing the queue lets the
/// consumer drain whatever is buffered and then observe end-of-stream.
#[derive(Debug)]
pub struct EventQueue {
    state: Mutex<QueueState>,
    notify: Notify,
    capacity: usize,
}

#[derive(Debug)]
struct QueueState {
    items: VecDeque<OutboundEvent>,
    closed: bool,
}

impl EventQueue {
    /// Create a queue holding at most `capacity` events.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            state: Mutex::new(QueueState {
                items: VecDeque::with_capacity(capacity),
                closed: false,
            }),
            notify: Notify::new(),
            capacity,
        }
    }

    /// Enqueue an event, evicting the oldest buffered entry when full.
    /// A push onto a closed queue is silently dropped.
    pub fn push(&self, event: OutboundEvent) {
        {
            let mut state = self.state.lock().unwrap();
            if state.closed {
                return;
            }
            if state.items.len() == self.capacity {
                state.items.pop_front();
            }
            state.items.push_back(event);
        }
        self.notify.notify_waiters();
    }

    /// Receive the next event in FIFO order.
    ///
    /// Suspends while the queue is empty and open. Returns `None` once the
    /// queue has been closed and fully drained.
    pub async fn recv(&self) -> Option<OutboundEvent> {
        loop {
            // Register for a wakeup before checking state, so a push that
            // lands between the check and the await is not lost.
            let notified = self.notify.notified();
            {
                let mut state = self.state.lock().unwrap();
                if let Some(event) = state.items.pop_front() {
                    return Some(event);
                }
                if state.closed {
                    return None;
                }
            }
            notified.await;
        }
    }

    /// Close the queue. Buffered events stay readable; subsequent pushes
    /// are dropped.
    pub fn close(&self) {
        {
            self.state.lock().unwrap().closed = true;
        }
        self.notify.notify_waiters();
    }

    /// Whether the queue has been closed.
    pub fn is_closed(&self) -> bool {
        self.state.lock().unwrap().closed
    }

    /// Number of events currently buffered.
    pub fn len(&self) -> usize {
        self.state.lock().unwrap().items.len()
    }

    /// Whether the queue is currently empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;

    fn heartbeat() -> OutboundEvent {
        OutboundEvent::Heartbeat {
            timestamp: Utc::now(),
        }
    }

    fn changed(key: &str) -> OutboundEvent {
        OutboundEvent::ConfigChanged {
            keys: vec![key.to_string()],
            timestamp: Utc::now(),
        }
    }

    fn changed_keys(event: Option<OutboundEvent>) -> Vec<String> {
        match event {
            Some(OutboundEvent::ConfigChanged { keys, .. }) => keys,
            other => panic!("expected config-changed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fifo_order() {
        let queue = EventQueue::new(10);
        queue.push(changed("a"));
        queue.push(changed("b"));

        assert_eq!(changed_keys(queue.recv().await), vec!["a"]);
        assert_eq!(changed_keys(queue.recv().await), vec!["b"]);
    }

    #[tokio::test]
    async fn test_overflow_drops_oldest() {
        let queue = EventQueue::new(100);
        for i in 0..101 {
            queue.push(changed(&format!("key-{i}")));
        }

        assert_eq!(queue.len(), 100);

        // The very first event was evicted; the remaining 100 arrive in order.
        for i in 1..101 {
            match queue.recv().await {
                Some(OutboundEvent::ConfigChanged { keys, .. }) => {
                    assert_eq!(keys, vec![format!("key-{i}")]);
                }
                other => panic!("unexpected event: {other:?}"),
            }
        }
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn test_close_drains_then_ends() {
        let queue = EventQueue::new(10);
        queue.push(heartbeat());
        queue.push(heartbeat());
        queue.close();

        assert!(queue.recv().await.is_some());
        assert!(queue.recv().await.is_some());
        assert!(queue.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_push_after_close_is_dropped() {
        let queue = EventQueue::new(10);
        queue.close();
        queue.push(heartbeat());

        assert!(queue.is_empty());
        assert!(queue.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_recv_wakes_on_push() {
        let queue = Arc::new(EventQueue::new(10));

        let consumer = {
            let queue = Arc::clone(&queue);
            tokio::spawn(async move { queue.recv().await })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        queue.push(heartbeat());

        let received = timeout(Duration::from_secs(1), consumer)
            .await
            .unwrap()
            .unwrap();
        assert!(received.is_some());
    }

    #[tokio::test]
    async fn test_recv_wakes_on_close() {
        let queue = Arc::new(EventQueue::new(10));

        let consumer = {
            let queue = Arc::clone(&queue);
            tokio::spawn(async move { queue.recv().await })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        queue.close();

        let received = timeout(Duration::from_secs(1), consumer)
            .await
            .unwrap()
            .unwrap();
        assert!(received.is_none());
    }
}
