//! Event bus using tokio broadcast channel
//!
//! Slow subscribers miss events rather than blocking the scheduler.

use crate::events::StudyEvent;
use tokio::sync::broadcast;

/// Default channel capacity
const DEFAULT_CAPACITY: usize = 256;

/// Event bus for study events
///
/// Events are fire-and-forget; with no subscribers they are dropped.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<StudyEvent>,
}

impl EventBus {
    /// Create a new event bus with default capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a new event bus with custom capacity
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to events emitted after this call.
    pub fn subscribe(&self) -> EventSubscriber {
        EventSubscriber {
            receiver: self.sender.subscribe(),
        }
    }

    /// Emit an event to all subscribers
    pub fn emit(&self, event: StudyEvent) {
        // Err only means nobody is listening.
        let _ = self.sender.send(event);
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Subscriber to event bus
pub struct EventSubscriber {
    receiver: broadcast::Receiver<StudyEvent>,
}

impl EventSubscriber {
    /// Receive the next event
    ///
    /// Returns None once the bus is dropped. Lagged events are skipped.
    pub async fn recv(&mut self) -> Option<StudyEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Closed) => return None,
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!("Study event subscriber lagged by {} events", n);
                    continue;
                }
            }
        }
    }

    /// Try to receive an event without blocking
    pub fn try_recv(&mut self) -> Option<StudyEvent> {
        self.receiver.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn invalidated(learner: &str) -> StudyEvent {
        StudyEvent::QueueInvalidated {
            learner_id: learner.to_string(),
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_event_bus_basic() {
        let bus = EventBus::new();
        let mut sub = bus.subscribe();

        bus.emit(invalidated("u1"));

        let received = sub.recv().await.unwrap();
        assert_eq!(received.learner_id(), "u1");
    }

    #[tokio::test]
    async fn test_no_subscribers_no_panic() {
        let bus = EventBus::new();
        bus.emit(invalidated("u1"));
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_try_recv_empty() {
        let bus = EventBus::new();
        let mut sub = bus.subscribe();
        assert!(sub.try_recv().is_none());
        bus.emit(invalidated("u2"));
        assert_eq!(sub.try_recv().unwrap().name(), "queue_invalidated");
    }
}
