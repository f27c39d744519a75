//! In-process notifications.
//!
//! The auth store announces session changes and the cart page announces cart
//! changes; the layout controller listens so it can refresh the navbar
//! without re-running the whole page-load sequence.
//!
//! Backed by a `tokio::sync::broadcast` channel, so every subscriber sees
//! every event published after it subscribed. Publishing never blocks and
//! works outside a runtime.

use tokio::sync::broadcast;

use crate::models::Session;

/// Buffered events per subscriber before the slowest one starts lagging.
const CHANNEL_CAPACITY: usize = 64;

/// A storefront notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// A user logged in (or was logged in after registering).
    SessionStarted(Session),
    /// The session was cleared.
    SessionEnded,
    /// The cart record changed.
    CartUpdated,
}

impl StoreEvent {
    /// Short name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SessionStarted(_) => "auth:login",
            Self::SessionEnded => "auth:logout",
            Self::CartUpdated => "cart:updated",
        }
    }
}

/// Publish/subscribe hub for [`StoreEvent`]s.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<StoreEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Deliver `event` to all current subscribers.
    ///
    /// Having no subscribers is normal (nothing on the page is listening).
    pub fn publish(&self, event: StoreEvent) {
        let name = event.name();
        match self.sender.send(event) {
            Ok(receivers) => tracing::debug!(event = name, receivers, "Published event"),
            Err(_) => tracing::debug!(event = name, "Published event with no listeners"),
        }
    }

    /// Subscribe to events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.sender.subscribe()
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_without_subscribers_is_fine() {
        let bus = EventBus::new();
        bus.publish(StoreEvent::CartUpdated);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_subscribers_see_later_events() {
        let bus = EventBus::new();
        bus.publish(StoreEvent::SessionEnded);

        let mut rx = bus.subscribe();
        bus.publish(StoreEvent::CartUpdated);

        assert_eq!(rx.try_recv().unwrap(), StoreEvent::CartUpdated);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_async_receive() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();
        bus.publish(StoreEvent::SessionEnded);
        assert_eq!(rx.recv().await.unwrap(), StoreEvent::SessionEnded);
    }
}
