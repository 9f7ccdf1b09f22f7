//! Session event plumbing.
//!
//! The surrounding application owns a [`SessionBus`] and publishes login
//! lifecycle events on it. Interested components subscribe at wiring time;
//! the picker registry's only obligation is clearing its site-enabled
//! handlers on [`SessionEvent::LoggedOut`].

use tokio::sync::broadcast;
use tracing::debug;

/// Login lifecycle notifications. No payload beyond the signal itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    LoggedIn,
    LoggedOut,
}

/// Broadcast fan-out for session events.
///
/// Subscribers that join after an event was published do not see it;
/// the bus carries signals, not state.
#[derive(Debug, Clone)]
pub struct SessionBus {
    tx: broadcast::Sender<SessionEvent>,
}

impl SessionBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.tx.subscribe()
    }

    /// Publish an event to all current subscribers. Returns how many
    /// subscribers received it.
    pub fn publish(&self, event: SessionEvent) -> usize {
        match self.tx.send(event) {
            Ok(receivers) => {
                debug!(?event, receivers, "Session event published");
                receivers
            }
            Err(_) => {
                debug!(?event, "Session event dropped, no subscribers");
                0
            }
        }
    }
}

impl Default for SessionBus {
    fn default() -> Self {
        Self::new(16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_reaches_subscriber() {
        let bus = SessionBus::new(4);
        let mut rx = bus.subscribe();

        assert_eq!(bus.publish(SessionEvent::LoggedOut), 1);
        assert_eq!(rx.recv().await.unwrap(), SessionEvent::LoggedOut);
    }

    #[tokio::test]
    async fn test_publish_without_subscribers() {
        let bus = SessionBus::new(4);
        assert_eq!(bus.publish(SessionEvent::LoggedIn), 0);
    }

    #[tokio::test]
    async fn test_each_subscriber_sees_events() {
        let bus = SessionBus::new(4);
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();

        assert_eq!(bus.publish(SessionEvent::LoggedIn), 2);
        assert_eq!(a.recv().await.unwrap(), SessionEvent::LoggedIn);
        assert_eq!(b.recv().await.unwrap(), SessionEvent::LoggedIn);
    }
}
