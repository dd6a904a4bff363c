//! AsyncNotificationManager implementation

use crate::notifications::error::NotificationError;
use crate::notifications::event::{EventFilter, KioskEvent};
use std::collections::HashMap;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

pub type EventReceiver = UnboundedReceiver<KioskEvent>;

struct SubscriberInfo {
    filter: EventFilter,
    source: String,
    sender: UnboundedSender<KioskEvent>,
    delivered: usize,
}

/// Fan-out of kiosk events to any number of subscribers.
///
/// Owned by the kiosk controller; subscribers register before the controller
/// starts and receive events over unbounded channels.
#[derive(Default)]
pub struct AsyncNotificationManager {
    subscribers: HashMap<String, SubscriberInfo>,
}

impl AsyncNotificationManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(
        &mut self,
        subscriber_id: impl Into<String>,
        filter: EventFilter,
        source: impl Into<String>,
    ) -> EventReceiver {
        let subscriber_id = subscriber_id.into();
        let source = source.into();
        let (sender, receiver) = unbounded_channel();

        let subscriber_info = SubscriberInfo {
            filter,
            source: source.clone(),
            sender,
            delivered: 0,
        };

        // Warn if overwriting existing subscriber
        if let Some(existing) = self.subscribers.insert(subscriber_id.clone(), subscriber_info) {
            log::warn!(
                "Subscriber '{}' replaced existing subscription (source: {} -> {})",
                subscriber_id,
                existing.source,
                source
            );
        }

        receiver
    }

    pub fn unsubscribe(&mut self, subscriber_id: &str) -> Result<(), NotificationError> {
        self.subscribers
            .remove(subscriber_id)
            .map(|_| ())
            .ok_or_else(|| NotificationError::UnknownSubscriber(subscriber_id.to_string()))
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn has_subscriber(&self, subscriber_id: &str) -> bool {
        self.subscribers.contains_key(subscriber_id)
    }

    /// Number of events delivered to a subscriber so far
    pub fn delivered_count(&self, subscriber_id: &str) -> Option<usize> {
        self.subscribers.get(subscriber_id).map(|info| info.delivered)
    }

    /// Send `event` to every subscriber whose filter accepts it.
    ///
    /// Subscribers whose receiver has been dropped are removed and reported
    /// in the error; delivery to the others still happens.
    pub fn publish(&mut self, event: KioskEvent) -> Result<(), NotificationError> {
        let mut failed_subscribers = Vec::new();

        for (subscriber_id, subscriber_info) in self.subscribers.iter_mut() {
            if !subscriber_info.filter.accepts(&event) {
                continue;
            }
            if subscriber_info.sender.send(event.clone()).is_err() {
                failed_subscribers.push(subscriber_id.clone());
            } else {
                subscriber_info.delivered += 1;
            }
        }

        for subscriber_id in &failed_subscribers {
            self.subscribers.remove(subscriber_id);
        }

        if !failed_subscribers.is_empty() {
            return Err(NotificationError::PublishFailed {
                event_type: event.kind().to_string(),
                failed_subscribers,
            });
        }

        Ok(())
    }
}
