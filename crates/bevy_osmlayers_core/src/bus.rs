//! Publish/subscribe channels between the search side, the registry and the panel.
//!
//! Publishing is synchronous: callbacks run in subscription order before `publish` returns.
//! There is no buffering, so a subscriber attached after a publication never sees it.

use crate::events::{LayerRegistered, LoadingStarted, ResultArrived};

/// Listener callback type
pub type Callback<T> = Box<dyn FnMut(&T) + Send + Sync>;

/// Handle returned by [`Channel::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// One ordered list of listeners for a single event type.
pub struct Channel<T> {
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Callback<T>)>,
}

impl<T> Default for Channel<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            subscribers: Vec::new(),
        }
    }
}

impl<T> Channel<T> {
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&T) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(subscription, _)| *subscription != id);
        self.subscribers.len() != before
    }

    pub fn publish(&mut self, event: &T) {
        for (_, callback) in &mut self.subscribers {
            callback(event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl<T> std::fmt::Debug for Channel<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Channel")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

/// The registry's three channels.
#[derive(Debug, Default)]
pub struct EventBus {
    pub loading_started: Channel<LoadingStarted>,
    pub result_arrived: Channel<ResultArrived>,
    pub layer_registered: Channel<LayerRegistered>,
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    fn recorder() -> (Arc<Mutex<Vec<String>>>, impl FnMut(&LoadingStarted) + Send + Sync) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        (seen, move |event: &LoadingStarted| {
            sink.lock().unwrap().push(event.query.clone())
        })
    }

    #[test]
    fn test_publish_reaches_subscribers_in_order() {
        let mut bus = EventBus::default();
        let order = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second"] {
            let order = order.clone();
            bus.loading_started
                .subscribe(move |_: &LoadingStarted| order.lock().unwrap().push(tag));
        }

        bus.loading_started.publish(&LoadingStarted {
            query: "amenity=cafe".into(),
        });
        assert_eq!(*order.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn test_late_subscriber_gets_no_replay() {
        let mut bus = EventBus::default();
        bus.loading_started.publish(&LoadingStarted { query: "a".into() });

        let (seen, callback) = recorder();
        bus.loading_started.subscribe(callback);
        assert!(seen.lock().unwrap().is_empty());

        bus.loading_started.publish(&LoadingStarted { query: "b".into() });
        assert_eq!(*seen.lock().unwrap(), vec!["b".to_string()]);
    }

    #[test]
    fn test_unsubscribe() {
        let mut bus = EventBus::default();
        let (seen, callback) = recorder();
        let id = bus.loading_started.subscribe(callback);
        assert_eq!(bus.loading_started.subscriber_count(), 1);

        assert!(bus.loading_started.unsubscribe(id));
        assert!(!bus.loading_started.unsubscribe(id));
        bus.loading_started.publish(&LoadingStarted { query: "a".into() });

        assert!(seen.lock().unwrap().is_empty());
        assert_eq!(bus.loading_started.subscriber_count(), 0);
    }

    #[test]
    fn test_channels_are_independent() {
        let mut bus = EventBus::default();
        let (seen, callback) = recorder();
        bus.loading_started.subscribe(callback);

        bus.result_arrived.publish(&ResultArrived {
            title: "amenity=cafe".into(),
            elements: 3,
        });
        assert!(seen.lock().unwrap().is_empty());
        assert_eq!(bus.result_arrived.subscriber_count(), 0);
    }
}
