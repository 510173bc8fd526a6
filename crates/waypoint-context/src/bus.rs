//! Event bus
//!
//! Synchronous dispatch to named subscribers, plus one-shot waiters used
//! for cooperative suspension on completion events.

use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::oneshot;

/// Subscriber callback. Receives the event name and its payload.
pub type Handler = Arc<dyn Fn(&str, &Value) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct BusState {
    subscribers: HashMap<String, Vec<(SubscriptionId, Handler)>>,
    waiters: HashMap<String, Vec<oneshot::Sender<Value>>>,
    next_id: u64,
}

pub struct EventBus {
    state: RwLock<BusState>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(BusState {
                subscribers: HashMap::new(),
                waiters: HashMap::new(),
                next_id: 0,
            }),
        }
    }

    /// Register a subscriber for `event`.
    pub fn subscribe<F>(&self, event: &str, handler: F) -> SubscriptionId
    where
        F: Fn(&str, &Value) + Send + Sync + 'static,
    {
        let mut state = self.state.write();
        state.next_id += 1;
        let id = SubscriptionId(state.next_id);
        state
            .subscribers
            .entry(event.to_string())
            .or_default()
            .push((id, Arc::new(handler)));
        id
    }

    /// Remove a subscriber. Unknown ids are ignored.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        let mut state = self.state.write();
        for handlers in state.subscribers.values_mut() {
            handlers.retain(|(sub_id, _)| *sub_id != id);
        }
    }

    /// Register a one-shot waiter fulfilled by the next dispatch of `event`.
    ///
    /// The returned receiver resolves with the event payload. If the event
    /// is never dispatched the receiver stays pending; the caller owns that
    /// assumption.
    pub fn wait_for(&self, event: &str) -> oneshot::Receiver<Value> {
        let (tx, rx) = oneshot::channel();
        self.state
            .write()
            .waiters
            .entry(event.to_string())
            .or_default()
            .push(tx);
        rx
    }

    /// Dispatch `event` to every subscriber and pending waiter.
    ///
    /// Handlers are collected before invocation so a handler may itself
    /// dispatch on the same bus.
    pub fn dispatch(&self, event: &str, payload: Value) {
        let (handlers, waiters) = {
            let mut state = self.state.write();
            let handlers: Vec<Handler> = state
                .subscribers
                .get(event)
                .map(|subs| subs.iter().map(|(_, h)| Arc::clone(h)).collect())
                .unwrap_or_default();
            let waiters = state.waiters.remove(event).unwrap_or_default();
            (handlers, waiters)
        };

        tracing::debug!(
            event = %event,
            subscribers = handlers.len(),
            waiters = waiters.len(),
            "dispatch"
        );

        for handler in handlers {
            handler(event, &payload);
        }

        for waiter in waiters {
            // Receiver may have been dropped; nothing to do then.
            let _ = waiter.send(payload.clone());
        }
    }

    /// Number of subscribers currently registered for `event`.
    pub fn subscriber_count(&self, event: &str) -> usize {
        self.state
            .read()
            .subscribers
            .get(event)
            .map(|subs| subs.len())
            .unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use serde_json::json;

    #[test]
    fn test_dispatch_reaches_subscribers() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let seen_clone = Arc::clone(&seen);
        bus.subscribe("nav:go", move |name, payload| {
            seen_clone
                .lock()
                .push((name.to_string(), payload.clone()));
        });

        bus.dispatch("nav:go", json!({"href": "/a/"}));
        bus.dispatch("other", json!({}));

        let seen = seen.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "nav:go");
        assert_eq!(seen[0].1["href"], "/a/");
    }

    #[test]
    fn test_unsubscribe() {
        let bus = EventBus::new();
        let count = Arc::new(Mutex::new(0));

        let count_clone = Arc::clone(&count);
        let id = bus.subscribe("tick", move |_, _| {
            *count_clone.lock() += 1;
        });

        bus.dispatch("tick", json!(null));
        bus.unsubscribe(id);
        bus.dispatch("tick", json!(null));

        assert_eq!(*count.lock(), 1);
        assert_eq!(bus.subscriber_count("tick"), 0);
    }

    #[test]
    fn test_reentrant_dispatch() {
        // A handler dispatching on the same bus must not deadlock. This is
        // how the default translate handlers signal completion.
        let bus = Arc::new(EventBus::new());
        let done = Arc::new(Mutex::new(false));

        let bus_clone = Arc::clone(&bus);
        bus.subscribe("translate", move |_, _| {
            bus_clone.dispatch("translate:done", json!(null));
        });

        let done_clone = Arc::clone(&done);
        bus.subscribe("translate:done", move |_, _| {
            *done_clone.lock() = true;
        });

        bus.dispatch("translate", json!(null));
        assert!(*done.lock());
    }

    #[tokio::test]
    async fn test_wait_for_resolves_with_payload() {
        let bus = EventBus::new();
        let rx = bus.wait_for("translate:done");

        bus.dispatch("translate:done", json!({"ok": true}));

        let payload = rx.await.unwrap();
        assert_eq!(payload["ok"], true);
    }

    #[tokio::test]
    async fn test_wait_for_is_one_shot() {
        let bus = EventBus::new();
        let rx = bus.wait_for("sig");

        bus.dispatch("sig", json!(1));
        assert_eq!(rx.await.unwrap(), json!(1));

        // A later waiter needs a fresh dispatch.
        let rx = bus.wait_for("sig");
        bus.dispatch("sig", json!(2));
        assert_eq!(rx.await.unwrap(), json!(2));
    }
}
