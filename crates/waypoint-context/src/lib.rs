//! Waypoint application context
//!
//! The publish/subscribe context every component receives by reference:
//! an event bus for dispatching named events and a keyed registry for
//! one-time wiring checks. There is deliberately no global instance.

mod bus;
mod registry;

use std::sync::Arc;

pub use bus::{EventBus, Handler, SubscriptionId};
pub use registry::Registry;

/// One event bus plus one wiring registry, shared by reference.
pub struct Context {
    bus: Arc<EventBus>,
    registry: Arc<Registry>,
}

impl Context {
    pub fn new() -> Self {
        Self {
            bus: Arc::new(EventBus::new()),
            registry: Arc::new(Registry::new()),
        }
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Context {
    fn clone(&self) -> Self {
        Self {
            bus: Arc::clone(&self.bus),
            registry: Arc::clone(&self.registry),
        }
    }
}
