//! Wiring registry
//!
//! Keyed values used for one-time wiring checks (e.g. the bootstrap
//! singleton guard).

use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;

pub struct Registry {
    values: RwLock<HashMap<String, Value>>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            values: RwLock::new(HashMap::new()),
        }
    }

    /// Store a value under `key`, replacing any previous wiring.
    pub fn wire_value(&self, key: &str, value: Value) {
        self.values.write().insert(key.to_string(), value);
    }

    /// Whether anything is wired under `key`.
    pub fn has_wiring(&self, key: &str) -> bool {
        self.values.read().contains_key(key)
    }

    pub fn get_value(&self, key: &str) -> Option<Value> {
        self.values.read().get(key).cloned()
    }

    pub fn unwire(&self, key: &str) -> Option<Value> {
        self.values.write().remove(key)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
