//! Navigation-intent payload
//!
//! Produced by the observer view on eligible clicks and by the history
//! adapter on pop; consumed by the transition orchestrator.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigateIntent {
    pub href: String,
    /// Set on history pops: the entry already exists, so the pipeline must
    /// not push a new one.
    #[serde(default)]
    pub keep_state: bool,
    /// Signed index delta. Multi-step pops carry the full delta.
    #[serde(default)]
    pub direction: Option<i64>,
}

impl NavigateIntent {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            keep_state: false,
            direction: None,
        }
    }

    pub fn to_value(&self) -> Value {
        json!({
            "href": self.href,
            "keepState": self.keep_state,
            "direction": self.direction,
        })
    }

    pub fn from_value(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }
}
