//! Inline assets and script execution
//!
//! Scripts harvested from a fetched document are handed to a
//! [`ScriptExecutor`] capability instead of being evaluated by the engine.
//! Hosts with a real scripting environment implement the trait; headless
//! hosts and tests use the recording implementation.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    /// Inline `<script>`; `source` holds the script text.
    Script,
    /// Inline `<style>`; `source` holds the serialized element.
    Style,
    /// `<link>` stylesheet reference; `source` holds the serialized element.
    StyleLink,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InlineAsset {
    pub id: String,
    pub kind: AssetKind,
    pub source: String,
}

/// Executes inline script text in the host's global scope.
///
/// The engine guarantees document order and one execution per collected
/// script per navigation; everything else is the host's concern.
pub trait ScriptExecutor: Send + Sync {
    fn execute(&self, script: &InlineAsset) -> Result<()>;
}

/// Default executor: records execution order without running anything.
pub struct RecordingExecutor {
    executed: Mutex<Vec<String>>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self {
            executed: Mutex::new(Vec::new()),
        }
    }

    /// Ids of executed scripts, in execution order.
    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().clone()
    }
}

impl Default for RecordingExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptExecutor for RecordingExecutor {
    fn execute(&self, script: &InlineAsset) -> Result<()> {
        tracing::debug!(id = %script.id, "executing inline script");
        self.executed.lock().push(script.id.clone());
        Ok(())
    }
}
