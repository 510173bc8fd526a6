//! Module views
//!
//! The ordered registry of view instances active inside the swap region.
//! The registry is owned by the initialize/destroy collaborators; the
//! orchestrator only calls `replace` on each entry during a swap. Views
//! registered as persistent (the observer itself) survive the destroy
//! event; everything else is scoped to the current content.

use parking_lot::RwLock;
use std::sync::Arc;

use waypoint_page::Content;

use crate::Result;

/// A view instance scoped to the replaceable content region.
pub trait ModuleView: Send + Sync {
    /// Name used for logging.
    fn name(&self) -> &str;

    /// Release bindings. Called when the region is torn down.
    fn destroy(&mut self);

    /// Swap in new content. Implementations must not reset scroll state or
    /// listeners outside the swapped subtree.
    fn replace(&mut self, content: &Content) -> Result<()>;
}

struct Entry {
    view: Box<dyn ModuleView>,
    persistent: bool,
}

#[derive(Default)]
pub struct ModuleViewRegistry {
    entries: Vec<Entry>,
}

pub type SharedModuleViews = Arc<RwLock<ModuleViewRegistry>>;

impl ModuleViewRegistry {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn shared() -> SharedModuleViews {
        Arc::new(RwLock::new(Self::new()))
    }

    /// Register a content-scoped view. Destroyed on the next teardown.
    pub fn register(&mut self, view: Box<dyn ModuleView>) {
        tracing::debug!(view = %view.name(), "module view registered");
        self.entries.push(Entry {
            view,
            persistent: false,
        });
    }

    /// Register a view that outlives content swaps.
    pub fn register_persistent(&mut self, view: Box<dyn ModuleView>) {
        tracing::debug!(view = %view.name(), "persistent module view registered");
        self.entries.push(Entry {
            view,
            persistent: true,
        });
    }

    /// Call `replace` on every active view, in registration order.
    pub fn replace_all(&mut self, content: &Content) -> Result<()> {
        for entry in &mut self.entries {
            entry.view.replace(content)?;
        }
        Ok(())
    }

    /// Destroy and drop the content-scoped views, keeping persistent ones.
    pub fn destroy_transient(&mut self) {
        for entry in &mut self.entries {
            if !entry.persistent {
                tracing::debug!(view = %entry.view.name(), "module view destroyed");
                entry.view.destroy();
            }
        }
        self.entries.retain(|entry| entry.persistent);
    }

    /// Destroy and drop every view, persistent or not.
    pub fn destroy_all(&mut self) {
        for entry in &mut self.entries {
            tracing::debug!(view = %entry.view.name(), "module view destroyed");
            entry.view.destroy();
        }
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
