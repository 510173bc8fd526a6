//! Anchor element snapshot
//!
//! The subset of an anchor element the classifier needs: attributes only,
//! no live DOM handle.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Anchor {
    /// The raw `href` attribute. `None` means the attribute is absent,
    /// which resolves to the current page location.
    pub href: Option<String>,
    /// The `target` attribute; empty means self.
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub title: String,
    /// Whether the `download` attribute is present.
    #[serde(default)]
    pub download: bool,
    /// Class list, used by the observer's opt-out filter.
    #[serde(default)]
    pub classes: Vec<String>,
}

impl Anchor {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: Some(href.into()),
            ..Self::default()
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_download(mut self) -> Self {
        self.download = true;
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}
