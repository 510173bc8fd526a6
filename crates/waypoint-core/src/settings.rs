//! Navigation settings
//!
//! One frozen snapshot per bootstrap. Mandatory selectors are validated at
//! wiring time; everything else carries a default.

use serde::{Deserialize, Serialize};

use waypoint_observer::ObserverConfig;
use waypoint_transition::TransitionConfig;

use crate::error::CoreError;
use crate::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationSettings {
    /// Root the observer view binds under.
    pub view_root: String,
    /// Selector of the content region replaced on navigation.
    pub swap_target: String,
    /// Which anchors are observed; a `:not(.class)` clause opts links out.
    pub observe_selector: String,
    /// Base name for navigate lifecycle events.
    pub event_name: String,
    /// Module lifecycle event names.
    pub initialize_event: String,
    pub destroy_event: String,
    /// Translate hook event names; `<name>:done` signals completion.
    pub translate_in_event: String,
    pub translate_out_event: String,
    /// Ids of inline scripts re-executed after each swap.
    pub script_ids: Vec<String>,
    /// Ids of styles and stylesheet links re-applied after each swap.
    pub style_ids: Vec<String>,
    /// Open foreign-origin self-target links in a new window.
    pub force_new_window: bool,
}

impl Default for NavigationSettings {
    fn default() -> Self {
        Self {
            view_root: "body".to_string(),
            swap_target: "#main".to_string(),
            observe_selector: "a:not(.no-singlepage)".to_string(),
            event_name: "*:navigate".to_string(),
            initialize_event: "application:start".to_string(),
            destroy_event: "application:stop".to_string(),
            translate_in_event: "*:translate-in".to_string(),
            translate_out_event: "*:translate-out".to_string(),
            script_ids: Vec::new(),
            style_ids: Vec::new(),
            force_new_window: false,
        }
    }
}

impl NavigationSettings {
    /// Check the mandatory pieces. Called once at wiring time; a failure
    /// here is fatal.
    pub fn validate(&self) -> Result<()> {
        if self.swap_target.trim().is_empty() {
            return Err(CoreError::Config(
                "swap target selector is required".to_string(),
            ));
        }
        if self.view_root.trim().is_empty() {
            return Err(CoreError::Config("view root selector is required".to_string()));
        }
        if self.event_name.trim().is_empty() {
            return Err(CoreError::Config("event name is required".to_string()));
        }
        Ok(())
    }

    /// The opt-out class from the observe selector's `:not(.class)` clause,
    /// if it has one.
    pub fn opt_out_class(&self) -> Option<String> {
        let start = self.observe_selector.find(":not(.")? + ":not(.".len();
        let rest = &self.observe_selector[start..];
        let end = rest.find(')')?;
        let class = &rest[..end];
        if class.is_empty() {
            None
        } else {
            Some(class.to_string())
        }
    }

    pub(crate) fn transition_config(&self) -> TransitionConfig {
        TransitionConfig {
            base_event: self.event_name.clone(),
            translate_in_event: self.translate_in_event.clone(),
            translate_out_event: self.translate_out_event.clone(),
            initialize_event: self.initialize_event.clone(),
            destroy_event: self.destroy_event.clone(),
            swap_selector: self.swap_target.clone(),
            script_ids: self.script_ids.clone(),
            style_ids: self.style_ids.clone(),
        }
    }

    pub(crate) fn observer_config(&self) -> ObserverConfig {
        ObserverConfig {
            opt_out_class: self.opt_out_class(),
            intent_event: self.event_name.clone(),
            force_new_window: self.force_new_window,
        }
    }
}
