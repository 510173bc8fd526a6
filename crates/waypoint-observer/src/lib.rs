//! Waypoint observer
//!
//! Delegated click handling over the view root: eligible links become
//! navigation intents, everything else keeps its default behavior. Also
//! home of the module-view registry the swap step drives.

mod error;
mod module;
mod view;

pub use error::ObserverError;
pub use module::{ModuleView, ModuleViewRegistry, SharedModuleViews};
pub use view::{
    ClickEvent, ClickOutcome, ObserverConfig, ObserverView, RecordingOpener, WindowOpener,
};

pub type Result<T> = std::result::Result<T, ObserverError>;
