//! Waypoint page model
//!
//! The live document the navigation engine mutates: title, location, the
//! swap-region content and appended head assets. Also the response-side
//! parsing used during a transition (title, swap fragment, allow-listed
//! scripts and styles) and the script execution capability.

mod error;
mod extract;
mod page;
mod script;

pub use error::PageError;
pub use extract::{extract, Extracted};
pub use page::{Content, Fragment, Page, PageHandle};
pub use script::{AssetKind, InlineAsset, RecordingExecutor, ScriptExecutor};

pub type Result<T> = std::result::Result<T, PageError>;
