//! Waypoint session history
//!
//! Wraps the host's session-history mechanism behind [`SessionHistory`]
//! and mediates it through [`HistoryAdapter`]: indexed entries, direction
//! derivation on pop, and graceful degradation to full page loads when the
//! underlying mechanism is unavailable or throws.

mod adapter;
mod backend;
mod error;
mod intent;

pub use adapter::HistoryAdapter;
pub use backend::{HistoryState, MemorySessionHistory, SessionHistory};
pub use error::HistoryError;
pub use intent::NavigateIntent;

pub type Result<T> = std::result::Result<T, HistoryError>;
