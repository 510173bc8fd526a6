//! Waypoint transition orchestration
//!
//! The state machine driving one navigation: fetch, parse, swap, history
//! update and module re-initialization, bracketed by translate hooks and
//! ordered lifecycle events.

mod error;
mod fetch;
mod orchestrator;
mod request;
mod state;

pub use error::TransitionError;
pub use fetch::{Fetch, FetchedPage, HttpFetcher};
pub use orchestrator::{Orchestrator, TransitionConfig};
pub use request::{Direction, NavigationRequest, Outcome};
pub use state::TransitionState;

pub type Result<T> = std::result::Result<T, TransitionError>;
