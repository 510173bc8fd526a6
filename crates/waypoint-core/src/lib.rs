//! Waypoint core
//!
//! Bootstrap wiring and configuration for the single-page navigation
//! engine: one call wires click observation, the transition pipeline and
//! the history adapter into an application context.

mod engine;
mod error;
mod settings;

pub use engine::{
    bootstrap, destroy_modules, initialize_modules, BootstrapOptions, Engine, BOOTSTRAP_KEY,
};
pub use error::CoreError;
pub use settings::NavigationSettings;

// Re-export the component surface
pub use waypoint_context::{Context, EventBus, Registry, SubscriptionId};
pub use waypoint_history::{
    HistoryAdapter, HistoryError, HistoryState, MemorySessionHistory, NavigateIntent,
    SessionHistory,
};
pub use waypoint_link::{Anchor, Link, LinkError};
pub use waypoint_observer::{
    ClickEvent, ClickOutcome, ModuleView, ModuleViewRegistry, ObserverError, ObserverView,
    RecordingOpener, SharedModuleViews, WindowOpener,
};
pub use waypoint_page::{
    extract, AssetKind, Content, Extracted, Fragment, InlineAsset, Page, PageError, PageHandle,
    RecordingExecutor, ScriptExecutor,
};
pub use waypoint_transition::{
    Direction, Fetch, FetchedPage, HttpFetcher, NavigationRequest, Orchestrator, Outcome,
    TransitionConfig, TransitionError, TransitionState,
};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
