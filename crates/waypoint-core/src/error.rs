//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Link error: {0}")]
    Link(#[from] waypoint_link::LinkError),

    #[error("Page error: {0}")]
    Page(#[from] waypoint_page::PageError),

    #[error("History error: {0}")]
    History(#[from] waypoint_history::HistoryError),

    #[error("Observer error: {0}")]
    Observer(#[from] waypoint_observer::ObserverError),

    #[error("Transition error: {0}")]
    Transition(#[from] waypoint_transition::TransitionError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
