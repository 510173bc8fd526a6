//! Transition error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransitionError {
    #[error("Invalid state transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Link error: {0}")]
    Link(#[from] waypoint_link::LinkError),

    #[error("Page error: {0}")]
    Page(#[from] waypoint_page::PageError),

    #[error("Observer error: {0}")]
    Observer(#[from] waypoint_observer::ObserverError),
}
