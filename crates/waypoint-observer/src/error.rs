//! Observer error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ObserverError {
    #[error("Link error: {0}")]
    Link(#[from] waypoint_link::LinkError),

    #[error("Page error: {0}")]
    Page(#[from] waypoint_page::PageError),
}
