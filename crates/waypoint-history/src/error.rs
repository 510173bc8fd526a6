//! History error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("History backend failure: {0}")]
    Backend(String),
}
