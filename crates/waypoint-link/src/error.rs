//! Link error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LinkError {
    #[error("Invalid link input: {0}")]
    InvalidInput(String),
}
