//! Page error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PageError {
    #[error("Invalid selector: {0}")]
    Selector(String),

    #[error("Script execution failed: {0}")]
    Script(String),
}
