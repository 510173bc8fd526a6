//! Waypoint link classification
//!
//! Parses a URL string or an anchor snapshot into a [`Link`] descriptor
//! with comparison predicates against a reference location. Pure value
//! objects; no side effects.

mod anchor;
mod error;
mod link;

pub use anchor::Anchor;
pub use error::LinkError;
pub use link::Link;

pub type Result<T> = std::result::Result<T, LinkError>;
