//! Construction-time errors.
//!
//! Route tables are assembled at build/program start, so every variant here
//! marks a programming defect, not a runtime condition. Matching never
//! produces an error: an unmatched path is `None`, not `Err`.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RouteError {
    /// Route paths are absolute; a registered path must start with `/`.
    #[error("route path must be absolute (missing leading '/'): {0:?}")]
    NotAbsolute(String),

    /// A capture segment (`:name`) was registered with no name.
    #[error("route path has a capture with no name: {0:?}")]
    EmptyCapture(String),

    /// The path contains a character route paths never carry.
    #[error("route path {path:?} contains invalid character {found:?}")]
    InvalidCharacter { path: String, found: char },

    /// A method string could not be parsed.
    #[error("unknown HTTP method: {0:?}")]
    UnknownMethod(String),
}
