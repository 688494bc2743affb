//! Workspace base error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as a source
//! where they need to surface it.

use thiserror::Error;

/// The base error type for `fleet-core`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    #[error("coordinate out of range: ({lat}, {lng})")]
    InvalidCoordinate { lat: f64, lng: f64 },
}

/// Shorthand result type for `fleet-core`.
pub type CoreResult<T> = Result<T, CoreError>;
