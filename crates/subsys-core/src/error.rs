//! Core error types for subsys-core.
//!
//! The data model itself is infallible; the only failure mode is parsing a
//! feature identifier that does not follow the `fig|<genome>.<type>.<number>`
//! shape.

use thiserror::Error;

/// Core errors produced by the subsys-core crate.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// A string could not be parsed as a feature identifier.
    #[error("invalid feature id: '{id}'")]
    InvalidFeatureId { id: String },
}
