//! Error types for rowbind.
//!
//! Construction problems are the only failure mode this crate reports.
//! Superseded diff results are normal control flow and are dropped
//! silently; contract violations (mutating a snapshot while a diff reads
//! it, querying content equality for a pair that never matched identity)
//! are undefined behavior rather than detected errors.

use thiserror::Error;

/// Errors surfaced while assembling a binder.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BindError {
    /// A binder cannot produce rows without a row factory.
    #[error("missing required row factory")]
    MissingRowFactory,
}

/// Result type alias for binder construction.
pub type BindResult<T> = Result<T, BindError>;
