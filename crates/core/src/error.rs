//! Error types for font auditing.
//!
//! Only [`Error`] is fatal to a scan. The other types describe recoverable
//! failures that the scanner absorbs into the report or the log.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a whole scan.
#[derive(Error, Debug)]
pub enum Error {
    /// The slide collection could not be enumerated at all.
    #[error("Failed to enumerate slides: {0}")]
    Enumeration(#[source] SourceError),
}

/// Errors a document source raises while retrieving slide data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// The content is protected or otherwise unavailable to the scanner.
    #[error("Not accessible: {0}")]
    AccessDenied(String),

    /// Any other retrieval failure.
    #[error("{0}")]
    Other(String),
}

impl SourceError {
    /// Whether this failure means the slide must be reported as skipped.
    pub fn is_access_denied(&self) -> bool {
        matches!(self, SourceError::AccessDenied(_))
    }
}

/// A single shape's font or text frame data could not be read.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Shape data unreadable: {0}")]
pub struct ShapeError(pub String);

/// Failures inside a font availability probe.
#[derive(Error, Debug)]
pub enum OracleError {
    /// No font rendering surface or font database is available.
    #[error("No font rendering surface available")]
    NoSurface,

    /// The probe itself failed.
    #[error("Font probe failed: {0}")]
    Probe(String),
}
