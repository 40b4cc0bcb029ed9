//! Error types for reading PPTX packages.

use fontaudit_core::SourceError;
use thiserror::Error;

/// Result type alias using the PPTX error type.
pub type Result<T> = std::result::Result<T, PptxError>;

/// Errors that can occur while reading a PPTX package.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PptxError {
    /// ZIP archive error.
    #[error("ZIP error: {0}")]
    Zip(String),

    /// XML parsing error.
    #[error("XML parsing error in '{part}': {message}")]
    Xml { part: String, message: String },

    /// A part referenced by a relationship is not in the package.
    #[error("Part not found in package: {0}")]
    MissingPart(String),

    /// A part exists but is encrypted or otherwise locked.
    #[error("Part is not accessible: {0}")]
    LockedPart(String),

    /// A part exists but could not be decompressed or decoded.
    #[error("Failed to read '{part}': {message}")]
    UnreadablePart { part: String, message: String },
}

impl From<PptxError> for SourceError {
    fn from(e: PptxError) -> Self {
        match e {
            PptxError::MissingPart(_) | PptxError::LockedPart(_) => {
                SourceError::AccessDenied(e.to_string())
            }
            other => SourceError::Other(other.to_string()),
        }
    }
}
