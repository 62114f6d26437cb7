//! Error types for matview operations

use alloc::string::String;
use thiserror::Error;

use crate::format::StorageClass;

/// Errors that can occur while building or accessing a matrix
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MatrixError {
    /// A construction-time structural invariant was violated
    #[error("malformed input: {0}")]
    MalformedInput(String),
    /// Unrecognised or known-unsupported format variant
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),
    /// Index or range outside the matrix extent
    #[error("{what} range [{start}, {end}) is out of range for extent {extent}")]
    OutOfRange {
        what: &'static str,
        start: usize,
        end: usize,
        extent: usize,
    },
    /// Backing storage class does not match the requested element kind
    #[error("type mismatch: expected {expected} storage, found {found}")]
    TypeMismatch {
        expected: StorageClass,
        found: StorageClass,
    },
    /// A descriptor field could not be attached at finalize
    #[error("missing metadata: {0}")]
    MissingMetadata(&'static str),
    /// File-system failure in the chunked store
    #[error("storage error: {0}")]
    Storage(String),
}

/// Coarse grouping of errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Raised while validating a backing description
    Construction,
    /// Raised by a read or write call on a live adapter
    Access,
    /// Raised by the underlying file system
    Storage,
}

impl MatrixError {
    /// Get the category of this error
    pub const fn category(&self) -> ErrorCategory {
        match self {
            MatrixError::MalformedInput(_)
            | MatrixError::UnsupportedFormat(_)
            | MatrixError::TypeMismatch { .. } => ErrorCategory::Construction,
            MatrixError::OutOfRange { .. } | MatrixError::MissingMetadata(_) => {
                ErrorCategory::Access
            }
            MatrixError::Storage(_) => ErrorCategory::Storage,
        }
    }

    /// Out-of-range error for a single index
    pub const fn index(what: &'static str, index: usize, extent: usize) -> Self {
        MatrixError::OutOfRange {
            what,
            start: index,
            end: index.saturating_add(1),
            extent,
        }
    }

    /// Out-of-range error for a half-open slice
    pub const fn range(what: &'static str, start: usize, end: usize, extent: usize) -> Self {
        MatrixError::OutOfRange {
            what,
            start,
            end,
            extent,
        }
    }
}

/// Result type for matview operations
pub type Result<T> = core::result::Result<T, MatrixError>;
