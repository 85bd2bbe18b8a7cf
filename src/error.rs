//! Error types returned by the matrix store.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while allocating, filling, slicing or reopening a store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Invalid dimensions or an unwritable target at creation time. No
    /// partial store is left behind when this is returned.
    #[error("failed to allocate store at {path}: {reason}")]
    Allocation { path: PathBuf, reason: String },

    /// A platform tag that does not name a supported array design, or a
    /// design the injected probe dataset does not cover.
    #[error("unknown platform '{0}'")]
    UnknownPlatform(String),

    /// Fill targeted a sample absent from the fixed sample list.
    #[error("sample '{0}' is not present in the store")]
    UnknownSample(String),

    /// Fill received a probe absent from the store under the reject policy.
    #[error("probe '{0}' is not present in the store")]
    UnknownProbe(String),

    #[error("column for sample '{sample}' expects {expected} values, got {actual}")]
    ColumnLength {
        sample:   String,
        expected: usize,
        actual:   usize,
    },

    #[error("catalog not found at {0}")]
    CatalogNotFound(PathBuf),

    #[error("catalog at {path} is corrupt: {reason}")]
    CatalogCorrupt { path: PathBuf, reason: String },

    /// A cell read ran past the end of the matrix file.
    #[error("store {path} is truncated: cannot read at byte offset {offset}")]
    Truncated { path: PathBuf, offset: u64 },

    #[error("store {path} has {actual} bytes, expected {expected}")]
    SizeMismatch {
        path:     PathBuf,
        expected: u64,
        actual:   u64,
    },

    #[error("manifest error: {0}")]
    Manifest(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub(crate) fn allocation<P: Into<PathBuf>, R: ToString>(
        path: P,
        reason: R,
    ) -> Self {
        StoreError::Allocation {
            path:   path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn corrupt<P: Into<PathBuf>, R: ToString>(
        path: P,
        reason: R,
    ) -> Self {
        StoreError::CatalogCorrupt {
            path:   path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type StoreResult<T> = Result<T, StoreError>;
