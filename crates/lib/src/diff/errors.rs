//! Errors produced by the diff and patch engines.

use thiserror::Error;

use crate::dom::DomError;
use crate::path::PathError;

/// Errors arising from structural diffing and patching.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DiffError {
    /// A patch path does not resolve to an existing node.
    #[error("patch path does not resolve: {path}")]
    PathNotFound {
        /// The unresolved path.
        path: String,
    },

    /// A `test` operation found a different value than supplied.
    #[error("test failed at {path}")]
    TestFailed {
        /// Path of the mismatching node.
        path: String,
    },

    /// A patch operation is missing a mandatory field.
    #[error("patch operation is missing field: {field}")]
    MissingField {
        /// Name of the absent field.
        field: &'static str,
    },

    /// Applying a modification to the tree failed.
    #[error("document operation failed during patch")]
    Dom(#[from] DomError),

    /// A patch path string failed to parse.
    #[error("invalid patch path")]
    Path(#[from] PathError),
}

impl DiffError {
    /// Test for a `test` operation mismatch.
    pub fn is_test_failed(&self) -> bool {
        matches!(self, DiffError::TestFailed { .. })
    }

    /// Test for an unresolved patch path.
    pub fn is_path_not_found(&self) -> bool {
        matches!(self, DiffError::PathNotFound { .. })
    }
}

impl From<DiffError> for crate::Error {
    fn from(err: DiffError) -> Self {
        crate::Error::Diff(err)
    }
}
