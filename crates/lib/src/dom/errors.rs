//! Error types for document tree operations.

use thiserror::Error;

/// Structured error types for DOM operations.
///
/// Covers the mutation discipline (sealed rejection), shape mismatches
/// during navigation, and index violations on lists.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DomError {
    /// A mutating operation reached a sealed container or list.
    #[error("node at '{path}' is sealed and rejects mutation")]
    Sealed { path: String },

    /// A node of one shape was found where another was required.
    #[error("type mismatch: expected {expected}, found {actual}")]
    TypeMismatch { expected: String, actual: String },

    /// A strict list write addressed a position past the end.
    #[error("list index {index} out of bounds (len {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    /// The supplied path cannot be used for this operation.
    #[error("invalid path: {path}")]
    InvalidPath { path: String },

    /// A path that must resolve did not.
    #[error("path not found: {path}")]
    NotFound { path: String },

    /// An external query engine rejected or failed the supplied query.
    #[error("query failed: {reason}")]
    Query { reason: String },
}

impl DomError {
    /// Builds a shape-mismatch error from an expectation and the node found.
    pub(crate) fn mismatch(expected: &str, found: &super::Node) -> Self {
        DomError::TypeMismatch {
            expected: expected.to_string(),
            actual: found.kind_name().to_string(),
        }
    }

    /// Check if this error came from mutating a sealed node.
    pub fn is_sealed(&self) -> bool {
        matches!(self, DomError::Sealed { .. })
    }

    /// Check if this error is a shape mismatch.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, DomError::TypeMismatch { .. })
    }

    /// Check if this error indicates a missing path.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DomError::NotFound { .. })
    }

    /// Check if this error came from an external query engine.
    pub fn is_query_failed(&self) -> bool {
        matches!(self, DomError::Query { .. })
    }
}

impl From<DomError> for crate::Error {
    fn from(err: DomError) -> Self {
        crate::Error::Dom(err)
    }
}
