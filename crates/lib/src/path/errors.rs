//! Error types for path parsing.

use thiserror::Error;

/// Structured error types for path parsing failures.
#[non_exhaustive]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    /// A character appeared where the grammar does not allow it.
    #[error("unexpected character '{found}' at offset {at} in path '{input}'")]
    UnexpectedChar { input: String, at: usize, found: char },

    /// A `[` index suffix was never closed.
    #[error("unterminated index bracket in path '{input}'")]
    UnterminatedIndex { input: String },

    /// The content between brackets is not a valid index.
    #[error("invalid list index '{index}' in path '{input}'")]
    InvalidIndex { input: String, index: String },

    /// A dotted path contained an empty segment.
    #[error("empty segment at offset {at} in path '{input}'")]
    EmptySegment { input: String, at: usize },

    /// A non-empty JSON pointer must start with '/'.
    #[error("JSON pointer '{input}' does not start with '/'")]
    MissingLeadingSlash { input: String },
}

impl PathError {
    /// The offending input string.
    pub fn input(&self) -> &str {
        match self {
            PathError::UnexpectedChar { input, .. }
            | PathError::UnterminatedIndex { input }
            | PathError::InvalidIndex { input, .. }
            | PathError::EmptySegment { input, .. }
            | PathError::MissingLeadingSlash { input } => input,
        }
    }
}

impl From<PathError> for crate::Error {
    fn from(err: PathError) -> Self {
        crate::Error::Path(err)
    }
}
