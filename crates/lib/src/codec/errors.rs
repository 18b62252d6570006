//! Errors produced while decoding or encoding documents.

use thiserror::Error;

use crate::dom::DomError;
use crate::path::PathError;

/// Errors arising from the codec back-ends.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CodecError {
    /// Underlying I/O failure while reading or writing a stream.
    #[error("I/O error during codec operation")]
    Io(#[from] std::io::Error),

    /// Malformed JSON input or unencodable value.
    #[error("JSON codec error")]
    Json(#[from] serde_json::Error),

    /// Malformed YAML input or unencodable value.
    #[error("YAML codec error")]
    Yaml(#[from] serde_yaml::Error),

    /// A property key failed to parse as a path.
    #[error("invalid property key")]
    Key(#[from] PathError),

    /// Building the document tree failed.
    #[error("document construction failed")]
    Dom(#[from] DomError),

    /// The top-level node of the input is not a mapping.
    #[error("top-level {format} value is not a mapping")]
    TopLevelNotContainer {
        /// Name of the offending format.
        format: &'static str,
    },

    /// A mapping key has a kind that cannot be represented as a string.
    #[error("unsupported mapping key of kind {kind}")]
    UnsupportedKey {
        /// Kind name of the offending key.
        kind: &'static str,
    },

    /// The input is malformed in a format-specific way.
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// Description of the problem.
        reason: String,
    },
}

impl CodecError {
    /// Test if the top-level value of the input was not a mapping.
    pub fn is_top_level_not_container(&self) -> bool {
        matches!(self, CodecError::TopLevelNotContainer { .. })
    }
}

impl From<CodecError> for crate::Error {
    fn from(err: CodecError) -> Self {
        crate::Error::Codec(err)
    }
}
