//! Errors produced by overlays, document sets and the manifest facade.

use thiserror::Error;

use crate::codec::CodecError;
use crate::dom::DomError;
use crate::path::PathError;

/// Errors arising from layered-document operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OverlayError {
    /// A named layer is absent from the overlay.
    #[error("unknown layer: {layer}")]
    UnknownLayer {
        /// Name of the missing layer.
        layer: String,
    },

    /// A document with this name already exists and the add policy
    /// demanded creation.
    #[error("layer already exists: {layer}")]
    LayerExists {
        /// Name of the conflicting document.
        layer: String,
    },

    /// The manifest declares an unsupported `kind`.
    #[error("unsupported manifest kind: {kind}")]
    UnsupportedKind {
        /// The declared kind.
        kind: String,
    },

    /// The manifest is missing a mandatory field.
    #[error("manifest is missing field: {field}")]
    MissingField {
        /// Name of the absent field.
        field: &'static str,
    },

    /// A `data` entry did not decode as base64.
    #[error("invalid base64 in manifest entry {entry}")]
    InvalidBase64 {
        /// Name of the offending entry.
        entry: String,
    },

    /// Decoding or encoding a layer's bytes failed.
    #[error("codec failure in overlay operation")]
    Codec(#[from] CodecError),

    /// Mutating a layer's document tree failed.
    #[error("document operation failed")]
    Dom(#[from] DomError),

    /// A supplied path string failed to parse.
    #[error("invalid path in overlay operation")]
    Path(#[from] PathError),
}

impl OverlayError {
    /// Test if a document name collided under a must-create policy.
    pub fn is_layer_exists(&self) -> bool {
        matches!(self, OverlayError::LayerExists { .. })
    }

    /// Test if a referenced layer is absent.
    pub fn is_unknown_layer(&self) -> bool {
        matches!(self, OverlayError::UnknownLayer { .. })
    }
}

impl From<OverlayError> for crate::Error {
    fn from(err: OverlayError) -> Self {
        crate::Error::Overlay(err)
    }
}
