//!
//! Strata: a layered configuration-document engine.
//!
//! ## Core Concepts
//!
//! Strata is built around several key concepts:
//!
//! * **Documents (`dom::Container`)**: Ordered trees of containers, lists and typed
//!   leaf values, with a seal discipline separating read-only and mutable trees.
//! * **Paths (`path::Path`)**: Structured addresses into a document, parsed from
//!   dotted property strings or RFC 6901 JSON pointers.
//! * **Codecs (`codec::Format`)**: YAML, JSON and properties readers/writers that
//!   map external documents onto the tree model.
//! * **Overlays (`overlay::Overlay`)**: Named layers of documents merged
//!   left-to-right, with document sets, tags and manifest ingestion on top.
//! * **Analysis (`analysis`)**: Placeholder resolution, cross-layer deduplication
//!   and `${key}` dependency reporting over overlays.
//! * **Diff & patch (`diff`)**: Structural comparison producing path-sorted
//!   modification lists, and RFC 6902 patch application.
//! * **Pipelines (`pipeline::Executor`)**: Declarative YAML action trees that
//!   import, transform and export documents through a service-aware executor.

pub mod analysis;
pub mod codec;
pub mod diff;
pub mod dom;
pub mod morph;
pub mod overlay;
pub mod path;
pub mod pipeline;

pub use dom::{Container, List, Node, Value};
pub use path::{Component, Path, PathSyntax};

/// Result type used throughout the Strata library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the Strata library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Structured document-tree errors from the dom module
    #[error(transparent)]
    Dom(dom::DomError),

    /// Structured path grammar errors from the path module
    #[error(transparent)]
    Path(path::PathError),

    /// Structured encode/decode errors from the codec module
    #[error(transparent)]
    Codec(codec::CodecError),

    /// Structured layering errors from the overlay module
    #[error(transparent)]
    Overlay(overlay::OverlayError),

    /// Structured resolution errors from the analysis module
    #[error(transparent)]
    Analysis(analysis::AnalysisError),

    /// Structured comparison and patch errors from the diff module
    #[error(transparent)]
    Diff(diff::DiffError),

    /// Structured execution errors from the pipeline module
    #[error(transparent)]
    Pipeline(pipeline::PipelineError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Dom(_) => "dom",
            Error::Path(_) => "path",
            Error::Codec(_) => "codec",
            Error::Overlay(_) => "overlay",
            Error::Analysis(_) => "analysis",
            Error::Diff(_) => "diff",
            Error::Pipeline(_) => "pipeline",
            Error::Io(_) => "io",
            Error::Serialize(_) => "serialize",
        }
    }

    /// Check if this error indicates a missing path or document.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Dom(dom_err) => dom_err.is_not_found(),
            Error::Diff(diff_err) => diff_err.is_path_not_found(),
            _ => false,
        }
    }

    /// Check if this error came from writing into a sealed tree.
    pub fn is_sealed(&self) -> bool {
        match self {
            Error::Dom(dom_err) => dom_err.is_sealed(),
            _ => false,
        }
    }

    /// Check if this error is a node-kind mismatch.
    pub fn is_type_mismatch(&self) -> bool {
        match self {
            Error::Dom(dom_err) => dom_err.is_type_mismatch(),
            _ => false,
        }
    }

    /// Check if this error indicates a name conflict.
    pub fn is_conflict(&self) -> bool {
        match self {
            Error::Overlay(overlay_err) => overlay_err.is_layer_exists(),
            Error::Pipeline(pipeline_err) => pipeline_err.is_already_defined(),
            _ => false,
        }
    }

    /// Check if this error is a cyclic placeholder reference.
    pub fn is_cyclic(&self) -> bool {
        match self {
            Error::Analysis(analysis_err) => analysis_err.is_cyclic(),
            _ => false,
        }
    }

    /// Check if this error is a failed patch `test` operation.
    pub fn is_test_failed(&self) -> bool {
        match self {
            Error::Diff(diff_err) => diff_err.is_test_failed(),
            _ => false,
        }
    }

    /// Check if this error is a pipeline abort.
    pub fn is_abort(&self) -> bool {
        match self {
            Error::Pipeline(pipeline_err) => pipeline_err.is_abort(),
            _ => false,
        }
    }

    /// Check if this error is I/O related.
    pub fn is_io_error(&self) -> bool {
        matches!(self, Error::Io(_))
    }
}
