//! Errors produced by the pipeline executor and its operations.

use thiserror::Error;

use crate::codec::CodecError;
use crate::diff::DiffError;
use crate::dom::DomError;
use crate::path::PathError;

/// Errors arising from pipeline execution.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PipelineError {
    /// Rendering or parsing a template failed.
    #[error("template rendering failed")]
    Template(#[from] minijinja::Error),

    /// A template expected to yield a boolean rendered something else.
    #[error("expected a boolean, rendered: {rendered}")]
    NotABool {
        /// The rendered text.
        rendered: String,
    },

    /// An `abort` operation fired.
    #[error("abort: {message}")]
    Abort {
        /// The rendered abort message.
        message: String,
    },

    /// An operation is missing a mandatory configuration field.
    #[error("{op} operation is missing mandatory field: {field}")]
    MissingConfig {
        /// The operation name.
        op: &'static str,
        /// The absent field.
        field: &'static str,
    },

    /// A `call` names an action that was never defined.
    #[error("undefined callable: {name}")]
    UndefinedCall {
        /// The unresolved name.
        name: String,
    },

    /// A `define` re-used an existing name.
    #[error("already defined: {name}")]
    AlreadyDefined {
        /// The duplicated name.
        name: String,
    },

    /// An `ext` names an unregistered action factory.
    #[error("unknown action factory: {name}")]
    UnknownFactory {
        /// The unresolved name.
        name: String,
    },

    /// A required service is not registered.
    #[error("service not registered: {name}")]
    ServiceNotRegistered {
        /// The service name.
        name: String,
    },

    /// An external program exited with a non-whitelisted code.
    #[error("{program} exited with code {code}")]
    ExitCode {
        /// The program that ran.
        program: String,
        /// Its exit code, or -1 when killed by a signal.
        code: i32,
    },

    /// A `convert` could not coerce the leaf value.
    #[error("cannot convert value at {path}: {reason}")]
    Convert {
        /// Path of the leaf.
        path: String,
        /// Why the coercion failed.
        reason: String,
    },

    /// A path was expected to address a leaf.
    #[error("not a leaf: {path}")]
    NotALeaf {
        /// The offending path.
        path: String,
    },

    /// Service shutdown reported one or more errors.
    #[error("service shutdown reported {} error(s)", errors.len())]
    Shutdown {
        /// The aggregated close errors, in shutdown order.
        errors: Vec<PipelineError>,
    },

    /// File or process I/O failed.
    #[error("I/O error during pipeline operation")]
    Io(#[from] std::io::Error),

    /// A glob pattern failed to compile.
    #[error("invalid glob pattern")]
    Glob(#[from] glob::PatternError),

    /// An environment filter regex failed to compile.
    #[error("invalid filter regex")]
    Regex(#[from] regex::Error),

    /// Spec or snapshot serialization failed.
    #[error("serialization failed")]
    Serialize(#[from] serde_json::Error),

    /// Reading a YAML pipeline file failed.
    #[error("pipeline file is not valid YAML")]
    SpecYaml(#[from] serde_yaml::Error),

    /// A codec invocation inside an operation failed.
    #[error("codec failure during pipeline operation")]
    Codec(#[from] CodecError),

    /// A patch operation failed.
    #[error("patch failed during pipeline operation")]
    Diff(#[from] DiffError),

    /// A document mutation failed.
    #[error("document operation failed during pipeline")]
    Dom(#[from] DomError),

    /// A configured path failed to parse.
    #[error("invalid path in operation configuration")]
    Path(#[from] PathError),
}

impl PipelineError {
    /// Test for an abort raised by the `abort` operation.
    pub fn is_abort(&self) -> bool {
        matches!(self, PipelineError::Abort { .. })
    }

    /// Test for a missing named callable.
    pub fn is_undefined_call(&self) -> bool {
        matches!(self, PipelineError::UndefinedCall { .. })
    }

    /// Test for a duplicate definition.
    pub fn is_already_defined(&self) -> bool {
        matches!(self, PipelineError::AlreadyDefined { .. })
    }

    /// Test for a missing service registration.
    pub fn is_service_not_registered(&self) -> bool {
        matches!(self, PipelineError::ServiceNotRegistered { .. })
    }
}

impl From<PipelineError> for crate::Error {
    fn from(err: PipelineError) -> Self {
        crate::Error::Pipeline(err)
    }
}
