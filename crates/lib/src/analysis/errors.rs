//! Errors produced by the analysis passes.

use thiserror::Error;

use crate::dom::DomError;
use crate::path::PathError;

/// Errors arising from placeholder and dependency analysis.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AnalysisError {
    /// The placeholder resolution graph contains a cycle.
    #[error("cyclic placeholder reference through key: {key}")]
    CyclicReference {
        /// The key whose resolution re-entered itself.
        key: String,
    },

    /// Rebuilding an analysed tree failed.
    #[error("document operation failed during analysis")]
    Dom(#[from] DomError),

    /// A flattened key failed to parse back into a path.
    #[error("invalid path during analysis")]
    Path(#[from] PathError),
}

impl AnalysisError {
    /// Test for a placeholder cycle.
    pub fn is_cyclic(&self) -> bool {
        matches!(self, AnalysisError::CyclicReference { .. })
    }
}

impl From<AnalysisError> for crate::Error {
    fn from(err: AnalysisError) -> Self {
        crate::Error::Analysis(err)
    }
}
