//! External query-engine integration.
//!
//! The crate carries query text and grammar but never evaluates
//! JSONPath or JMESPath itself. [`UniversalQuery`] names the grammar;
//! evaluation is delegated to a caller-supplied [`QueryEngine`]
//! wrapping whichever library the application links.

use crate::path::UniversalQuery;

use super::{Container, DomError, Node};

/// Evaluates queries against a document tree.
///
/// Implementations wrap an RFC 9535 JSONPath or JMESPath engine; the
/// grammar of a given query is available via
/// [`UniversalQuery::syntax`]. An engine that does not support the
/// requested grammar fails with [`DomError::Query`].
pub trait QueryEngine {
    /// Runs `query` against `root`, returning the matched nodes in
    /// document order. No match is an empty sequence, not an error.
    fn evaluate(&self, root: &Container, query: &UniversalQuery) -> Result<Vec<Node>, DomError>;
}

impl Container {
    /// Evaluates `q` against this container with the supplied engine.
    pub fn query(
        &self,
        engine: &dyn QueryEngine,
        q: &UniversalQuery,
    ) -> Result<Vec<Node>, DomError> {
        engine.evaluate(self, q)
    }
}
