//! Inline-or-referenced string values.

use serde::{Deserialize, Serialize};

use crate::dom::Node;
use crate::path::PathSyntax;

use super::context::ActionContext;
use super::PipelineError;

/// A field accepting either an inline string or a `{ref: "path"}`
/// reference into the data tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValOrRef {
    /// A reference to a leaf in the data tree.
    Ref {
        /// Property path of the leaf.
        #[serde(rename = "ref")]
        reference: String,
    },
    /// An inline value, template-rendered on resolve.
    Val(String),
}

impl ValOrRef {
    /// Resolves to a string: inline values are rendered leniently,
    /// references are dereferenced. A dangling reference resolves to
    /// the empty string; a reference to a non-leaf fails.
    pub fn resolve(&self, ctx: &ActionContext) -> Result<String, PipelineError> {
        match self {
            ValOrRef::Val(value) => Ok(ctx.render_lenient(value)),
            ValOrRef::Ref { reference } => {
                let path = PathSyntax::Properties.parse(reference)?;
                match ctx.data().get(&path) {
                    Some(Node::Leaf(value)) => Ok(value.render()),
                    Some(_) => Err(PipelineError::NotALeaf {
                        path: reference.clone(),
                    }),
                    None => Ok(String::new()),
                }
            }
        }
    }
}

impl From<&str> for ValOrRef {
    fn from(value: &str) -> Self {
        ValOrRef::Val(value.to_string())
    }
}
