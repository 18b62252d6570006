//! HTML translation bridged through the registry hook.

use serde::{Deserialize, Serialize};

use crate::dom::{DomError, Node};
use crate::path::PathSyntax;

use super::super::context::ActionContext;
use super::super::PipelineError;
use super::parse_path;

/// Hands the HTML text at `path` to the installed translator and
/// stores the resulting node at `target`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Html2DomOp {
    /// Leaf holding the HTML text.
    pub path: String,
    /// Where the translated node lands.
    pub target: String,
    /// Optional XPath narrowing, passed through verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xpath: Option<String>,
}

impl Html2DomOp {
    pub fn run(&self, ctx: &mut ActionContext) -> Result<(), PipelineError> {
        let source = parse_path(ctx, &self.path)?;
        let html = match ctx.data().get(&source) {
            Some(Node::Leaf(value)) => value.render(),
            Some(_) => {
                return Err(PipelineError::NotALeaf {
                    path: PathSyntax::Properties.serialize(&source),
                });
            }
            None => {
                return Err(DomError::NotFound {
                    path: PathSyntax::Properties.serialize(&source),
                }
                .into());
            }
        };
        let translator =
            ctx.registry
                .html_translator()
                .ok_or_else(|| PipelineError::ServiceNotRegistered {
                    name: "html-translator".to_string(),
                })?;
        let node = translator.translate(&html, self.xpath.as_deref())?;
        let target = parse_path(ctx, &self.target)?;
        ctx.data_mut().set(&target, node)?;
        Ok(())
    }
}
