//! Operations that rewrite the data tree in place.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::diff::{self, PatchKind, PatchOp};
use crate::dom::{DomError, MergeOptions, Node, Value};
use crate::path::PathSyntax;

use super::super::context::ActionContext;
use super::super::PipelineError;
use super::parse_path;

/// How `set` combines its literal with an existing subtree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SetStrategy {
    /// Overwrite whatever is at the target (default).
    #[default]
    Replace,
    /// Merge container-with-container; other shapes replace.
    Merge,
}

/// Merges or assigns a literal map into the data tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetOp {
    /// Target path; absent means the tree root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// The literal data.
    pub data: serde_json::Value,
    /// Combination strategy.
    #[serde(default)]
    pub strategy: SetStrategy,
}

impl SetOp {
    pub fn run(&self, ctx: &mut ActionContext) -> Result<(), PipelineError> {
        let node = Node::from_plain(self.data.clone());
        match self.path.as_deref().filter(|p| !p.is_empty()) {
            None => {
                let Node::Container(incoming) = node else {
                    return Err(DomError::mismatch("container", &node).into());
                };
                match self.strategy {
                    SetStrategy::Replace => *ctx.data_mut() = incoming,
                    SetStrategy::Merge => {
                        let merged = ctx.data().merge(&incoming, &MergeOptions::default());
                        *ctx.data_mut() = merged;
                    }
                }
            }
            Some(raw) => {
                let path = parse_path(ctx, raw)?;
                let node = match (self.strategy, ctx.data().get(&path), &node) {
                    (SetStrategy::Merge, Some(Node::Container(old)), Node::Container(new)) => {
                        Node::Container(old.merge(new, &MergeOptions::default()))
                    }
                    _ => node,
                };
                ctx.data_mut().set(&path, node)?;
            }
        }
        debug!(path = self.path.as_deref().unwrap_or(""), "set applied");
        Ok(())
    }
}

/// Applies one RFC 6902 operation; the value is either a literal or
/// taken from another path in the data tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchDirective {
    /// The operation kind.
    pub op: PatchKind,
    /// Target path, rendered before use.
    pub path: String,
    /// Source path for `move`/`copy`, rendered before use.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// Literal value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    /// Data-tree path supplying the value instead of a literal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_from: Option<String>,
}

impl PatchDirective {
    pub fn run(&self, ctx: &mut ActionContext) -> Result<(), PipelineError> {
        let value = match (&self.value, &self.value_from) {
            (Some(literal), _) => Some(Node::from_plain(literal.clone())),
            (None, Some(value_from)) => {
                let source = parse_path(ctx, value_from)?;
                let node = ctx
                    .data()
                    .get(&source)
                    .cloned()
                    .ok_or_else(|| DomError::NotFound {
                        path: value_from.clone(),
                    })?;
                Some(node)
            }
            (None, None) => None,
        };
        let op = PatchOp {
            op: self.op,
            path: ctx.render_lenient(&self.path),
            from: self.from.as_deref().map(|f| ctx.render_lenient(f)),
            value,
        };
        diff::patch::apply(ctx.data_mut(), &op)?;
        Ok(())
    }
}

/// The numeric kinds a leaf can be coerced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberKind {
    Int64,
    Float64,
}

/// Coerces a leaf value in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertOp {
    /// Path of the leaf.
    pub path: String,
    /// Target kind.
    pub to: NumberKind,
}

impl ConvertOp {
    pub fn run(&self, ctx: &mut ActionContext) -> Result<(), PipelineError> {
        let path = parse_path(ctx, &self.path)?;
        let rendered = match ctx.data().get(&path) {
            Some(Node::Leaf(value)) => value.render(),
            Some(_) => {
                return Err(PipelineError::NotALeaf {
                    path: self.path.clone(),
                });
            }
            None => {
                return Err(DomError::NotFound {
                    path: self.path.clone(),
                }
                .into());
            }
        };
        let converted = match self.to {
            NumberKind::Int64 => rendered
                .trim()
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|e| PipelineError::Convert {
                    path: self.path.clone(),
                    reason: e.to_string(),
                })?,
            NumberKind::Float64 => rendered
                .trim()
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|e| PipelineError::Convert {
                    path: self.path.clone(),
                    reason: e.to_string(),
                })?,
        };
        ctx.data_mut().set(&path, converted)?;
        Ok(())
    }
}
