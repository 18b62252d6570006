//! Control-flow operations: logging, aborting, loops, iteration and
//! the define/call/ext indirections.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dom::Node;
use crate::path::PathSyntax;

use super::super::context::ActionContext;
use super::super::spec::{run_spec, ActionSpec};
use super::super::valorref::ValOrRef;
use super::super::PipelineError;
use super::parse_path;

/// Emits a message through the listener's log channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogOp {
    /// Inline text (rendered) or a reference into the data tree.
    #[serde(alias = "msg")]
    pub message: ValOrRef,
}

impl LogOp {
    pub fn run(&self, ctx: &ActionContext) -> Result<(), PipelineError> {
        let message = self.message.resolve(ctx)?;
        ctx.log(&message);
        Ok(())
    }
}

/// Unconditionally raises an error with a rendered message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbortOp {
    /// Inline text (rendered) or a reference into the data tree.
    #[serde(alias = "msg")]
    pub message: ValOrRef,
}

impl AbortOp {
    pub fn run(&self, ctx: &ActionContext) -> Result<(), PipelineError> {
        Err(PipelineError::Abort {
            message: self.message.resolve(ctx)?,
        })
    }
}

/// `init?` then while `test` holds: `postAction?` then `action`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoopOp {
    /// One-time set-up action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub init: Option<Box<ActionSpec>>,
    /// Boolean template controlling the loop.
    pub test: String,
    /// Runs before the body on every iteration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_action: Option<Box<ActionSpec>>,
    /// The loop body.
    pub action: Box<ActionSpec>,
}

impl LoopOp {
    pub fn run(&self, ctx: &mut ActionContext) -> Result<(), PipelineError> {
        if let Some(init) = &self.init {
            run_spec(ctx, init)?;
        }
        while ctx.eval_bool(&self.test)? {
            if let Some(post) = &self.post_action {
                run_spec(ctx, post)?;
            }
            run_spec(ctx, &self.action)?;
        }
        Ok(())
    }
}

fn default_var() -> String {
    "forEach".to_string()
}

/// Iterates glob matches, a literal list, or a query over the data
/// tree, binding the current item for the body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForEachOp {
    /// File glob pattern producing path items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glob: Option<String>,
    /// Literal items.
    #[serde(default, alias = "item", skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<serde_json::Value>>,
    /// Data-tree path whose children become the items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// Binding name for the current item.
    #[serde(default = "default_var")]
    pub var: String,
    /// The body, cloned-with-template per item.
    pub action: Box<ActionSpec>,
}

impl ForEachOp {
    fn items(&self, ctx: &ActionContext) -> Result<Vec<serde_json::Value>, PipelineError> {
        if let Some(pattern) = &self.glob {
            let rendered = ctx.render_lenient(pattern);
            let mut matches = Vec::new();
            for entry in glob::glob(&rendered)? {
                if let Ok(path) = entry {
                    matches.push(serde_json::Value::String(path.display().to_string()));
                }
            }
            return Ok(matches);
        }
        if let Some(items) = &self.items {
            return Ok(items.clone());
        }
        if let Some(query) = &self.query {
            let path = parse_path(ctx, query)?;
            return Ok(match ctx.data().get(&path) {
                Some(Node::List(list)) => list.iter().map(|(_, item)| item.to_plain()).collect(),
                Some(Node::Container(c)) => {
                    c.children().map(|(_, child)| child.to_plain()).collect()
                }
                Some(leaf) => vec![leaf.to_plain()],
                None => Vec::new(),
            });
        }
        Err(PipelineError::MissingConfig {
            op: "forEach",
            field: "items",
        })
    }

    pub fn run(&self, ctx: &mut ActionContext) -> Result<(), PipelineError> {
        let items = self.items(ctx)?;
        let var = PathSyntax::Properties.parse(&self.var)?;
        debug!(count = items.len(), var = %self.var, "iterating");
        for item in items {
            ctx.data_mut().set(&var, Node::from_plain(item))?;
            let body = self.action.clone_with(ctx);
            let result = body.and_then(|body| run_spec(ctx, &body));
            // The binding goes away on every exit path.
            ctx.data_mut().delete(&var)?;
            result?;
        }
        Ok(())
    }
}

/// Registers a named action spec; redefinition fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefineOp {
    /// Registry name.
    pub name: String,
    /// The action tree to register.
    pub action: Box<ActionSpec>,
}

impl DefineOp {
    pub fn run(&self, ctx: &mut ActionContext) -> Result<(), PipelineError> {
        if self.name.is_empty() {
            return Err(PipelineError::MissingConfig {
                op: "define",
                field: "name",
            });
        }
        ctx.registry.define(self.name.clone(), (*self.action).clone())
    }
}

fn default_args_path() -> String {
    "args".to_string()
}

/// Invokes a previously defined action spec, grafting arguments under
/// a configurable key for the duration of the call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallOp {
    /// Name of the defined action.
    pub name: String,
    /// Where the arguments are grafted.
    #[serde(default = "default_args_path")]
    pub args_path: String,
    /// The arguments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<serde_json::Value>,
}

impl CallOp {
    pub fn run(&self, ctx: &mut ActionContext) -> Result<(), PipelineError> {
        let name = ctx.render_lenient(&self.name);
        let spec = ctx
            .registry
            .defined(&name)
            .cloned()
            .ok_or(PipelineError::UndefinedCall { name })?;
        let args_path = PathSyntax::Properties.parse(&self.args_path)?;
        if let Some(args) = &self.args {
            ctx.data_mut()
                .set(&args_path, Node::from_plain(args.clone()))?;
        }
        let result = run_spec(ctx, &spec);
        if self.args.is_some() {
            ctx.data_mut().delete(&args_path)?;
        }
        result
    }
}

/// Invokes a factory-produced action by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtOp {
    /// Name of the registered factory.
    pub name: String,
    /// Arguments handed to the factory, strings rendered first.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub args: serde_json::Value,
}

impl ExtOp {
    pub fn run(&self, ctx: &mut ActionContext) -> Result<(), PipelineError> {
        let name = ctx.render_lenient(&self.name);
        let mut args = self.args.clone();
        render_value(&mut args, ctx);
        let action = {
            let factory = ctx
                .registry
                .factory(&name)
                .ok_or(PipelineError::UnknownFactory { name })?;
            factory(&args)?
        };
        action.run(ctx)
    }
}

fn render_value(value: &mut serde_json::Value, ctx: &ActionContext) {
    match value {
        serde_json::Value::String(s) => *s = ctx.render_lenient(s),
        serde_json::Value::Array(items) => {
            for item in items {
                render_value(item, ctx);
            }
        }
        serde_json::Value::Object(map) => {
            for item in map.values_mut() {
                render_value(item, ctx);
            }
        }
        _ => {}
    }
}
