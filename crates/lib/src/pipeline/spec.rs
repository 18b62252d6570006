//! The declarative action model.
//!
//! An [`ActionSpec`] carries metadata (`name`, `order`, `when`,
//! `error_propagation`), a flattened [`OpSpec`] of concrete operations
//! and a named map of child specs. Children run in ascending `order`
//! with ties broken by key; operations run in one fixed canonical
//! order regardless of their position in the document.

use std::collections::BTreeMap;
use std::io::Read;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::context::ActionContext;
use super::ops;
use super::PipelineError;

/// The minimal runnable abstraction.
pub trait Action {
    /// Executes against the context.
    fn run(&self, ctx: &mut ActionContext) -> Result<(), PipelineError>;

    /// Deep copy with every string field rendered against the
    /// context's snapshot.
    fn clone_with(&self, ctx: &ActionContext) -> Result<Box<dyn Action>, PipelineError>;

    /// Short human-readable label.
    fn describe(&self) -> String;
}

/// Whether an error inside a spec propagates or is swallowed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPropagation {
    /// Surface the first error (default).
    #[default]
    Propagate,
    /// Swallow errors and continue with the next operation or sibling.
    Ignore,
}

/// The concrete operations of one spec, executed in canonical order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set: Option<ops::SetOp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import: Option<ops::ImportOp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch: Option<ops::PatchDirective>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<ops::TemplateOp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_file: Option<ops::TemplateFileOp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export: Option<ops::ExportOp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<ops::EnvOp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exec: Option<ops::ExecOp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log: Option<ops::LogOp>,
    #[serde(rename = "loop", default, skip_serializing_if = "Option::is_none")]
    pub repeat: Option<ops::LoopOp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub for_each: Option<ops::ForEachOp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abort: Option<ops::AbortOp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub define: Option<ops::DefineOp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call: Option<ops::CallOp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ext: Option<ops::ExtOp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub convert: Option<ops::ConvertOp>,
    #[serde(rename = "html2dom", default, skip_serializing_if = "Option::is_none")]
    pub html_to_dom: Option<ops::Html2DomOp>,
}

macro_rules! run_present {
    ($ctx:expr, $($field:expr),+ $(,)?) => {
        $(if let Some(op) = $field { op.run($ctx)?; })+
    };
}

impl OpSpec {
    /// Test for a spec declaring no operation at all.
    pub fn is_empty(&self) -> bool {
        self == &OpSpec::default()
    }

    /// Runs every declared operation in canonical order.
    pub fn run(&self, ctx: &mut ActionContext) -> Result<(), PipelineError> {
        run_present!(
            ctx,
            &self.set,
            &self.import,
            &self.patch,
            &self.template,
            &self.template_file,
            &self.export,
            &self.env,
            &self.exec,
            &self.log,
            &self.repeat,
            &self.for_each,
            &self.abort,
            &self.define,
            &self.call,
            &self.ext,
            &self.convert,
            &self.html_to_dom,
        );
        Ok(())
    }
}

/// One node of the declarative action tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionSpec {
    /// Free-form label.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Ascending execution order among siblings.
    #[serde(default)]
    pub order: i64,
    /// Boolean template; when it evaluates false the spec is skipped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when: Option<String>,
    /// Error handling for operations and children of this spec.
    #[serde(default)]
    pub error_propagation: ErrorPropagation,
    /// The operations, flattened into this spec's fields.
    #[serde(flatten)]
    pub ops: OpSpec,
    /// Child specs by name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub steps: BTreeMap<String, ActionSpec>,
}

impl ActionSpec {
    /// Reads a spec from a YAML pipeline document.
    pub fn from_yaml(reader: &mut dyn Read) -> Result<ActionSpec, PipelineError> {
        Ok(serde_yaml::from_reader(reader)?)
    }

    /// Deep copy with every string field rendered leniently against
    /// the context's snapshot.
    pub fn clone_with(&self, ctx: &ActionContext) -> Result<ActionSpec, PipelineError> {
        let mut raw = serde_json::to_value(self)?;
        render_strings(&mut raw, ctx);
        Ok(serde_json::from_value(raw)?)
    }

    fn label(&self) -> String {
        if self.name.is_empty() {
            "action".to_string()
        } else {
            self.name.clone()
        }
    }
}

fn render_strings(value: &mut serde_json::Value, ctx: &ActionContext) {
    match value {
        serde_json::Value::String(s) => *s = ctx.render_lenient(s),
        serde_json::Value::Array(items) => {
            for item in items {
                render_strings(item, ctx);
            }
        }
        serde_json::Value::Object(map) => {
            for item in map.values_mut() {
                render_strings(item, ctx);
            }
        }
        _ => {}
    }
}

impl Action for ActionSpec {
    fn run(&self, ctx: &mut ActionContext) -> Result<(), PipelineError> {
        run_spec(ctx, self)
    }

    fn clone_with(&self, ctx: &ActionContext) -> Result<Box<dyn Action>, PipelineError> {
        Ok(Box::new(ActionSpec::clone_with(self, ctx)?))
    }

    fn describe(&self) -> String {
        self.label()
    }
}

/// Dispatches one spec, wrapping it in the listener callbacks. This is
/// the single entry point for every action in the tree.
pub(crate) fn run_spec(ctx: &mut ActionContext, spec: &ActionSpec) -> Result<(), PipelineError> {
    let label = spec.label();
    ctx.listener.on_before(&label);
    let result = execute(ctx, spec);
    ctx.listener.on_after(&label, result.as_ref().err());
    result
}

fn execute(ctx: &mut ActionContext, spec: &ActionSpec) -> Result<(), PipelineError> {
    if let Some(when) = &spec.when {
        if !ctx.eval_bool(when)? {
            debug!(name = %spec.label(), "condition false, skipping");
            return Ok(());
        }
    }
    let ignore = spec.error_propagation == ErrorPropagation::Ignore;

    if let Err(err) = spec.ops.run(ctx) {
        if !ignore {
            return Err(err);
        }
        warn!(name = %spec.label(), error = %err, "ignored operation error");
    }

    let mut children: Vec<(&String, &ActionSpec)> = spec.steps.iter().collect();
    children.sort_by_key(|(_, child)| child.order);
    for (key, child) in children {
        if let Err(err) = run_spec(ctx, child) {
            if !ignore {
                return Err(err);
            }
            warn!(step = %key, error = %err, "ignored step error");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_flattened_op_fields() {
        let spec: ActionSpec = serde_yaml::from_str(
            "\
name: demo
order: 3
when: 'true'
log:
  message: hello
steps:
  child:
    order: 1
    abort:
      message: boom
",
        )
        .unwrap();
        assert_eq!(spec.name, "demo");
        assert_eq!(spec.order, 3);
        assert!(spec.ops.log.is_some());
        assert!(spec.steps["child"].ops.abort.is_some());
    }

    #[test]
    fn ignore_swallows_operation_errors() {
        let spec: ActionSpec = serde_yaml::from_str(
            "\
errorPropagation: ignore
abort:
  message: swallowed
",
        )
        .unwrap();
        let mut ctx = ActionContext::new();
        run_spec(&mut ctx, &spec).unwrap();
    }

    #[test]
    fn propagate_surfaces_the_first_error() {
        let spec: ActionSpec = serde_yaml::from_str("abort:\n  message: boom\n").unwrap();
        let mut ctx = ActionContext::new();
        let err = run_spec(&mut ctx, &spec).unwrap_err();
        assert!(err.is_abort());
        assert_eq!(err.to_string(), "abort: boom");
    }

    #[test]
    fn when_false_skips_silently() {
        let spec: ActionSpec = serde_yaml::from_str(
            "\
when: 'false'
abort:
  message: never
",
        )
        .unwrap();
        let mut ctx = ActionContext::new();
        run_spec(&mut ctx, &spec).unwrap();
    }

    #[test]
    fn clone_with_renders_string_fields() {
        let mut ctx = ActionContext::new();
        ctx.data_mut()
            .set(&crate::path::property::must_parse("who"), "world")
            .unwrap();
        let spec: ActionSpec =
            serde_yaml::from_str("log:\n  message: 'hi {{ who }}'\n").unwrap();
        let rendered = spec.clone_with(&ctx).unwrap();
        assert_eq!(rendered.ops.log.unwrap().message, "hi world".into());
    }
}
