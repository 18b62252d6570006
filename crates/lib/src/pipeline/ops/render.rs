//! Template rendering operations.

use std::fs;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::codec::Format;
use crate::dom::{Node, Value};

use super::super::context::ActionContext;
use super::super::PipelineError;
use super::parse_path;

/// Post-processing applied to a rendered template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// Decode the rendering as YAML and graft the container.
    Yaml,
    /// Parse as a signed integer leaf.
    Int64,
    /// Parse as a floating leaf.
    Float64,
}

/// Renders a template string into the data tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateOp {
    /// The template source.
    pub template: String,
    /// Target path for the result.
    pub path: String,
    /// Optional post-parse of the rendering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parse: Option<ParseMode>,
    /// Trim surrounding whitespace before storing.
    #[serde(default)]
    pub trim: bool,
}

impl TemplateOp {
    pub fn run(&self, ctx: &mut ActionContext) -> Result<(), PipelineError> {
        if self.template.is_empty() {
            return Err(PipelineError::MissingConfig {
                op: "template",
                field: "template",
            });
        }
        if self.path.is_empty() {
            return Err(PipelineError::MissingConfig {
                op: "template",
                field: "path",
            });
        }
        let mut rendered = ctx.render(&self.template)?;
        if self.trim {
            rendered = rendered.trim().to_string();
        }
        let node = match self.parse {
            None => Node::Leaf(Value::Text(rendered)),
            Some(ParseMode::Yaml) => Node::Container(Format::Yaml.decode_str(&rendered)?),
            Some(ParseMode::Int64) => {
                let parsed = rendered.trim().parse::<i64>().map_err(|e| {
                    PipelineError::Convert {
                        path: self.path.clone(),
                        reason: e.to_string(),
                    }
                })?;
                Node::Leaf(Value::Int(parsed))
            }
            Some(ParseMode::Float64) => {
                let parsed = rendered.trim().parse::<f64>().map_err(|e| {
                    PipelineError::Convert {
                        path: self.path.clone(),
                        reason: e.to_string(),
                    }
                })?;
                Node::Leaf(Value::Float(parsed))
            }
        };
        let path = parse_path(ctx, &self.path)?;
        ctx.data_mut().set(&path, node)?;
        Ok(())
    }
}

/// Renders a template file into an output file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateFileOp {
    /// File holding the template source.
    pub file: String,
    /// Destination file for the rendering.
    pub output: String,
    /// Trim surrounding whitespace before writing.
    #[serde(default)]
    pub trim: bool,
}

impl TemplateFileOp {
    pub fn run(&self, ctx: &ActionContext) -> Result<(), PipelineError> {
        if self.file.is_empty() {
            return Err(PipelineError::MissingConfig {
                op: "templateFile",
                field: "file",
            });
        }
        if self.output.is_empty() {
            return Err(PipelineError::MissingConfig {
                op: "templateFile",
                field: "output",
            });
        }
        let file = ctx.render_lenient(&self.file);
        let template = fs::read_to_string(&file)?;
        let mut rendered = ctx.render(&template)?;
        if self.trim {
            rendered = rendered.trim().to_string();
        }
        let output = ctx.render_lenient(&self.output);
        fs::write(&output, rendered)?;
        debug!(file, output, "rendered template file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::PathSyntax;

    fn prop(s: &str) -> crate::path::Path {
        PathSyntax::Properties.must_parse(s)
    }

    #[test]
    fn renders_into_a_leaf() {
        let mut ctx = ActionContext::new();
        ctx.data_mut().set(&prop("name"), "pipe").unwrap();
        TemplateOp {
            template: "  hello {{ name }}  ".into(),
            path: "out".into(),
            parse: None,
            trim: true,
        }
        .run(&mut ctx)
        .unwrap();
        assert_eq!(ctx.data().leaf("out"), Some(&Value::Text("hello pipe".into())));
    }

    #[test]
    fn yaml_post_parse_grafts_a_container() {
        let mut ctx = ActionContext::new();
        ctx.data_mut().set(&prop("port"), 8080i64).unwrap();
        TemplateOp {
            template: "server:\n  port: {{ port }}\n".into(),
            path: "cfg".into(),
            parse: Some(ParseMode::Yaml),
            trim: false,
        }
        .run(&mut ctx)
        .unwrap();
        assert_eq!(
            ctx.data().leaf("cfg.server.port"),
            Some(&Value::Int(8080))
        );
    }

    #[test]
    fn numeric_post_parse_produces_typed_leaves() {
        let mut ctx = ActionContext::new();
        TemplateOp {
            template: "41".into(),
            path: "n".into(),
            parse: Some(ParseMode::Int64),
            trim: false,
        }
        .run(&mut ctx)
        .unwrap();
        assert_eq!(ctx.data().leaf("n"), Some(&Value::Int(41)));
    }

    #[test]
    fn empty_template_is_a_config_error() {
        let mut ctx = ActionContext::new();
        let err = TemplateOp {
            template: "".into(),
            path: "x".into(),
            parse: None,
            trim: false,
        }
        .run(&mut ctx)
        .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::MissingConfig { field: "template", .. }
        ));
    }

    #[test]
    fn template_file_renders_to_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("tpl.txt");
        let output = dir.path().join("out.txt");
        fs::write(&input, "port={{ port }}").unwrap();

        let mut ctx = ActionContext::new();
        ctx.data_mut().set(&prop("port"), 9i64).unwrap();
        TemplateFileOp {
            file: input.display().to_string(),
            output: output.display().to_string(),
            trim: false,
        }
        .run(&ctx)
        .unwrap();
        assert_eq!(fs::read_to_string(&output).unwrap(), "port=9");
    }
}
