//! Operations that cross the process boundary: files, the
//! environment and external programs.

use std::fs;
use std::io::Write;
use std::process::Command;

use base64ct::{Base64, Encoding};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::codec::Format;
use crate::dom::{DomError, Node, Value};
use crate::path::{Component, Path};

use super::super::context::ActionContext;
use super::super::PipelineError;
use super::parse_path;

/// How `import`/`export` interpret the file content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferMode {
    /// Pick a codec by file extension, falling back to text.
    #[default]
    Auto,
    /// Raw text as a single leaf.
    Text,
    /// Base64-encoded bytes as a single leaf.
    Binary,
    Yaml,
    Json,
    Properties,
}

impl TransferMode {
    fn format_for(self, file: &str) -> Option<Format> {
        match self {
            TransferMode::Auto => Format::from_extension(file),
            TransferMode::Yaml => Some(Format::Yaml),
            TransferMode::Json => Some(Format::Json),
            TransferMode::Properties => Some(Format::Properties),
            TransferMode::Text | TransferMode::Binary => None,
        }
    }
}

/// Reads a file and grafts its decoded content into the data tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOp {
    /// Source file, rendered before use.
    pub file: String,
    /// Target path; absent grafts a decoded container at the root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Content interpretation.
    #[serde(default)]
    pub mode: TransferMode,
}

impl ImportOp {
    pub fn run(&self, ctx: &mut ActionContext) -> Result<(), PipelineError> {
        let file = ctx.render_lenient(&self.file);
        if file.is_empty() {
            return Err(PipelineError::MissingConfig {
                op: "import",
                field: "file",
            });
        }
        let bytes = fs::read(&file)?;
        let node = match (self.mode, self.mode.format_for(&file)) {
            (TransferMode::Binary, _) => {
                Node::Leaf(Value::Text(Base64::encode_string(&bytes)))
            }
            (_, Some(format)) => {
                Node::Container(format.decode(&mut bytes.as_slice())?)
            }
            (_, None) => Node::Leaf(Value::Text(
                String::from_utf8_lossy(&bytes).into_owned(),
            )),
        };
        debug!(file, "imported");
        match self.path.as_deref().filter(|p| !p.is_empty()) {
            Some(raw) => {
                let path = parse_path(ctx, raw)?;
                ctx.data_mut().set(&path, node)?;
            }
            None => match node {
                Node::Container(c) => *ctx.data_mut() = c,
                other => return Err(DomError::mismatch("container", &other).into()),
            },
        }
        Ok(())
    }
}

/// Writes a subtree of the data tree to a file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOp {
    /// Destination file, rendered before use.
    pub file: String,
    /// Source path; absent exports the whole tree.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Content interpretation; `text` requires a leaf source.
    #[serde(default)]
    pub mode: TransferMode,
}

impl ExportOp {
    pub fn run(&self, ctx: &ActionContext) -> Result<(), PipelineError> {
        let file = ctx.render_lenient(&self.file);
        if file.is_empty() {
            return Err(PipelineError::MissingConfig {
                op: "export",
                field: "file",
            });
        }
        let node = match self.path.as_deref().filter(|p| !p.is_empty()) {
            Some(raw) => {
                let path = parse_path(ctx, raw)?;
                ctx.data()
                    .get(&path)
                    .cloned()
                    .ok_or_else(|| DomError::NotFound { path: raw.into() })?
            }
            None => Node::Container(ctx.data().clone()),
        };
        match self.mode.format_for(&file) {
            Some(format) => {
                let Node::Container(container) = node else {
                    return Err(DomError::mismatch("container", &node).into());
                };
                let mut out = fs::File::create(&file)?;
                format.encode(&mut out, &container)?;
            }
            None => match node {
                Node::Leaf(value) => fs::write(&file, value.render())?,
                other => return Err(DomError::mismatch("leaf", &other).into()),
            },
        }
        debug!(file, "exported");
        Ok(())
    }
}

/// Grafts the process environment under `Env.*`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvOp {
    /// Base path; absent grafts at the root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Only variables matching this regex are kept.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<String>,
    /// Variables matching this regex are dropped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<String>,
}

impl EnvOp {
    pub fn run(&self, ctx: &mut ActionContext) -> Result<(), PipelineError> {
        let include = self.include.as_deref().map(Regex::new).transpose()?;
        let exclude = self.exclude.as_deref().map(Regex::new).transpose()?;
        let base = match self.path.as_deref().filter(|p| !p.is_empty()) {
            Some(raw) => parse_path(ctx, raw)?,
            None => Path::root(),
        };
        for (name, value) in std::env::vars() {
            if include.as_ref().is_some_and(|re| !re.is_match(&name)) {
                continue;
            }
            if exclude.as_ref().is_some_and(|re| re.is_match(&name)) {
                continue;
            }
            let path = base
                .child(Component::Key("Env".into()))
                .child(Component::Key(name));
            ctx.data_mut().set(&path, Value::Text(value))?;
        }
        Ok(())
    }
}

fn default_exit_codes() -> Vec<i32> {
    vec![0]
}

/// Runs an external program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecOp {
    /// Program to run, rendered before use.
    pub program: String,
    /// Arguments, each rendered before use.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    /// File capturing stdout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stdout: Option<String>,
    /// File capturing stderr.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stderr: Option<String>,
    /// Accepted exit codes; defaults to `[0]`.
    #[serde(default = "default_exit_codes")]
    pub valid_exit_codes: Vec<i32>,
}

impl ExecOp {
    pub fn run(&self, ctx: &ActionContext) -> Result<(), PipelineError> {
        let program = ctx.render_lenient(&self.program);
        if program.is_empty() {
            return Err(PipelineError::MissingConfig {
                op: "exec",
                field: "program",
            });
        }
        let snapshot = ctx.snapshot();
        let args = ctx.engine.render_slice_lenient(&self.args, &snapshot);
        debug!(program, ?args, "running external program");
        let output = Command::new(&program).args(&args).output()?;

        if let Some(stdout) = &self.stdout {
            let mut file = fs::File::create(ctx.render_lenient(stdout))?;
            file.write_all(&output.stdout)?;
        }
        if let Some(stderr) = &self.stderr {
            let mut file = fs::File::create(ctx.render_lenient(stderr))?;
            file.write_all(&output.stderr)?;
        }

        let code = output.status.code().unwrap_or(-1);
        if !self.valid_exit_codes.contains(&code) {
            warn!(program, code, "exit code not whitelisted");
            return Err(PipelineError::ExitCode { program, code });
        }
        Ok(())
    }
}
