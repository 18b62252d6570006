//! The operation catalogue.
//!
//! Every operation is a small serde-deserializable struct with a
//! `run` method against the [`ActionContext`]. Operations with string
//! configuration render those fields through the template engine when
//! they run; structural re-parameterisation happens via
//! [`ActionSpec::clone_with`](super::ActionSpec::clone_with).

mod data;
mod flow;
mod html;
mod io;
mod render;

pub use data::{ConvertOp, NumberKind, PatchDirective, SetOp, SetStrategy};
pub use flow::{AbortOp, CallOp, DefineOp, ExtOp, ForEachOp, LogOp, LoopOp};
pub use html::Html2DomOp;
pub use io::{EnvOp, ExecOp, ExportOp, ImportOp, TransferMode};
pub use render::{ParseMode, TemplateFileOp, TemplateOp};

use crate::path::{Path, PathSyntax};

use super::context::ActionContext;
use super::PipelineError;

/// Renders a configured path string leniently and parses it as a
/// property path.
pub(super) fn parse_path(ctx: &ActionContext, raw: &str) -> Result<Path, PipelineError> {
    Ok(PathSyntax::Properties.parse(&ctx.render_lenient(raw))?)
}
