//! The pipeline executor and its service lifecycle.

use tracing::debug;

use crate::dom::Container;

use super::context::ActionContext;
use super::spec::{run_spec, ActionSpec};
use super::PipelineError;

/// Owns the context for a run and drives the service lifecycle around
/// spec dispatch: configure and init in registration order, close in
/// reverse.
#[derive(Debug)]
pub struct Executor {
    ctx: ActionContext,
}

impl Executor {
    /// An executor over `data` with a default context.
    pub fn new(data: Container) -> Self {
        Executor {
            ctx: ActionContext::with_data(data),
        }
    }

    /// An executor over a fully prepared context.
    pub fn from_context(ctx: ActionContext) -> Self {
        Executor { ctx }
    }

    /// Read access to the context, for registrations between runs.
    pub fn context(&self) -> &ActionContext {
        &self.ctx
    }

    /// Write access to the context.
    pub fn context_mut(&mut self) -> &mut ActionContext {
        &mut self.ctx
    }

    /// Runs one spec tree: services start, the tree dispatches, and
    /// services close even when dispatch failed. Close errors are
    /// aggregated into [`PipelineError::Shutdown`], surfaced only when
    /// the run itself succeeded.
    pub fn run(&mut self, spec: &ActionSpec) -> Result<(), PipelineError> {
        self.start_services()?;
        let result = run_spec(&mut self.ctx, spec);
        let shutdown = self.close_services();
        result?;
        shutdown
    }

    /// Consumes the executor, returning the data tree.
    pub fn into_data(self) -> Container {
        self.ctx.into_data()
    }

    fn start_services(&mut self) -> Result<(), PipelineError> {
        let snapshot = self.ctx.snapshot();
        for (name, service) in self.ctx.registry.services_mut() {
            debug!(name = %name, "starting service");
            service.configure(&snapshot)?;
            service.init()?;
        }
        Ok(())
    }

    fn close_services(&mut self) -> Result<(), PipelineError> {
        let mut errors = Vec::new();
        for (name, service) in self.ctx.registry.services_mut().iter_mut().rev() {
            debug!(name = %name, "closing service");
            if let Err(err) = service.close() {
                errors.push(err);
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(PipelineError::Shutdown { errors })
        }
    }
}
