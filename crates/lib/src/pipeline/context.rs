//! The execution context shared by every action.
//!
//! The context owns the data tree, a lazily rebuilt plain-data
//! snapshot of it, the registry and the listener. Read paths (template
//! rendering, `when` evaluation) go through the snapshot so one action
//! sees a consistent view; any mutable borrow of the tree invalidates
//! the snapshot.

use std::cell::RefCell;

use crate::codec::json;
use crate::dom::Container;

use super::listener::{Listener, Noop};
use super::registry::Registry;
use super::template::{Jinja, TemplateEngine};
use super::PipelineError;

/// Everything an action can reach while running.
pub struct ActionContext {
    data: Container,
    snapshot: RefCell<Option<serde_json::Value>>,
    /// Defined actions, factories and services.
    pub registry: Registry,
    /// Execution observer.
    pub listener: Box<dyn Listener>,
    /// Template engine used by all rendering operations.
    pub engine: Box<dyn TemplateEngine>,
}

impl std::fmt::Debug for ActionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionContext")
            .field("data", &self.data)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl Default for ActionContext {
    fn default() -> Self {
        ActionContext {
            data: Container::new(),
            snapshot: RefCell::new(None),
            registry: Registry::default(),
            listener: Box::new(Noop),
            engine: Box::new(Jinja::new()),
        }
    }
}

impl ActionContext {
    /// A context over an empty data tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// A context owning `data`.
    pub fn with_data(data: Container) -> Self {
        ActionContext {
            data,
            ..Default::default()
        }
    }

    /// Replaces the listener.
    pub fn with_listener(mut self, listener: Box<dyn Listener>) -> Self {
        self.listener = listener;
        self
    }

    /// Read access to the data tree.
    pub fn data(&self) -> &Container {
        &self.data
    }

    /// Write access to the data tree; invalidates the snapshot.
    pub fn data_mut(&mut self) -> &mut Container {
        self.snapshot.replace(None);
        &mut self.data
    }

    /// Consumes the context, returning the data tree.
    pub fn into_data(self) -> Container {
        self.data
    }

    /// The plain-data view of the tree, rebuilt only after a mutation.
    pub fn snapshot(&self) -> serde_json::Value {
        let mut cached = self.snapshot.borrow_mut();
        cached
            .get_or_insert_with(|| json::to_value(&self.data))
            .clone()
    }

    /// Renders a template against the snapshot.
    pub fn render(&self, template: &str) -> Result<String, PipelineError> {
        self.engine.render(template, &self.snapshot())
    }

    /// Renders against the snapshot, falling back to the input on
    /// failure.
    pub fn render_lenient(&self, template: &str) -> String {
        self.engine.render_lenient(template, &self.snapshot())
    }

    /// Evaluates a boolean template against the snapshot.
    pub fn eval_bool(&self, template: &str) -> Result<bool, PipelineError> {
        self.engine.eval_bool(template, &self.snapshot())
    }

    /// Emits a message through the listener's log channel.
    pub fn log(&self, message: &str) {
        self.listener.on_log(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::property::must_parse;

    #[test]
    fn snapshot_tracks_mutations() {
        let mut ctx = ActionContext::new();
        let path = must_parse("a.b");
        ctx.data_mut().set(&path, 1i64).unwrap();
        assert_eq!(ctx.snapshot()["a"]["b"], serde_json::json!(1));

        ctx.data_mut().set(&path, 2i64).unwrap();
        assert_eq!(ctx.snapshot()["a"]["b"], serde_json::json!(2));
    }

    #[test]
    fn rendering_consults_the_snapshot() {
        let mut ctx = ActionContext::new();
        ctx.data_mut()
            .set(&must_parse("name"), "world")
            .unwrap();
        assert_eq!(ctx.render("hi {{ name }}").unwrap(), "hi world");
        assert_eq!(ctx.render_lenient("plain"), "plain");
    }
}
