//! The executor's registry: defined actions, action factories and
//! long-lived services.

use std::collections::HashMap;

use tracing::debug;

use super::spec::{Action, ActionSpec};
use super::PipelineError;

/// Builds an action from rendered arguments; the hook behind the
/// `ext` operation.
pub type ActionFactory =
    Box<dyn Fn(&serde_json::Value) -> Result<Box<dyn Action>, PipelineError> + Send + Sync>;

/// A long-lived object with a pipeline-scoped lifecycle: configured
/// and initialized at start-up, closed at the end of the run.
pub trait Service {
    /// Receives the initial data snapshot before the pipeline starts.
    fn configure(&mut self, data: &serde_json::Value) -> Result<(), PipelineError> {
        let _ = data;
        Ok(())
    }

    /// Acquires resources; an error here aborts start-up.
    fn init(&mut self) -> Result<(), PipelineError> {
        Ok(())
    }

    /// Releases resources. Close errors are aggregated by the
    /// executor, not raised mid-shutdown.
    fn close(&mut self) -> Result<(), PipelineError> {
        Ok(())
    }
}

/// Translates an HTML string into a document node; the integration
/// hook behind the `html2dom` operation.
pub trait HtmlTranslator {
    /// Parses `html`, optionally narrowing with an XPath expression.
    fn translate(
        &self,
        html: &str,
        xpath: Option<&str>,
    ) -> Result<crate::dom::Node, PipelineError>;
}

/// The three namespaces of the executor.
#[derive(Default)]
pub struct Registry {
    defined: HashMap<String, ActionSpec>,
    factories: HashMap<String, ActionFactory>,
    services: Vec<(String, Box<dyn Service>)>,
    html_translator: Option<Box<dyn HtmlTranslator>>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("defined", &self.defined.keys().collect::<Vec<_>>())
            .field("factories", &self.factories.keys().collect::<Vec<_>>())
            .field(
                "services",
                &self.services.iter().map(|(n, _)| n).collect::<Vec<_>>(),
            )
            .field("html_translator", &self.html_translator.is_some())
            .finish()
    }
}

impl Registry {
    /// Registers a named action spec; redefinition fails.
    pub fn define(&mut self, name: impl Into<String>, spec: ActionSpec) -> Result<(), PipelineError> {
        let name = name.into();
        if self.defined.contains_key(&name) {
            return Err(PipelineError::AlreadyDefined { name });
        }
        debug!(name, "defined action");
        self.defined.insert(name, spec);
        Ok(())
    }

    /// A previously defined action spec.
    pub fn defined(&self, name: &str) -> Option<&ActionSpec> {
        self.defined.get(name)
    }

    /// Registers an action factory, replacing any previous one of the
    /// same name.
    pub fn register_factory(&mut self, name: impl Into<String>, factory: ActionFactory) {
        self.factories.insert(name.into(), factory);
    }

    /// A registered action factory.
    pub fn factory(&self, name: &str) -> Option<&ActionFactory> {
        self.factories.get(name)
    }

    /// Registers a service; registration order drives the start-up
    /// order and the reverse drives shutdown.
    pub fn register_service(&mut self, name: impl Into<String>, service: Box<dyn Service>) {
        self.services.push((name.into(), service));
    }

    /// Services in registration order.
    pub(crate) fn services_mut(&mut self) -> &mut [(String, Box<dyn Service>)] {
        &mut self.services
    }

    /// Installs the HTML translation hook.
    pub fn set_html_translator(&mut self, translator: Box<dyn HtmlTranslator>) {
        self.html_translator = Some(translator);
    }

    /// The HTML translation hook, if installed.
    pub fn html_translator(&self) -> Option<&dyn HtmlTranslator> {
        self.html_translator.as_deref()
    }
}
