//! Template engine abstraction and the minijinja-backed default.
//!
//! The lenient variants never fail: strings without template markers
//! bypass the engine entirely, and render errors fall back to the
//! original text. The engine exposes a `tpl` function so deferred
//! templates stored in the data tree can be evaluated against an
//! explicit scope.

use std::collections::BTreeMap;

use minijinja::Environment;
use tracing::trace;

use super::PipelineError;

/// Cheap pre-check: the string contains `{{` followed by `}}`.
pub fn possibly_template(input: &str) -> bool {
    match input.find("{{") {
        Some(idx) => input[idx..].contains("}}"),
        None => false,
    }
}

/// The rendering contract every engine must satisfy.
pub trait TemplateEngine {
    /// Renders `template` against `data`.
    fn render(&self, template: &str, data: &serde_json::Value) -> Result<String, PipelineError>;

    /// Renders, falling back to the input verbatim on any failure.
    fn render_lenient(&self, template: &str, data: &serde_json::Value) -> String {
        if !possibly_template(template) {
            return template.to_string();
        }
        match self.render(template, data) {
            Ok(rendered) => rendered,
            Err(_) => template.to_string(),
        }
    }

    /// Structure-preserving lenient render over a slice.
    fn render_slice_lenient(&self, templates: &[String], data: &serde_json::Value) -> Vec<String> {
        templates
            .iter()
            .map(|t| self.render_lenient(t, data))
            .collect()
    }

    /// Structure-preserving lenient render over map values.
    fn render_map_lenient(
        &self,
        map: &BTreeMap<String, String>,
        data: &serde_json::Value,
    ) -> BTreeMap<String, String> {
        map.iter()
            .map(|(k, v)| (k.clone(), self.render_lenient(v, data)))
            .collect()
    }

    /// Renders and parses the result as a boolean. Accepts
    /// `true`/`false` case-insensitively and `1`/`0`.
    fn eval_bool(&self, template: &str, data: &serde_json::Value) -> Result<bool, PipelineError> {
        let rendered = self.render(template, data)?;
        match rendered.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err(PipelineError::NotABool { rendered }),
        }
    }
}

/// The default minijinja-backed engine.
pub struct Jinja {
    env: Environment<'static>,
}

impl Default for Jinja {
    fn default() -> Self {
        let mut env = Environment::new();
        env.add_function(
            "tpl",
            |state: &minijinja::State,
             template: String,
             scope: minijinja::value::Value|
             -> Result<String, minijinja::Error> {
                state.env().render_str(&template, scope)
            },
        );
        Jinja { env }
    }
}

impl Jinja {
    /// A fresh engine with the `tpl` function installed.
    pub fn new() -> Self {
        Self::default()
    }
}

impl TemplateEngine for Jinja {
    fn render(&self, template: &str, data: &serde_json::Value) -> Result<String, PipelineError> {
        let rendered = self.env.render_str(template, data)?;
        trace!(template, "rendered template");
        Ok(rendered)
    }
}
