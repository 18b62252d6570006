//! Declarative pipeline execution.
//!
//! A pipeline is a tree of [`ActionSpec`] nodes read from YAML. Each
//! node carries a flattened set of operations (set, import, template,
//! patch, exec, ...) plus named child steps ordered by their `order`
//! field. The [`Executor`] owns the [`ActionContext`] for a run,
//! driving service start-up, dispatch through the single `run_spec`
//! choke point (where [`Listener`] callbacks fire) and LIFO service
//! shutdown.
//!
//! ```
//! use strata::pipeline::{ActionSpec, Executor};
//! use strata::dom::Container;
//!
//! let spec: ActionSpec = serde_yaml::from_str(
//!     "set:\n  path: greeting\n  data: hello\n",
//! ).unwrap();
//! let mut executor = Executor::new(Container::new());
//! executor.run(&spec).unwrap();
//! ```

pub mod context;
mod errors;
mod executor;
pub mod listener;
pub mod ops;
pub mod registry;
pub mod spec;
pub mod template;
mod valorref;

pub use context::ActionContext;
pub use errors::PipelineError;
pub use executor::Executor;
pub use listener::{Event, Listener, Noop, Recording};
pub use registry::{ActionFactory, HtmlTranslator, Registry, Service};
pub use spec::{Action, ActionSpec, ErrorPropagation, OpSpec};
pub use template::{possibly_template, Jinja, TemplateEngine};
pub use valorref::ValOrRef;
