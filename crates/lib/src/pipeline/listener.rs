//! Execution listeners.
//!
//! A [`Listener`] observes action dispatch and log output. Callbacks
//! are invoked synchronously from the executing thread, in dispatch
//! order.

use std::sync::{Arc, Mutex};

use super::PipelineError;

/// Observer of pipeline execution.
pub trait Listener {
    /// Called before an action runs.
    fn on_before(&self, action: &str) {
        let _ = action;
    }

    /// Called after an action ran; `error` carries the failure, if any.
    fn on_after(&self, action: &str, error: Option<&PipelineError>) {
        let _ = (action, error);
    }

    /// Called for every `log` operation.
    fn on_log(&self, message: &str) {
        let _ = message;
    }
}

/// A listener that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct Noop;

impl Listener for Noop {}

/// One observed event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// An action is about to run.
    Before(String),
    /// An action finished; `true` means it succeeded.
    After(String, bool),
    /// A log message was emitted.
    Log(String),
}

/// A listener that records every event, for tests and audits.
#[derive(Debug, Default, Clone)]
pub struct Recording {
    events: Arc<Mutex<Vec<Event>>>,
}

impl Recording {
    /// A fresh recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything observed so far.
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Only the log messages, in emission order.
    pub fn logs(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Log(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    fn record(&self, event: Event) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl Listener for Recording {
    fn on_before(&self, action: &str) {
        self.record(Event::Before(action.to_string()));
    }

    fn on_after(&self, action: &str, error: Option<&PipelineError>) {
        self.record(Event::After(action.to_string(), error.is_none()));
    }

    fn on_log(&self, message: &str) {
        self.record(Event::Log(message.to_string()));
    }
}
