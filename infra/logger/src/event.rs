use quill_errors::{Fields, QuillError};
use serde_json::Value;
use std::fmt;

/// The logging interface handed to library components at construction.
///
/// Every method returns unit: a failing sink must never turn into a failure of the
/// operation being logged.
pub trait EventLog: Send + Sync + fmt::Debug {
    /// `error` carries the taxonomy record when the failure has one.
    fn error(&self, message: &str, error: Option<&QuillError>, fields: &Fields);
    fn warn(&self, message: &str, fields: &Fields);
    fn info(&self, message: &str, fields: &Fields);
    fn debug(&self, message: &str, fields: &Fields);
}

/// Forwards events to the global `tracing` dispatcher.
#[derive(Debug, Clone, Copy)]
pub struct TracingLog {
    component: &'static str,
}

impl TracingLog {
    /// `component` ends up as a field on every event, e.g. `vault` or `resilience`.
    #[must_use]
    pub const fn new(component: &'static str) -> Self {
        Self { component }
    }
}

impl Default for TracingLog {
    fn default() -> Self {
        Self::new("quill")
    }
}

fn render(fields: &Fields) -> Option<String> {
    (!fields.is_empty()).then(|| Value::Object(fields.clone()).to_string())
}

impl EventLog for TracingLog {
    fn error(&self, message: &str, error: Option<&QuillError>, fields: &Fields) {
        let record = error.map(|err| Value::Object(err.to_log_record()).to_string());
        tracing::error!(
            component = self.component,
            fields = render(fields),
            error = record,
            "{message}"
        );
    }

    fn warn(&self, message: &str, fields: &Fields) {
        tracing::warn!(component = self.component, fields = render(fields), "{message}");
    }

    fn info(&self, message: &str, fields: &Fields) {
        tracing::info!(component = self.component, fields = render(fields), "{message}");
    }

    fn debug(&self, message: &str, fields: &Fields) {
        tracing::debug!(component = self.component, fields = render(fields), "{message}");
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLog;

impl EventLog for NullLog {
    fn error(&self, _: &str, _: Option<&QuillError>, _: &Fields) {}
    fn warn(&self, _: &str, _: &Fields) {}
    fn info(&self, _: &str, _: &Fields) {}
    fn debug(&self, _: &str, _: &Fields) {}
}
