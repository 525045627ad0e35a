use crate::event::EventLog;
use quill_errors::{Fields, QuillError};
use std::sync::{Mutex, PoisonError};
use tracing::Level;

/// One captured event.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub level: Level,
    pub message: String,
    pub fields: Fields,
    /// The taxonomy record of an `error` event, if one was attached.
    pub error: Option<Fields>,
}

/// Captures events in memory so tests can assert on what a component logged.
#[derive(Debug, Default)]
pub struct MemoryLog {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemoryLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A snapshot of everything logged so far, oldest first.
    #[must_use]
    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock().clone()
    }

    #[must_use]
    pub fn at_level(&self, level: Level) -> Vec<LogEntry> {
        self.lock().iter().filter(|entry| entry.level == level).cloned().collect()
    }

    #[must_use]
    pub fn count(&self, level: Level) -> usize {
        self.lock().iter().filter(|entry| entry.level == level).count()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<LogEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn push(&self, level: Level, message: &str, fields: &Fields, error: Option<Fields>) {
        self.lock().push(LogEntry {
            level,
            message: message.to_owned(),
            fields: fields.clone(),
            error,
        });
    }
}

impl EventLog for MemoryLog {
    fn error(&self, message: &str, error: Option<&QuillError>, fields: &Fields) {
        self.push(Level::ERROR, message, fields, error.map(QuillError::to_log_record));
    }

    fn warn(&self, message: &str, fields: &Fields) {
        self.push(Level::WARN, message, fields, None);
    }

    fn info(&self, message: &str, fields: &Fields) {
        self.push(Level::INFO, message, fields, None);
    }

    fn debug(&self, message: &str, fields: &Fields) {
        self.push(Level::DEBUG, message, fields, None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_errors::ErrorCode;

    #[test]
    fn captures_entries_in_order() {
        let log = MemoryLog::new();
        log.info("first", &crate::fields! { "n" => 1 });
        log.warn("second", &Fields::new());
        log.error("third", Some(&QuillError::new(ErrorCode::SystemFile)), &Fields::new());

        let entries = log.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].message, "first");
        assert_eq!(entries[0].fields["n"], 1);
        assert_eq!(entries[1].level, Level::WARN);

        let record = entries[2].error.as_ref().expect("error record");
        assert_eq!(record["code"], 9001);

        assert_eq!(log.count(Level::WARN), 1);
        assert_eq!(log.at_level(Level::ERROR).len(), 1);
        log.clear();
        assert!(log.entries().is_empty());
    }
}
