//! Record handed by the backend to its appenders

use super::field_value::Fields;
use super::log_level::LogLevel;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cell::RefCell;

// Thread-local caches for thread information to avoid repeated allocations
thread_local! {
    static THREAD_ID_CACHE: RefCell<Option<String>> = const { RefCell::new(None) };
    static THREAD_NAME_CACHE: RefCell<Option<Option<String>>> = const { RefCell::new(None) };
}

fn current_thread_id() -> String {
    THREAD_ID_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| format!("{:?}", std::thread::current().id()))
            .clone()
    })
}

fn current_thread_name() -> Option<String> {
    THREAD_NAME_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| std::thread::current().name().map(String::from))
            .clone()
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct Record {
    pub level: LogLevel,
    pub category: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub thread_id: String,
    pub thread_name: Option<String>,
    /// Decorated payload: meta fields plus an optional `debug` map
    pub fields: Fields,
}

impl Record {
    /// Replaces newlines, carriage returns, and tabs with escape sequences
    /// so a message cannot forge extra log lines.
    fn sanitize_message(message: &str) -> String {
        message
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    pub fn new(
        level: LogLevel,
        category: impl Into<String>,
        message: &str,
        fields: Fields,
    ) -> Self {
        Self {
            level,
            category: category.into(),
            message: Self::sanitize_message(message),
            timestamp: Utc::now(),
            thread_id: current_thread_id(),
            thread_name: current_thread_name(),
            fields,
        }
    }

    /// Thread name when set, otherwise its id
    pub fn thread_label(&self) -> &str {
        self.thread_name.as_deref().unwrap_or(&self.thread_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_sanitized() {
        let record = Record::new(
            LogLevel::Info,
            "api",
            "User login\nERROR fake entry\r\tend",
            Fields::new(),
        );
        assert_eq!(record.message, "User login\\nERROR fake entry\\r\\tend");
    }

    #[test]
    fn test_thread_info_cached() {
        let first = Record::new(LogLevel::Info, "api", "a", Fields::new());
        let second = Record::new(LogLevel::Info, "api", "b", Fields::new());
        assert_eq!(first.thread_id, second.thread_id);
        assert!(!first.thread_label().is_empty());
    }
}
