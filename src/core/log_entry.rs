//! Captured log entry

use super::field_value::Fields;
use super::log_level::LogLevel;
use serde::Serialize;

/// One log call as seen by an in-memory capture store
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub category: String,
    pub message: String,
    /// Payload as delivered to the sink
    pub fields: Fields,
}

impl LogEntry {
    pub fn new(
        level: LogLevel,
        category: impl Into<String>,
        message: impl Into<String>,
        fields: Fields,
    ) -> Self {
        Self {
            level,
            category: category.into(),
            message: message.into(),
            fields,
        }
    }
}
