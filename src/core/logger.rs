//! Category-bound logger façade

use super::{
    decorate::Decorator,
    error::Result,
    field_value::Fields,
    fields::build_payload,
    log_level::LogLevel,
    sink::Sink,
};
use std::sync::Arc;

/// A logger bound to one category and one sink
///
/// Every call separates meta from debug fields, normalizes errors in the debug
/// part and hands `(level, message, payload)` to the sink. Loggers obtained
/// from a [`LogSystem`](crate::LogSystem) also decorate fields with phase,
/// defaults, context, category and topics first.
///
/// # Example
///
/// ```
/// use rust_topic_logger::prelude::*;
/// use rust_topic_logger::fields;
///
/// let store = MemoryStore::new();
/// let logger = Logger::new("startup", store.sink_for("startup"));
///
/// logger.info("Hello", fields! { "port" => 3000 }).unwrap();
/// assert_eq!(store.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Logger {
    category: Arc<str>,
    sink: Sink,
    decorator: Option<Arc<Decorator>>,
}

impl Logger {
    /// Plain façade without decoration
    pub fn new(category: impl AsRef<str>, sink: Sink) -> Self {
        Self {
            category: Arc::from(category.as_ref()),
            sink,
            decorator: None,
        }
    }

    /// Façade that decorates every call before emitting it
    pub fn decorated(category: impl AsRef<str>, sink: Sink, decorator: Arc<Decorator>) -> Self {
        Self {
            category: Arc::from(category.as_ref()),
            sink,
            decorator: Some(decorator),
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn log(&self, level: LogLevel, message: impl AsRef<str>, fields: Fields) -> Result<()> {
        let fields = match &self.decorator {
            Some(decorator) => decorator.decorate(&self.category, fields),
            None => fields,
        };
        self.sink.emit(level, message.as_ref(), build_payload(fields))
    }

    #[inline]
    pub fn trace(&self, message: impl AsRef<str>, fields: Fields) -> Result<()> {
        self.log(LogLevel::Trace, message, fields)
    }

    #[inline]
    pub fn debug(&self, message: impl AsRef<str>, fields: Fields) -> Result<()> {
        self.log(LogLevel::Debug, message, fields)
    }

    #[inline]
    pub fn info(&self, message: impl AsRef<str>, fields: Fields) -> Result<()> {
        self.log(LogLevel::Info, message, fields)
    }

    #[inline]
    pub fn warn(&self, message: impl AsRef<str>, fields: Fields) -> Result<()> {
        self.log(LogLevel::Warn, message, fields)
    }

    #[inline]
    pub fn error(&self, message: impl AsRef<str>, fields: Fields) -> Result<()> {
        self.log(LogLevel::Error, message, fields)
    }

    #[inline]
    pub fn fatal(&self, message: impl AsRef<str>, fields: Fields) -> Result<()> {
        self.log(LogLevel::Fatal, message, fields)
    }
}
