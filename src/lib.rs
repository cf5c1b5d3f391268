//! # Rust Topic Logger
//!
//! A structured logging facade with hierarchical topics and request context.
//!
//! ## Features
//!
//! - **Topics**: every entry carries its category and all ancestor prefixes
//!   (`api.users` → `["api.users", "api"]`) for subscription-style filtering
//! - **Meta/debug split**: `$`-prefixed fields stay at the top level, all
//!   others are grouped under `debug`
//! - **Request context**: scoped fields that follow sync calls and futures
//! - **Error normalization**: errors become `{name, message, stack}` maps
//! - **Test capture**: an in-memory store for asserting on log output
//!
//! ## Example
//!
//! ```
//! use rust_topic_logger::prelude::*;
//! use rust_topic_logger::{fields, info};
//!
//! let system: LogSystem<&str> = LogSystem::new();
//! system.init(Config::test()).unwrap();
//!
//! let logger = system.logger("api.users").unwrap();
//! system.with_context(fields! { "requestId" => "abc-123" }, || {
//!     info!(logger, { "userId" => 42 }, "Created user {}", "alice").unwrap();
//! });
//!
//! let entries = system.test_entries();
//! let entry = &entries[0];
//! assert_eq!(entry.message, "Created user alice");
//! assert_eq!(entry.fields["$requestId"], FieldValue::from("abc-123"));
//! ```

pub mod appenders;
pub mod config;
pub mod core;
pub mod macros;
pub mod system;

pub mod prelude {
    pub use crate::appenders::{ConsoleAppender, JsonAppender, MemoryStore};
    pub use crate::config::{Config, EnvConfig, Output};
    pub use crate::core::{
        Appender, Backend, BackendMetrics, ContextFutureExt, DefaultFields, ErrorValue,
        FieldValue, Fields, LogEntry, LogLevel, Logger, LoggerError, OutputFormat, Result, Sink,
        TimestampFormat,
    };
    pub use crate::system::LogSystem;
}

pub use appenders::{ConsoleAppender, JsonAppender, MemoryStore};
pub use config::{Config, EnvConfig, Output};
pub use core::{
    Appender, Backend, BackendMetrics, ContextFutureExt, DefaultFields, ErrorValue, FieldValue,
    Fields, LogEntry, LogLevel, Logger, LoggerError, OutputFormat, Result, Sink, SinkFactory,
    TimestampFormat,
};
pub use system::LogSystem;
