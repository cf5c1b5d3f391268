//! Core logger types and traits

pub mod appender;
pub mod backend;
pub mod context;
pub mod decorate;
pub mod error;
pub mod field_value;
pub mod fields;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod output_format;
pub mod record;
pub mod sink;
pub mod timestamp;
pub mod topics;

pub use appender::Appender;
pub use backend::{Backend, BackendBuilder, DEFAULT_SHUTDOWN_TIMEOUT};
pub use context::{
    current_context, enter_context, require_context, with_context, with_context_async, Context,
    ContextFutureExt, ContextGuard, ContextScope,
};
pub use decorate::{decorate, DefaultFields, Decorator};
pub use error::{LoggerError, Result};
pub use field_value::{fields_to_json, ErrorValue, FieldValue, Fields};
pub use fields::{build_payload, is_meta_key, meta_key, normalize, separate, SeparatedFields};
pub use log_entry::LogEntry;
pub use log_level::LogLevel;
pub use logger::Logger;
pub use metrics::BackendMetrics;
pub use output_format::{pretty_fields, OutputFormat};
pub use record::Record;
pub use sink::{Sink, SinkFactory};
pub use timestamp::TimestampFormat;
pub use topics::topics;
