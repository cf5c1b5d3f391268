//! Logging macros for ergonomic field construction and message formatting.
//!
//! These macros provide a convenient interface for logging with automatic
//! string formatting, similar to `println!` and `format!`. Fields go in an
//! optional `{ key => value }` block before the format string.
//!
//! # Examples
//!
//! ```
//! use rust_topic_logger::prelude::*;
//! use rust_topic_logger::{fields, info, warn};
//!
//! let store = MemoryStore::new();
//! let logger = Logger::new("server", store.sink_for("server"));
//!
//! // Basic logging
//! info!(logger, "Server started").unwrap();
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port).unwrap();
//!
//! // With fields
//! warn!(logger, { "$requestId" => "abc", "retries" => 3 }, "Retry {} of {}", 3, 5).unwrap();
//!
//! assert_eq!(store.len(), 3);
//! ```

/// Build a [`Fields`](crate::Fields) map from `key => value` pairs.
///
/// Values are converted with [`FieldValue::from`](crate::FieldValue).
///
/// # Examples
///
/// ```
/// use rust_topic_logger::{fields, FieldValue};
///
/// let fields = fields! {
///     "$requestId" => "abc",
///     "port" => 3000,
///     "tags" => vec!["a", "b"],
///     "nested" => fields! { "ok" => true },
/// };
/// assert_eq!(fields["port"], FieldValue::Int(3000));
/// assert!(fields! {}.is_empty());
/// ```
#[macro_export]
macro_rules! fields {
    () => {
        $crate::Fields::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut fields = $crate::Fields::new();
        $(
            fields.insert(::std::string::String::from($key), $crate::FieldValue::from($value));
        )+
        fields
    }};
}

/// Log a message with automatic formatting.
///
/// # Examples
///
/// ```
/// # use rust_topic_logger::prelude::*;
/// # let logger = Logger::new("app", Sink::discard());
/// use rust_topic_logger::log;
/// log!(logger, LogLevel::Info, "Simple message").unwrap();
/// log!(logger, LogLevel::Error, "Error code: {}", 500).unwrap();
/// log!(logger, LogLevel::Error, { "code" => 500 }, "Request failed").unwrap();
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, { $($key:expr => $value:expr),* $(,)? }, $($arg:tt)+) => {
        $logger.log($level, format!($($arg)+), $crate::fields!($($key => $value),*))
    };
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, format!($($arg)+), $crate::Fields::new())
    };
}

/// Log a trace-level message.
///
/// # Examples
///
/// ```
/// # use rust_topic_logger::prelude::*;
/// # let logger = Logger::new("app", Sink::discard());
/// use rust_topic_logger::trace;
/// trace!(logger, "Entering function: calculate()").unwrap();
/// trace!(logger, "Variable value: {}", 42).unwrap();
/// ```
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Trace, $($arg)+)
    };
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use rust_topic_logger::prelude::*;
/// # let logger = Logger::new("app", Sink::discard());
/// use rust_topic_logger::debug;
/// debug!(logger, "Debug information").unwrap();
/// debug!(logger, { "counter" => 10 }, "Counter value").unwrap();
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use rust_topic_logger::prelude::*;
/// # let logger = Logger::new("db", Sink::discard());
/// use rust_topic_logger::error;
/// let err = std::io::Error::new(std::io::ErrorKind::Other, "connection reset");
/// error!(logger, { "error" => FieldValue::error(&err) }, "Failed to connect to database")
///     .unwrap();
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level message.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, $($arg)+)
    };
}
