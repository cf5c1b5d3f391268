//! Error types for the logger system

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// A configuration value outside its enumerated set
    #[error("Invalid {variable} \"{value}\". Must be one of: {expected}")]
    InvalidConfigValue {
        variable: String,
        value: String,
        expected: String,
    },

    /// Strict context accessor used outside any context scope
    #[error("require_context called outside of with_context")]
    NoContext,

    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Channel send error
    #[error("Failed to send log record to async worker")]
    ChannelSendError,

    /// Writer error (generic)
    #[error("Writer error: {0}")]
    WriterError(String),
}

impl LoggerError {
    /// Create an invalid configuration value error
    ///
    /// `expected` lists the accepted values in the order they should be shown.
    pub fn invalid_config_value(
        variable: impl Into<String>,
        value: impl Into<String>,
        expected: &[&str],
    ) -> Self {
        LoggerError::InvalidConfigValue {
            variable: variable.into(),
            value: value.into(),
            expected: expected.join(", "),
        }
    }

    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a writer error (generic)
    pub fn writer<S: Into<String>>(msg: S) -> Self {
        LoggerError::WriterError(msg.into())
    }
}
