//! Configuration: environment parsing and log system options

use crate::core::{
    Appender, Backend, DefaultFields, LogLevel, LoggerError, Result, SinkFactory,
};
use std::io::IsTerminal;
use std::sync::Arc;

/// Minimum level: one of `trace, debug, info, warn, error, fatal` (any case)
pub const ENV_LEVEL: &str = "TOPIC_LOG_LEVEL";
/// Pretty text output: `1, 0, true, false` (any case)
pub const ENV_PRETTY: &str = "TOPIC_LOG_PRETTY";
/// Show `$`-prefixed metadata in pretty output: `1, 0, true, false` (any case)
pub const ENV_SHOW_METADATA: &str = "TOPIC_LOG_SHOW_METADATA";

const BOOL_VALUES: [&str; 4] = ["1", "0", "true", "false"];

/// Settings read from the environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvConfig {
    pub level: LogLevel,
    pub pretty: bool,
    pub show_metadata: bool,
}

impl EnvConfig {
    /// Read settings from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(&env_lookup)
    }

    /// Read settings through `lookup`, e.g. a map in tests
    ///
    /// # Example
    ///
    /// ```
    /// use rust_topic_logger::config::EnvConfig;
    /// use rust_topic_logger::LogLevel;
    ///
    /// let config = EnvConfig::from_lookup(&|key: &str| match key {
    ///     "TOPIC_LOG_LEVEL" => Some("DEBUG".to_string()),
    ///     "TOPIC_LOG_PRETTY" => Some("0".to_string()),
    ///     _ => None,
    /// })
    /// .unwrap();
    ///
    /// assert_eq!(config.level, LogLevel::Debug);
    /// assert!(!config.pretty);
    /// ```
    pub fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            level: level_from(lookup)?,
            pretty: pretty_from(lookup)?,
            show_metadata: show_metadata_from(lookup)?,
        })
    }
}

pub(crate) fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Minimum level from [`ENV_LEVEL`]; `info` when unset or empty
pub fn level_from(lookup: &dyn Fn(&str) -> Option<String>) -> Result<LogLevel> {
    match lookup(ENV_LEVEL) {
        None => Ok(LogLevel::Info),
        Some(value) if value.is_empty() => Ok(LogLevel::Info),
        Some(value) => value
            .parse()
            .map_err(|_| LoggerError::invalid_config_value(ENV_LEVEL, value, &LogLevel::names())),
    }
}

/// Pretty flag from [`ENV_PRETTY`]; defaults to whether stdout is a terminal
pub fn pretty_from(lookup: &dyn Fn(&str) -> Option<String>) -> Result<bool> {
    match lookup(ENV_PRETTY) {
        None => Ok(std::io::stdout().is_terminal()),
        Some(value) => parse_bool(ENV_PRETTY, value),
    }
}

/// Metadata flag from [`ENV_SHOW_METADATA`]; `false` when unset
pub fn show_metadata_from(lookup: &dyn Fn(&str) -> Option<String>) -> Result<bool> {
    match lookup(ENV_SHOW_METADATA) {
        None => Ok(false),
        Some(value) => parse_bool(ENV_SHOW_METADATA, value),
    }
}

fn parse_bool(variable: &str, value: String) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        _ => Err(LoggerError::invalid_config_value(variable, value, &BOOL_VALUES)),
    }
}

/// Where decorated log lines go
#[derive(Default)]
pub enum Output {
    /// Console appender; pretty text or JSON lines depending on `pretty`
    #[default]
    Console,
    /// In-memory capture, read back with `LogSystem::test_entries`
    Memory,
    /// A backend over the given appenders
    Appenders(Vec<Box<dyn Appender>>),
    /// A backend built by the caller; level and pretty settings are ignored
    Backend(Arc<Backend>),
    /// Arbitrary per-category sinks
    Custom(SinkFactory),
}

/// Options for [`LogSystem::init`](crate::LogSystem::init)
///
/// Unset options fall back to the environment (see [`EnvConfig`]).
///
/// # Example
///
/// ```
/// use rust_topic_logger::config::Config;
/// use rust_topic_logger::{fields, LogLevel};
///
/// let config = Config::console()
///     .level(LogLevel::Debug)
///     .pretty(true)
///     .default_fields(fields! { "$service" => "my-api", "$version" => "1.0.0" });
/// ```
#[derive(Default)]
pub struct Config {
    pub(crate) output: Output,
    pub(crate) level: Option<LogLevel>,
    pub(crate) pretty: Option<bool>,
    pub(crate) show_metadata: Option<bool>,
    pub(crate) default_fields: Option<DefaultFields>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture logs in memory
    pub fn test() -> Self {
        Self::default().output(Output::Memory)
    }

    pub fn console() -> Self {
        Self::default().output(Output::Console)
    }

    /// Forward logs to a caller-built backend
    pub fn backend(backend: Arc<Backend>) -> Self {
        Self::default().output(Output::Backend(backend))
    }

    /// Route each category to the sink built by `factory`
    pub fn custom(factory: SinkFactory) -> Self {
        Self::default().output(Output::Custom(factory))
    }

    #[must_use = "builder methods return a new value"]
    pub fn output(mut self, output: Output) -> Self {
        self.output = output;
        self
    }

    /// Add an appender, switching the output to [`Output::Appenders`]
    #[must_use = "builder methods return a new value"]
    pub fn appender<A: Appender + 'static>(mut self, appender: A) -> Self {
        match &mut self.output {
            Output::Appenders(appenders) => appenders.push(Box::new(appender)),
            _ => self.output = Output::Appenders(vec![Box::new(appender)]),
        }
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = Some(level);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = Some(pretty);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn show_metadata(mut self, show_metadata: bool) -> Self {
        self.show_metadata = Some(show_metadata);
        self
    }

    /// Fields merged into every entry; a [`DefaultFields::Dynamic`] closure
    /// is called for every log line
    #[must_use = "builder methods return a new value"]
    pub fn default_fields(mut self, defaults: impl Into<DefaultFields>) -> Self {
        self.default_fields = Some(defaults.into());
        self
    }
}
