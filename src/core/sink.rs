//! Sinks: the terminal consumers of decorated log lines

use super::error::Result;
use super::field_value::Fields;
use super::log_level::LogLevel;
use std::fmt;
use std::sync::Arc;

type SinkFn = dyn Fn(LogLevel, &str, Fields) -> Result<()> + Send + Sync;

/// A function value receiving `(level, message, payload)`
///
/// Swapping the destination of a logger means supplying a different sink.
///
/// # Example
///
/// ```
/// use rust_topic_logger::core::Sink;
///
/// let sink = Sink::new(|level, message, payload| {
///     println!("{} {} {:?}", level, message, payload);
///     Ok(())
/// });
/// ```
#[derive(Clone)]
pub struct Sink(Arc<SinkFn>);

impl Sink {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(LogLevel, &str, Fields) -> Result<()> + Send + Sync + 'static,
    {
        Sink(Arc::new(f))
    }

    /// A sink that accepts and drops everything
    pub fn discard() -> Self {
        Sink::new(|_, _, _| Ok(()))
    }

    #[inline]
    pub fn emit(&self, level: LogLevel, message: &str, payload: Fields) -> Result<()> {
        (self.0)(level, message, payload)
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Sink(..)")
    }
}

/// Builds the sink for a category
pub type SinkFactory = Arc<dyn Fn(&str) -> Sink + Send + Sync>;
