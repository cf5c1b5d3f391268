//! Production backend: level filtering and dispatch to appenders

use super::{
    appender::Appender,
    error::{LoggerError, Result},
    field_value::Fields,
    log_level::LogLevel,
    metrics::BackendMetrics,
    record::Record,
    sink::Sink,
};
use crossbeam_channel::{bounded, Sender, TrySendError};
use parking_lot::RwLock;
use std::any::Any;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Time the backend waits for its async worker to drain when dropped
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

type Appenders = Arc<RwLock<Vec<Box<dyn Appender>>>>;

/// Level-filtered dispatcher to a list of appenders
///
/// In synchronous mode appender failures are returned to the caller. In async
/// mode records are queued to a worker thread that reports failures on stderr
/// and counts them as dropped.
pub struct Backend {
    min_level: RwLock<LogLevel>,
    appenders: Appenders,
    sender: Option<Sender<Record>>,
    worker: Option<thread::JoinHandle<()>>,
    metrics: Arc<BackendMetrics>,
}

impl Backend {
    #[must_use]
    pub fn new() -> Self {
        Self {
            min_level: RwLock::new(LogLevel::Info),
            appenders: Arc::new(RwLock::new(Vec::new())),
            sender: None,
            worker: None,
            metrics: Arc::new(BackendMetrics::new()),
        }
    }

    /// Create a backend that writes from a worker thread fed by a bounded queue
    #[must_use]
    pub fn with_async(buffer_size: usize) -> Self {
        let (sender, receiver) = bounded::<Record>(buffer_size);
        let appenders: Appenders = Arc::new(RwLock::new(Vec::new()));
        let appenders_clone = Arc::clone(&appenders);
        let metrics = Arc::new(BackendMetrics::new());
        let metrics_clone = Arc::clone(&metrics);

        let handle = thread::spawn(move || {
            const BATCH_SIZE: usize = 50;

            let mut batch = Vec::with_capacity(BATCH_SIZE);

            // Blocks for the first record, then drains whatever is queued
            while let Ok(record) = receiver.recv() {
                batch.push(record);
                while batch.len() < BATCH_SIZE {
                    match receiver.try_recv() {
                        Ok(record) => batch.push(record),
                        Err(_) => break,
                    }
                }

                Self::process_batch(&appenders_clone, &batch, &metrics_clone);
                batch.clear();
            }
        });

        Self {
            min_level: RwLock::new(LogLevel::Info),
            appenders,
            sender: Some(sender),
            worker: Some(handle),
            metrics,
        }
    }

    #[must_use]
    pub fn builder() -> BackendBuilder {
        BackendBuilder::new()
    }

    fn panic_message(panic_info: &(dyn Any + Send)) -> String {
        if let Some(s) = panic_info.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        }
    }

    /// Hand one record to every appender.
    ///
    /// Each appender is isolated with `catch_unwind` so one failing appender
    /// does not starve the others. Returns the first failure.
    fn dispatch(appenders: &mut [Box<dyn Appender>], record: &Record) -> Result<()> {
        let mut first_error = None;

        for (idx, appender) in appenders.iter_mut().enumerate() {
            let append_result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                appender.append(record)
            }));

            let error = match append_result {
                Ok(Ok(())) => continue,
                Ok(Err(e)) => e,
                Err(panic_info) => LoggerError::writer(format!(
                    "appender #{} ({}) panicked: {}",
                    idx,
                    appender.name(),
                    Self::panic_message(panic_info.as_ref())
                )),
            };

            if first_error.is_none() {
                first_error = Some(error);
            }
        }

        match first_error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn process_batch(appenders: &Appenders, batch: &[Record], metrics: &BackendMetrics) {
        let mut appenders_guard = appenders.write();

        for record in batch {
            match Self::dispatch(&mut appenders_guard, record) {
                Ok(()) => {
                    metrics.record_logged();
                }
                Err(e) => {
                    eprintln!("[LOGGER ERROR] {}", e);
                    metrics.record_dropped();
                }
            }
        }

        for (idx, appender) in appenders_guard.iter_mut().enumerate() {
            if let Err(e) = appender.flush() {
                eprintln!("[LOGGER ERROR] Appender #{} flush failed: {}", idx, e);
            }
        }
    }

    pub fn add_appender(&self, appender: Box<dyn Appender>) {
        self.appenders.write().push(appender);
    }

    pub fn set_min_level(&self, level: LogLevel) {
        *self.min_level.write() = level;
    }

    pub fn min_level(&self) -> LogLevel {
        *self.min_level.read()
    }

    #[inline]
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        level >= *self.min_level.read()
    }

    pub fn is_async(&self) -> bool {
        self.sender.is_some()
    }

    /// Write one decorated log line
    pub fn log(
        &self,
        level: LogLevel,
        category: &str,
        message: &str,
        fields: Fields,
    ) -> Result<()> {
        if !self.is_enabled(level) {
            self.metrics.record_filtered();
            return Ok(());
        }

        let record = Record::new(level, category, message, fields);

        let Some(sender) = &self.sender else {
            let mut appenders = self.appenders.write();
            let result = Self::dispatch(&mut appenders, &record);
            match &result {
                Ok(()) => self.metrics.record_logged(),
                Err(_) => self.metrics.record_dropped(),
            };
            return result;
        };

        match sender.try_send(record) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(record)) => {
                self.metrics.record_queue_full();
                sender
                    .send(record)
                    .map_err(|_| LoggerError::ChannelSendError)
            }
            Err(TrySendError::Disconnected(_)) => Err(LoggerError::ChannelSendError),
        }
    }

    /// Sink forwarding the lines of `category` to this backend
    pub fn sink_for(self: &Arc<Self>, category: &str) -> Sink {
        let backend = Arc::clone(self);
        let category = category.to_string();
        Sink::new(move |level, message, payload| backend.log(level, &category, message, payload))
    }

    pub fn metrics(&self) -> &BackendMetrics {
        &self.metrics
    }

    pub fn flush(&self) -> Result<()> {
        let mut appenders = self.appenders.write();
        for appender in appenders.iter_mut() {
            appender.flush()?;
        }
        Ok(())
    }
}

impl Default for Backend {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Backend {
    fn drop(&mut self) {
        // Closing the channel lets the worker drain and exit
        drop(self.sender.take());

        if let Some(handle) = self.worker.take() {
            let start = std::time::Instant::now();

            loop {
                if handle.is_finished() {
                    if let Err(e) = handle.join() {
                        eprintln!(
                            "[LOGGER ERROR] Async worker thread panicked during shutdown: {:?}",
                            e
                        );
                    }
                    break;
                }

                if start.elapsed() >= DEFAULT_SHUTDOWN_TIMEOUT {
                    eprintln!(
                        "[LOGGER WARNING] Async worker thread did not finish within {:?} timeout. \
                         Some logs may be lost.",
                        DEFAULT_SHUTDOWN_TIMEOUT
                    );
                    break;
                }

                thread::sleep(Duration::from_millis(10));
            }
        }

        if let Err(e) = self.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush during shutdown: {}", e);
        }
    }
}

/// Builder for [`Backend`]
///
/// # Example
/// ```
/// use rust_topic_logger::prelude::*;
///
/// let backend = Backend::builder()
///     .min_level(LogLevel::Debug)
///     .appender(ConsoleAppender::new())
///     .async_mode(1000)
///     .build();
/// ```
pub struct BackendBuilder {
    min_level: LogLevel,
    appenders: Vec<Box<dyn Appender>>,
    async_buffer: Option<usize>,
}

impl BackendBuilder {
    pub fn new() -> Self {
        Self {
            min_level: LogLevel::Info,
            appenders: Vec::new(),
            async_buffer: None,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn appender<A: Appender + 'static>(mut self, appender: A) -> Self {
        self.appenders.push(Box::new(appender));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn boxed_appenders(mut self, appenders: Vec<Box<dyn Appender>>) -> Self {
        self.appenders.extend(appenders);
        self
    }

    /// Enable async mode with the given queue capacity
    #[must_use = "builder methods return a new value"]
    pub fn async_mode(mut self, buffer_size: usize) -> Self {
        self.async_buffer = Some(buffer_size);
        self
    }

    pub fn build(self) -> Backend {
        let backend = match self.async_buffer {
            Some(size) => Backend::with_async(size),
            None => Backend::new(),
        };

        backend.set_min_level(self.min_level);
        for appender in self.appenders {
            backend.add_appender(appender);
        }

        backend
    }
}

impl Default for BackendBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields;
    use parking_lot::Mutex;

    struct CollectingAppender {
        records: Arc<Mutex<Vec<Record>>>,
    }

    impl Appender for CollectingAppender {
        fn append(&mut self, record: &Record) -> Result<()> {
            self.records.lock().push(record.clone());
            Ok(())
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "collecting"
        }
    }

    struct FailingAppender;

    impl Appender for FailingAppender {
        fn append(&mut self, _record: &Record) -> Result<()> {
            Err(LoggerError::writer("disk full"))
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    struct PanickingAppender;

    impl Appender for PanickingAppender {
        fn append(&mut self, _record: &Record) -> Result<()> {
            panic!("appender exploded")
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "panicking"
        }
    }

    fn collecting() -> (CollectingAppender, Arc<Mutex<Vec<Record>>>) {
        let records = Arc::new(Mutex::new(Vec::new()));
        (
            CollectingAppender {
                records: Arc::clone(&records),
            },
            records,
        )
    }

    #[test]
    fn test_sync_dispatch() {
        let (appender, records) = collecting();
        let backend = Backend::builder().appender(appender).build();

        backend
            .log(LogLevel::Info, "api", "Hello", fields! { "$category" => "api" })
            .unwrap();

        let records = records.lock();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].category, "api");
        assert_eq!(records[0].message, "Hello");
        assert_eq!(backend.metrics().total_logged(), 1);
    }

    #[test]
    fn test_level_filtering() {
        let (appender, records) = collecting();
        let backend = Backend::builder()
            .min_level(LogLevel::Warn)
            .appender(appender)
            .build();

        backend.log(LogLevel::Info, "api", "skipped", Fields::new()).unwrap();
        backend.log(LogLevel::Error, "api", "kept", Fields::new()).unwrap();

        assert_eq!(records.lock().len(), 1);
        assert_eq!(backend.metrics().filtered_count(), 1);
    }

    #[test]
    fn test_sync_failure_propagates_and_others_still_write() {
        let (appender, records) = collecting();
        let backend = Backend::builder()
            .appender(FailingAppender)
            .appender(appender)
            .build();

        let result = backend.log(LogLevel::Info, "api", "Hello", Fields::new());

        assert!(matches!(result, Err(LoggerError::WriterError(_))));
        assert_eq!(records.lock().len(), 1);
        assert_eq!(backend.metrics().dropped_count(), 1);
    }

    #[test]
    fn test_panicking_appender_isolated() {
        let (appender, records) = collecting();
        let backend = Backend::builder()
            .appender(PanickingAppender)
            .appender(appender)
            .build();

        let result = backend.log(LogLevel::Info, "api", "Hello", Fields::new());

        match result {
            Err(LoggerError::WriterError(message)) => {
                assert!(message.contains("appender exploded"))
            }
            other => panic!("expected writer error, got {:?}", other),
        }
        assert_eq!(records.lock().len(), 1);
    }

    #[test]
    fn test_async_drains_on_drop_in_order() {
        let (appender, records) = collecting();
        let backend = Backend::builder().appender(appender).async_mode(4).build();
        assert!(backend.is_async());

        for i in 0..20 {
            backend
                .log(LogLevel::Info, "api", &format!("Message {}", i), Fields::new())
                .unwrap();
        }
        drop(backend);

        let records = records.lock();
        assert_eq!(records.len(), 20);
        for (i, record) in records.iter().enumerate() {
            assert_eq!(record.message, format!("Message {}", i));
        }
    }

    #[test]
    fn test_sink_for_binds_category() {
        let (appender, records) = collecting();
        let backend = Arc::new(Backend::builder().appender(appender).build());

        let sink = backend.sink_for("db");
        sink.emit(LogLevel::Warn, "slow query", Fields::new()).unwrap();

        assert_eq!(records.lock()[0].category, "db");
        assert_eq!(records.lock()[0].level, LogLevel::Warn);
    }
}
