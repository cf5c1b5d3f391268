//! Integration tests for the topic logger
//!
//! These tests verify:
//! - Test-mode capture and clearing
//! - Topics, phase and category decoration
//! - Request context propagation into entries
//! - Static and dynamic default fields
//! - Error normalization in debug fields
//! - Re-initialization semantics
//! - Backend output through file appenders
//! - Sink failure propagation

use rust_topic_logger::appenders::JsonAppender;
use rust_topic_logger::core::{enter_context, BackendMetrics};
use rust_topic_logger::prelude::*;
use rust_topic_logger::{fields, info, SinkFactory};
use std::fs;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

#[derive(Debug, Clone, Copy)]
enum Category {
    Startup,
    Users,
    Db,
}

impl AsRef<str> for Category {
    fn as_ref(&self) -> &str {
        match self {
            Category::Startup => "startup",
            Category::Users => "api.users",
            Category::Db => "storage.db.pool",
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("connection refused")]
struct ConnectionRefused;

#[derive(Debug, thiserror::Error)]
#[error("query failed")]
struct QueryFailed {
    #[source]
    source: ConnectionRefused,
}

fn test_system() -> LogSystem<Category> {
    let system = LogSystem::new();
    system.init(Config::test()).expect("test mode init");
    system
}

#[test]
fn test_static_entry_shape() {
    let system = test_system();
    let logger = system.logger(Category::Startup).unwrap();

    logger.info("Hello", fields! { "port" => 3000 }).unwrap();

    assert_eq!(
        system.test_entries(),
        vec![LogEntry::new(
            LogLevel::Info,
            "startup",
            "Hello",
            fields! {
                "$phase" => "static",
                "$category" => "startup",
                "$topics" => vec!["startup"],
                "debug" => fields! { "port" => 3000 },
            },
        )]
    );
}

#[test]
fn test_topics_most_specific_first() {
    let system = test_system();
    system
        .logger(Category::Db)
        .unwrap()
        .warn("Pool exhausted", Fields::new())
        .unwrap();

    let entries = system.test_entries();
    let entry = &entries[0];
    assert_eq!(
        entry.fields["$topics"],
        FieldValue::from(vec!["storage.db.pool", "storage.db", "storage"])
    );
    assert!(!entry.fields.contains_key("debug"));
}

#[test]
fn test_request_context_becomes_meta() {
    let system = test_system();
    let logger = system.logger(Category::Users).unwrap();

    system.with_context(fields! { "requestId" => "abc-123", "$tenant" => "acme" }, || {
        logger.info("Created user", fields! { "userId" => 42 }).unwrap();
    });
    logger.info("After request", Fields::new()).unwrap();

    let entries = system.test_entries();
    assert_eq!(
        entries[0].fields,
        fields! {
            "$phase" => "request",
            "$requestId" => "abc-123",
            "$tenant" => "acme",
            "$category" => "api.users",
            "$topics" => vec!["api.users", "api"],
            "debug" => fields! { "userId" => 42 },
        }
    );
    assert_eq!(entries[1].fields["$phase"], FieldValue::from("static"));
    assert!(!entries[1].fields.contains_key("$requestId"));
}

#[test]
fn test_nested_context_guard() {
    let system = test_system();
    let logger = system.logger(Category::Users).unwrap();

    let _outer = enter_context(fields! { "requestId" => "outer", "region" => "eu" });
    {
        let _inner = enter_context(fields! { "requestId" => "inner" });
        logger.info("inner", Fields::new()).unwrap();
    }
    logger.info("outer", Fields::new()).unwrap();

    let entries = system.test_entries();
    assert_eq!(entries[0].fields["$requestId"], FieldValue::from("inner"));
    assert_eq!(entries[0].fields["$region"], FieldValue::from("eu"));
    assert_eq!(entries[1].fields["$requestId"], FieldValue::from("outer"));
}

#[test]
fn test_caller_fields_override_decoration() {
    let system = test_system();
    let logger = system.logger(Category::Users).unwrap();

    logger
        .info("Override", fields! { "$category" => "custom", "$phase" => "boot" })
        .unwrap();

    let entries = system.test_entries();
    let fields = &entries[0].fields;
    assert_eq!(fields["$category"], FieldValue::from("custom"));
    assert_eq!(fields["$phase"], FieldValue::from("boot"));
    assert_eq!(fields["$topics"], FieldValue::from(vec!["api.users", "api"]));
}

#[test]
fn test_static_default_fields() {
    let system: LogSystem<Category> = LogSystem::new();
    system
        .init(Config::test().default_fields(fields! {
            "$service" => "my-api",
            "$version" => "1.0.0",
        }))
        .unwrap();

    system.with_context(fields! { "service" => "from-context" }, || {
        system
            .logger(Category::Startup)
            .unwrap()
            .info("Ready", Fields::new())
            .unwrap();
    });

    let entries = system.test_entries();
    let fields = &entries[0].fields;
    assert_eq!(fields["$service"], FieldValue::from("from-context"));
    assert_eq!(fields["$version"], FieldValue::from("1.0.0"));
}

#[test]
fn test_dynamic_default_fields_evaluated_per_call() {
    let counter = Arc::new(AtomicI64::new(0));
    let counter_clone = Arc::clone(&counter);

    let system: LogSystem<Category> = LogSystem::new();
    system
        .init(Config::test().default_fields(DefaultFields::dynamic(move || {
            fields! { "$seq" => counter_clone.fetch_add(1, Ordering::SeqCst) }
        })))
        .unwrap();

    let logger = system.logger(Category::Startup).unwrap();
    logger.info("first", Fields::new()).unwrap();
    logger.info("second", Fields::new()).unwrap();

    let seqs: Vec<FieldValue> = system
        .test_entries()
        .iter()
        .map(|entry| entry.fields["$seq"].clone())
        .collect();
    assert_eq!(seqs, vec![FieldValue::Int(0), FieldValue::Int(1)]);
    assert_eq!(counter.load(Ordering::SeqCst), 2);
}

#[test]
fn test_error_normalized_with_class_and_causes() {
    let system = test_system();
    let logger = system.logger(Category::Db).unwrap();
    let err = QueryFailed {
        source: ConnectionRefused,
    };

    logger
        .error(
            "Query failed",
            fields! {
                "error" => FieldValue::error(&err),
                "attempts" => vec![
                    FieldValue::from(ErrorValue::new("timeout")),
                    FieldValue::from(1),
                ],
            },
        )
        .unwrap();

    let entries = system.test_entries();
    let entry = &entries[0];
    let debug = entry.fields["debug"].as_map().unwrap();
    assert_eq!(
        debug["error"],
        FieldValue::Map(fields! {
            "name" => "QueryFailed",
            "message" => "query failed",
            "stack" => "QueryFailed: query failed\n    caused by: connection refused",
            "_class" => "QueryFailed",
        })
    );
    assert_eq!(
        debug["attempts"],
        FieldValue::List(vec![
            FieldValue::Map(fields! {
                "name" => "Error",
                "message" => "timeout",
                "stack" => "Error: timeout",
            }),
            FieldValue::Int(1),
        ])
    );
}

#[test]
fn test_boxed_error_is_base_error() {
    let system = test_system();
    let err: Box<dyn std::error::Error + Send + Sync> = Box::new(ConnectionRefused);

    system
        .logger(Category::Db)
        .unwrap()
        .error("failed", fields! { "error" => FieldValue::error(err.as_ref()) })
        .unwrap();

    let debug = system.test_entries()[0].fields["debug"].as_map().unwrap().clone();
    let error = debug["error"].as_map().unwrap();
    assert_eq!(error["name"], FieldValue::from("Error"));
    assert!(!error.contains_key("_class"));
}

#[test]
fn test_clear_test_entries() {
    let system = test_system();
    let logger = system.logger(Category::Startup).unwrap();

    for i in 0..5 {
        info!(logger, { "iteration" => i }, "Message {}", i).unwrap();
    }
    assert_eq!(system.test_entries().len(), 5);

    system.clear_test_entries();
    assert!(system.test_entries().is_empty());

    info!(logger, "after clear").unwrap();
    assert_eq!(system.test_entries().len(), 1);
}

#[test]
fn test_reinit_routes_only_new_loggers() {
    let system = test_system();
    let before = system.logger(Category::Startup).unwrap();
    let generation = system.generation();

    system.init(Config::test()).unwrap();
    assert_eq!(system.generation(), generation + 1);

    before.info("old", Fields::new()).unwrap();
    system
        .logger(Category::Startup)
        .unwrap()
        .info("new", Fields::new())
        .unwrap();

    let messages: Vec<String> = system
        .test_entries()
        .into_iter()
        .map(|entry| entry.message)
        .collect();
    assert_eq!(messages, vec!["new".to_string()]);
}

#[test]
fn test_json_appender_backend() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("app.jsonl");

    let system: LogSystem<Category> = LogSystem::new();
    system
        .init(
            Config::new()
                .level(LogLevel::Info)
                .appender(JsonAppender::new(&log_file).expect("Failed to create appender")),
        )
        .unwrap();

    let logger = system.logger(Category::Users).unwrap();
    logger.debug("filtered out", Fields::new()).unwrap();
    system.with_context(fields! { "requestId" => "r-1" }, || {
        logger
            .info("Created user\nFAKE line", fields! { "userId" => 42 })
            .unwrap();
    });
    drop(logger);
    // Dropping the system drops the backend, flushing the appender
    drop(system);

    let content = fs::read_to_string(&log_file).expect("Failed to read log file");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 1, "debug line should be filtered: {:?}", lines);

    let json: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(json["level"], "info");
    assert_eq!(json["message"], "Created user\\nFAKE line");
    assert_eq!(json["$requestId"], "r-1");
    assert_eq!(json["$topics"], serde_json::json!(["api.users", "api"]));
    assert_eq!(json["debug"]["userId"], 42);
}

#[test]
fn test_shared_backend_metrics() {
    let backend = Arc::new(
        Backend::builder()
            .min_level(LogLevel::Warn)
            .appender(ConsoleAppender::for_mode(false, false))
            .build(),
    );

    let system: LogSystem<Category> = LogSystem::new();
    system.init(Config::backend(Arc::clone(&backend))).unwrap();

    let logger = system.logger(Category::Startup).unwrap();
    logger.info("below threshold", Fields::new()).unwrap();
    logger.warn("logged", Fields::new()).unwrap();

    let metrics: &BackendMetrics = backend.metrics();
    assert_eq!(metrics.filtered_count(), 1);
    assert_eq!(metrics.total_logged(), 1);
}

#[test]
fn test_sink_failure_propagates_to_caller() {
    let factory: SinkFactory = Arc::new(|_category: &str| {
        Sink::new(|_, _, _| Err(LoggerError::writer("disk full")))
    });

    let system: LogSystem<Category> = LogSystem::new();
    system.init(Config::custom(factory)).unwrap();

    let result = system
        .logger(Category::Startup)
        .unwrap()
        .error("cannot write", Fields::new());
    assert!(matches!(result, Err(LoggerError::WriterError(_))));
}
