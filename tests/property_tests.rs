//! Property-based tests for rust_topic_logger using proptest

use proptest::prelude::*;
use rust_topic_logger::core::{build_payload, normalize, separate, topics};
use rust_topic_logger::fields;
use rust_topic_logger::prelude::*;

fn any_level() -> impl Strategy<Value = LogLevel> {
    prop_oneof![
        Just(LogLevel::Trace),
        Just(LogLevel::Debug),
        Just(LogLevel::Info),
        Just(LogLevel::Warn),
        Just(LogLevel::Error),
        Just(LogLevel::Fatal),
    ]
}

fn any_category() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z][a-z0-9_]{0,7}", 1..6).prop_map(|segments| segments.join("."))
}

fn any_key() -> impl Strategy<Value = String> {
    prop_oneof!["[a-zA-Z][a-zA-Z0-9_]{0,10}", "\\$[a-zA-Z][a-zA-Z0-9_]{0,10}"]
}

fn any_value() -> impl Strategy<Value = FieldValue> {
    let leaf = prop_oneof![
        Just(FieldValue::Null),
        any::<bool>().prop_map(FieldValue::Bool),
        any::<i64>().prop_map(FieldValue::Int),
        "[a-z ]{0,12}".prop_map(FieldValue::String),
        "[a-z ]{1,12}".prop_map(|message| FieldValue::from(ErrorValue::new(message))),
    ];
    leaf.prop_recursive(3, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(FieldValue::List),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..4).prop_map(FieldValue::Map),
        ]
    })
}

fn any_fields() -> impl Strategy<Value = Fields> {
    prop::collection::btree_map(any_key(), any_value(), 0..8)
}

fn contains_error(value: &FieldValue) -> bool {
    match value {
        FieldValue::Error(_) => true,
        FieldValue::List(items) => items.iter().any(contains_error),
        FieldValue::Map(fields) => fields.values().any(contains_error),
        _ => false,
    }
}

// ============================================================================
// Topic Tests
// ============================================================================

proptest! {
    /// One topic per segment, most specific first, each a prefix at a dot boundary
    #[test]
    fn test_topics_are_dot_prefixes(category in any_category()) {
        let result = topics(&category);

        prop_assert_eq!(result.len(), category.split('.').count());
        prop_assert_eq!(&result[0], &category);
        prop_assert!(!result.last().unwrap().contains('.'));

        for topic in &result {
            let prefix = format!("{}.", topic);
            prop_assert!(
                topic == &category || category.starts_with(&prefix),
                "{} is not a dot prefix of {}",
                topic,
                category
            );
        }
        for pair in result.windows(2) {
            prop_assert!(pair[0].len() > pair[1].len());
        }
    }
}

// ============================================================================
// Field Separation Tests
// ============================================================================

proptest! {
    /// Separation partitions keys by prefix without losing or inventing fields
    #[test]
    fn test_separate_partitions(fields in any_fields()) {
        let separated = separate(fields.clone());

        prop_assert_eq!(separated.meta.len() + separated.debug.len(), fields.len());
        prop_assert!(separated.meta.keys().all(|key| key.starts_with('$')));
        prop_assert!(separated.debug.keys().all(|key| !key.starts_with('$')));

        let mut rejoined = separated.meta;
        rejoined.extend(separated.debug);
        prop_assert_eq!(rejoined, fields);
    }

    /// Normalizing removes every error value and is idempotent
    #[test]
    fn test_normalize_idempotent(value in any_value()) {
        let once = normalize(value);
        prop_assert!(!contains_error(&once));
        prop_assert_eq!(normalize(once.clone()), once);
    }

    /// The payload keeps meta fields verbatim and omits an empty debug map
    #[test]
    fn test_payload_shape(fields in any_fields()) {
        let has_debug = fields.keys().any(|key| !key.starts_with('$'));
        let payload = build_payload(fields.clone());

        for (key, value) in fields.iter().filter(|(key, _)| key.starts_with('$')) {
            prop_assert_eq!(&payload[key], value);
        }
        prop_assert_eq!(payload.contains_key("debug"), has_debug);
        if let Some(debug) = payload.get("debug") {
            prop_assert!(!contains_error(debug));
        }
    }
}

// ============================================================================
// LogLevel Tests
// ============================================================================

proptest! {
    /// Level names parse back regardless of case
    #[test]
    fn test_log_level_str_roundtrip(level in any_level()) {
        prop_assert_eq!(level.as_str().parse::<LogLevel>().unwrap(), level);
        prop_assert_eq!(level.to_str().parse::<LogLevel>().unwrap(), level);
    }

    /// Test that LogLevel ordering is consistent
    #[test]
    fn test_log_level_ordering(level1 in any_level(), level2 in any_level()) {
        let cmp1 = level1.cmp(&level2);
        let cmp2 = (level1 as u8).cmp(&(level2 as u8));
        prop_assert_eq!(cmp1, cmp2);
    }

    /// Anything that is not a level name is rejected
    #[test]
    fn test_log_level_rejects_unknown(name in "[a-z]{1,10}") {
        let known = LogLevel::names().contains(&name.as_str());
        prop_assert_eq!(name.parse::<LogLevel>().is_ok(), known);
    }
}

// ============================================================================
// Façade Tests
// ============================================================================

proptest! {
    /// Messages reach the sink unchanged and in call order
    #[test]
    fn test_messages_forwarded_verbatim(messages in prop::collection::vec(".{0,40}", 1..10)) {
        let store = MemoryStore::new();
        let logger = Logger::new("prop", store.sink_for("prop"));

        for message in &messages {
            logger.info(message, fields! {}).unwrap();
        }

        let captured: Vec<String> = store
            .entries()
            .into_iter()
            .map(|entry| entry.message)
            .collect();
        prop_assert_eq!(captured, messages);
    }
}
