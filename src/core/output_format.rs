//! Output formats for backend records
//!
//! - Text: human-readable line, optionally hiding `$`-prefixed metadata
//! - Json: one JSON object per record, payload fields at the top level

use super::field_value::{FieldValue, Fields};
use super::fields::{is_meta_key, DEBUG_KEY};
use super::record::Record;
use super::timestamp::TimestampFormat;

/// Keys written by the formatters themselves. Debug fields with these names
/// stay nested under `debug` when the debug map is flattened.
pub const RESERVED_KEYS: [&str; 5] = ["level", "timestamp", "message", "category", "thread"];

/// Output format for records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    ///
    /// Example: `[2025-01-08T10:30:45.123Z] [INFO ] api.users - Created user id=42`
    #[default]
    Text,

    /// JSON format for machine processing
    ///
    /// Example:
    /// `{"timestamp":"2025-01-08T10:30:45.123Z","level":"info","message":"Created user",`
    /// `"$category":"api.users","debug":{"id":42}}`
    Json,
}

/// Strip `$`-prefixed fields and flatten `debug` into the top level, keeping
/// debug keys that clash with [`RESERVED_KEYS`] nested under `debug`.
///
/// ```
/// use rust_topic_logger::core::pretty_fields;
/// use rust_topic_logger::fields;
///
/// let pretty = pretty_fields(&fields! {
///     "$category" => "test",
///     "debug" => fields! { "port" => 3000, "message" => "user text" },
/// });
/// assert_eq!(pretty, fields! {
///     "port" => 3000,
///     "debug" => fields! { "message" => "user text" },
/// });
/// ```
pub fn pretty_fields(payload: &Fields) -> Fields {
    let mut filtered = Fields::new();
    let mut reserved = Fields::new();

    for (key, value) in payload {
        if is_meta_key(key) {
            continue;
        }
        match (key.as_str(), value) {
            (DEBUG_KEY, FieldValue::Map(debug)) => {
                for (debug_key, debug_value) in debug {
                    if RESERVED_KEYS.contains(&debug_key.as_str()) {
                        reserved.insert(debug_key.clone(), debug_value.clone());
                    } else {
                        filtered.insert(debug_key.clone(), debug_value.clone());
                    }
                }
            }
            _ => {
                filtered.insert(key.clone(), value.clone());
            }
        }
    }

    if !reserved.is_empty() {
        filtered.insert(DEBUG_KEY.to_string(), FieldValue::Map(reserved));
    }
    filtered
}

impl OutputFormat {
    /// Format a record according to this output format
    pub fn format(
        &self,
        record: &Record,
        timestamp_format: &TimestampFormat,
        show_metadata: bool,
    ) -> String {
        match self {
            OutputFormat::Text => {
                Self::format_text(record, timestamp_format, show_metadata, record.level.to_str())
            }
            OutputFormat::Json => Self::format_json(record, timestamp_format),
        }
    }

    /// Text line with a caller-rendered level label (e.g. colored)
    pub(crate) fn format_text(
        record: &Record,
        timestamp_format: &TimestampFormat,
        show_metadata: bool,
        level_label: &str,
    ) -> String {
        let base = format!(
            "[{}] [{:5}] {} - {}",
            timestamp_format.format(&record.timestamp),
            level_label,
            record.category,
            record.message
        );

        let shown = if show_metadata {
            record.fields.clone()
        } else {
            pretty_fields(&record.fields)
        };

        if shown.is_empty() {
            return base;
        }

        let rendered = shown
            .iter()
            .map(|(key, value)| format!("{}={}", key, Self::escape_value(value)))
            .collect::<Vec<_>>()
            .join(" ");
        format!("{} {}", base, rendered)
    }

    fn format_json(record: &Record, timestamp_format: &TimestampFormat) -> String {
        let mut json_obj = serde_json::Map::new();

        json_obj.insert(
            "timestamp".to_string(),
            timestamp_format.to_json_value(&record.timestamp),
        );
        json_obj.insert(
            "level".to_string(),
            serde_json::Value::String(record.level.as_str().to_string()),
        );
        json_obj.insert(
            "message".to_string(),
            serde_json::Value::String(record.message.clone()),
        );
        json_obj.insert(
            "thread".to_string(),
            serde_json::Value::String(record.thread_label().to_string()),
        );

        for (key, value) in &record.fields {
            json_obj.insert(key.clone(), value.to_json_value());
        }

        serde_json::Value::Object(json_obj).to_string()
    }

    /// Quote a value if it contains spaces, quotes, `=` or control characters.
    /// Line breaks and tabs are escaped so a record stays on one line.
    fn escape_value(value: &FieldValue) -> String {
        let rendered = value.to_string();
        if !rendered.contains([' ', '"', '=', '\n', '\r', '\t']) {
            return rendered;
        }

        let mut quoted = String::with_capacity(rendered.len() + 2);
        quoted.push('"');
        for ch in rendered.chars() {
            match ch {
                '\\' => quoted.push_str("\\\\"),
                '"' => quoted.push_str("\\\""),
                '\n' => quoted.push_str("\\n"),
                '\r' => quoted.push_str("\\r"),
                '\t' => quoted.push_str("\\t"),
                other => quoted.push(other),
            }
        }
        quoted.push('"');
        quoted
    }
}
