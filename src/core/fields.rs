//! Meta/debug field separation and error normalization

use super::field_value::{FieldValue, Fields};

/// Marker that turns a field into a meta field
pub const META_PREFIX: char = '$';

/// Key under which debug fields are nested in the emitted payload
pub const DEBUG_KEY: &str = "debug";

/// Fields split by the meta prefix
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeparatedFields {
    /// `$`-prefixed fields, keys kept verbatim
    pub meta: Fields,
    /// Every other field
    pub debug: Fields,
}

#[inline]
pub fn is_meta_key(key: &str) -> bool {
    key.starts_with(META_PREFIX)
}

/// Prefix `key` with the meta marker unless it already carries it
pub fn meta_key(key: &str) -> String {
    if is_meta_key(key) {
        key.to_string()
    } else {
        format!("{}{}", META_PREFIX, key)
    }
}

/// Separate fields into meta (`$`-prefixed) and debug (everything else).
///
/// ```
/// use rust_topic_logger::core::separate;
/// use rust_topic_logger::fields;
///
/// let separated = separate(fields! { "$requestId" => "abc", "userId" => 42 });
/// assert!(separated.meta.contains_key("$requestId"));
/// assert!(separated.debug.contains_key("userId"));
/// ```
pub fn separate(fields: Fields) -> SeparatedFields {
    let mut separated = SeparatedFields::default();
    for (key, value) in fields {
        if is_meta_key(&key) {
            separated.meta.insert(key, value);
        } else {
            separated.debug.insert(key, value);
        }
    }
    separated
}

/// Replace every error-like value with its plain mapping, recursing through
/// lists and maps. Everything else is returned unchanged.
pub fn normalize(value: FieldValue) -> FieldValue {
    match value {
        FieldValue::Error(err) => FieldValue::Map(err.to_fields()),
        FieldValue::List(items) => FieldValue::List(items.into_iter().map(normalize).collect()),
        FieldValue::Map(fields) => FieldValue::Map(normalize_fields(fields)),
        other => other,
    }
}

/// [`normalize`] applied to every value of a field map
pub fn normalize_fields(fields: Fields) -> Fields {
    fields
        .into_iter()
        .map(|(key, value)| (key, normalize(value)))
        .collect()
}

/// Build the emitted payload: all meta fields plus a `debug` map holding the
/// normalized debug fields, omitted entirely when there are none.
pub fn build_payload(fields: Fields) -> Fields {
    let SeparatedFields { mut meta, debug } = separate(fields);
    let debug = normalize_fields(debug);
    if !debug.is_empty() {
        meta.insert(DEBUG_KEY.to_string(), FieldValue::Map(debug));
    }
    meta
}
