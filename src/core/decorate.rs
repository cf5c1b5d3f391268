//! Field decoration: phase, defaults, context, category and topics

use super::context::current_context;
use super::field_value::{FieldValue, Fields};
use super::fields::meta_key;
use super::topics::topics;
use std::fmt;
use std::sync::Arc;

pub const PHASE_KEY: &str = "$phase";
pub const CATEGORY_KEY: &str = "$category";
pub const TOPICS_KEY: &str = "$topics";

/// `$phase` value inside a context scope
pub const PHASE_REQUEST: &str = "request";
/// `$phase` value outside any context scope
pub const PHASE_STATIC: &str = "static";

/// Fields merged into every log entry (e.g. `$service`, `$environment`)
#[derive(Clone)]
pub enum DefaultFields {
    Static(Fields),
    /// Evaluated afresh for every log call
    Dynamic(Arc<dyn Fn() -> Fields + Send + Sync>),
}

impl DefaultFields {
    pub fn dynamic<F>(f: F) -> Self
    where
        F: Fn() -> Fields + Send + Sync + 'static,
    {
        DefaultFields::Dynamic(Arc::new(f))
    }

    pub fn resolve(&self) -> Fields {
        match self {
            DefaultFields::Static(fields) => fields.clone(),
            DefaultFields::Dynamic(f) => f(),
        }
    }
}

impl fmt::Debug for DefaultFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultFields::Static(fields) => f.debug_tuple("Static").field(fields).finish(),
            DefaultFields::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

impl From<Fields> for DefaultFields {
    fn from(fields: Fields) -> Self {
        DefaultFields::Static(fields)
    }
}

/// Decorate `fields` for a log line in `category`.
///
/// Later sources win on key collision:
/// `$phase` < defaults < context (`$`-prefixed) < `$category`/`$topics` <
/// caller fields.
pub fn decorate(category: &str, fields: Fields, defaults: Option<&DefaultFields>) -> Fields {
    let context = current_context();
    let phase = if context.is_some() {
        PHASE_REQUEST
    } else {
        PHASE_STATIC
    };

    let mut decorated = Fields::new();
    decorated.insert(PHASE_KEY.to_string(), FieldValue::from(phase));

    if let Some(defaults) = defaults {
        decorated.extend(defaults.resolve());
    }

    if let Some(context) = context {
        for (key, value) in context.iter() {
            decorated.insert(meta_key(key), value.clone());
        }
    }

    decorated.insert(CATEGORY_KEY.to_string(), FieldValue::from(category));
    decorated.insert(TOPICS_KEY.to_string(), FieldValue::from(topics(category)));

    decorated.extend(fields);
    decorated
}

/// Decoration settings shared by every logger of a log system
#[derive(Debug, Clone, Default)]
pub struct Decorator {
    defaults: Option<DefaultFields>,
}

impl Decorator {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_defaults(mut self, defaults: impl Into<DefaultFields>) -> Self {
        self.defaults = Some(defaults.into());
        self
    }

    pub fn defaults(&self) -> Option<&DefaultFields> {
        self.defaults.as_ref()
    }

    pub fn decorate(&self, category: &str, fields: Fields) -> Fields {
        decorate(category, fields, self.defaults.as_ref())
    }
}
