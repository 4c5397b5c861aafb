//! Structured metadata attached to entities and relationship evidence

use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

/// Ordered string-keyed map of metadata values.
///
/// The keys a provider writes are part of that provider's contract; the core
/// only merges maps.
pub type Metadata = BTreeMap<String, MetadataValue>;

/// A metadata value: one of a small closed set of kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    /// Boolean flag
    Bool(bool),
    /// Numeric value; NaN and infinities serialize as text
    Number(#[serde(serialize_with = "serialize_number")] f64),
    /// Free text
    Text(String),
    /// List of strings
    List(Vec<String>),
    /// Nested map
    Map(Metadata),
}

impl MetadataValue {
    /// Text content, if this is a `Text` value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetadataValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Boolean content, if this is a `Bool` value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            MetadataValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Numeric content, if this is a `Number` value
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetadataValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Nested map, if this is a `Map` value
    pub fn as_map(&self) -> Option<&Metadata> {
        match self {
            MetadataValue::Map(m) => Some(m),
            _ => None,
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        MetadataValue::Text(value.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        MetadataValue::Text(value)
    }
}

impl From<bool> for MetadataValue {
    fn from(value: bool) -> Self {
        MetadataValue::Bool(value)
    }
}

impl From<f64> for MetadataValue {
    /// Non-finite values have no JSON number form and are kept as text
    fn from(value: f64) -> Self {
        if value.is_finite() {
            MetadataValue::Number(value)
        } else {
            MetadataValue::Text(value.to_string())
        }
    }
}

impl From<i64> for MetadataValue {
    fn from(value: i64) -> Self {
        MetadataValue::Number(value as f64)
    }
}

impl From<Vec<String>> for MetadataValue {
    fn from(value: Vec<String>) -> Self {
        MetadataValue::List(value)
    }
}

impl From<Metadata> for MetadataValue {
    fn from(value: Metadata) -> Self {
        MetadataValue::Map(value)
    }
}

// serde_json writes non-finite floats as null, which no variant reads back
fn serialize_number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() {
        serializer.serialize_f64(*value)
    } else {
        serializer.collect_str(value)
    }
}

/// Merge `incoming` into `target`; incoming keys overwrite on conflict
pub fn merge_metadata(target: &mut Metadata, incoming: Metadata) {
    target.extend(incoming);
}
