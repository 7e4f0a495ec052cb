//! Facility records

use ahash::AHashMap;
use serde_json::{Map, Value};

use crate::geo::GeoPoint;

/// One regulated facility, as loaded from the dataset
///
/// Attribute values are stringified once at load time. `null` and missing
/// properties are not stored, so [`Record::attribute`] returns `None` for
/// them and callers decide how an absent value behaves.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    point: GeoPoint,
    attributes: AHashMap<String, String>,
}

impl Record {
    /// Create a record with no attributes
    pub fn new(point: GeoPoint) -> Self {
        Self {
            point,
            attributes: AHashMap::new(),
        }
    }

    /// Create a record from a GeoJSON properties object
    pub fn from_properties(point: GeoPoint, properties: &Map<String, Value>) -> Self {
        let attributes = properties
            .iter()
            .filter_map(|(key, value)| stringify(value).map(|text| (key.clone(), text)))
            .collect();

        Self { point, attributes }
    }

    /// Builder-style attribute setter
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn point(&self) -> &GeoPoint {
        &self.point
    }

    /// The stringified attribute, `None` when absent or null
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// The stringified attribute, absent values read as ""
    pub fn attribute_or_empty(&self, key: &str) -> &str {
        self.attribute(key).unwrap_or("")
    }

    /// The attribute when present and not blank
    pub fn non_empty_attribute(&self, key: &str) -> Option<&str> {
        self.attribute(key).filter(|value| !value.trim().is_empty())
    }

    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }
}

fn stringify(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        other => Some(other.to_string()),
    }
}
