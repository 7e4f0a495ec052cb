//! Filter catalog
//!
//! Distinct values per filterable attribute, computed once from the full
//! record collection so the options never shrink as filters are applied.

use ahash::AHashSet;
use indexmap::IndexMap;
use icpe_core::{FilterField, Record};

/// One filterable attribute and its selectable values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterDefinition {
    pub key: String,
    pub label: String,
    /// Sorted distinct values, always starting with "" (no filter)
    pub options: Vec<String>,
}

impl FilterDefinition {
    /// Whether `value` is one of the options
    pub fn has_option(&self, value: &str) -> bool {
        self.options
            .binary_search_by(|option| option.as_str().cmp(value))
            .is_ok()
    }
}

/// Filter definitions in display order
#[derive(Debug, Clone, Default)]
pub struct FilterCatalog {
    definitions: IndexMap<String, FilterDefinition>,
}

impl FilterCatalog {
    /// Collect the distinct values of each field across all records
    pub fn build(records: &[Record], fields: &[FilterField]) -> Self {
        let definitions = fields
            .iter()
            .map(|field| {
                let definition = FilterDefinition {
                    key: field.key.clone(),
                    label: field.label.clone(),
                    options: distinct_sorted(records, &field.key),
                };
                (field.key.clone(), definition)
            })
            .collect::<IndexMap<_, _>>();

        tracing::debug!(
            "Built filter catalog: {}",
            definitions
                .values()
                .map(|d| format!("{}={}", d.key, d.options.len()))
                .collect::<Vec<_>>()
                .join(", ")
        );

        Self { definitions }
    }

    pub fn get(&self, key: &str) -> Option<&FilterDefinition> {
        self.definitions.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FilterDefinition> {
        self.definitions.values()
    }

    /// Whether `value` is a known option of the filter `key`
    pub fn contains(&self, key: &str, value: &str) -> bool {
        self.get(key).is_some_and(|definition| definition.has_option(value))
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

fn distinct_sorted(records: &[Record], key: &str) -> Vec<String> {
    let distinct: AHashSet<&str> = records
        .iter()
        .map(|record| record.attribute_or_empty(key))
        .collect();

    let mut options: Vec<String> = distinct.into_iter().map(str::to_string).collect();
    options.sort();

    if options.first().map(String::as_str) != Some("") {
        options.insert(0, String::new());
    }
    options
}
