//! Selection state
//!
//! A [`SelectionState`] is built fresh from the session inputs each time a
//! pass runs, and handed to the selection engine by reference.

use indexmap::IndexMap;

/// Filter values, search text and display budget for one evaluation pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    /// Filter key to chosen value; "" means no constraint
    filters: IndexMap<String, String>,

    /// Raw search text as submitted
    search: String,

    /// Maximum number of records accepted by the pass
    budget: usize,
}

impl SelectionState {
    /// Create an unconstrained state with the given budget
    pub fn new(budget: usize) -> Self {
        Self {
            filters: IndexMap::new(),
            search: String::new(),
            budget,
        }
    }

    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    pub fn with_filters<K, V>(mut self, filters: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.filters
            .extend(filters.into_iter().map(|(key, value)| (key.into(), value.into())));
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_budget(mut self, budget: usize) -> Self {
        self.budget = budget;
        self
    }

    pub fn budget(&self) -> usize {
        self.budget
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Filter entries that actually constrain the selection
    pub fn active_filters(&self) -> impl Iterator<Item = (&str, &str)> {
        self.filters
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn has_active_filter(&self) -> bool {
        self.active_filters().next().is_some()
    }

    /// The search text when it is long enough to narrow results
    pub fn active_search(&self, min_len: usize) -> Option<&str> {
        let len = self.search.chars().count();
        (len > 0 && len >= min_len).then_some(self.search.as_str())
    }

    /// Whether a filter or an active search narrows the selection
    pub fn has_constraint(&self, min_search_len: usize) -> bool {
        self.has_active_filter() || self.active_search(min_search_len).is_some()
    }
}
