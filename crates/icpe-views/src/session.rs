//! Map session
//!
//! Holds the user's filter, search and budget inputs between interactions.
//! Every interaction builds a fresh [`SelectionState`] from those inputs and
//! renders a full pass.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use icpe_core::{SelectionState, Settings};
use icpe_data::{FilterCatalog, RecordStore};
use indexmap::IndexMap;
use parking_lot::Mutex;

use crate::coordinator::{RenderCoordinator, RenderSummary};
use crate::surface::MapSurface;

/// Loaded data plus the mutable selection inputs of one user session
pub struct MapSession<M: MapSurface> {
    store: RecordStore,
    catalog: FilterCatalog,
    settings: Settings,
    filters: IndexMap<String, String>,
    search: String,
    budget: usize,
    coordinator: RenderCoordinator<M>,
    last_summary: Option<RenderSummary>,
}

impl<M: MapSurface> MapSession<M> {
    /// Build the filter catalog and center the map; nothing is rendered yet
    pub fn new(store: RecordStore, settings: Settings, mut map: M) -> Self {
        let catalog = FilterCatalog::build(store.records(), &settings.fields.filters);
        map.set_view(settings.initial_center, settings.initial_zoom);

        Self {
            coordinator: RenderCoordinator::from_settings(map, &settings),
            budget: settings.default_budget,
            store,
            catalog,
            settings,
            filters: IndexMap::new(),
            search: String::new(),
            last_summary: None,
        }
    }

    /// The selection inputs as they stand now
    pub fn selection_state(&self) -> SelectionState {
        SelectionState::new(self.budget)
            .with_filters(self.filters.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .with_search(self.search.as_str())
    }

    /// A filter option was picked; unknown keys or values are ignored
    ///
    /// The value is looked up as offered by the catalog and stored trimmed.
    pub fn select_option(&mut self, key: &str, value: &str) -> Option<RenderSummary> {
        if !self.catalog.contains(key, value) {
            tracing::warn!("Ignoring unknown filter selection {}={:?}", key, value);
            return None;
        }

        let value = value.trim();

        if value.is_empty() {
            self.filters.shift_remove(key);
        } else {
            self.filters.insert(key.to_string(), value.to_string());
        }
        Some(self.render())
    }

    /// New search text; shorter than the minimum length it has no effect
    pub fn submit_search(&mut self, text: &str) -> RenderSummary {
        self.search = text.to_string();
        self.render()
    }

    /// Clear filters and search, restore the default budget
    pub fn reset(&mut self) -> RenderSummary {
        self.filters.clear();
        self.search.clear();
        self.budget = self.settings.default_budget;
        tracing::info!("Selection reset");
        self.render()
    }

    /// Raise the budget by one step
    pub fn increase_budget(&mut self) -> RenderSummary {
        self.budget = self.budget.saturating_add(self.settings.budget_step);
        self.render()
    }

    /// The map was panned, zoomed or resized
    pub fn viewport_changed(&mut self) -> RenderSummary {
        self.render()
    }

    /// Re-render with unchanged inputs
    pub fn refresh(&mut self) -> RenderSummary {
        self.render()
    }

    fn render(&mut self) -> RenderSummary {
        let state = self.selection_state();
        let summary = self.coordinator.render(&self.store, &state);

        tracing::info!(
            "Rendered {} markers (budget {}, truncated: {})",
            summary.shown_count,
            summary.budget,
            summary.truncated
        );
        self.last_summary = Some(summary);
        summary
    }

    /// Currently chosen value of a filter, "" when unset
    pub fn selected(&self, key: &str) -> &str {
        self.filters.get(key).map(String::as_str).unwrap_or("")
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn budget(&self) -> usize {
        self.budget
    }

    pub fn catalog(&self) -> &FilterCatalog {
        &self.catalog
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn last_summary(&self) -> Option<RenderSummary> {
        self.last_summary
    }

    pub fn map(&self) -> &M {
        self.coordinator.map()
    }

    pub fn map_mut(&mut self) -> &mut M {
        self.coordinator.map_mut()
    }
}

/// Proof that a trigger was issued; stale once a newer one exists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerToken(u64);

/// A session shared between threads
///
/// The selection inputs and the live layer sit behind one mutex. Callers
/// take a [`TriggerToken`] when an interaction happens and apply it later;
/// a token superseded by a newer trigger is dropped without rendering.
pub struct SharedSession<M: MapSurface> {
    inner: Arc<Mutex<MapSession<M>>>,
    generation: Arc<AtomicU64>,
}

impl<M: MapSurface> Clone for SharedSession<M> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            generation: self.generation.clone(),
        }
    }
}

impl<M: MapSurface> SharedSession<M> {
    pub fn new(session: MapSession<M>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Register a new trigger, superseding all earlier ones
    pub fn begin_trigger(&self) -> TriggerToken {
        TriggerToken(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Run `action` unless a newer trigger was issued since `token`
    pub fn apply<F>(&self, token: TriggerToken, action: F) -> Option<RenderSummary>
    where
        F: FnOnce(&mut MapSession<M>) -> RenderSummary,
    {
        let mut session = self.inner.lock();
        if self.generation.load(Ordering::SeqCst) != token.0 {
            tracing::debug!("Dropping superseded trigger {:?}", token);
            return None;
        }
        Some(action(&mut session))
    }

    /// Access the session under the lock
    pub fn with<R>(&self, f: impl FnOnce(&mut MapSession<M>) -> R) -> R {
        f(&mut self.inner.lock())
    }
}
