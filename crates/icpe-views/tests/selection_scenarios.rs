//! End-to-end selection behaviour over a record store

use icpe_core::{EmptySelectionPolicy, FieldSchema, GeoPoint, Record, SelectionState, Settings, Viewport};
use icpe_data::RecordStore;
use icpe_views::{LayerId, MapSurface, MarkerLayer, RenderCoordinator, SelectionEngine};
use pretty_assertions::assert_eq;

/// Map stub with a fixed viewport that keeps its live layers
struct StaticMap {
    viewport: Viewport,
    layers: Vec<MarkerLayer>,
}

impl StaticMap {
    fn new(viewport: Viewport) -> Self {
        Self { viewport, layers: Vec::new() }
    }

    fn shown_names(&self) -> Vec<String> {
        self.layers
            .iter()
            .flat_map(|layer| layer.markers())
            .filter_map(|marker| marker.popup.title().map(str::to_string))
            .collect()
    }
}

impl MapSurface for StaticMap {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn set_view(&mut self, _center: GeoPoint, _zoom: f64) {}

    fn add_layer(&mut self, layer: MarkerLayer) -> LayerId {
        let id = layer.id();
        self.layers.push(layer);
        id
    }

    fn remove_layer(&mut self, id: LayerId) {
        self.layers.retain(|layer| layer.id() != id);
    }
}

fn around_rennes() -> Viewport {
    Viewport::from_corners(GeoPoint::new(47.5, -3.5), GeoPoint::new(48.5, -1.5))
}

fn engine() -> SelectionEngine {
    SelectionEngine::from_settings(&Settings::default())
}

fn facility(name: &str, dep: &str, lat: f64, lon: f64) -> Record {
    Record::new(GeoPoint::new(lat, lon))
        .with_attribute("nom_ets", name)
        .with_attribute("num_dep", dep)
}

fn acme_and_beta() -> RecordStore {
    RecordStore::ordered(vec![
        facility("Acme", "35", 48.1, -2.5),
        facility("Beta", "22", 48.1, -2.5),
    ])
}

/// A mixed collection: some inside the viewport, some outside, two departments
fn mixed_store() -> RecordStore {
    let records = (0..200)
        .map(|i| {
            let inside = i % 4 != 0;
            let (lat, lon) = if inside { (48.0, -2.0 - (i as f64) / 1000.0) } else { (45.0, 5.0) };
            facility(&format!("Site {i}"), if i % 2 == 0 { "35" } else { "22" }, lat, lon)
                .with_attribute("famille_ic", if i % 5 == 0 { "Usine chimique" } else { "Élevage" })
        })
        .collect();
    RecordStore::from_records(records, Some(42))
}

#[test]
fn test_scenario_a_exact_department_filter() {
    let mut coordinator = RenderCoordinator::new(
        StaticMap::new(around_rennes()),
        engine(),
        FieldSchema::default(),
    );

    let summary = coordinator.render(&acme_and_beta(), &SelectionState::new(500).with_filter("num_dep", "35"));

    assert_eq!(coordinator.map().shown_names(), vec!["Acme".to_string()]);
    assert_eq!(summary.shown_count, 1);
    assert!(!summary.truncated);
}

#[test]
fn test_scenario_b_no_constraint_shows_nothing() {
    let mut coordinator = RenderCoordinator::new(
        StaticMap::new(around_rennes()),
        engine(),
        FieldSchema::default(),
    );

    let summary = coordinator.render(&acme_and_beta(), &SelectionState::new(500));

    assert!(coordinator.map().shown_names().is_empty());
    assert_eq!(summary.shown_count, 0);
    assert!(!summary.truncated);
}

#[test]
fn test_scenario_b_alternative_policy_shows_viewport() {
    let engine = SelectionEngine::new(
        vec!["nom_ets".to_string()],
        3,
        EmptySelectionPolicy::ShowAllInViewport,
    );
    let mut coordinator = RenderCoordinator::new(StaticMap::new(around_rennes()), engine, FieldSchema::default());

    let summary = coordinator.render(&acme_and_beta(), &SelectionState::new(500));
    assert_eq!(summary.shown_count, 2);
}

#[test]
fn test_scenario_c_budget_truncation_and_increase() {
    let records = (0..1000)
        .map(|i| facility(&format!("Site {i}"), "35", 48.0, -2.0))
        .collect();
    let store = RecordStore::from_records(records, Some(1));
    let mut coordinator = RenderCoordinator::new(
        StaticMap::new(around_rennes()),
        engine(),
        FieldSchema::default(),
    );

    let state = SelectionState::new(500).with_filter("num_dep", "35");
    let summary = coordinator.render(&store, &state);
    assert_eq!((summary.shown_count, summary.truncated), (500, true));

    let summary = coordinator.render(&store, &state.with_budget(1000));
    assert_eq!((summary.shown_count, summary.truncated), (1000, false));
    assert_eq!(coordinator.map().layers.len(), 1);
}

#[test]
fn test_scenario_d_case_insensitive_search() {
    let store = RecordStore::ordered(vec![
        facility("Fonderie", "35", 48.1, -2.5).with_attribute("famille_ic", "Usine de traitement"),
        facility("Ferme", "35", 48.1, -2.5).with_attribute("famille_ic", "Élevage"),
    ]);

    let outcome = engine().run_pass(
        store.records(),
        &SelectionState::new(500).with_search("usine"),
        &around_rennes(),
    );

    assert_eq!(outcome.included, vec![0]);
}

#[test]
fn test_viewport_rejection_is_filter_independent() {
    let store = mixed_store();
    let viewport = around_rennes();
    let states = [
        SelectionState::new(500).with_filter("num_dep", "35"),
        SelectionState::new(500).with_filter("num_dep", "22"),
        SelectionState::new(500).with_search("site"),
        SelectionState::new(500).with_search("usine").with_filter("num_dep", "35"),
    ];

    for state in &states {
        let outcome = engine().run_pass(store.records(), state, &viewport);
        for &index in &outcome.included {
            assert!(viewport.contains(store.records()[index].point()));
        }
    }
}

#[test]
fn test_included_records_match_every_active_filter() {
    let store = mixed_store();
    let state = SelectionState::new(500)
        .with_filter("num_dep", "35")
        .with_filter("famille_ic", "Usine chimique")
        .with_filter("lib_regime", "");

    let outcome = engine().run_pass(store.records(), &state, &around_rennes());

    assert!(!outcome.included.is_empty());
    for &index in &outcome.included {
        let record = &store.records()[index];
        assert_eq!(record.attribute("num_dep"), Some("35"));
        assert_eq!(record.attribute("famille_ic"), Some("Usine chimique"));
    }
}

#[test]
fn test_repeated_passes_are_identical() {
    let store = mixed_store();
    let state = SelectionState::new(20).with_search("site");

    let first = engine().run_pass(store.records(), &state, &around_rennes());
    let second = engine().run_pass(store.records(), &state, &around_rennes());

    assert_eq!(first, second);
    assert!(first.truncated);
}

#[test]
fn test_raising_budget_is_monotonic() {
    let store = mixed_store();
    let state = SelectionState::new(1).with_filter("num_dep", "22");

    let mut previous = engine().run_pass(store.records(), &state, &around_rennes());
    for budget in [2, 5, 10, 50, 75, 200, 500] {
        let outcome = engine().run_pass(store.records(), &state.clone().with_budget(budget), &around_rennes());
        assert!(outcome.accepted_count() >= previous.accepted_count());
        assert!(!(outcome.truncated && !previous.truncated));
        previous = outcome;
    }
    assert!(!previous.truncated);
}

#[test]
fn test_short_search_has_no_effect() {
    let store = mixed_store();
    let filtered = SelectionState::new(500).with_filter("num_dep", "35");

    let baseline = engine().run_pass(store.records(), &filtered, &around_rennes());
    for search in ["z", "zq"] {
        let outcome = engine().run_pass(store.records(), &filtered.clone().with_search(search), &around_rennes());
        assert_eq!(outcome, baseline);
    }

    let outcome = engine().run_pass(store.records(), &filtered.with_search("zqx"), &around_rennes());
    assert!(outcome.included.is_empty());
}

#[test]
fn test_budget_reached_then_non_matching_record_still_truncates() {
    let store = RecordStore::ordered(vec![
        facility("Acme", "35", 48.1, -2.5),
        facility("Beta", "35", 48.1, -2.5),
        facility("Gamma", "22", 48.1, -2.5),
    ]);
    let state = SelectionState::new(2).with_filter("num_dep", "35");

    let outcome = engine().run_pass(store.records(), &state, &around_rennes());

    assert_eq!(outcome.included, vec![0, 1]);
    assert!(outcome.truncated);
}

#[test]
fn test_budget_reached_on_last_record_is_not_truncated() {
    let store = RecordStore::ordered(vec![
        facility("Acme", "35", 48.1, -2.5),
        facility("Gamma", "22", 48.1, -2.5),
        facility("Beta", "35", 48.1, -2.5),
    ]);
    let state = SelectionState::new(2).with_filter("num_dep", "35");

    let outcome = engine().run_pass(store.records(), &state, &around_rennes());

    assert_eq!(outcome.included, vec![0, 2]);
    assert!(!outcome.truncated);
}
