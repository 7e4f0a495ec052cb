//! Render coordinator
//!
//! Runs a selection pass against the map's current viewport and swaps the
//! resulting marker layer in for the previous one.

use icpe_core::{FieldSchema, SelectionState, Settings};
use icpe_data::RecordStore;

use crate::marker::{LayerId, Marker, MarkerLayer};
use crate::selection::SelectionEngine;
use crate::surface::MapSurface;

/// What a render pass put on the map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSummary {
    pub shown_count: usize,
    pub truncated: bool,
    pub budget: usize,
}

impl RenderSummary {
    /// Status line for the filter panel
    pub fn status_message(&self) -> String {
        if self.truncated {
            format!(
                "{} installations affichées (limite atteinte) : zoomez ou augmentez la limite",
                self.shown_count
            )
        } else {
            format!("{} installations affichées", self.shown_count)
        }
    }
}

/// Owns the map surface and the single live marker layer
pub struct RenderCoordinator<M: MapSurface> {
    map: M,
    engine: SelectionEngine,
    fields: FieldSchema,
    current_layer: Option<LayerId>,
}

impl<M: MapSurface> RenderCoordinator<M> {
    pub fn new(map: M, engine: SelectionEngine, fields: FieldSchema) -> Self {
        Self {
            map,
            engine,
            fields,
            current_layer: None,
        }
    }

    pub fn from_settings(map: M, settings: &Settings) -> Self {
        Self::new(map, SelectionEngine::from_settings(settings), settings.fields.clone())
    }

    /// Select, build markers and replace the live layer
    pub fn render(&mut self, store: &RecordStore, state: &SelectionState) -> RenderSummary {
        let viewport = self.map.viewport();
        let outcome = self.engine.run_pass(store.records(), state, &viewport);

        let markers = outcome
            .included
            .iter()
            .filter_map(|&index| {
                store
                    .get(index)
                    .map(|record| Marker::for_record(index, record, &self.fields))
            })
            .collect();
        let layer = MarkerLayer::new(markers);

        if let Some(previous) = self.current_layer.take() {
            self.map.remove_layer(previous);
        }
        self.current_layer = Some(self.map.add_layer(layer));

        RenderSummary {
            shown_count: outcome.accepted_count(),
            truncated: outcome.truncated,
            budget: state.budget(),
        }
    }

    pub fn current_layer(&self) -> Option<LayerId> {
        self.current_layer
    }

    pub fn engine(&self) -> &SelectionEngine {
        &self.engine
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut M {
        &mut self.map
    }
}
