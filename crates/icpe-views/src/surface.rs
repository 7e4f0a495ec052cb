//! Map collaborator interface

use icpe_core::{GeoPoint, Viewport};

use crate::marker::{LayerId, MarkerLayer};

/// What the render coordinator needs from a map widget
pub trait MapSurface {
    /// Currently visible bounds
    fn viewport(&self) -> Viewport;

    /// Move the map to a center and zoom level
    fn set_view(&mut self, center: GeoPoint, zoom: f64);

    /// Put a marker layer on the map
    fn add_layer(&mut self, layer: MarkerLayer) -> LayerId;

    /// Take a previously added layer off the map
    fn remove_layer(&mut self, id: LayerId);
}
