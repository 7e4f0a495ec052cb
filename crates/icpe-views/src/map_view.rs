//! Interactive map surface
//!
//! A Web Mercator map drawn with the egui painter: a plain graticule
//! background, one dot per marker, drag to pan, scroll to zoom, and a popup
//! window for the clicked marker.

use egui::{Align2, Color32, FontId, Pos2, Rect, Rounding, Sense, Stroke, Ui, Vec2};
use icpe_core::{GeoPoint, Viewport};

use crate::marker::{LayerId, Marker, MarkerLayer, PopupLine};
use crate::surface::MapSurface;

const TILE_SIZE: f64 = 256.0;
const MAX_LATITUDE: f64 = 85.051_128_78;
const MIN_ZOOM: f64 = 2.0;
const MAX_ZOOM: f64 = 18.0;
/// Scroll distance for one zoom level
const SCROLL_PER_ZOOM: f64 = 120.0;
/// Click tolerance around a marker, in points
const PICK_RADIUS: f32 = 8.0;

/// Colors and sizes used by the map
#[derive(Debug, Clone)]
pub struct MapStyle {
    pub background: Color32,
    pub graticule: Stroke,
    pub label: Color32,
    pub marker_fill: Color32,
    pub marker_stroke: Stroke,
    pub marker_radius: f32,
}

impl Default for MapStyle {
    fn default() -> Self {
        Self {
            background: Color32::from_rgb(230, 240, 250),
            graticule: Stroke::new(0.5, Color32::from_gray(190)),
            label: Color32::from_gray(110),
            marker_fill: Color32::from_rgb(214, 69, 65),
            marker_stroke: Stroke::new(1.0, Color32::WHITE),
            marker_radius: 5.0,
        }
    }
}

/// Result of drawing the map for one frame
#[derive(Debug, Clone, Copy, Default)]
pub struct MapResponse {
    /// The visible bounds moved; the selection must be re-evaluated
    pub viewport_changed: bool,
}

/// Map widget implementing [`MapSurface`]
pub struct MapView {
    center: GeoPoint,
    zoom: f64,
    size: Vec2,
    layers: Vec<MarkerLayer>,
    open_popup: Option<usize>,
    style: MapStyle,
}

impl MapView {
    pub fn new(style: MapStyle) -> Self {
        Self {
            center: GeoPoint::new(0.0, 0.0),
            zoom: MIN_ZOOM,
            size: Vec2::new(1024.0, 768.0),
            layers: Vec::new(),
            open_popup: None,
            style,
        }
    }

    pub fn center(&self) -> GeoPoint {
        self.center
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Markers of every live layer
    pub fn markers(&self) -> impl Iterator<Item = &Marker> {
        self.layers.iter().flat_map(|layer| layer.markers().iter())
    }

    /// Draw the map and handle pan, zoom and marker clicks
    pub fn show(&mut self, ui: &mut Ui) -> MapResponse {
        let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
        let rect = response.rect;
        let mut map_response = MapResponse::default();

        if rect.size() != self.size {
            self.size = rect.size();
            map_response.viewport_changed = true;
        }

        if response.dragged() {
            let delta = response.drag_delta();
            if delta != Vec2::ZERO {
                let [x, y] = self.world_position(&self.center);
                self.center = self.unproject([x - delta.x as f64, y - delta.y as f64]);
            }
        }
        // Only the end of a drag re-runs the selection
        if response.drag_released() {
            map_response.viewport_changed = true;
        }

        if response.hovered() {
            let scroll = ui.input(|i| i.scroll_delta.y) as f64;
            if scroll != 0.0 {
                let zoom = (self.zoom + scroll / SCROLL_PER_ZOOM).clamp(MIN_ZOOM, MAX_ZOOM);
                if zoom != self.zoom {
                    self.zoom = zoom;
                    map_response.viewport_changed = true;
                }
            }
        }

        if response.clicked() {
            if let Some(pointer) = response.interact_pointer_pos() {
                self.open_popup = self.pick_marker(rect, pointer);
            }
        }

        painter.rect_filled(rect, Rounding::ZERO, self.style.background);
        self.draw_graticule(&painter, rect);
        for marker in self.markers() {
            let pos = self.screen_position(rect, &marker.point);
            if rect.expand(self.style.marker_radius).contains(pos) {
                painter.circle(pos, self.style.marker_radius, self.style.marker_fill, self.style.marker_stroke);
            }
        }

        self.show_popup(ui, rect);
        map_response
    }

    fn draw_graticule(&self, painter: &egui::Painter, rect: Rect) {
        let viewport = self.viewport();
        let step = graticule_step(viewport.east - viewport.west, rect.width());

        let mut lon = (viewport.west / step).ceil() * step;
        while lon <= viewport.east {
            let x = self.screen_position(rect, &GeoPoint::new(self.center.lat, lon)).x;
            painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], self.style.graticule);
            painter.text(
                Pos2::new(x + 2.0, rect.bottom() - 2.0),
                Align2::LEFT_BOTTOM,
                format!("{lon:.2}°"),
                FontId::proportional(10.0),
                self.style.label,
            );
            lon += step;
        }

        let mut lat = (viewport.south / step).ceil() * step;
        while lat <= viewport.north {
            let y = self.screen_position(rect, &GeoPoint::new(lat, self.center.lon)).y;
            painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], self.style.graticule);
            painter.text(
                Pos2::new(rect.left() + 2.0, y - 2.0),
                Align2::LEFT_BOTTOM,
                format!("{lat:.2}°"),
                FontId::proportional(10.0),
                self.style.label,
            );
            lat += step;
        }
    }

    fn pick_marker(&self, rect: Rect, pointer: Pos2) -> Option<usize> {
        self.markers()
            .map(|marker| (marker, (self.screen_position(rect, &marker.point) - pointer).length()))
            .filter(|(_, distance)| *distance <= PICK_RADIUS)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(marker, _)| marker.record_index)
    }

    fn show_popup(&mut self, ui: &mut Ui, rect: Rect) {
        let Some(record_index) = self.open_popup else {
            return;
        };
        let Some(marker) = self.markers().find(|m| m.record_index == record_index).cloned() else {
            // The record left the selection
            self.open_popup = None;
            return;
        };

        let anchor = self.screen_position(rect, &marker.point) + Vec2::new(10.0, -10.0);
        let mut open = true;
        let title = marker.popup.title();
        egui::Window::new(title.unwrap_or("Installation").to_string())
            .id(egui::Id::new(("icpe_popup", record_index)))
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .default_pos(anchor)
            .show(ui.ctx(), |ui| {
                for line in marker.popup.body() {
                    match line {
                        PopupLine::Text(text) => {
                            ui.label(text.as_str());
                        }
                        PopupLine::Link { label, url } => {
                            ui.hyperlink_to(label.as_str(), url);
                        }
                    }
                }
            });

        if !open {
            self.open_popup = None;
        }
    }

    fn world_size(&self) -> f64 {
        TILE_SIZE * 2f64.powf(self.zoom)
    }

    /// Web Mercator position in world pixels at the current zoom
    fn world_position(&self, point: &GeoPoint) -> [f64; 2] {
        let size = self.world_size();
        let lat = point.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
        let x = (point.lon + 180.0) / 360.0 * size;
        let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / std::f64::consts::PI) / 2.0 * size;
        [x, y]
    }

    fn unproject(&self, [x, y]: [f64; 2]) -> GeoPoint {
        let size = self.world_size();
        let lon = (x / size) * 360.0 - 180.0;
        let n = std::f64::consts::PI * (1.0 - 2.0 * y / size);
        let lat = n.sinh().atan().to_degrees();
        GeoPoint::new(lat.clamp(-MAX_LATITUDE, MAX_LATITUDE), lon.clamp(-180.0, 180.0))
    }

    fn screen_position(&self, rect: Rect, point: &GeoPoint) -> Pos2 {
        let [x, y] = self.world_position(point);
        let [cx, cy] = self.world_position(&self.center);
        rect.center() + Vec2::new((x - cx) as f32, (y - cy) as f32)
    }
}

impl Default for MapView {
    fn default() -> Self {
        Self::new(MapStyle::default())
    }
}

impl MapSurface for MapView {
    fn viewport(&self) -> Viewport {
        let [x, y] = self.world_position(&self.center);
        let (half_w, half_h) = (self.size.x as f64 / 2.0, self.size.y as f64 / 2.0);
        let south_west = self.unproject([x - half_w, y + half_h]);
        let north_east = self.unproject([x + half_w, y - half_h]);
        Viewport::from_corners(south_west, north_east)
    }

    fn set_view(&mut self, center: GeoPoint, zoom: f64) {
        self.center = center;
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    fn add_layer(&mut self, layer: MarkerLayer) -> LayerId {
        let id = layer.id();
        self.layers.push(layer);
        id
    }

    fn remove_layer(&mut self, id: LayerId) {
        self.layers.retain(|layer| layer.id() != id);
    }
}

/// Round graticule spacing, in degrees, leaving at least ~100 points between lines
fn graticule_step(span_degrees: f64, width: f32) -> f64 {
    const STEPS: [f64; 10] = [0.01, 0.02, 0.05, 0.1, 0.2, 0.5, 1.0, 5.0, 10.0, 30.0];
    let min_step = span_degrees * 100.0 / width.max(1.0) as f64;
    STEPS.into_iter().find(|step| *step >= min_step).unwrap_or(90.0)
}
