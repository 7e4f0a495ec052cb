//! Geographic primitives

use serde::{Deserialize, Serialize};

/// A WGS84 position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// The visible bounding box of the map, edges included
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Viewport {
    /// Create a viewport from its south-west and north-east corners
    pub fn from_corners(south_west: GeoPoint, north_east: GeoPoint) -> Self {
        Self {
            south: south_west.lat.min(north_east.lat),
            west: south_west.lon.min(north_east.lon),
            north: south_west.lat.max(north_east.lat),
            east: south_west.lon.max(north_east.lon),
        }
    }

    /// Viewport covering the whole globe
    pub fn world() -> Self {
        Self {
            south: -90.0,
            west: -180.0,
            north: 90.0,
            east: 180.0,
        }
    }

    /// Whether the point lies inside the box or on one of its edges
    pub fn contains(&self, point: &GeoPoint) -> bool {
        point.lat >= self.south
            && point.lat <= self.north
            && point.lon >= self.west
            && point.lon <= self.east
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new((self.south + self.north) / 2.0, (self.west + self.east) / 2.0)
    }
}
