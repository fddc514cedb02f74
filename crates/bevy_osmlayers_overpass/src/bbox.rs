//! Geographic bounding boxes.

use serde::Deserialize;

/// A WGS84 bounding box in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl BoundingBox {
    /// Switzerland, used whenever the map extent is not available.
    pub const SWITZERLAND: BoundingBox = BoundingBox {
        south: 46.8,
        west: 5.9,
        north: 47.8,
        east: 10.5,
    };

    /// Create a bounding box from its four edges.
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self {
            south,
            west,
            north,
            east,
        }
    }

    /// Build a box from two opposite corners given as `(lon, lat)`.
    pub fn from_corners(a: (f64, f64), b: (f64, f64)) -> Self {
        Self {
            south: a.1.min(b.1),
            west: a.0.min(b.0),
            north: a.1.max(b.1),
            east: a.0.max(b.0),
        }
    }

    /// Whether all four edges are finite numbers.
    pub fn is_finite(&self) -> bool {
        [self.south, self.west, self.north, self.east]
            .iter()
            .all(|v| v.is_finite())
    }

    /// Return `self` if usable, otherwise `fallback`.
    pub fn or_fallback(self, fallback: BoundingBox) -> BoundingBox {
        if self.is_finite() { self } else { fallback }
    }

    /// Overpass bbox filter syntax: `south,west,north,east`.
    pub fn to_overpass(&self) -> String {
        format!("{},{},{},{}", self.south, self.west, self.north, self.east)
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::SWITZERLAND
    }
}
