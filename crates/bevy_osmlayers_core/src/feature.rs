//! Styled map features.

use bevy::math::Vec2;
use bevy_osmlayers_overpass::payload::{GeoPoint, Tags};

/// The payload element a feature was produced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementRef {
    Node(i64),
    Way(i64),
    /// A way member of a relation, rendered on its own.
    RelationMember { relation: i64, way: i64 },
}

/// Feature geometry in WGS84 (lon/lat).
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(GeoPoint),
    LineString(Vec<GeoPoint>),
    /// A single ring. Not necessarily closed for relation members.
    Polygon(Vec<GeoPoint>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Point,
    Line,
    Polygon,
}

impl Geometry {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Geometry::Point(_) => ShapeKind::Point,
            Geometry::LineString(_) => ShapeKind::Line,
            Geometry::Polygon(_) => ShapeKind::Polygon,
        }
    }

    pub fn coordinates(&self) -> &[GeoPoint] {
        match self {
            Geometry::Point(point) => std::slice::from_ref(point),
            Geometry::LineString(points) | Geometry::Polygon(points) => points,
        }
    }
}

/// How a feature is drawn. Colors are CSS strings (`#RRGGBB` or `rgba(...)`).
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureStyle {
    /// Filled circle with an outline
    Circle {
        radius: f32,
        fill: String,
        outline: String,
        outline_width: f32,
    },
    /// Plain stroke
    Stroke { color: String, width: f32 },
    /// Stroke plus translucent fill
    Area {
        stroke: String,
        width: f32,
        fill: String,
    },
}

/// A single shape plus its tag properties.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub element: ElementRef,
    pub geometry: Geometry,
    /// `geometry` projected to display coordinates by the map surface
    pub display: Vec<Vec2>,
    /// Source tags. Empty when the element had none.
    pub properties: Tags,
    pub style: FeatureStyle,
}

impl Feature {
    pub fn kind(&self) -> ShapeKind {
        self.geometry.kind()
    }
}
