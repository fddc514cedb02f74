//! Payload → styled feature conversion.
//!
//! Rules:
//! - Nodes referenced by any way in the same payload are not drawn on their own.
//! - A way is a polygon when it has more than two coordinates and its first and last
//!   coordinates are equal; otherwise it is a line.
//! - Every way member of a relation becomes its own polygon carrying the relation's tags.
//! - Elements with missing or `null` geometry are skipped and counted.

use std::collections::HashSet;

use bevy::prelude::*;
use bevy_osmlayers_overpass::payload::{
    Element, GeoPoint, MemberKind, OverpassPayload, Tags, resolve_geometry,
};

use crate::color::LayerColor;
use crate::config::StyleConfig;
use crate::feature::{ElementRef, Feature, FeatureStyle, Geometry, ShapeKind};
use crate::surface::MapSurface;

/// Result of ingesting one payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestReport {
    pub features: Vec<Feature>,
    /// Elements dropped because their geometry was unusable
    pub skipped: usize,
}

/// Converts Overpass payloads into styled features.
#[derive(Debug, Clone, Default)]
pub struct FeatureIngestor {
    style: StyleConfig,
}

impl FeatureIngestor {
    pub fn new(style: StyleConfig) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    pub fn ingest<S: MapSurface + ?Sized>(
        &self,
        payload: &OverpassPayload,
        color: &LayerColor,
        surface: &S,
    ) -> IngestReport {
        let used_nodes = referenced_nodes(payload);
        let mut report = IngestReport::default();

        for element in &payload.elements {
            match element {
                Element::Node { id, lat, lon, tags } => {
                    if used_nodes.contains(id) {
                        continue;
                    }
                    let (Some(lat), Some(lon)) = (*lat, *lon) else {
                        report.skipped += 1;
                        continue;
                    };
                    let point = GeoPoint::new(lat, lon);
                    if !is_finite(&point) {
                        report.skipped += 1;
                        continue;
                    }
                    report.features.push(self.feature(
                        ElementRef::Node(*id),
                        Geometry::Point(point),
                        tags.as_ref(),
                        color,
                        surface,
                    ));
                }
                Element::Way { id, geometry, tags, .. } => {
                    let Some(coords) = usable(resolve_geometry(geometry.as_ref()), 2) else {
                        report.skipped += 1;
                        continue;
                    };
                    report.features.push(self.feature(
                        ElementRef::Way(*id),
                        classify_way(coords),
                        tags.as_ref(),
                        color,
                        surface,
                    ));
                }
                Element::Relation { id, members, tags } => {
                    for member in members {
                        if member.kind != MemberKind::Way || member.geometry.is_none() {
                            continue;
                        }
                        let Some(coords) = usable(resolve_geometry(member.geometry.as_ref()), 3)
                        else {
                            report.skipped += 1;
                            continue;
                        };
                        report.features.push(self.feature(
                            ElementRef::RelationMember {
                                relation: *id,
                                way: member.reference,
                            },
                            Geometry::Polygon(coords),
                            tags.as_ref(),
                            color,
                            surface,
                        ));
                    }
                }
                Element::Other => {}
            }
        }

        if report.skipped > 0 {
            debug!(
                "Skipped {} elements with unusable geometry ({} features kept)",
                report.skipped,
                report.features.len()
            );
        }

        report
    }

    fn feature<S: MapSurface + ?Sized>(
        &self,
        element: ElementRef,
        geometry: Geometry,
        tags: Option<&Tags>,
        color: &LayerColor,
        surface: &S,
    ) -> Feature {
        let display = geometry
            .coordinates()
            .iter()
            .map(|&point| surface.project_to_display(point))
            .collect();

        Feature {
            element,
            style: self.style_for(geometry.kind(), color),
            geometry,
            display,
            properties: tags.cloned().unwrap_or_default(),
        }
    }

    fn style_for(&self, kind: ShapeKind, color: &LayerColor) -> FeatureStyle {
        match kind {
            ShapeKind::Point => FeatureStyle::Circle {
                radius: self.style.point_radius,
                fill: color.hex().to_string(),
                outline: self.style.point_outline.clone(),
                outline_width: self.style.point_outline_width,
            },
            ShapeKind::Line => FeatureStyle::Stroke {
                color: color.hex().to_string(),
                width: self.style.stroke_width,
            },
            ShapeKind::Polygon => FeatureStyle::Area {
                stroke: color.hex().to_string(),
                width: self.style.stroke_width,
                fill: color.to_rgba(self.style.fill_alpha),
            },
        }
    }
}

/// Every node id listed by a way in the payload.
fn referenced_nodes(payload: &OverpassPayload) -> HashSet<i64> {
    payload
        .elements
        .iter()
        .filter_map(|element| match element {
            Element::Way { nodes, .. } => nodes.as_deref(),
            _ => None,
        })
        .flatten()
        .copied()
        .collect()
}

fn classify_way(coords: Vec<GeoPoint>) -> Geometry {
    let closed = coords.len() > 2 && coords.first() == coords.last();
    if closed {
        Geometry::Polygon(coords)
    } else {
        Geometry::LineString(coords)
    }
}

fn usable(coords: Option<Vec<GeoPoint>>, min_len: usize) -> Option<Vec<GeoPoint>> {
    coords.filter(|coords| coords.len() >= min_len && coords.iter().all(is_finite))
}

fn is_finite(point: &GeoPoint) -> bool {
    point.lat.is_finite() && point.lon.is_finite()
}
