//! Gizmo drawing of the registry's draw order.
//!
//! Renderables are drawn bottom to top in the order the surface holds them, so the topmost
//! panel entry is submitted last.

use bevy::prelude::*;
use bevy_osmlayers_core::config::OsmLayersConfig;
use bevy_osmlayers_core::feature::{Feature, FeatureStyle};
use bevy_osmlayers_core::registry::MapLayers;
use bevy_osmlayers_core::resources::MapViewport;
use bevy_osmlayers_core::surface::{Renderable, WebMercator};
use bevy_osmlayers_overpass::BoundingBox;
use bevy_osmlayers_overpass::payload::GeoPoint;

use crate::color::ColorCache;
use crate::config::GizmoRenderConfig;

/// Upper bound on graticule lines per axis; coarser steps are used past it.
const MAX_GRATICULE_LINES: usize = 100;

/// Draw every renderable on the map surface.
pub fn draw_layers(
    registry: Res<MapLayers>,
    config: Res<GizmoRenderConfig>,
    core_config: Res<OsmLayersConfig>,
    viewport: Res<MapViewport>,
    mut cache: Local<ColorCache>,
    mut gizmos: Gizmos,
) {
    let projection = registry.surface().projection();

    for renderable in registry.surface().drawables() {
        match renderable {
            Renderable::Base { .. } => {
                if config.draw_base {
                    let area = viewport.search_area(core_config.fallback_bbox);
                    draw_graticule(&mut gizmos, projection, area, &config);
                }
            }
            Renderable::Vector { layer } => {
                let Some(features) = registry.features(*layer) else {
                    continue;
                };
                for feature in features {
                    draw_feature(&mut gizmos, feature, &config, &mut cache);
                }
            }
        }
    }
}

fn draw_feature(
    gizmos: &mut Gizmos,
    feature: &Feature,
    config: &GizmoRenderConfig,
    cache: &mut ColorCache,
) {
    match &feature.style {
        FeatureStyle::Circle {
            radius,
            fill,
            outline,
            outline_width,
        } => {
            let Some(&center) = feature.display.first() else {
                return;
            };
            let fill = cache.get(fill, config.fallback_color);
            let outline = cache.get(outline, config.fallback_color);
            let isometry = Isometry2d::from_translation(center);

            // Concentric rings approximate the filled disc
            let mut r = *radius;
            while r > 0.0 {
                gizmos
                    .circle_2d(isometry, r, fill)
                    .resolution(config.point_segments);
                r -= radius / 4.0;
            }
            gizmos
                .circle_2d(isometry, radius + outline_width, outline)
                .resolution(config.point_segments);
        }
        FeatureStyle::Stroke { color, .. } => {
            let color = cache.get(color, config.fallback_color);
            gizmos.linestrip_2d(feature.display.iter().copied(), color);
        }
        FeatureStyle::Area { stroke, fill, .. } => {
            let stroke = cache.get(stroke, config.fallback_color);
            let fill = cache.get(fill, config.fallback_color);
            gizmos.linestrip_2d(closed_ring(&feature.display), stroke);
            gizmos.linestrip_2d(closed_ring(&inset_ring(&feature.display, 0.9)), fill);
        }
    }
}

/// Ring points with the first point repeated at the end if needed.
fn closed_ring(points: &[Vec2]) -> Vec<Vec2> {
    let mut ring = points.to_vec();
    if let (Some(&first), Some(&last)) = (points.first(), points.last())
        && first != last
    {
        ring.push(first);
    }
    ring
}

/// Ring scaled towards its vertex centroid by `factor`.
fn inset_ring(points: &[Vec2], factor: f32) -> Vec<Vec2> {
    if points.is_empty() {
        return Vec::new();
    }
    let centroid = points.iter().copied().sum::<Vec2>() / points.len() as f32;
    points
        .iter()
        .map(|&p| centroid + (p - centroid) * factor)
        .collect()
}

fn draw_graticule(
    gizmos: &mut Gizmos,
    projection: WebMercator,
    area: BoundingBox,
    config: &GizmoRenderConfig,
) {
    for (from, to) in graticule_lines(area, config.graticule_step_degrees) {
        gizmos.line_2d(
            projection.project(from),
            projection.project(to),
            config.base_color,
        );
    }
}

/// Meridians and parallels covering `area` at multiples of `step` degrees.
pub fn graticule_lines(area: BoundingBox, step: f64) -> Vec<(GeoPoint, GeoPoint)> {
    if !area.is_finite() || step <= 0.0 {
        return Vec::new();
    }
    let mut step = step;
    while ((area.east - area.west) / step) as usize > MAX_GRATICULE_LINES
        || ((area.north - area.south) / step) as usize > MAX_GRATICULE_LINES
    {
        step *= 2.0;
    }

    let mut lines = Vec::new();
    let mut lon = (area.west / step).ceil() * step;
    while lon <= area.east {
        lines.push((GeoPoint::new(area.south, lon), GeoPoint::new(area.north, lon)));
        lon += step;
    }
    let mut lat = (area.south / step).ceil() * step;
    while lat <= area.north {
        lines.push((GeoPoint::new(lat, area.west), GeoPoint::new(lat, area.east)));
        lat += step;
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graticule_covers_area() {
        let lines = graticule_lines(BoundingBox::new(46.8, 5.9, 47.8, 10.5), 1.0);
        // Meridians 6..=10, parallels 47
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0].0, GeoPoint::new(46.8, 6.0));
        assert_eq!(lines[5].0, GeoPoint::new(47.0, 5.9));
    }

    #[test]
    fn test_graticule_is_bounded() {
        let world = BoundingBox::new(-85.0, -180.0, 85.0, 180.0);
        let lines = graticule_lines(world, 0.001);
        assert!(lines.len() <= 2 * (MAX_GRATICULE_LINES + 1));
        assert!(graticule_lines(BoundingBox::new(f64::NAN, 0.0, 1.0, 1.0), 1.0).is_empty());
        assert!(graticule_lines(world, 0.0).is_empty());
    }

    #[test]
    fn test_ring_helpers() {
        let open = [Vec2::ZERO, Vec2::X, Vec2::ONE];
        assert_eq!(closed_ring(&open).len(), 4);
        assert_eq!(closed_ring(&closed_ring(&open)).len(), 4);

        let square = [Vec2::ZERO, Vec2::new(2.0, 0.0), Vec2::new(2.0, 2.0), Vec2::new(0.0, 2.0)];
        let inset = inset_ring(&square, 0.5);
        assert_eq!(inset[0], Vec2::new(0.5, 0.5));
        assert!(inset_ring(&[], 0.5).is_empty());
    }
}
