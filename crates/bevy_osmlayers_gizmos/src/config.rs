//! Render configuration.

use bevy::prelude::*;

/// Configuration for `OsmLayersGizmosPlugin`.
#[derive(Resource, Debug, Clone)]
pub struct GizmoRenderConfig {
    /// Graticule color for the base layer
    pub base_color: Color,
    /// Spacing of graticule lines in degrees
    pub graticule_step_degrees: f64,
    /// Draw the base layer graticule
    pub draw_base: bool,
    /// Circle resolution for point features
    pub point_segments: u32,
    /// Used when a feature color fails to parse
    pub fallback_color: Color,
}

impl Default for GizmoRenderConfig {
    fn default() -> Self {
        Self {
            base_color: Color::srgba(0.5, 0.5, 0.5, 0.25),
            graticule_step_degrees: 0.5,
            draw_base: true,
            point_segments: 24,
            fallback_color: Color::srgb(1.0, 0.0, 1.0),
        }
    }
}
