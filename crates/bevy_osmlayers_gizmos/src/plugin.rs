//! Plugin for `bevy_osmlayers_gizmos`.

use bevy::prelude::*;
use bevy_osmlayers_core::OsmLayersSystems;

use crate::config::GizmoRenderConfig;
use crate::draw::draw_layers;
use crate::viewport::track_viewport;

/// Draws `bevy_osmlayers` layers with gizmos and feeds the camera extent back as the
/// search area.
///
/// Add after `OsmLayersCorePlugin`.
///
/// # Example
///
/// ```rust,no_run
/// use bevy::prelude::*;
/// use bevy_osmlayers_core::OsmLayersCorePlugin;
/// use bevy_osmlayers_gizmos::{GizmoRenderConfig, OsmLayersGizmosPlugin};
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(OsmLayersCorePlugin::default())
///     .add_plugins(OsmLayersGizmosPlugin::new(GizmoRenderConfig {
///         draw_base: false,
///         ..default()
///     }))
///     .run();
/// ```
#[derive(Default)]
pub struct OsmLayersGizmosPlugin {
    pub config: GizmoRenderConfig,
}

impl OsmLayersGizmosPlugin {
    /// Create a new plugin with custom configuration.
    pub fn new(config: GizmoRenderConfig) -> Self {
        Self { config }
    }
}

impl Plugin for OsmLayersGizmosPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.config.clone());

        app.add_systems(Update, track_viewport.before(OsmLayersSystems));
        app.add_systems(PostUpdate, draw_layers);

        info!("OsmLayersGizmosPlugin initialized");
    }
}
