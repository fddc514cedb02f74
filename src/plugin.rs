//! Unified plugin.

use bevy::prelude::*;
use bevy_osmlayers_core::{OsmLayersConfig, OsmLayersCorePlugin};
#[cfg(feature = "gizmos")]
use bevy_osmlayers_gizmos::{GizmoRenderConfig, OsmLayersGizmosPlugin};

/// Adds the core plugin and, with the `gizmos` feature, the gizmo renderer.
///
/// # Example
///
/// ```rust,no_run
/// use bevy::prelude::*;
/// use bevy_osmlayers::prelude::*;
///
/// let config = OsmLayersConfig::from_json_file("osmlayers.json").unwrap_or_default();
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(BevyOsmLayersPlugin::default().with_core(config))
///     .run();
/// ```
#[derive(Default)]
pub struct BevyOsmLayersPlugin {
    pub core: OsmLayersConfig,
    #[cfg(feature = "gizmos")]
    pub gizmos: GizmoRenderConfig,
}

impl BevyOsmLayersPlugin {
    pub fn with_core(mut self, config: OsmLayersConfig) -> Self {
        self.core = config;
        self
    }

    #[cfg(feature = "gizmos")]
    pub fn with_gizmos(mut self, config: GizmoRenderConfig) -> Self {
        self.gizmos = config;
        self
    }
}

impl Plugin for BevyOsmLayersPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(OsmLayersCorePlugin::new(self.core.clone()));

        #[cfg(feature = "gizmos")]
        app.add_plugins(OsmLayersGizmosPlugin::new(self.gizmos.clone()));

        info!("BevyOsmLayersPlugin initialized");
    }
}
