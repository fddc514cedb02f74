//! Camera → geographic viewport tracking.

use bevy::prelude::*;
use bevy_osmlayers_core::registry::MapLayers;
use bevy_osmlayers_core::resources::MapViewport;

/// Store the active camera's visible area as a bounding box, used as the search area.
pub fn track_viewport(
    cameras: Query<(&Camera, &GlobalTransform)>,
    registry: Res<MapLayers>,
    mut viewport: ResMut<MapViewport>,
) {
    let Some((camera, transform)) = cameras.iter().find(|(camera, _)| camera.is_active) else {
        return;
    };
    let Some(size) = camera.logical_viewport_size() else {
        return;
    };
    let (Ok(a), Ok(b)) = (
        camera.viewport_to_world_2d(transform, Vec2::ZERO),
        camera.viewport_to_world_2d(transform, size),
    ) else {
        return;
    };

    let bbox = registry.surface().projection().unproject_rect(a, b);
    if viewport.bbox != Some(bbox) {
        viewport.bbox = Some(bbox);
    }
}
