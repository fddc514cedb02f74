//! Panel-driven layer management and bus relaying.

use std::path::PathBuf;

use bevy::prelude::*;

use crate::events::{
    ExportLayer, LayerExported, LayerOrderChanged, LayerRemoved, MoveLayer, RemoveLayer,
};
use crate::export::{default_export_file_name, export_layer};
use crate::panel::LayerPanel;
use crate::registry::MapLayers;
use crate::resources::{BusMessage, BusOutbox};

/// Relay registry bus publications as Bevy triggers and keep the panel in step.
pub fn relay_bus_events(
    mut commands: Commands,
    outbox: Res<BusOutbox>,
    mut panel: ResMut<LayerPanel>,
) {
    for message in outbox.drain() {
        match message {
            BusMessage::LoadingStarted(event) => commands.trigger(event),
            BusMessage::ResultArrived(event) => commands.trigger(event),
            BusMessage::LayerRegistered(event) => {
                panel.on_layer_registered(&event);
                commands.trigger(event);
            }
        }
    }
}

/// Observer: remove a layer from the registry and the panel.
pub fn on_remove_layer(
    trigger: On<RemoveLayer>,
    mut commands: Commands,
    mut registry: ResMut<MapLayers>,
    mut panel: ResMut<LayerPanel>,
) {
    let id = trigger.event().id;
    panel.remove(id);
    if registry.remove_layer(id) {
        commands.trigger(LayerRemoved { id });
    }
}

/// Observer: apply a drag-drop move, falling back to the registry order if it is rejected.
pub fn on_move_layer(
    trigger: On<MoveLayer>,
    mut commands: Commands,
    mut registry: ResMut<MapLayers>,
    mut panel: ResMut<LayerPanel>,
) {
    let MoveLayer { from, to } = *trigger.event();
    let Some(order) = panel.move_entry(from, to) else {
        warn!("Ignoring move from {}: the panel has {} layers", from, panel.entries().len());
        return;
    };

    match registry.reorder(&order) {
        Ok(()) => commands.trigger(LayerOrderChanged { order }),
        Err(e) => {
            warn!("Panel out of sync with registry: {}", e);
            panel.sync_order(registry.order());
        }
    }
}

/// Observer: export a layer to GeoJSON.
pub fn on_export_layer(
    trigger: On<ExportLayer>,
    mut commands: Commands,
    registry: Res<MapLayers>,
) {
    let ExportLayer { id, path, geometry } = trigger.event().clone();
    let Some(layer) = registry.layer(id) else {
        warn!("Cannot export {}: no such layer", id);
        return;
    };
    let path = path.unwrap_or_else(|| PathBuf::from(default_export_file_name(&layer.title)));

    match export_layer(&*registry, id, &path, geometry) {
        Ok(count) => {
            info!("Exported {} features of {} to {}", count, id, path.display());
            commands.trigger(LayerExported { id, path });
        }
        Err(e) => error!("Failed to export {} to {}: {}", id, path.display(), e),
    }
}
