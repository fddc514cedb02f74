//! Interactive viewer for `bevy_osmlayers`.
//!
//! Controls:
//! - Arrow keys: pan, `+`/`-`: zoom
//! - `1`-`5`: search a preset tag in the visible area
//! - `Delete`: remove the top layer
//! - `PageDown`/`PageUp`: move the top layer down / the second layer up
//! - `E`: export the top layer to `{title}.json`, `P`: export only its polygons
//!
//! Run with:
//! ```bash
//! cargo run --example viewer [config.json]
//! ```

use bevy::prelude::*;
use bevy_osmlayers::prelude::*;
use bevy_osmlayers_overpass::payload::GeoPoint;

const PRESETS: [&str; 5] = [
    "amenity=cafe",
    "shop=bakery",
    "leisure=park",
    "highway=cycleway",
    "tourism=viewpoint",
];

const PAN_SPEED: f32 = 600.0;

fn main() {
    let config = match std::env::args().nth(1) {
        Some(path) => OsmLayersConfig::from_json_file(&path).unwrap_or_else(|e| {
            error!("{}, using defaults", e);
            OsmLayersConfig::default()
        }),
        None => OsmLayersConfig::default(),
    };

    App::new()
        .add_plugins(DefaultPlugins)
        .add_plugins(BevyOsmLayersPlugin::default().with_core(config))
        .add_observer(log_registered)
        .add_observer(log_description)
        .add_observer(log_failure)
        .add_observer(log_suggestions)
        .add_systems(Startup, setup_camera)
        .add_systems(Update, (camera_controls, layer_controls))
        .run();
}

fn setup_camera(mut commands: Commands, registry: Res<MapLayers>) {
    let center = registry
        .surface()
        .projection()
        .project(GeoPoint::new(46.948, 7.447));

    commands.spawn((
        Camera2d,
        Projection::Orthographic(OrthographicProjection {
            scale: 2.0,
            ..OrthographicProjection::default_2d()
        }),
        Transform::from_xyz(center.x, center.y, 0.0),
    ));

    info!("Controls: arrows pan, +/- zoom, 1-5 search, Delete remove, PageUp/PageDown reorder, E/P export");
}

fn camera_controls(
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    mut cameras: Query<(&mut Transform, &mut Projection), With<Camera2d>>,
) {
    let Ok((mut transform, mut projection)) = cameras.single_mut() else {
        return;
    };
    let Projection::Orthographic(ortho) = &mut *projection else {
        return;
    };

    let mut direction = Vec2::ZERO;
    if keyboard.pressed(KeyCode::ArrowUp) {
        direction.y += 1.0;
    }
    if keyboard.pressed(KeyCode::ArrowDown) {
        direction.y -= 1.0;
    }
    if keyboard.pressed(KeyCode::ArrowLeft) {
        direction.x -= 1.0;
    }
    if keyboard.pressed(KeyCode::ArrowRight) {
        direction.x += 1.0;
    }
    if direction != Vec2::ZERO {
        let step = direction.normalize() * PAN_SPEED * ortho.scale * time.delta_secs();
        transform.translation += step.extend(0.0);
    }

    if keyboard.pressed(KeyCode::Equal) || keyboard.pressed(KeyCode::NumpadAdd) {
        ortho.scale = (ortho.scale * (1.0 - time.delta_secs())).max(0.01);
    }
    if keyboard.pressed(KeyCode::Minus) || keyboard.pressed(KeyCode::NumpadSubtract) {
        ortho.scale = (ortho.scale * (1.0 + time.delta_secs())).min(100.0);
    }
}

fn layer_controls(
    mut commands: Commands,
    keyboard: Res<ButtonInput<KeyCode>>,
    panel: Res<LayerPanel>,
) {
    let digits = [
        KeyCode::Digit1,
        KeyCode::Digit2,
        KeyCode::Digit3,
        KeyCode::Digit4,
        KeyCode::Digit5,
    ];
    for (key, query) in digits.iter().zip(PRESETS) {
        if keyboard.just_pressed(*key) {
            commands.trigger(SubmitSearch {
                query: query.to_string(),
            });
        }
    }

    let Some(top) = panel.entries().first() else {
        return;
    };
    if keyboard.just_pressed(KeyCode::Delete) {
        commands.trigger(RemoveLayer { id: top.id });
    }
    if keyboard.just_pressed(KeyCode::PageDown) {
        commands.trigger(MoveLayer { from: 0, to: 1 });
    }
    if keyboard.just_pressed(KeyCode::PageUp) {
        commands.trigger(MoveLayer { from: 1, to: 0 });
    }
    if keyboard.just_pressed(KeyCode::KeyE) {
        commands.trigger(ExportLayer {
            id: top.id,
            path: None,
            geometry: None,
        });
    }
    if keyboard.just_pressed(KeyCode::KeyP) {
        commands.trigger(ExportLayer {
            id: top.id,
            path: Some(format!("{}-polygons.json", top.title.replace(['/', '\\'], "_")).into()),
            geometry: Some(ShapeKind::Polygon),
        });
    }
}

fn log_registered(trigger: On<LayerRegistered>, panel: Res<LayerPanel>) {
    let event = trigger.event();
    info!(
        "New layer {} '{}' in {} ({} layers)",
        event.id,
        event.title,
        event.color,
        panel.entries().len()
    );
}

fn log_description(trigger: On<DescriptionAttached>) {
    let event = trigger.event();
    info!("{}: {}", event.id, event.description);
}

fn log_failure(trigger: On<SearchFailed>) {
    let event = trigger.event();
    warn!("No layer for '{}': {}", event.query, event.error);
}

fn log_suggestions(trigger: On<SuggestionsUpdated>) {
    info!("Suggestions: {:?}", trigger.event().labels);
}
