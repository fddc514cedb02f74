//! Plugin for `bevy_osmlayers_core`.

use bevy::prelude::*;

use crate::color::{ColorAllocator, Palette};
use crate::config::OsmLayersConfig;
use crate::ingest::FeatureIngestor;
use crate::panel::LayerPanel;
use crate::registry::{LayerRegistry, MapLayers};
use crate::resources::{BusOutbox, Completions, MapViewport, SearchClients, SearchState};
use crate::surface::{DrawList, WebMercator};
use crate::systems::{
    apply_completions, dispatch_suggestions, on_export_layer, on_move_layer, on_remove_layer,
    on_search_input_changed, on_submit_search, relay_bus_events,
};

/// System set containing the search, completion and relay systems (in `Update`).
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct OsmLayersSystems;

/// Plugin for the layer registry and search pipeline.
///
/// # Example
///
/// ```rust,no_run
/// use bevy::prelude::*;
/// use bevy_osmlayers_core::prelude::*;
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(OsmLayersCorePlugin::default())
///     .add_systems(Startup, |mut commands: Commands| {
///         commands.trigger(SubmitSearch { query: "amenity=cafe".into() });
///     })
///     .run();
/// ```
///
/// # Offline
///
/// Insert [`SearchClients`] before adding the plugin to replace the HTTP clients.
#[derive(Default)]
pub struct OsmLayersCorePlugin {
    config: OsmLayersConfig,
}

impl OsmLayersCorePlugin {
    /// Create a new plugin with custom configuration.
    pub fn new(config: OsmLayersConfig) -> Self {
        Self { config }
    }

    /// The registry this plugin starts with.
    fn build_registry(&self) -> MapLayers {
        let palette = self.config.palette().unwrap_or_else(|e| {
            error!("Invalid layer palette, using the default: {}", e);
            Palette::default()
        });
        let surface = DrawList::new(WebMercator::new(self.config.projection_scale))
            .with_base(self.config.base_layer_name.clone());

        LayerRegistry::new(
            surface,
            ColorAllocator::new(palette),
            FeatureIngestor::new(self.config.style.clone()),
        )
    }
}

impl Plugin for OsmLayersCorePlugin {
    fn build(&self, app: &mut App) {
        let mut registry = self.build_registry();
        let outbox = BusOutbox::default();
        outbox.attach(registry.events_mut());

        app.insert_resource(registry)
            .insert_resource(outbox)
            .insert_resource(self.config.clone())
            .init_resource::<LayerPanel>()
            .init_resource::<SearchState>()
            .init_resource::<MapViewport>()
            .init_resource::<Completions>();

        if !app.world().contains_resource::<SearchClients>() {
            match SearchClients::http(&self.config.endpoint_config()) {
                Ok(clients) => {
                    app.insert_resource(clients);
                }
                Err(e) => error!("Failed to build HTTP clients, searches are disabled: {}", e),
            }
        }

        app.add_observer(on_submit_search)
            .add_observer(on_search_input_changed)
            .add_observer(on_remove_layer)
            .add_observer(on_move_layer)
            .add_observer(on_export_layer);

        app.add_systems(
            Update,
            (dispatch_suggestions, apply_completions, relay_bus_events)
                .chain()
                .in_set(OsmLayersSystems),
        );

        info!("OsmLayersCorePlugin initialized");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use bevy_osmlayers_overpass::prelude::*;

    use super::*;
    use crate::events::*;
    use crate::id::LayerId;

    struct StubGeodata;

    impl GeodataQueryClient for StubGeodata {
        fn query(
            &self,
            tag: &TagQuery,
            _bbox: &BoundingBox,
        ) -> Result<OverpassPayload, ClientError> {
            if tag.key == "fail" {
                return Err(ClientError::Status {
                    service: "overpass",
                    status: 504,
                });
            }
            Ok(OverpassPayload::from_json(
                r#"{"elements": [{"type": "node", "id": 1, "lat": 46.9, "lon": 7.4}]}"#,
            )?)
        }
    }

    struct StubDescriptions;

    impl TagDescriptionClient for StubDescriptions {
        fn describe(&self, tag: &TagQuery) -> TagDescription {
            TagDescription::new(format!("About {tag}"))
        }
    }

    struct StubSuggestions;

    impl TagSuggestionClient for StubSuggestions {
        fn suggest(&self, partial: &str) -> Result<Vec<String>, ClientError> {
            Ok(vec![format!("{partial}=yes")])
        }
    }

    fn app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(SearchClients::new(
                StubGeodata,
                StubDescriptions,
                StubSuggestions,
            ))
            .add_plugins(OsmLayersCorePlugin::default());
        app
    }

    /// Update until `done` holds or give up.
    fn update_until(app: &mut App, done: impl Fn(&mut App) -> bool) {
        for _ in 0..500 {
            app.update();
            if done(app) {
                return;
            }
            std::thread::sleep(Duration::from_millis(2));
        }
        panic!("condition not reached");
    }

    fn search(app: &mut App, query: &str) -> LayerId {
        let before = app.world().resource::<MapLayers>().len();
        app.world_mut().trigger(SubmitSearch {
            query: query.into(),
        });
        update_until(app, |app| app.world().resource::<MapLayers>().len() > before);
        app.world().resource::<MapLayers>().order()[0]
    }

    #[test]
    fn test_search_registers_layer_and_panel_entry() {
        let mut app = app();
        let registered = Arc::new(Mutex::new(Vec::new()));
        let sink = registered.clone();
        app.add_observer(move |trigger: On<LayerRegistered>| {
            sink.lock().unwrap().push(trigger.event().id);
        });

        let id = search(&mut app, "amenity=cafe");
        app.update();

        let registry = app.world().resource::<MapLayers>();
        assert_eq!(registry.features(id).map(<[_]>::len), Some(1));
        assert!(!registry.is_loading());
        assert_eq!(app.world().resource::<LayerPanel>().order(), vec![id]);
        assert_eq!(*registered.lock().unwrap(), vec![id]);
    }

    #[test]
    fn test_description_arrives_by_id() {
        let mut app = app();
        let id = search(&mut app, "amenity=cafe");
        update_until(&mut app, |app| {
            app.world()
                .resource::<MapLayers>()
                .layer(id)
                .is_some_and(|layer| layer.description.is_some())
        });

        let layer = app.world().resource::<MapLayers>().layer(id).unwrap();
        assert_eq!(layer.description.as_deref(), Some("About amenity=cafe"));
    }

    #[test]
    fn test_failed_search_creates_no_layer() {
        let mut app = app();
        let failures = Arc::new(Mutex::new(Vec::new()));
        let sink = failures.clone();
        app.add_observer(move |trigger: On<SearchFailed>| {
            sink.lock().unwrap().push(trigger.event().query.clone());
        });

        app.world_mut().trigger(SubmitSearch {
            query: "fail=yes".into(),
        });
        assert!(app.world().resource::<MapLayers>().is_loading());
        update_until(&mut app, |_| !failures.lock().unwrap().is_empty());

        let registry = app.world().resource::<MapLayers>();
        assert!(registry.is_empty());
        assert!(!registry.is_loading());
    }

    #[test]
    fn test_move_and_remove_through_events() {
        let mut app = app();
        let a = search(&mut app, "amenity=cafe");
        let b = search(&mut app, "shop=bakery");
        app.update();
        assert_eq!(app.world().resource::<LayerPanel>().order(), vec![b, a]);

        app.world_mut().trigger(MoveLayer { from: 0, to: 1 });
        assert_eq!(app.world().resource::<MapLayers>().order(), &[a, b]);
        assert_eq!(app.world().resource::<LayerPanel>().order(), vec![a, b]);

        app.world_mut().trigger(MoveLayer { from: 7, to: 0 });
        assert_eq!(app.world().resource::<MapLayers>().order(), &[a, b]);
        assert_eq!(app.world().resource::<LayerPanel>().order(), vec![a, b]);

        app.world_mut().trigger(RemoveLayer { id: a });
        app.world_mut().trigger(RemoveLayer { id: a });
        assert_eq!(app.world().resource::<MapLayers>().order(), &[b]);
        assert_eq!(app.world().resource::<LayerPanel>().order(), vec![b]);
    }

    #[test]
    fn test_export_event_writes_requested_kind() {
        let mut app = app();
        let exported = Arc::new(Mutex::new(Vec::new()));
        let sink = exported.clone();
        app.add_observer(move |trigger: On<LayerExported>| {
            sink.lock().unwrap().push(trigger.event().path.clone());
        });

        let id = search(&mut app, "amenity=cafe");
        let path = std::env::temp_dir().join(format!("osmlayers-plugin-{}.json", std::process::id()));
        app.world_mut().trigger(ExportLayer {
            id,
            path: Some(path.clone()),
            geometry: Some(crate::feature::ShapeKind::Line),
        });
        app.update();

        assert_eq!(*exported.lock().unwrap(), vec![path.clone()]);
        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(written["features"].as_array().unwrap().is_empty());
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_suggestions_are_debounced() {
        let mut app = app();
        app.world_mut().trigger(SearchInputChanged {
            text: "amenity".into(),
        });
        update_until(&mut app, |app| {
            !app.world().resource::<SearchState>().suggestions.is_empty()
        });
        assert_eq!(
            app.world().resource::<SearchState>().suggestions,
            vec!["amenity=yes".to_string()]
        );

        app.world_mut().trigger(SearchInputChanged { text: "am".into() });
        assert!(app.world().resource::<SearchState>().suggestions.is_empty());
    }
}
