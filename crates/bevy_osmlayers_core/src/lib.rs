//! # `bevy_osmlayers_core`
//!
//! Layer lifecycle and map synchronization for `bevy_osmlayers`. Turns Overpass search
//! results into colored, orderable map layers and keeps the map's draw order in step with
//! the layer panel.
//!
//! **This crate does NOT render anything** - drawing is a Layer 3 concern that reads the
//! registry's surface and reacts to the events triggered here.
//!
//! ## Architecture
//!
//! Layer 2 (this crate) sits between:
//! - **Layer 1** (`bevy_osmlayers_overpass`): payload model and remote clients
//! - **Layer 3** (`bevy_osmlayers_gizmos`): rendering
//!
//! ## What Layer 2 Provides
//!
//! 1. **`LayerRegistry`**: layer identity, feature sources and synchronous draw-order sync
//! 2. **`LayerOrderCoordinator`**: panel order → draw order, base layers pinned to the bottom
//! 3. **`ColorAllocator`** and **`FeatureIngestor`**: layer colors and payload conversion
//! 4. **`EventBus`**: loading-started, result-arrived and layer-registered channels
//! 5. **Plugin**: searches, descriptions and suggestions on worker threads, relayed as
//!    observer events
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use bevy::prelude::*;
//! use bevy_osmlayers_core::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(OsmLayersCorePlugin::default())
//!         .add_observer(log_new_layers)
//!         .run();
//! }
//!
//! fn log_new_layers(trigger: On<LayerRegistered>) {
//!     let event = trigger.event();
//!     info!("{} '{}' is {}", event.id, event.title, event.color);
//! }
//! ```

pub mod bus;
pub mod color;
pub mod config;
pub mod error;
pub mod events;
pub mod export;
pub mod feature;
pub mod id;
pub mod ingest;
pub mod order;
pub mod panel;
pub mod plugin;
pub mod registry;
pub mod resources;
pub mod surface;
pub mod systems;

pub mod prelude {
    //! Common imports for `bevy_osmlayers_core` users.

    pub use crate::bus::{Channel, EventBus, SubscriptionId};
    pub use crate::color::{ColorAllocator, ColorError, LayerColor, Palette, hex_to_rgba};
    pub use crate::config::{ConfigError, OsmLayersConfig, SearchConfig, StyleConfig};
    pub use crate::error::{OrderViolation, RegistryError};
    pub use crate::events::{
        DescriptionAttached, ExportLayer, LayerExported, LayerOrderChanged, LayerRegistered,
        LayerRemoved, LoadingStarted, MoveLayer, RemoveLayer, ResultArrived,
        SearchFailed, SearchInputChanged, SubmitSearch, SuggestionsUpdated,
    };
    pub use crate::export::{ExportError, export_layer, features_to_geojson};
    pub use crate::feature::{ElementRef, Feature, FeatureStyle, Geometry, ShapeKind};
    pub use crate::id::LayerId;
    pub use crate::ingest::{FeatureIngestor, IngestReport};
    pub use crate::order::LayerOrderCoordinator;
    pub use crate::panel::{LayerPanel, PanelEntry};
    pub use crate::plugin::{OsmLayersCorePlugin, OsmLayersSystems};
    pub use crate::registry::{Layer, LayerRegistry, MapLayers};
    pub use crate::resources::{MapViewport, SearchClients, SearchState};
    pub use crate::surface::{DrawList, MapSurface, Renderable, WebMercator};
}

// Re-export plugin types at crate root for convenience
pub use config::OsmLayersConfig;
pub use plugin::{OsmLayersCorePlugin, OsmLayersSystems};
