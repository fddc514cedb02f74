//! # `bevy_osmlayers`
//!
//! Search OpenStreetMap tags in the visible map area and manage every result as a colored,
//! orderable layer.
//!
//! ## Architecture
//!
//! - **Layer 1** (`bevy_osmlayers_overpass`): Overpass payload model, tag queries, HTTP clients
//! - **Layer 2** (`bevy_osmlayers_core`): layer registry, draw-order sync, search plugin
//! - **Layer 3** (`bevy_osmlayers_gizmos`, feature `gizmos`): gizmo rendering
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bevy::prelude::*;
//! use bevy_osmlayers::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(BevyOsmLayersPlugin::default())
//!         .add_systems(Startup, setup)
//!         .run();
//! }
//!
//! fn setup(mut commands: Commands) {
//!     commands.spawn(Camera2d);
//!     commands.trigger(SubmitSearch { query: "amenity=cafe".into() });
//! }
//! ```

mod plugin;

pub use plugin::BevyOsmLayersPlugin;

pub mod prelude {
    //! Common imports for `bevy_osmlayers` users.

    pub use crate::plugin::BevyOsmLayersPlugin;
    pub use bevy_osmlayers_core::prelude::*;
    #[cfg(feature = "gizmos")]
    pub use bevy_osmlayers_gizmos::prelude::*;
    pub use bevy_osmlayers_overpass::prelude::{
        BoundingBox, ClientError, GeodataQueryClient, OverpassPayload, TagDescription,
        TagDescriptionClient, TagQuery, TagSuggestionClient,
    };
}
