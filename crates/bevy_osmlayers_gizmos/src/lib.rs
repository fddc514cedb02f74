//! # `bevy_osmlayers_gizmos`
//!
//! Gizmo renderer for `bevy_osmlayers`. Walks the registry's draw order bottom to top and
//! draws the base layer as a lon/lat graticule and every vector layer's features in their
//! layer style: points as circles, lines as strips and polygons as outlined rings.
//!
//! ## Architecture
//!
//! Layer 3 (this crate) builds on:
//! - **Layer 2** (`bevy_osmlayers_core`): `MapLayers`, `MapViewport`, feature styles
//! - **Layer 1** (`bevy_osmlayers_overpass`): bounding boxes and coordinates
//!
//! It also writes the active camera's extent into `MapViewport`, which the core uses as the
//! search area.

pub mod color;
pub mod config;
pub mod draw;
pub mod plugin;
pub mod viewport;

pub mod prelude {
    //! Common imports for `bevy_osmlayers_gizmos`.

    pub use crate::color::{ParseColorError, parse_css_color};
    pub use crate::config::GizmoRenderConfig;
    pub use crate::plugin::OsmLayersGizmosPlugin;
}

// Re-export at crate root for convenience
pub use config::GizmoRenderConfig;
pub use plugin::OsmLayersGizmosPlugin;
