//! Observer events.
//!
//! Inbound events are triggered by UI code (`commands.trigger(SubmitSearch { .. })`) and
//! handled by the plugin's observers. Outbound events are triggered by the plugin so that
//! Layer 3 and UI code can react with `app.add_observer(..)`.
//!
//! `LoadingStarted`, `ResultArrived` and `LayerRegistered` are also the payloads of the
//! registry's [`EventBus`](crate::bus::EventBus) channels; the plugin relays every bus
//! publication as a Bevy trigger of the same type.

use std::path::PathBuf;

use bevy::prelude::*;

use crate::color::LayerColor;
use crate::feature::ShapeKind;
use crate::id::LayerId;

/// Request a tag search (`key=value` or `key`) in the current viewport.
///
/// # Example
///
/// ```ignore
/// fn search_cafes(mut commands: Commands) {
///     commands.trigger(SubmitSearch { query: "amenity=cafe".into() });
/// }
/// ```
#[derive(Event, Debug, Clone)]
pub struct SubmitSearch {
    pub query: String,
}

/// The search box text changed. Drives debounced tag suggestions.
#[derive(Event, Debug, Clone)]
pub struct SearchInputChanged {
    pub text: String,
}

/// Remove a layer. Unknown ids are ignored.
#[derive(Event, Debug, Clone)]
pub struct RemoveLayer {
    pub id: LayerId,
}

/// Drag-drop move of a panel entry from one position to another.
#[derive(Event, Debug, Clone, Copy)]
pub struct MoveLayer {
    pub from: usize,
    pub to: usize,
}

/// Export a layer's features as GeoJSON.
#[derive(Event, Debug, Clone)]
pub struct ExportLayer {
    pub id: LayerId,
    /// Target file. Defaults to `{title}.json` in the working directory.
    pub path: Option<PathBuf>,
    /// Only export features of this kind; `None` exports everything.
    pub geometry: Option<ShapeKind>,
}

/// A search was dispatched.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct LoadingStarted {
    pub query: String,
}

/// A search completed and its payload is about to become a layer.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct ResultArrived {
    pub title: String,
    /// Number of raw elements in the payload
    pub elements: usize,
}

/// A layer was registered and attached to the map surface.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct LayerRegistered {
    pub id: LayerId,
    pub title: String,
    pub color: LayerColor,
}

/// A search failed; no layer was created.
#[derive(Event, Debug, Clone)]
pub struct SearchFailed {
    pub query: String,
    pub error: String,
}

#[derive(Event, Debug, Clone)]
pub struct LayerRemoved {
    pub id: LayerId,
}

/// The panel order changed. Front-to-back, index 0 is topmost.
#[derive(Event, Debug, Clone)]
pub struct LayerOrderChanged {
    pub order: Vec<LayerId>,
}

#[derive(Event, Debug, Clone)]
pub struct DescriptionAttached {
    pub id: LayerId,
    pub description: String,
}

#[derive(Event, Debug, Clone)]
pub struct SuggestionsUpdated {
    pub labels: Vec<String>,
}

#[derive(Event, Debug, Clone)]
pub struct LayerExported {
    pub id: LayerId,
    pub path: PathBuf,
}
