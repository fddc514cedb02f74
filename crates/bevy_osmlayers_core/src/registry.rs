//! The layer registry: identity, feature sources, order and map-surface sync.
//!
//! Every mutation (`register_layer`, `remove_layer`, `reorder`) reconciles the surface's
//! draw order before returning, so the surface always draws `[base..., order reversed]`.

use std::collections::{HashMap, HashSet};

use bevy::prelude::*;
use bevy_osmlayers_overpass::payload::OverpassPayload;

use crate::bus::EventBus;
use crate::color::{ColorAllocator, LayerColor};
use crate::error::{OrderViolation, RegistryError};
use crate::events::{LayerRegistered, LoadingStarted, ResultArrived};
use crate::feature::Feature;
use crate::id::{LayerId, LayerIdAllocator};
use crate::ingest::{FeatureIngestor, IngestReport};
use crate::order::LayerOrderCoordinator;
use crate::surface::{DrawList, MapSurface, Renderable};

/// The mutable feature container backing a layer's renderable.
#[derive(Debug, Clone, Default)]
pub struct FeatureSource {
    features: Vec<Feature>,
}

impl FeatureSource {
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// A registered layer.
#[derive(Debug, Clone)]
pub struct Layer {
    pub id: LayerId,
    pub title: String,
    pub color: LayerColor,
    pub description: Option<String>,
    renderable: Renderable,
    source: FeatureSource,
}

impl Layer {
    pub fn renderable(&self) -> &Renderable {
        &self.renderable
    }

    pub fn source(&self) -> &FeatureSource {
        &self.source
    }
}

/// Owns every layer and keeps the map surface in sync with the panel order.
///
/// Order is front-to-back: index 0 is the topmost (most recent, unless reordered) layer.
#[derive(Resource, Debug)]
pub struct LayerRegistry<S: MapSurface = DrawList> {
    surface: S,
    layers: HashMap<LayerId, Layer>,
    order: Vec<LayerId>,
    ids: LayerIdAllocator,
    colors: ColorAllocator,
    ingestor: FeatureIngestor,
    events: EventBus,
    loading: usize,
}

/// The registry used by the Bevy plugin.
pub type MapLayers = LayerRegistry<DrawList>;

impl<S: MapSurface> LayerRegistry<S> {
    pub fn new(surface: S, colors: ColorAllocator, ingestor: FeatureIngestor) -> Self {
        Self {
            surface,
            layers: HashMap::new(),
            order: Vec::new(),
            ids: LayerIdAllocator::default(),
            colors,
            ingestor,
            events: EventBus::default(),
            loading: 0,
        }
    }

    /// Registry with the default palette and style.
    pub fn with_surface(surface: S) -> Self {
        Self::new(surface, ColorAllocator::default(), FeatureIngestor::default())
    }

    /// Create an empty layer on top of the order and attach it to the surface.
    ///
    /// `layer_registered` subscribers run after the renderable is attached, so a lookup by
    /// the new id always succeeds.
    pub fn register_layer(&mut self, title: impl Into<String>, color: LayerColor) -> LayerId {
        let id = self.ids.next_id();
        let title = title.into();
        let renderable = Renderable::Vector { layer: id };

        self.surface.add_drawable(renderable.clone());
        self.layers.insert(
            id,
            Layer {
                id,
                title: title.clone(),
                color: color.clone(),
                description: None,
                renderable,
                source: FeatureSource::default(),
            },
        );
        self.order.insert(0, id);
        self.sync_surface();

        info!("Registered {} '{}' with color {}", id, title, color);
        self.events
            .layer_registered
            .publish(&LayerRegistered { id, title, color });
        id
    }

    /// Remove a layer and its renderable and features.
    ///
    /// Unknown ids are a logged no-op; returns whether anything was removed.
    pub fn remove_layer(&mut self, id: LayerId) -> bool {
        let Some(layer) = self.layers.remove(&id) else {
            warn!("Cannot remove {}: no such layer", id);
            return false;
        };

        self.surface.remove_drawable(&layer.renderable);
        self.order.retain(|&other| other != id);
        self.sync_surface();

        info!("Removed {} '{}'", id, layer.title);
        true
    }

    /// Features of a layer, or `None` if the id is unknown.
    pub fn features(&self, id: LayerId) -> Option<&[Feature]> {
        self.layers.get(&id).map(|layer| layer.source.features())
    }

    /// Append features to a layer's source. Returns `false` for unknown ids.
    pub fn extend_features(&mut self, id: LayerId, features: impl IntoIterator<Item = Feature>) -> bool {
        match self.layers.get_mut(&id) {
            Some(layer) => {
                layer.source.features.extend(features);
                true
            }
            None => {
                warn!("Cannot add features to {}: no such layer", id);
                false
            }
        }
    }

    /// Replace the order wholesale.
    ///
    /// Fails without touching any state unless `new_order` is a permutation of the current
    /// order.
    pub fn reorder(&mut self, new_order: &[LayerId]) -> Result<(), RegistryError> {
        if let Err(reason) = self.check_permutation(new_order) {
            warn!("Rejected layer order {:?}: {}", new_order, reason);
            return Err(RegistryError::InvalidOrder {
                expected: self.order.clone(),
                actual: new_order.to_vec(),
                reason,
            });
        }

        self.order = new_order.to_vec();
        self.sync_surface();
        debug!("Layer order is now {:?}", self.order);
        Ok(())
    }

    fn check_permutation(&self, new_order: &[LayerId]) -> Result<(), OrderViolation> {
        let mut seen = HashSet::with_capacity(new_order.len());
        for &id in new_order {
            if !self.layers.contains_key(&id) {
                return Err(OrderViolation::Unknown(id));
            }
            if !seen.insert(id) {
                return Err(OrderViolation::Duplicate(id));
            }
        }
        if new_order.len() != self.order.len() {
            return Err(OrderViolation::LengthMismatch {
                expected: self.order.len(),
                actual: new_order.len(),
            });
        }
        Ok(())
    }

    pub fn next_color(&mut self) -> LayerColor {
        self.colors.next_color()
    }

    /// Turn a completed search into a new layer.
    ///
    /// Features are attached after registration, so `layer_registered` subscribers see an
    /// empty feature source.
    pub fn add_search_result(
        &mut self,
        title: impl Into<String>,
        payload: &OverpassPayload,
    ) -> (LayerId, IngestReport) {
        let title = title.into();
        self.events.result_arrived.publish(&ResultArrived {
            title: title.clone(),
            elements: payload.elements.len(),
        });

        let color = self.next_color();
        let report = self.ingestor.ingest(payload, &color, &self.surface);
        let id = self.register_layer(title, color);
        self.extend_features(id, report.features.iter().cloned());
        (id, report)
    }

    /// Mark a search as in flight.
    pub fn start_loading(&mut self, query: impl Into<String>) {
        self.loading += 1;
        self.events.loading_started.publish(&LoadingStarted {
            query: query.into(),
        });
    }

    /// Mark a search as finished, successfully or not.
    pub fn finish_loading(&mut self) {
        self.loading = self.loading.saturating_sub(1);
    }

    pub fn is_loading(&self) -> bool {
        self.loading > 0
    }

    /// Attach a description by identity.
    ///
    /// Returns `false` if the layer is gone or already has a description.
    pub fn set_description(&mut self, id: LayerId, description: impl Into<String>) -> bool {
        match self.layers.get_mut(&id) {
            Some(layer) if layer.description.is_none() => {
                layer.description = Some(description.into());
                true
            }
            Some(_) => {
                debug!("{} already has a description", id);
                false
            }
            None => {
                debug!("Dropping description for removed {}", id);
                false
            }
        }
    }

    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.get(&id)
    }

    /// Layers front-to-back.
    pub fn layers(&self) -> impl Iterator<Item = &Layer> {
        self.order.iter().filter_map(|id| self.layers.get(id))
    }

    pub fn order(&self) -> &[LayerId] {
        &self.order
    }

    pub fn contains(&self, id: LayerId) -> bool {
        self.layers.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    fn sync_surface(&mut self) {
        let renderables: HashMap<LayerId, Renderable> = self
            .layers
            .iter()
            .map(|(id, layer)| (*id, layer.renderable.clone()))
            .collect();
        LayerOrderCoordinator::reconcile(&mut self.surface, &self.order, &renderables);
    }
}
