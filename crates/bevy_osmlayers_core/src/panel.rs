//! Side panel model.

use bevy::prelude::*;

use crate::color::LayerColor;
use crate::events::LayerRegistered;
use crate::id::LayerId;
use crate::order::{move_item, splice_out, unshift};

#[derive(Debug, Clone, PartialEq)]
pub struct PanelEntry {
    pub id: LayerId,
    pub title: String,
    pub color: LayerColor,
    pub description: Option<String>,
}

/// The layer list shown to the user, front-to-back.
///
/// Mutations here only describe what the user did; the registry stays authoritative and the
/// new order is handed to [`LayerRegistry::reorder`](crate::registry::LayerRegistry::reorder).
#[derive(Resource, Debug, Clone, Default)]
pub struct LayerPanel {
    entries: Vec<PanelEntry>,
}

impl LayerPanel {
    /// Prepend a newly registered layer.
    pub fn on_layer_registered(&mut self, event: &LayerRegistered) {
        if self.entries.iter().any(|entry| entry.id == event.id) {
            return;
        }
        unshift(
            &mut self.entries,
            PanelEntry {
                id: event.id,
                title: event.title.clone(),
                color: event.color.clone(),
                description: None,
            },
        );
    }

    /// Drag-drop move. Returns the resulting order, or `None` if `from` is not an entry.
    pub fn move_entry(&mut self, from: usize, to: usize) -> Option<Vec<LayerId>> {
        move_item(&mut self.entries, from, to).then(|| self.order())
    }

    pub fn remove(&mut self, id: LayerId) -> bool {
        splice_out(&mut self.entries, |entry| entry.id == id).is_some()
    }

    pub fn set_description(&mut self, id: LayerId, description: &str) -> bool {
        match self.entries.iter_mut().find(|entry| entry.id == id) {
            Some(entry) => {
                entry.description = Some(description.to_string());
                true
            }
            None => false,
        }
    }

    /// Realign to `order`, dropping entries that are not in it.
    pub fn sync_order(&mut self, order: &[LayerId]) {
        self.entries.retain(|entry| order.contains(&entry.id));
        self.entries.sort_by_key(|entry| {
            order
                .iter()
                .position(|&id| id == entry.id)
                .unwrap_or(usize::MAX)
        });
    }

    pub fn order(&self) -> Vec<LayerId> {
        self.entries.iter().map(|entry| entry.id).collect()
    }

    pub fn entries(&self) -> &[PanelEntry] {
        &self.entries
    }

    pub fn get(&self, id: LayerId) -> Option<&PanelEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
