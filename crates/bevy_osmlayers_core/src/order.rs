//! Panel order → map draw order reconciliation.
//!
//! The panel lists layers front-to-back (index 0 on top); the surface draws bottom-to-top.
//! Every reconciliation clears the tracked layers from the surface and re-appends them in
//! reverse panel order, leaving base layers first.

use std::collections::HashMap;

use crate::id::LayerId;
use crate::surface::{MapSurface, Renderable};

pub struct LayerOrderCoordinator;

impl LayerOrderCoordinator {
    /// Rebuild `surface`'s draw order from `panel_order`.
    ///
    /// Ids without an entry in `renderables` are skipped.
    pub fn reconcile<S: MapSurface + ?Sized>(
        surface: &mut S,
        panel_order: &[LayerId],
        renderables: &HashMap<LayerId, Renderable>,
    ) {
        let mut order: Vec<Renderable> = surface
            .draw_order()
            .into_iter()
            .filter(Renderable::is_base)
            .collect();

        order.extend(
            panel_order
                .iter()
                .rev()
                .filter_map(|id| renderables.get(id))
                .cloned(),
        );

        surface.set_draw_order(order);
    }

    /// The draw order `panel_order` should produce on top of `base`.
    pub fn expected_draw_order(base: &[Renderable], panel_order: &[LayerId]) -> Vec<Renderable> {
        base.iter()
            .cloned()
            .chain(
                panel_order
                    .iter()
                    .rev()
                    .map(|&layer| Renderable::Vector { layer }),
            )
            .collect()
    }
}

/// Move the item at `from` to `to`, clamping `to` to the list bounds.
///
/// Returns `false` and leaves `items` untouched if `from` is out of range.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from >= items.len() {
        return false;
    }
    let to = to.min(items.len() - 1);
    if from != to {
        let item = items.remove(from);
        items.insert(to, item);
    }
    true
}

/// Insert at the front.
pub fn unshift<T>(items: &mut Vec<T>, item: T) {
    items.insert(0, item);
}

/// Remove the first element matching `predicate`. Returns it, if any.
pub fn splice_out<T>(items: &mut Vec<T>, predicate: impl Fn(&T) -> bool) -> Option<T> {
    let index = items.iter().position(predicate)?;
    Some(items.remove(index))
}
