//! Search dispatch and completion handling.
//!
//! Remote calls run on worker threads with the blocking clients; their results come back
//! through [`Completions`] and are applied here on the main thread. Descriptions are
//! applied by layer id, so reorders and removals in the meantime are harmless.

use std::sync::Arc;

use bevy::prelude::*;
use bevy_osmlayers_overpass::prelude::*;
use crossbeam_channel::Sender;

use crate::config::OsmLayersConfig;
use crate::events::{DescriptionAttached, SearchFailed, SubmitSearch, SuggestionsUpdated};
use crate::id::LayerId;
use crate::panel::LayerPanel;
use crate::registry::MapLayers;
use crate::resources::{Completion, Completions, MapViewport, SearchClients, SearchState};

/// Observer: start a search for the submitted tag in the current viewport.
pub fn on_submit_search(
    trigger: On<SubmitSearch>,
    mut registry: ResMut<MapLayers>,
    viewport: Res<MapViewport>,
    config: Res<OsmLayersConfig>,
    clients: Option<Res<SearchClients>>,
    completions: Res<Completions>,
) {
    let query = trigger.event().query.trim().to_string();
    let tag = match query.parse::<TagQuery>() {
        Ok(tag) => tag,
        Err(e) => {
            warn!("Ignoring search: {}", e);
            return;
        }
    };
    let Some(clients) = clients else {
        warn!("Ignoring search for {}: no search clients configured", tag);
        return;
    };

    let bbox = viewport.search_area(config.fallback_bbox);
    info!("Searching {} in {}", tag, bbox.to_overpass());
    registry.start_loading(query.clone());

    spawn_search(clients.geodata.clone(), completions.sender(), query, tag, bbox);
}

fn spawn_search(
    client: Arc<dyn GeodataQueryClient>,
    sender: Sender<Completion>,
    query: String,
    tag: TagQuery,
    bbox: BoundingBox,
) {
    std::thread::spawn(move || {
        let result = client.query(&tag, &bbox);
        // The receiver only goes away with the app
        let _ = sender.send(Completion::Search { query, result });
    });
}

fn spawn_description(
    client: Arc<dyn TagDescriptionClient>,
    sender: Sender<Completion>,
    id: LayerId,
    tag: TagQuery,
) {
    std::thread::spawn(move || {
        let description = client.describe(&tag);
        let _ = sender.send(Completion::Description { id, description });
    });
}

/// Apply every finished remote call.
pub fn apply_completions(
    mut commands: Commands,
    completions: Res<Completions>,
    clients: Option<Res<SearchClients>>,
    mut registry: ResMut<MapLayers>,
    mut panel: ResMut<LayerPanel>,
    mut search: ResMut<SearchState>,
) {
    for completion in completions.drain() {
        match completion {
            Completion::Search { query, result } => {
                registry.finish_loading();
                match result {
                    Ok(payload) => {
                        let (id, report) = registry.add_search_result(query.clone(), &payload);
                        info!(
                            "{} '{}' has {} features ({} elements skipped)",
                            id,
                            query,
                            report.features.len(),
                            report.skipped
                        );

                        if let (Some(clients), Ok(tag)) = (&clients, query.parse::<TagQuery>()) {
                            spawn_description(
                                clients.description.clone(),
                                completions.sender(),
                                id,
                                tag,
                            );
                        }
                    }
                    Err(e) => {
                        warn!("Search for '{}' failed: {}", query, e);
                        commands.trigger(SearchFailed {
                            query,
                            error: e.to_string(),
                        });
                    }
                }
            }
            Completion::Description { id, description } => {
                if !description.is_available() {
                    debug!("No description found for {}", id);
                }
                if registry.set_description(id, description.description.clone()) {
                    panel.set_description(id, &description.description);
                    commands.trigger(DescriptionAttached {
                        id,
                        description: description.description,
                    });
                }
            }
            Completion::Suggestions { prefix, result } => match result {
                Ok(labels) => {
                    if search.accept_suggestions(&prefix, labels.clone()) {
                        commands.trigger(SuggestionsUpdated { labels });
                    } else {
                        debug!("Discarding stale suggestions for '{}'", prefix);
                    }
                }
                Err(e) => debug!("Suggestion lookup for '{}' failed: {}", prefix, e),
            },
        }
    }
}
