//! Plugin resources shared by the search, suggestion and panel systems.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use bevy::prelude::*;
use bevy_osmlayers_overpass::prelude::*;
use crossbeam_channel::{Receiver, Sender};

use crate::bus::EventBus;
use crate::events::{LayerRegistered, LoadingStarted, ResultArrived};
use crate::id::LayerId;

/// The remote collaborators, shared with worker threads.
///
/// The plugin inserts HTTP clients built from the config unless this resource already
/// exists, so tests and offline apps can insert their own before adding the plugin.
#[derive(Resource, Clone)]
pub struct SearchClients {
    pub geodata: Arc<dyn GeodataQueryClient>,
    pub description: Arc<dyn TagDescriptionClient>,
    pub suggestion: Arc<dyn TagSuggestionClient>,
}

impl SearchClients {
    pub fn new(
        geodata: impl GeodataQueryClient + 'static,
        description: impl TagDescriptionClient + 'static,
        suggestion: impl TagSuggestionClient + 'static,
    ) -> Self {
        Self {
            geodata: Arc::new(geodata),
            description: Arc::new(description),
            suggestion: Arc::new(suggestion),
        }
    }

    /// Blocking HTTP clients for Overpass, taginfo and tagfinder.
    pub fn http(config: &EndpointConfig) -> Result<Self, ClientError> {
        Ok(Self::new(
            OverpassClient::new(config)?,
            TagInfoClient::new(config)?,
            TagFinderClient::new(config)?,
        ))
    }
}

/// The visible map extent, updated by the render layer.
#[derive(Resource, Debug, Clone, Default)]
pub struct MapViewport {
    pub bbox: Option<BoundingBox>,
}

impl MapViewport {
    /// Area to search: the viewport if known and finite, else `fallback`.
    pub fn search_area(&self, fallback: BoundingBox) -> BoundingBox {
        self.bbox
            .map_or(fallback, |bbox| bbox.or_fallback(fallback))
    }
}

/// Search box state and suggestion debounce bookkeeping.
#[derive(Resource, Debug, Clone, Default)]
pub struct SearchState {
    pub input: String,
    pub suggestions: Vec<String>,
    last_edit: Option<Duration>,
    requested: Option<String>,
}

impl SearchState {
    /// Record an edit at `now`. Returns `true` if existing suggestions were cleared.
    pub fn edit(&mut self, text: &str, now: Duration, min_chars: usize) -> bool {
        self.input = text.to_string();
        if text.trim().chars().count() < min_chars {
            self.last_edit = None;
            self.requested = None;
            let cleared = !self.suggestions.is_empty();
            self.suggestions.clear();
            return cleared;
        }
        self.last_edit = Some(now);
        false
    }

    /// The prefix to request suggestions for, once input has been idle for `debounce`.
    pub fn due_suggestion(
        &mut self,
        now: Duration,
        debounce: Duration,
        min_chars: usize,
    ) -> Option<String> {
        let last = self.last_edit?;
        if now.saturating_sub(last) < debounce {
            return None;
        }
        self.last_edit = None;

        let prefix = self.input.trim();
        if prefix.chars().count() < min_chars || self.requested.as_deref() == Some(prefix) {
            return None;
        }
        let prefix = prefix.to_string();
        self.requested = Some(prefix.clone());
        Some(prefix)
    }

    /// Apply suggestions if the input still matches the prefix they were requested for.
    pub fn accept_suggestions(&mut self, prefix: &str, labels: Vec<String>) -> bool {
        if self.input.trim() != prefix {
            return false;
        }
        self.suggestions = labels;
        true
    }
}

/// A worker thread result.
#[derive(Debug)]
pub enum Completion {
    Search {
        query: String,
        result: Result<OverpassPayload, ClientError>,
    },
    Description {
        id: LayerId,
        description: TagDescription,
    },
    Suggestions {
        prefix: String,
        result: Result<Vec<String>, ClientError>,
    },
}

/// Worker → main thread channel.
#[derive(Resource)]
pub struct Completions {
    sender: Sender<Completion>,
    receiver: Receiver<Completion>,
}

impl Default for Completions {
    fn default() -> Self {
        let (sender, receiver) = crossbeam_channel::unbounded();
        Self { sender, receiver }
    }
}

impl Completions {
    pub fn sender(&self) -> Sender<Completion> {
        self.sender.clone()
    }

    /// Everything completed since the last drain.
    pub fn drain(&self) -> Vec<Completion> {
        self.receiver.try_iter().collect()
    }
}

/// A registry bus publication waiting to be relayed as a Bevy trigger.
#[derive(Debug, Clone)]
pub enum BusMessage {
    LoadingStarted(LoadingStarted),
    ResultArrived(ResultArrived),
    LayerRegistered(LayerRegistered),
}

/// Collects bus publications so systems can relay them after the registry call returns.
#[derive(Resource, Clone, Default)]
pub struct BusOutbox {
    queue: Arc<Mutex<Vec<BusMessage>>>,
}

impl BusOutbox {
    /// Subscribe to all three channels of `bus`.
    pub fn attach(&self, bus: &mut EventBus) {
        let queue = self.queue.clone();
        bus.loading_started.subscribe(move |event: &LoadingStarted| {
            push(&queue, BusMessage::LoadingStarted(event.clone()));
        });
        let queue = self.queue.clone();
        bus.result_arrived.subscribe(move |event: &ResultArrived| {
            push(&queue, BusMessage::ResultArrived(event.clone()));
        });
        let queue = self.queue.clone();
        bus.layer_registered.subscribe(move |event: &LayerRegistered| {
            push(&queue, BusMessage::LayerRegistered(event.clone()));
        });
    }

    pub fn drain(&self) -> Vec<BusMessage> {
        match self.queue.lock() {
            Ok(mut queue) => std::mem::take(&mut *queue),
            Err(_) => {
                error!("Bus outbox lock poisoned");
                Vec::new()
            }
        }
    }
}

fn push(queue: &Mutex<Vec<BusMessage>>, message: BusMessage) {
    if let Ok(mut queue) = queue.lock() {
        queue.push(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEBOUNCE: Duration = Duration::from_millis(300);

    fn ms(ms: u64) -> Duration {
        Duration::from_millis(ms)
    }

    #[test]
    fn test_suggestion_waits_for_debounce() {
        let mut state = SearchState::default();
        state.edit("ame", ms(0), 3);
        assert_eq!(state.due_suggestion(ms(100), DEBOUNCE, 3), None);

        state.edit("amen", ms(200), 3);
        assert_eq!(state.due_suggestion(ms(400), DEBOUNCE, 3), None);
        assert_eq!(state.due_suggestion(ms(500), DEBOUNCE, 3), Some("amen".into()));
        assert_eq!(state.due_suggestion(ms(900), DEBOUNCE, 3), None);
    }

    #[test]
    fn test_same_text_is_requested_once() {
        let mut state = SearchState::default();
        state.edit("amenity", ms(0), 3);
        assert!(state.due_suggestion(ms(300), DEBOUNCE, 3).is_some());

        state.edit("amenity ", ms(400), 3);
        assert_eq!(state.due_suggestion(ms(800), DEBOUNCE, 3), None);
    }

    #[test]
    fn test_short_input_clears_suggestions() {
        let mut state = SearchState::default();
        state.edit("amenity", ms(0), 3);
        state.due_suggestion(ms(300), DEBOUNCE, 3);
        assert!(state.accept_suggestions("amenity", vec!["amenity=cafe".into()]));

        assert!(state.edit("am", ms(400), 3));
        assert!(state.suggestions.is_empty());
        assert_eq!(state.due_suggestion(ms(1000), DEBOUNCE, 3), None);

        // Same text again after clearing is requested anew
        state.edit("amenity", ms(1100), 3);
        assert_eq!(state.due_suggestion(ms(1400), DEBOUNCE, 3), Some("amenity".into()));
    }

    #[test]
    fn test_stale_suggestions_are_ignored() {
        let mut state = SearchState::default();
        state.edit("shop", ms(0), 3);
        state.edit("shop=ba", ms(10), 3);
        assert!(!state.accept_suggestions("shop", vec!["shop=bakery".into()]));
        assert!(state.suggestions.is_empty());
    }

    #[test]
    fn test_viewport_fallback() {
        let fallback = BoundingBox::SWITZERLAND;
        assert_eq!(MapViewport::default().search_area(fallback), fallback);

        let broken = MapViewport {
            bbox: Some(BoundingBox::new(f64::NAN, 0.0, 1.0, 1.0)),
        };
        assert_eq!(broken.search_area(fallback), fallback);

        let bbox = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
        let known = MapViewport { bbox: Some(bbox) };
        assert_eq!(known.search_area(fallback), bbox);
    }

    #[test]
    fn test_outbox_collects_bus_publications() {
        let mut bus = EventBus::default();
        let outbox = BusOutbox::default();
        outbox.attach(&mut bus);

        bus.loading_started.publish(&LoadingStarted { query: "a=b".into() });
        bus.result_arrived.publish(&ResultArrived {
            title: "a=b".into(),
            elements: 0,
        });

        let drained = outbox.drain();
        assert_eq!(drained.len(), 2);
        assert!(matches!(drained[0], BusMessage::LoadingStarted(_)));
        assert!(outbox.drain().is_empty());
    }

    #[test]
    fn test_completions_round_trip_through_channel() {
        let completions = Completions::default();
        let sender = completions.sender();
        std::thread::spawn(move || {
            sender
                .send(Completion::Suggestions {
                    prefix: "ame".into(),
                    result: Ok(vec!["amenity=cafe".into()]),
                })
                .unwrap();
        })
        .join()
        .unwrap();

        let drained = completions.drain();
        assert_eq!(drained.len(), 1);
        assert!(completions.drain().is_empty());
    }
}
