//! Debounced tag suggestions.

use bevy::prelude::*;

use crate::config::OsmLayersConfig;
use crate::events::{SearchInputChanged, SuggestionsUpdated};
use crate::resources::{Completion, Completions, SearchClients, SearchState};

/// Observer: record the edit; short input clears the suggestion list.
pub fn on_search_input_changed(
    trigger: On<SearchInputChanged>,
    mut commands: Commands,
    mut search: ResMut<SearchState>,
    config: Res<OsmLayersConfig>,
    time: Res<Time>,
) {
    let text = &trigger.event().text;
    if search.edit(text, time.elapsed(), config.search.min_suggestion_chars) {
        commands.trigger(SuggestionsUpdated { labels: Vec::new() });
    }
}

/// Issue a suggestion request once the input has been idle long enough.
pub fn dispatch_suggestions(
    mut search: ResMut<SearchState>,
    config: Res<OsmLayersConfig>,
    clients: Option<Res<SearchClients>>,
    completions: Res<Completions>,
    time: Res<Time>,
) {
    let Some(clients) = clients else {
        return;
    };
    let Some(prefix) = search.due_suggestion(
        time.elapsed(),
        config.search.debounce(),
        config.search.min_suggestion_chars,
    ) else {
        return;
    };

    debug!("Requesting suggestions for '{}'", prefix);
    let client = clients.suggestion.clone();
    let sender = completions.sender();
    std::thread::spawn(move || {
        let result = client.suggest(&prefix);
        let _ = sender.send(Completion::Suggestions { prefix, result });
    });
}
