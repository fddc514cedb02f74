//! Systems and observers wiring the registry into the app.

pub mod layers;
pub mod search;
pub mod suggestions;

pub use layers::{on_export_layer, on_move_layer, on_remove_layer, relay_bus_events};
pub use search::{apply_completions, on_submit_search};
pub use suggestions::{dispatch_suggestions, on_search_input_changed};
