//! Plugin configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use bevy::prelude::*;
use bevy_osmlayers_overpass::BoundingBox;
use bevy_osmlayers_overpass::http::EndpointConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::color::{ColorError, DEFAULT_PALETTE, Palette};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid palette: {0}")]
    Palette(#[from] ColorError),
}

/// Feature styling shared by every layer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StyleConfig {
    /// Point circle radius in display units
    pub point_radius: f32,
    pub point_outline: String,
    pub point_outline_width: f32,
    /// Line and polygon stroke width
    pub stroke_width: f32,
    /// Polygon fill opacity
    pub fill_alpha: f64,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            point_radius: 10.0,
            point_outline: "rgba(0, 0, 0, 0.3)".to_string(),
            point_outline_width: 1.0,
            stroke_width: 2.0,
            fill_alpha: 0.6,
        }
    }
}

/// Search box behavior.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchConfig {
    /// Input shorter than this never requests suggestions
    pub min_suggestion_chars: usize,
    pub suggestion_debounce_ms: u64,
    pub suggestion_limit: usize,
    /// Language for descriptions and suggestions
    pub language: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_suggestion_chars: 3,
            suggestion_debounce_ms: 300,
            suggestion_limit: 5,
            language: "en".to_string(),
        }
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.suggestion_debounce_ms)
    }
}

/// Configuration for `OsmLayersCorePlugin`.
///
/// Every field has a default, so a JSON file only needs the settings it changes:
///
/// ```json
/// { "palette": ["#1B9E77", "#D95F02"], "search": { "language": "de" } }
/// ```
#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OsmLayersConfig {
    /// Layer colors, `#RRGGBB`, assigned round-robin
    pub palette: Vec<String>,
    pub style: StyleConfig,
    pub search: SearchConfig,
    pub endpoints: EndpointConfig,
    /// Search area used while the viewport is unknown
    pub fallback_bbox: BoundingBox,
    /// Name of the background renderable kept at the bottom of the draw order
    pub base_layer_name: String,
    /// Display units per Web Mercator meter
    pub projection_scale: f64,
}

impl Default for OsmLayersConfig {
    fn default() -> Self {
        Self {
            palette: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
            style: StyleConfig::default(),
            search: SearchConfig::default(),
            endpoints: EndpointConfig::default(),
            fallback_bbox: BoundingBox::SWITZERLAND,
            base_layer_name: "osm-tiles".to_string(),
            projection_scale: 0.01,
        }
    }
}

impl OsmLayersConfig {
    /// Load and validate a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        info!("Loaded bevy_osmlayers config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.palette()?;
        Ok(config)
    }

    pub fn palette(&self) -> Result<Palette, ColorError> {
        Palette::new(&self.palette)
    }

    /// Endpoint settings with the search language and suggestion limit applied.
    pub fn endpoint_config(&self) -> EndpointConfig {
        EndpointConfig {
            language: self.search.language.clone(),
            suggestion_limit: self.search.suggestion_limit,
            ..self.endpoints.clone()
        }
    }
}
