//! GeoJSON export of a layer's features.

use std::path::Path;

use bevy_osmlayers_overpass::payload::GeoPoint;
use serde_json::{Map, Value, json};
use thiserror::Error;

use crate::feature::{Feature, Geometry, ShapeKind};
use crate::id::LayerId;
use crate::registry::LayerRegistry;
use crate::surface::MapSurface;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Nothing to export: {0} does not exist")]
    UnknownLayer(LayerId),

    #[error("Failed to serialize features: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write export: {0}")]
    Io(#[from] std::io::Error),
}

/// File name offered for a layer export.
pub fn default_export_file_name(title: &str) -> String {
    let stem: String = title
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("{stem}.json")
}

fn position(point: &GeoPoint) -> Value {
    json!([point.lon, point.lat])
}

fn geometry_json(geometry: &Geometry) -> Value {
    match geometry {
        Geometry::Point(point) => json!({
            "type": "Point",
            "coordinates": position(point),
        }),
        Geometry::LineString(points) => json!({
            "type": "LineString",
            "coordinates": points.iter().map(position).collect::<Vec<_>>(),
        }),
        Geometry::Polygon(points) => {
            let mut ring: Vec<Value> = points.iter().map(position).collect();
            if let (Some(first), Some(last)) = (points.first(), points.last())
                && first != last
            {
                ring.push(position(first));
            }
            json!({
                "type": "Polygon",
                "coordinates": [ring],
            })
        }
    }
}

/// Build a GeoJSON `FeatureCollection` in lon/lat.
pub fn features_to_geojson(features: &[Feature]) -> Value {
    let features: Vec<Value> = features
        .iter()
        .map(|feature| {
            let properties: Map<String, Value> = feature
                .properties
                .iter()
                .map(|(key, value)| (key.clone(), Value::String(value.clone())))
                .collect();
            json!({
                "type": "Feature",
                "geometry": geometry_json(&feature.geometry),
                "properties": properties,
            })
        })
        .collect();

    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}

/// Write a layer's features to `path` as GeoJSON, optionally only those of one `geometry`
/// kind. Returns the number of features written.
///
/// Unknown ids fail with [`ExportError::UnknownLayer`] and nothing is written.
pub fn export_layer<S: MapSurface>(
    registry: &LayerRegistry<S>,
    id: LayerId,
    path: &Path,
    geometry: Option<ShapeKind>,
) -> Result<usize, ExportError> {
    let features: Vec<Feature> = registry
        .features(id)
        .ok_or(ExportError::UnknownLayer(id))?
        .iter()
        .filter(|feature| geometry.is_none_or(|kind| feature.kind() == kind))
        .cloned()
        .collect();
    let json = serde_json::to_string_pretty(&features_to_geojson(&features))?;
    std::fs::write(path, json)?;
    Ok(features.len())
}

#[cfg(test)]
mod tests {
    use bevy_osmlayers_overpass::payload::OverpassPayload;

    use super::*;
    use crate::surface::DrawList;

    fn registry_with_features() -> (LayerRegistry, LayerId) {
        let mut registry = LayerRegistry::with_surface(DrawList::default());
        let payload = OverpassPayload::from_json(
            r#"{"elements": [
                {"type": "node", "id": 1, "lat": 46.9, "lon": 7.4, "tags": {"amenity": "cafe"}},
                {"type": "relation", "id": 2, "tags": {"leisure": "park"}, "members": [
                    {"type": "way", "ref": 3,
                     "geometry": [{"lat": 0, "lon": 0}, {"lat": 0, "lon": 1}, {"lat": 1, "lon": 1}]}
                ]}
            ]}"#,
        )
        .unwrap();
        let (id, _) = registry.add_search_result("amenity=cafe", &payload);
        (registry, id)
    }

    #[test]
    fn test_geojson_shape() {
        let (registry, id) = registry_with_features();
        let geojson = features_to_geojson(registry.features(id).unwrap());

        assert_eq!(geojson["type"], "FeatureCollection");
        let point = &geojson["features"][0];
        assert_eq!(point["geometry"]["type"], "Point");
        assert_eq!(point["geometry"]["coordinates"], json!([7.4, 46.9]));
        assert_eq!(point["properties"]["amenity"], "cafe");

        let polygon = &geojson["features"][1];
        assert_eq!(polygon["geometry"]["type"], "Polygon");
        let ring = polygon["geometry"]["coordinates"][0].as_array().unwrap();
        assert_eq!(ring.len(), 4);
        assert_eq!(ring.first(), ring.last());
    }

    #[test]
    fn test_export_writes_file() {
        let (registry, id) = registry_with_features();
        let path = std::env::temp_dir().join(format!("osmlayers-export-{}.json", std::process::id()));

        assert_eq!(export_layer(&registry, id, &path, None).unwrap(), 2);
        let written: Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["features"].as_array().unwrap().len(), 2);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_export_one_geometry_kind() {
        let (registry, id) = registry_with_features();
        let path = std::env::temp_dir().join(format!("osmlayers-polygons-{}.json", std::process::id()));

        assert_eq!(
            export_layer(&registry, id, &path, Some(ShapeKind::Polygon)).unwrap(),
            1
        );
        let written: Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let features = written["features"].as_array().unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0]["geometry"]["type"], "Polygon");
        assert_eq!(features[0]["properties"]["leisure"], "park");

        assert_eq!(
            export_layer(&registry, id, &path, Some(ShapeKind::Line)).unwrap(),
            0
        );
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_export_unknown_layer_writes_nothing() {
        let (mut registry, id) = registry_with_features();
        registry.remove_layer(id);
        let path = std::env::temp_dir().join(format!("osmlayers-missing-{}.json", std::process::id()));

        assert!(matches!(
            export_layer(&registry, id, &path, None),
            Err(ExportError::UnknownLayer(_))
        ));
        assert!(!path.exists());
    }

    #[test]
    fn test_default_file_name() {
        assert_eq!(default_export_file_name("amenity=cafe"), "amenity=cafe.json");
        assert_eq!(default_export_file_name("a/b"), "a_b.json");
    }
}
