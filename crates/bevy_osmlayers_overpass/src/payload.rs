//! Raw Overpass API result model.
//!
//! Mirrors the `[out:json]` response format: a flat `elements` array where every element is
//! tagged by its `type`. Only the fields the map needs are modelled; unknown fields are
//! ignored and unknown element kinds deserialize to [`Element::Other`]. Coordinates are read
//! leniently: a coordinate that is not a number, or a geometry entry without both `lat` and
//! `lon`, decodes as missing so only that element is lost.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// OSM tag map (`key -> value`), ordered by key.
pub type Tags = BTreeMap<String, String>;

/// A WGS84 coordinate as it appears in Overpass `geometry` arrays.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lon: f64,
}

impl GeoPoint {
    /// Create a point from latitude and longitude.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Read a `{lat, lon}` object, or `None` if either is absent or not a number.
    pub fn from_value(value: &Value) -> Option<Self> {
        let lat = value.get("lat")?.as_f64()?;
        let lon = value.get("lon")?.as_f64()?;
        Some(Self { lat, lon })
    }
}

fn lenient_coordinate<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?
        .as_ref()
        .and_then(Value::as_f64))
}

fn lenient_geometry<'de, D>(deserializer: D) -> Result<Option<Vec<Option<GeoPoint>>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(Value::Array(entries)) = Option::<Value>::deserialize(deserializer)? else {
        return Ok(None);
    };
    Ok(Some(entries.iter().map(GeoPoint::from_value).collect()))
}

/// A complete Overpass result payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OverpassPayload {
    /// Result elements in response order.
    #[serde(default)]
    pub elements: Vec<Element>,
}

impl OverpassPayload {
    /// Parse a payload from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// A single Overpass result element.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    /// A point element. Coordinates may be missing for tag-only output modes.
    Node {
        id: i64,
        #[serde(default, deserialize_with = "lenient_coordinate")]
        lat: Option<f64>,
        #[serde(default, deserialize_with = "lenient_coordinate")]
        lon: Option<f64>,
        #[serde(default)]
        tags: Option<Tags>,
    },
    /// A way element with its node references and (with `out geom`) inline geometry.
    ///
    /// A `None` entry in `geometry` means the coordinate was not delivered or unreadable.
    Way {
        id: i64,
        #[serde(default)]
        nodes: Option<Vec<i64>>,
        #[serde(default, deserialize_with = "lenient_geometry")]
        geometry: Option<Vec<Option<GeoPoint>>>,
        #[serde(default)]
        tags: Option<Tags>,
    },
    /// A relation element and its members.
    Relation {
        id: i64,
        #[serde(default)]
        members: Vec<RelationMember>,
        #[serde(default)]
        tags: Option<Tags>,
    },
    /// Any element kind the map does not understand (`area`, `count`, ...).
    #[serde(other)]
    Other,
}

impl Element {
    /// The element's OSM id, if it has one.
    pub fn id(&self) -> Option<i64> {
        match self {
            Element::Node { id, .. } | Element::Way { id, .. } | Element::Relation { id, .. } => {
                Some(*id)
            }
            Element::Other => None,
        }
    }

    /// The element's tags, if any were delivered.
    pub fn tags(&self) -> Option<&Tags> {
        match self {
            Element::Node { tags, .. } | Element::Way { tags, .. } | Element::Relation { tags, .. } => {
                tags.as_ref()
            }
            Element::Other => None,
        }
    }
}

/// Kind of a relation member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    Node,
    Way,
    Relation,
    #[serde(other)]
    Other,
}

/// A member of a relation element.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RelationMember {
    /// Member element kind
    #[serde(rename = "type")]
    pub kind: MemberKind,
    /// Referenced element id
    #[serde(rename = "ref")]
    pub reference: i64,
    /// Member role (`outer`, `inner`, ...)
    #[serde(default)]
    pub role: String,
    /// Inline member geometry (way members with `out geom`)
    #[serde(default, deserialize_with = "lenient_geometry")]
    pub geometry: Option<Vec<Option<GeoPoint>>>,
}

/// Resolve an inline geometry array into coordinates.
///
/// Returns `None` when the geometry is absent or contains a `null` entry.
pub fn resolve_geometry(geometry: Option<&Vec<Option<GeoPoint>>>) -> Option<Vec<GeoPoint>> {
    geometry?.iter().copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "version": 0.6,
        "generator": "Overpass API",
        "elements": [
            {"type": "node", "id": 1, "lat": 46.95, "lon": 7.44, "tags": {"amenity": "cafe", "name": "Adrianos"}},
            {"type": "node", "id": 2, "lat": 46.96, "lon": 7.45},
            {"type": "way", "id": 10, "nodes": [2, 3],
             "geometry": [{"lat": 46.96, "lon": 7.45}, {"lat": 46.97, "lon": 7.46}],
             "tags": {"amenity": "cafe"}},
            {"type": "relation", "id": 100,
             "members": [{"type": "way", "ref": 10, "role": "outer",
                          "geometry": [{"lat": 1.0, "lon": 2.0}, null]}],
             "tags": {"type": "multipolygon"}},
            {"type": "area", "id": 3600000001}
        ]
    }"#;

    #[test]
    fn test_parse_sample_payload() {
        let payload = OverpassPayload::from_json(SAMPLE).unwrap();
        assert_eq!(payload.elements.len(), 5);

        match &payload.elements[0] {
            Element::Node { id, lat, lon, tags } => {
                assert_eq!(*id, 1);
                assert_eq!(*lat, Some(46.95));
                assert_eq!(*lon, Some(7.44));
                assert_eq!(tags.as_ref().unwrap()["name"], "Adrianos");
            }
            other => panic!("expected node, got {other:?}"),
        }

        assert!(payload.elements[1].tags().is_none());
        assert_eq!(payload.elements[4], Element::Other);
        assert_eq!(payload.elements[4].id(), None);
    }

    #[test]
    fn test_way_geometry_resolves() {
        let payload = OverpassPayload::from_json(SAMPLE).unwrap();
        let Element::Way { nodes, geometry, .. } = &payload.elements[2] else {
            panic!("expected way");
        };
        assert_eq!(nodes.as_deref(), Some(&[2, 3][..]));
        let coords = resolve_geometry(geometry.as_ref()).unwrap();
        assert_eq!(coords, vec![GeoPoint::new(46.96, 7.45), GeoPoint::new(46.97, 7.46)]);
    }

    #[test]
    fn test_null_member_geometry_is_unresolved() {
        let payload = OverpassPayload::from_json(SAMPLE).unwrap();
        let Element::Relation { members, .. } = &payload.elements[3] else {
            panic!("expected relation");
        };
        assert_eq!(members[0].kind, MemberKind::Way);
        assert_eq!(members[0].reference, 10);
        assert_eq!(members[0].role, "outer");
        assert!(resolve_geometry(members[0].geometry.as_ref()).is_none());
    }

    #[test]
    fn test_bad_coordinates_only_affect_their_element() {
        let payload = OverpassPayload::from_json(
            r#"{"elements": [
                {"type": "node", "id": 4, "lat": 46.9, "lon": 7.4},
                {"type": "node", "id": 5, "lat": "north", "lon": 7.4},
                {"type": "way", "id": 10, "geometry": [{"lat": 0, "lon": 0}, {"lat": 1}]},
                {"type": "way", "id": 11, "geometry": "none"}
            ]}"#,
        )
        .unwrap();

        assert_eq!(payload.elements.len(), 4);
        assert!(matches!(
            payload.elements[0],
            Element::Node { lat: Some(_), lon: Some(_), .. }
        ));
        assert!(matches!(payload.elements[1], Element::Node { lat: None, .. }));

        let Element::Way { geometry, .. } = &payload.elements[2] else {
            panic!("expected way");
        };
        assert_eq!(
            geometry.as_deref(),
            Some(&[Some(GeoPoint::new(0.0, 0.0)), None][..])
        );
        assert!(resolve_geometry(geometry.as_ref()).is_none());

        let Element::Way { geometry, .. } = &payload.elements[3] else {
            panic!("expected way");
        };
        assert!(geometry.is_none());
    }

    #[test]
    fn test_missing_elements_defaults_to_empty() {
        let payload = OverpassPayload::from_json("{}").unwrap();
        assert!(payload.elements.is_empty());
    }
}
