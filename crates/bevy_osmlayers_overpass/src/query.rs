//! Overpass QL generation.

use crate::bbox::BoundingBox;
use crate::tag::TagQuery;

/// Build the tag selector, e.g. `["amenity"="cafe"]` or `["building"]`.
pub fn tag_selector(tag: &TagQuery) -> String {
    match &tag.value {
        Some(value) => format!("[\"{}\"=\"{}\"]", escape(&tag.key), escape(value)),
        None => format!("[\"{}\"]", escape(&tag.key)),
    }
}

/// Build a complete `[out:json]` query for `tag` inside `bbox`.
///
/// Nodes, ways and relations are selected with `out geom`, followed by a recursion
/// (`>; out skel qt;`) so the result also contains the nodes that make up every matched way.
pub fn build_query(tag: &TagQuery, bbox: &BoundingBox, timeout_secs: u32) -> String {
    let selector = tag_selector(tag);
    let area = bbox.to_overpass();

    let mut query = format!("[out:json][timeout:{timeout_secs}];\n(\n");
    for kind in ["node", "way", "relation"] {
        query.push_str(&format!("  {kind}{selector}({area});\n"));
    }
    query.push_str(");\nout geom;\n>;\nout skel qt;\n");
    query
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
