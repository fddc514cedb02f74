//! # `bevy_osmlayers_overpass`
//!
//! Data acquisition layer for `bevy_osmlayers`: the raw Overpass result model, tag query
//! parsing, bounding boxes, Overpass QL generation and the three remote collaborators the
//! map needs (geodata query, tag description, tag suggestion).
//!
//! **This crate has no ECS concerns.** It does not create layers, pick colors or render
//! anything; it only turns a tag and a bounding box into a payload (and a tag into text).
//!
//! ## Architecture
//!
//! Layer 1 (this crate) sits below:
//! - **Layer 2** (`bevy_osmlayers_core`): layer registry, ingestion and the Bevy plugin
//! - **Layer 3** (`bevy_osmlayers_gizmos`): rendering
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use bevy_osmlayers_overpass::prelude::*;
//!
//! let client = OverpassClient::new(&EndpointConfig::default()).unwrap();
//! let tag: TagQuery = "amenity=cafe".parse().unwrap();
//! let payload = client.query(&tag, &BoundingBox::SWITZERLAND).unwrap();
//! println!("{} elements", payload.elements.len());
//! ```

pub mod bbox;
pub mod client;
pub mod error;
pub mod http;
pub mod payload;
pub mod query;
pub mod tag;

pub mod prelude {
    //! Common imports for `bevy_osmlayers_overpass` users.

    pub use crate::bbox::BoundingBox;
    pub use crate::client::{
        GeodataQueryClient, NO_DESCRIPTION, TagDescription, TagDescriptionClient,
        TagSuggestionClient,
    };
    pub use crate::error::ClientError;
    pub use crate::http::{EndpointConfig, OverpassClient, TagFinderClient, TagInfoClient};
    pub use crate::payload::{Element, GeoPoint, OverpassPayload, RelationMember};
    pub use crate::query::build_query;
    pub use crate::tag::TagQuery;
}

pub use bbox::BoundingBox;
pub use error::ClientError;
pub use tag::TagQuery;
