//! Remote collaborator seams.
//!
//! The core crate only talks to these traits, so tests and offline demos can substitute
//! canned implementations for the HTTP clients in [`crate::http`].

use crate::bbox::BoundingBox;
use crate::error::ClientError;
use crate::payload::OverpassPayload;
use crate::tag::TagQuery;

/// Text shown when no description exists for a tag.
pub const NO_DESCRIPTION: &str = "No description available.";

/// Executes a tag search inside a bounding box.
pub trait GeodataQueryClient: Send + Sync {
    fn query(&self, tag: &TagQuery, bbox: &BoundingBox) -> Result<OverpassPayload, ClientError>;
}

/// Human readable description of a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagDescription {
    pub description: String,
}

impl TagDescription {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }

    /// The fallback description.
    pub fn unavailable() -> Self {
        Self::new(NO_DESCRIPTION)
    }

    pub fn is_available(&self) -> bool {
        self.description != NO_DESCRIPTION
    }
}

/// Looks up tag descriptions.
///
/// Never fails: any lookup problem yields [`TagDescription::unavailable`].
pub trait TagDescriptionClient: Send + Sync {
    fn describe(&self, tag: &TagQuery) -> TagDescription;
}

/// Suggests tags for partial search input.
pub trait TagSuggestionClient: Send + Sync {
    fn suggest(&self, partial: &str) -> Result<Vec<String>, ClientError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_description() {
        let unavailable = TagDescription::unavailable();
        assert_eq!(unavailable.description, NO_DESCRIPTION);
        assert!(!unavailable.is_available());
        assert!(TagDescription::new("A cafe").is_available());
    }
}
