//! OSM tag queries (`key=value` or bare `key`).

use std::fmt;
use std::str::FromStr;

use crate::error::ClientError;

/// A tag to search for.
///
/// Parsed from the search box text: everything before the first `=` is the key, everything
/// after it the value. A bare key matches any value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TagQuery {
    /// Tag key, e.g. `amenity`
    pub key: String,
    /// Tag value, e.g. `cafe`
    pub value: Option<String>,
}

impl TagQuery {
    /// Create a `key=value` query.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
        }
    }

    /// Create a key-only query.
    pub fn key(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: None,
        }
    }
}

impl FromStr for TagQuery {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (key, value) = match trimmed.split_once('=') {
            Some((key, value)) => (key.trim(), Some(value.trim())),
            None => (trimmed, None),
        };

        if key.is_empty() {
            return Err(ClientError::InvalidTag(s.to_string()));
        }

        Ok(Self {
            key: key.to_string(),
            value: value.filter(|v| !v.is_empty()).map(str::to_string),
        })
    }
}

impl fmt::Display for TagQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}={}", self.key, value),
            None => f.write_str(&self.key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_value() {
        let tag: TagQuery = "amenity=cafe".parse().unwrap();
        assert_eq!(tag, TagQuery::new("amenity", "cafe"));
        assert_eq!(tag.to_string(), "amenity=cafe");
    }

    #[test]
    fn test_parse_splits_on_first_equals() {
        let tag: TagQuery = "note=a=b".parse().unwrap();
        assert_eq!(tag.key, "note");
        assert_eq!(tag.value.as_deref(), Some("a=b"));
    }

    #[test]
    fn test_parse_bare_key() {
        let tag: TagQuery = " building ".parse().unwrap();
        assert_eq!(tag, TagQuery::key("building"));
        assert_eq!(tag.to_string(), "building");

        let trailing: TagQuery = "building=".parse().unwrap();
        assert_eq!(trailing.value, None);
    }

    #[test]
    fn test_parse_rejects_empty_key() {
        assert!(matches!(
            "=cafe".parse::<TagQuery>(),
            Err(ClientError::InvalidTag(_))
        ));
        assert!("".parse::<TagQuery>().is_err());
    }
}
