//! Blocking HTTP implementations of the collaborator traits.
//!
//! All three clients are synchronous; the core plugin calls them from worker threads so the
//! Bevy schedule never waits on the network.

use std::time::Duration;

use bevy::log::{debug, warn};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::bbox::BoundingBox;
use crate::client::{
    GeodataQueryClient, TagDescription, TagDescriptionClient, TagSuggestionClient,
};
use crate::error::ClientError;
use crate::payload::OverpassPayload;
use crate::query::build_query;
use crate::tag::TagQuery;

/// Remote endpoint settings shared by the HTTP clients.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EndpointConfig {
    /// Overpass interpreter URL
    pub overpass_url: String,
    /// Taginfo API base URL (without trailing slash)
    pub taginfo_url: String,
    /// Tagfinder search URL
    pub tagfinder_url: String,
    /// Request timeout, also sent as the Overpass `[timeout:N]` setting
    pub timeout_secs: u32,
    pub user_agent: String,
    /// Preferred language for descriptions and suggestions
    pub language: String,
    /// Maximum number of suggestions returned
    pub suggestion_limit: usize,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            overpass_url: "http://overpass.osm.ch/api/interpreter".to_string(),
            taginfo_url: "https://taginfo.openstreetmap.org/api/4".to_string(),
            tagfinder_url: "https://tagfinder.osm.ch/api/search".to_string(),
            timeout_secs: 25,
            user_agent: concat!("bevy_osmlayers/", env!("CARGO_PKG_VERSION")).to_string(),
            language: "en".to_string(),
            suggestion_limit: 5,
        }
    }
}

impl EndpointConfig {
    fn build_client(&self) -> Result<Client, ClientError> {
        Ok(Client::builder()
            .user_agent(self.user_agent.clone())
            .timeout(Duration::from_secs(u64::from(self.timeout_secs)))
            .build()?)
    }
}

fn get_json<T: DeserializeOwned>(
    client: &Client,
    service: &'static str,
    url: &str,
    params: &[(&str, &str)],
) -> Result<T, ClientError> {
    let response = client.get(url).query(params).send()?;
    let status = response.status();
    if !status.is_success() {
        return Err(ClientError::Status {
            service,
            status: status.as_u16(),
        });
    }
    let body = response.text()?;
    Ok(serde_json::from_str(&body)?)
}

/// Overpass API client.
#[derive(Debug, Clone)]
pub struct OverpassClient {
    client: Client,
    url: String,
    timeout_secs: u32,
}

impl OverpassClient {
    pub fn new(config: &EndpointConfig) -> Result<Self, ClientError> {
        Ok(Self {
            client: config.build_client()?,
            url: config.overpass_url.clone(),
            timeout_secs: config.timeout_secs,
        })
    }
}

impl GeodataQueryClient for OverpassClient {
    fn query(&self, tag: &TagQuery, bbox: &BoundingBox) -> Result<OverpassPayload, ClientError> {
        let query = build_query(tag, bbox, self.timeout_secs);
        debug!("Overpass query for {} in {}", tag, bbox.to_overpass());
        get_json(&self.client, "overpass", &self.url, &[("data", query.as_str())])
    }
}

#[derive(Debug, Deserialize)]
struct WikiPagesResponse {
    #[serde(default)]
    data: Vec<WikiPage>,
}

#[derive(Debug, Deserialize)]
struct WikiPage {
    #[serde(default)]
    lang: String,
    #[serde(default)]
    description: String,
}

/// Pick the best description: preferred language, then English, then the fallback text.
fn pick_description(response: &WikiPagesResponse, language: &str) -> TagDescription {
    let find = |lang: &str| {
        response
            .data
            .iter()
            .find(|page| page.lang == lang)
            .map(|page| page.description.as_str())
            .filter(|description| !description.is_empty())
    };

    find(language)
        .or_else(|| find("en"))
        .map(TagDescription::new)
        .unwrap_or_else(TagDescription::unavailable)
}

/// Taginfo wiki-page lookup client.
#[derive(Debug, Clone)]
pub struct TagInfoClient {
    client: Client,
    base_url: String,
    language: String,
}

impl TagInfoClient {
    pub fn new(config: &EndpointConfig) -> Result<Self, ClientError> {
        Ok(Self {
            client: config.build_client()?,
            base_url: config.taginfo_url.trim_end_matches('/').to_string(),
            language: config.language.clone(),
        })
    }

    fn fetch(&self, tag: &TagQuery) -> Result<WikiPagesResponse, ClientError> {
        match &tag.value {
            Some(value) => get_json(
                &self.client,
                "taginfo",
                &format!("{}/tag/wiki_pages", self.base_url),
                &[("key", tag.key.as_str()), ("value", value.as_str())],
            ),
            None => get_json(
                &self.client,
                "taginfo",
                &format!("{}/key/wiki_pages", self.base_url),
                &[("key", tag.key.as_str())],
            ),
        }
    }
}

impl TagDescriptionClient for TagInfoClient {
    fn describe(&self, tag: &TagQuery) -> TagDescription {
        match self.fetch(tag) {
            Ok(response) => pick_description(&response, &self.language),
            Err(e) => {
                warn!("Failed to fetch description for {}: {}", tag, e);
                TagDescription::unavailable()
            }
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TagFinderEntry {
    #[serde(default)]
    pref_label: String,
}

fn take_labels(entries: Vec<TagFinderEntry>, limit: usize) -> Vec<String> {
    entries
        .into_iter()
        .map(|entry| entry.pref_label)
        .filter(|label| !label.is_empty())
        .take(limit)
        .collect()
}

/// Tagfinder suggestion client.
#[derive(Debug, Clone)]
pub struct TagFinderClient {
    client: Client,
    url: String,
    language: String,
    limit: usize,
}

impl TagFinderClient {
    pub fn new(config: &EndpointConfig) -> Result<Self, ClientError> {
        Ok(Self {
            client: config.build_client()?,
            url: config.tagfinder_url.clone(),
            language: config.language.clone(),
            limit: config.suggestion_limit,
        })
    }
}

impl TagSuggestionClient for TagFinderClient {
    fn suggest(&self, partial: &str) -> Result<Vec<String>, ClientError> {
        let entries: Vec<TagFinderEntry> = get_json(
            &self.client,
            "tagfinder",
            &self.url,
            &[
                ("query", partial),
                ("lang", self.language.as_str()),
                ("sortname", "count_all"),
                ("sortorder", "desc"),
                ("page", "1"),
                ("rp", "10"),
            ],
        )?;
        Ok(take_labels(entries, self.limit))
    }
}
