//! Client error type.

use thiserror::Error;

/// Failure of a remote collaborator call.
///
/// Callers treat every variant the same way: the operation that triggered the call simply
/// produces no result.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{service} returned HTTP {status}")]
    Status { service: &'static str, status: u16 },

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid tag query: {0:?}")]
    InvalidTag(String),
}
