//! Catalog error taxonomy.

/// Message shown for any failure that is not reported by the catalog itself.
pub const GENERIC_FETCH_FAILURE: &str = "Failed to fetch movies.";

/// Errors returned by the catalog client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[allow(clippy::module_name_repetitions)]
pub enum CatalogError {
    /// Network failure or non-success HTTP status.
    #[error("catalog request failed: {0}")]
    Transport(String),
    /// Success status, but the body reports a domain-level failure.
    #[error("catalog reported an error: {0}")]
    Logical(String),
    /// Success status, but the body could not be decoded.
    #[error("failed to decode catalog response: {0}")]
    Decode(String),
}

impl CatalogError {
    /// Returns the text to display in place of the movie list.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::Logical(message) => message,
            Self::Transport(_) | Self::Decode(_) => GENERIC_FETCH_FAILURE,
        }
    }
}
