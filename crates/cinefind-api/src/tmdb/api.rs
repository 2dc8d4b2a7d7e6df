//! `CatalogApi` trait definition.
#![allow(clippy::future_not_send)]

use super::error::CatalogError;
use super::types::{CatalogResponse, MovieQuery};

/// Movie catalog trait.
///
/// Abstracts the listing request for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[trait_variant::make(CatalogApi: Send)]
pub trait LocalCatalogApi {
    /// Fetches the listing selected by `query` and returns the decoded body.
    ///
    /// A body that reports a logical failure (`Response: "False"`) is still
    /// returned as `Ok`; use [`CatalogResponse::into_movies`] to interpret it.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Transport`] on network failure or a non-success
    /// HTTP status, and [`CatalogError::Decode`] if the body is not JSON.
    async fn fetch_listing(&self, query: &MovieQuery) -> Result<CatalogResponse, CatalogError>;
}
