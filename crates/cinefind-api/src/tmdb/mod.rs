//! TMDB API client module.
//!
//! Handles HTTP requests to the TMDB API v3 movie search and
//! discovery endpoints.

mod api;
mod client;
mod error;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{CatalogApi, LocalCatalogApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{TmdbClient, TmdbClientBuilder};
pub use error::{CatalogError, GENERIC_FETCH_FAILURE};
pub use types::{CatalogResponse, Movie, MovieQuery, POSTER_BASE_URL};
