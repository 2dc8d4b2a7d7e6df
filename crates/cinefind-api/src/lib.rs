//! Movie catalog client library for cinefind.
//!
//! Provides a client for the TMDB v3 movie listing endpoints.

/// TMDB API client.
pub mod tmdb;
