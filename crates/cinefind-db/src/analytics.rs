//! `AnalyticsStore` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::Result;
use cinefind_api::tmdb::Movie;

use super::searches::TrendingEntry;

/// Search analytics trait.
///
/// Abstracts the store for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(AnalyticsStore: Send)]
pub trait LocalAnalyticsStore {
    /// Records that `query` was searched and `top_result` came back first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    async fn record_search(&self, query: &str, top_result: &Movie) -> Result<()>;

    /// Returns up to `limit` trending entries, highest rank first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    async fn trending(&self, limit: usize) -> Result<Vec<TrendingEntry>>;
}
