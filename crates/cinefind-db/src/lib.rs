//! Search analytics store for cinefind.
//!
//! Uses `rusqlite` (bundled `SQLite`) to count which search terms were
//! used and which movie they surfaced first, and serves the most frequent
//! terms as a trending list.

mod analytics;
mod connection;
mod migrations;
/// Search metric CRUD operations.
pub mod searches;
mod store;

#[allow(clippy::module_name_repetitions)]
pub use analytics::{AnalyticsStore, LocalAnalyticsStore};
pub use connection::{home_dir, open_db, resolve_data_dir};
pub use searches::{SearchHit, TrendingEntry, load_trending, record_search};
#[allow(clippy::module_name_repetitions)]
pub use store::SqliteAnalyticsStore;
