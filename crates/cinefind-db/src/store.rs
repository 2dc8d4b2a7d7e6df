//! `SqliteAnalyticsStore` - `SQLite` implementation of `AnalyticsStore`.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result, anyhow};
use cinefind_api::tmdb::Movie;
use rusqlite::Connection;

use super::analytics::AnalyticsStore;
use super::connection::open_db;
use super::searches::{SearchHit, TrendingEntry, load_trending, record_search};

/// Analytics store backed by the local `SQLite` database.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct SqliteAnalyticsStore {
    /// Connection, used only from the blocking thread pool.
    conn: Arc<Mutex<Connection>>,
}

impl SqliteAnalyticsStore {
    /// Opens the store in `dir` (or the default data directory).
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open(dir: Option<&PathBuf>) -> Result<Self> {
        let conn = open_db(dir).context("failed to open analytics database")?;
        Ok(Self::from_connection(conn))
    }

    /// Wraps an already migrated connection.
    #[must_use]
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Runs `op` with the connection on the blocking thread pool.
    async fn with_connection<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|_| anyhow!("analytics connection lock poisoned"))?;
            op(&conn)
        })
        .await
        .context("analytics task failed")?
    }
}

impl AnalyticsStore for SqliteAnalyticsStore {
    async fn record_search(&self, query: &str, top_result: &Movie) -> Result<()> {
        let hit = SearchHit::from_movie(top_result);
        let query = query.to_owned();
        self.with_connection(move |conn| record_search(conn, &query, &hit))
            .await
    }

    async fn trending(&self, limit: usize) -> Result<Vec<TrendingEntry>> {
        self.with_connection(move |conn| load_trending(conn, limit))
            .await
    }
}
