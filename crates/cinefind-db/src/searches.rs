//! Search metric CRUD operations.

use anyhow::{Context, Result};
use cinefind_api::tmdb::Movie;
use rusqlite::Connection;

/// The top result recorded for a search term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    /// TMDB movie ID.
    pub movie_id: u64,
    /// Movie title.
    pub title: String,
    /// Full poster URL.
    pub poster_url: Option<String>,
}

impl SearchHit {
    /// Builds a hit from the first movie of a listing.
    #[must_use]
    pub fn from_movie(movie: &Movie) -> Self {
        Self {
            movie_id: movie.id,
            title: movie.title.clone(),
            poster_url: movie.poster_url(),
        }
    }
}

/// A trending search, ranked by how often its term was searched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendingEntry {
    /// TMDB movie ID of the recorded top result.
    pub id: u64,
    /// Movie title.
    pub title: String,
    /// Full poster URL.
    pub poster_url: Option<String>,
    /// 1-based position in the trending list.
    pub rank: usize,
    /// Number of times the term was searched.
    pub count: u32,
}

/// Records a search for `term` whose first result was `hit`.
///
/// A term seen before only has its count incremented; the movie recorded
/// the first time is kept.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn record_search(conn: &Connection, term: &str, hit: &SearchHit) -> Result<()> {
    conn.execute(
        "INSERT INTO search_metrics (search_term, count, movie_id, title, poster_url)
         VALUES (?1, 1, ?2, ?3, ?4)
         ON CONFLICT(search_term) DO UPDATE SET
            count = count + 1,
            updated_at = datetime('now')",
        rusqlite::params![term, hit.movie_id, hit.title, hit.poster_url],
    )
    .with_context(|| format!("failed to record search {term:?}"))?;

    tracing::debug!(term, movie_id = hit.movie_id, "Recorded search");
    Ok(())
}

/// Loads the most frequent searches, highest count first.
///
/// Ties keep the order in which terms were first recorded.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn load_trending(conn: &Connection, limit: usize) -> Result<Vec<TrendingEntry>> {
    let limit = i64::try_from(limit).context("trending limit out of range")?;

    let mut stmt = conn
        .prepare(
            "SELECT movie_id, title, poster_url, count FROM search_metrics
             ORDER BY count DESC, rowid ASC
             LIMIT ?1",
        )
        .context("failed to prepare trending query")?;

    let rows = stmt
        .query_map([limit], |row| {
            Ok((
                row.get::<_, u64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, u32>(3)?,
            ))
        })
        .context("failed to query trending")?;

    let rows = rows
        .collect::<std::result::Result<Vec<_>, _>>()
        .context("failed to read trending rows")?;

    Ok(rows
        .into_iter()
        .enumerate()
        .map(|(i, (id, title, poster_url, count))| TrendingEntry {
            id,
            title,
            poster_url,
            rank: i.saturating_add(1),
            count,
        })
        .collect())
}
