//! Projection of [`PageState`] into what the screen shows.

use cinefind_api::tmdb::Movie;
use cinefind_db::TrendingEntry;

use crate::state::PageState;

/// Shown when a movie has no poster.
pub const NO_POSTER: &str = "(no poster)";

/// Shown for a missing rating or release year.
pub const NOT_AVAILABLE: &str = "N/A";

/// Everything needed to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    /// Search box contents (the live query, not the debounced one).
    pub search: String,
    /// Trending rows; the section is hidden when empty.
    pub trending: Vec<TrendingRow>,
    /// Results area.
    pub results: ResultsView,
}

/// One trending entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendingRow {
    /// 1-based rank.
    pub rank: usize,
    /// Movie title.
    pub title: String,
    /// Poster URL or [`NO_POSTER`].
    pub poster: String,
}

/// Results area contents, in order of precedence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultsView {
    /// A search is in flight.
    Loading,
    /// The latest search failed.
    Error(String),
    /// Movie cards in catalog order.
    Movies {
        /// Cards to list.
        cards: Vec<MovieCard>,
        /// Highlighted card.
        selected: usize,
    },
}

/// Display fields of one movie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieCard {
    /// Movie title.
    pub title: String,
    /// Vote average with one decimal, or [`NOT_AVAILABLE`].
    pub rating: String,
    /// Original language code, or [`NOT_AVAILABLE`].
    pub language: String,
    /// Release year, or [`NOT_AVAILABLE`].
    pub year: String,
    /// Poster URL or [`NO_POSTER`].
    pub poster: String,
}

impl MovieCard {
    /// Builds the card for `movie`.
    #[must_use]
    pub fn from_movie(movie: &Movie) -> Self {
        Self {
            title: movie.title.clone(),
            rating: format_rating(movie.vote_average),
            language: movie
                .original_language
                .clone()
                .filter(|l| !l.is_empty())
                .unwrap_or_else(|| String::from(NOT_AVAILABLE)),
            year: String::from(movie.release_year().unwrap_or(NOT_AVAILABLE)),
            poster: movie
                .poster_url()
                .unwrap_or_else(|| String::from(NO_POSTER)),
        }
    }
}

impl TrendingRow {
    fn from_entry(entry: &TrendingEntry) -> Self {
        Self {
            rank: entry.rank,
            title: entry.title.clone(),
            poster: entry
                .poster_url
                .clone()
                .unwrap_or_else(|| String::from(NO_POSTER)),
        }
    }
}

/// Projects `state` into a [`PageView`].
///
/// Loading takes precedence over an error, and an error over results.
#[must_use]
pub fn view(state: &PageState) -> PageView {
    let results = if state.loading {
        ResultsView::Loading
    } else if let Some(message) = &state.error {
        ResultsView::Error(message.clone())
    } else {
        ResultsView::Movies {
            cards: state.movies.iter().map(MovieCard::from_movie).collect(),
            selected: state.selected,
        }
    };

    PageView {
        search: state.query.clone(),
        trending: state.trending.iter().map(TrendingRow::from_entry).collect(),
        results,
    }
}

/// A zero or missing average counts as unrated.
fn format_rating(vote_average: Option<f64>) -> String {
    vote_average
        .filter(|v| v.abs() > 0.0)
        .map_or_else(|| String::from(NOT_AVAILABLE), |v| format!("{v:.1}"))
}
