//! Discovery page state.

use cinefind_api::tmdb::{CatalogError, Movie};
use cinefind_db::TrendingEntry;

/// Everything the discovery page shows.
///
/// `loading` is true only while the latest search is in flight, and
/// `movies` is empty whenever `error` is set.
#[derive(Debug, Clone, Default, PartialEq)]
#[allow(clippy::module_name_repetitions)]
pub struct PageState {
    /// Text in the search box, updated on every keystroke.
    pub query: String,
    /// Query value that last settled through the debouncer.
    pub debounced_query: String,
    /// Results of the latest applied search, in catalog order.
    pub movies: Vec<Movie>,
    /// A search is in flight.
    pub loading: bool,
    /// Message of the latest failed search.
    pub error: Option<String>,
    /// Most frequent searches, loaded once.
    pub trending: Vec<TrendingEntry>,
    /// Cursor position in the results list.
    pub selected: usize,
}

impl PageState {
    /// Marks a search as started.
    pub fn begin_search(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Stores the outcome of a search and clears the loading flag.
    pub fn settle(&mut self, outcome: Result<Vec<Movie>, CatalogError>) {
        match outcome {
            Ok(movies) => {
                self.movies = movies;
                self.error = None;
            }
            Err(e) => {
                self.movies.clear();
                self.error = Some(String::from(e.user_message()));
            }
        }
        self.loading = false;
        self.selected = 0;
    }

    /// Movie under the cursor.
    #[must_use]
    pub fn selected_movie(&self) -> Option<&Movie> {
        self.movies.get(self.selected)
    }

    /// Moves the cursor up by `step` rows, stopping at the first row.
    pub const fn move_up(&mut self, step: usize) {
        self.selected = self.selected.saturating_sub(step);
    }

    /// Moves the cursor down by `step` rows, stopping at the last row.
    pub fn move_down(&mut self, step: usize) {
        let last = self.movies.len().saturating_sub(1);
        self.selected = self.selected.saturating_add(step).min(last);
    }
}
