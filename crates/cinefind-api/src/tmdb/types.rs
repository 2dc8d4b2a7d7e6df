//! TMDB API response types and listing selection.

use serde::Deserialize;

use super::error::{CatalogError, GENERIC_FETCH_FAILURE};

/// Base URL for poster images (w500 rendition).
pub const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// Sort order used for the default listing.
const POPULARITY_DESC: &str = "popularity.desc";

// --- Listing selection ---

/// Which catalog listing to request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MovieQuery {
    /// `search/movie` with the given text.
    Search(String),
    /// `discover/movie` sorted by descending popularity.
    Popular,
}

impl MovieQuery {
    /// Selects the listing for the given search text.
    ///
    /// Empty text selects the popularity listing; anything else, including
    /// whitespace, is searched as typed.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        if text.is_empty() {
            Self::Popular
        } else {
            Self::Search(String::from(text))
        }
    }

    /// Endpoint path relative to the API base URL.
    #[must_use]
    pub const fn path(&self) -> &'static str {
        match self {
            Self::Search(_) => "search/movie",
            Self::Popular => "discover/movie",
        }
    }

    /// Query string pairs for the endpoint (encoded by the HTTP client).
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Search(text) => vec![("query", text.clone())],
            Self::Popular => vec![("sort_by", String::from(POPULARITY_DESC))],
        }
    }
}

// --- Listing response ---

/// Body of a listing response.
///
/// `results` is kept as raw JSON so that a missing or non-array field can
/// be treated as an empty listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogResponse {
    /// Raw `results` field.
    #[serde(default)]
    pub results: Option<serde_json::Value>,
    /// Logical status flag (`"False"` on failure).
    #[serde(rename = "Response", default)]
    pub response: Option<String>,
    /// Logical failure message.
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
}

impl CatalogResponse {
    /// Interprets the body as a movie list.
    ///
    /// Entries of `results` that are not movies are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Logical`] if the body reports `Response: "False"`;
    /// the message falls back to [`GENERIC_FETCH_FAILURE`] when absent.
    pub fn into_movies(self) -> Result<Vec<Movie>, CatalogError> {
        if self.response.as_deref() == Some("False") {
            let message = self
                .error
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| String::from(GENERIC_FETCH_FAILURE));
            return Err(CatalogError::Logical(message));
        }

        let Some(serde_json::Value::Array(items)) = self.results else {
            return Ok(Vec::new());
        };
        Ok(items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| match serde_json::from_value::<Movie>(item) {
                Ok(movie) => Some(movie),
                Err(e) => {
                    tracing::warn!(index, error = %e, "Skipping malformed results entry");
                    None
                }
            })
            .collect())
    }
}

/// A single movie from a listing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Movie {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    pub title: String,
    /// Poster image path.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Release date (YYYY-MM-DD, may be empty).
    #[serde(default)]
    pub release_date: Option<String>,
    /// Vote average.
    #[serde(default)]
    pub vote_average: Option<f64>,
    /// Original language (ISO 639-1).
    #[serde(default)]
    pub original_language: Option<String>,
}

impl Movie {
    /// Full poster URL, if the movie has a poster.
    #[must_use]
    pub fn poster_url(&self) -> Option<String> {
        self.poster_path
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(|p| format!("{POSTER_BASE_URL}{p}"))
    }

    /// Release year taken from `release_date`.
    #[must_use]
    pub fn release_year(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .and_then(|d| d.split('-').next())
            .filter(|y| !y.is_empty())
    }
}

// --- Error Response ---

/// TMDB API error response body.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TmdbErrorResponse {
    /// TMDB error code.
    pub status_code: u32,
    /// Error message.
    pub status_message: String,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;

    #[test]
    fn test_empty_text_selects_popular() {
        // Arrange & Act
        let query = MovieQuery::from_text("");

        // Assert
        assert_eq!(query, MovieQuery::Popular);
        assert_eq!(query.path(), "discover/movie");
        assert_eq!(
            query.query_pairs(),
            vec![("sort_by", String::from("popularity.desc"))]
        );
    }

    #[test]
    fn test_text_selects_search() {
        // Arrange & Act
        let query = MovieQuery::from_text("star wars");

        // Assert
        assert_eq!(query.path(), "search/movie");
        assert_eq!(
            query.query_pairs(),
            vec![("query", String::from("star wars"))]
        );
    }

    #[test]
    fn test_whitespace_is_searched_as_typed() {
        // Arrange & Act
        let query = MovieQuery::from_text(" ");

        // Assert
        assert_eq!(query, MovieQuery::Search(String::from(" ")));
    }

    #[test]
    fn test_into_movies_keeps_order() {
        // Arrange
        let body: CatalogResponse = serde_json::from_str(
            r#"{"results":[{"id":1,"title":"A"},{"id":2,"title":"B"}]}"#,
        )
        .unwrap();

        // Act
        let movies = body.into_movies().unwrap();

        // Assert
        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].id, 1);
        assert_eq!(movies[0].title, "A");
        assert_eq!(movies[1].id, 2);
        assert_eq!(movies[1].title, "B");
        assert!(movies[0].poster_path.is_none());
    }

    #[test]
    fn test_into_movies_missing_results_is_empty() {
        // Arrange
        let body: CatalogResponse = serde_json::from_str(r#"{"page":1}"#).unwrap();

        // Act & Assert
        assert!(body.into_movies().unwrap().is_empty());
    }

    #[test]
    fn test_into_movies_non_array_results_is_empty() {
        // Arrange
        let body: CatalogResponse =
            serde_json::from_str(r#"{"results":{"id":1,"title":"A"}}"#).unwrap();

        // Act & Assert
        assert!(body.into_movies().unwrap().is_empty());
    }

    #[test]
    fn test_into_movies_logical_error() {
        // Arrange
        let body: CatalogResponse =
            serde_json::from_str(r#"{"Response":"False","Error":"No results"}"#).unwrap();

        // Act
        let result = body.into_movies();

        // Assert
        assert_eq!(
            result.unwrap_err(),
            CatalogError::Logical(String::from("No results"))
        );
    }

    #[test]
    fn test_into_movies_logical_error_without_message() {
        // Arrange
        let body: CatalogResponse = serde_json::from_str(r#"{"Response":"False"}"#).unwrap();

        // Act
        let err = body.into_movies().unwrap_err();

        // Assert
        assert_eq!(err.user_message(), GENERIC_FETCH_FAILURE);
    }

    #[test]
    fn test_into_movies_skips_malformed_entries() {
        // Arrange
        let body: CatalogResponse = serde_json::from_str(
            r#"{"results":[{"id":1,"title":null},{"title":"no id"},{"id":2,"title":"B"}]}"#,
        )
        .unwrap();

        // Act
        let movies = body.into_movies().unwrap();

        // Assert
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].id, 2);
        assert_eq!(movies[0].title, "B");
    }

    #[test]
    fn test_parse_search_movie_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/tmdb/search_movie_inception.json");

        // Act
        let response: CatalogResponse = serde_json::from_str(json).unwrap();
        let movies = response.into_movies().unwrap();

        // Assert
        assert_eq!(movies.len(), 3);
        let first = &movies[0];
        assert_eq!(first.id, 27_205);
        assert_eq!(first.title, "Inception");
        assert_eq!(first.release_year(), Some("2010"));
        assert_eq!(
            first.poster_url().as_deref(),
            Some("https://image.tmdb.org/t/p/w500/oYuLEt3zVCKq57qu2F8dT7NIa6f.jpg")
        );
        assert!(movies[2].poster_url().is_none());
        assert!(movies[2].release_year().is_none());
    }

    #[test]
    fn test_parse_error_response() {
        // Arrange
        let json = r#"{"status_code":7,"status_message":"Invalid API key: You must be granted a valid key.","success":false}"#;

        // Act
        let error: TmdbErrorResponse = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(error.status_code, 7);
        assert!(error.status_message.contains("Invalid API key"));
    }
}
