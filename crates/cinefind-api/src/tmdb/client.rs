//! `TmdbClient` - TMDB API client implementation.

use anyhow::{Context, Result};
use reqwest::Client;
use reqwest::header::ACCEPT;
use tracing::instrument;
use url::Url;

use super::api::CatalogApi;
use super::error::CatalogError;
use super::types::{CatalogResponse, MovieQuery, TmdbErrorResponse};

/// Default base URL for TMDB API v3.
const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// TMDB API client.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// Bearer API token.
    api_token: String,
    /// Response language sent with every request, if set.
    language: Option<String>,
}

/// Builder for `TmdbClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClientBuilder {
    base_url: Option<Url>,
    api_token: Option<String>,
    user_agent: Option<String>,
    language: Option<String>,
}

impl TmdbClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            api_token: None,
            user_agent: None,
            language: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the API bearer token (required).
    #[must_use]
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the response language (e.g. "ja-JP"). TMDB defaults to "en-US".
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `api_token` is not set.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<TmdbClient> {
        let api_token = self.api_token.context("api_token is required")?;
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(TmdbClient {
            http_client,
            base_url,
            api_token,
            language: self.language,
        })
    }
}

impl TmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> TmdbClientBuilder {
        TmdbClientBuilder::new()
    }

    /// Sends a GET request with Bearer auth and JSON accept header.
    ///
    /// No retry: any failure is returned to the caller as-is.
    #[instrument(skip_all)]
    async fn get_json(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> std::result::Result<CatalogResponse, CatalogError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| CatalogError::Transport(format!("failed to join URL path {path}: {e}")))?;

        let mut request = self
            .http_client
            .get(url)
            .bearer_auth(&self.api_token)
            .header(ACCEPT, "application/json")
            .query(query);
        if let Some(ref language) = self.language {
            request = request.query(&[("language", language)]);
        }
        let request = request
            .build()
            .map_err(|e| CatalogError::Transport(format!("failed to build request {path}: {e}")))?;

        tracing::debug!(url = %request.url(), "TMDB API request");

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|e| CatalogError::Transport(format!("request failed {path}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<failed to read body>"));
            if let Ok(error_response) = serde_json::from_str::<TmdbErrorResponse>(&body) {
                return Err(CatalogError::Transport(format!(
                    "TMDB API error (HTTP {}): code={}, message={}",
                    status, error_response.status_code, error_response.status_message,
                )));
            }
            return Err(CatalogError::Transport(format!(
                "TMDB API error (HTTP {status}): {body}"
            )));
        }

        let body = response.text().await.map_err(|e| {
            CatalogError::Transport(format!("failed to read response body {path}: {e}"))
        })?;
        serde_json::from_str(&body).map_err(|e| CatalogError::Decode(format!("{path}: {e}")))
    }
}

impl CatalogApi for TmdbClient {
    #[instrument(skip_all)]
    async fn fetch_listing(
        &self,
        query: &MovieQuery,
    ) -> std::result::Result<CatalogResponse, CatalogError> {
        self.get_json(query.path(), &query.query_pairs()).await
    }
}
