//! Mock catalog and analytics store shared by unit tests.
#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use cinefind_api::tmdb::{CatalogApi, CatalogError, CatalogResponse, Movie, MovieQuery};
use cinefind_db::{AnalyticsStore, TrendingEntry};

pub const INCEPTION_BODY: &str =
    include_str!("../../../fixtures/tmdb/search_movie_inception.json");
pub const POPULAR_BODY: &str = include_str!("../../../fixtures/tmdb/discover_movie_popular.json");
pub const EMPTY_BODY: &str = r#"{"page":1,"results":[],"total_results":0}"#;
pub const NOT_FOUND_BODY: &str = r#"{"Response":"False","Error":"Movie not found!"}"#;

/// Canned catalog reply.
#[derive(Debug, Clone)]
pub enum Reply {
    /// JSON body decoded as a success response.
    Body(&'static str),
    /// Error returned as-is.
    Fail(CatalogError),
}

/// Catalog returning canned replies keyed by query text (`""` = popular).
#[derive(Debug, Default)]
pub struct MockCatalog {
    replies: HashMap<String, (Reply, Duration)>,
    requests: Mutex<Vec<MovieQuery>>,
}

impl MockCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, text: &str, reply: Reply) -> Self {
        self.reply_after(text, reply, Duration::ZERO)
    }

    pub fn reply_after(mut self, text: &str, reply: Reply, delay: Duration) -> Self {
        self.replies.insert(String::from(text), (reply, delay));
        self
    }

    pub fn requests(&self) -> Vec<MovieQuery> {
        self.requests.lock().unwrap().clone()
    }
}

impl CatalogApi for MockCatalog {
    async fn fetch_listing(&self, query: &MovieQuery) -> Result<CatalogResponse, CatalogError> {
        self.requests.lock().unwrap().push(query.clone());
        let text = match query {
            MovieQuery::Search(text) => text.as_str(),
            MovieQuery::Popular => "",
        };
        let (reply, delay) = self
            .replies
            .get(text)
            .cloned()
            .unwrap_or((Reply::Body(EMPTY_BODY), Duration::ZERO));

        tokio::time::sleep(delay).await;

        match reply {
            Reply::Body(json) => {
                serde_json::from_str(json).map_err(|e| CatalogError::Decode(e.to_string()))
            }
            Reply::Fail(e) => Err(e),
        }
    }
}

/// In-memory analytics store that records calls.
#[derive(Debug)]
pub struct MockAnalytics {
    recorded: Mutex<Vec<(String, u64)>>,
    trending: Option<Vec<TrendingEntry>>,
    trending_calls: AtomicUsize,
    fail_record: bool,
    record_delay: Duration,
}

impl MockAnalytics {
    /// Store whose trending load fails until [`with_trending`](Self::with_trending).
    pub fn new() -> Self {
        Self {
            recorded: Mutex::new(Vec::new()),
            trending: None,
            trending_calls: AtomicUsize::new(0),
            fail_record: false,
            record_delay: Duration::ZERO,
        }
    }

    pub fn with_trending(mut self, entries: Vec<TrendingEntry>) -> Self {
        self.trending = Some(entries);
        self
    }

    pub fn failing_record(mut self) -> Self {
        self.fail_record = true;
        self
    }

    /// Delays every `record_search` by `delay`.
    pub fn record_after(mut self, delay: Duration) -> Self {
        self.record_delay = delay;
        self
    }

    pub fn recorded(&self) -> Vec<(String, u64)> {
        self.recorded.lock().unwrap().clone()
    }

    pub fn trending_calls(&self) -> usize {
        self.trending_calls.load(Ordering::SeqCst)
    }
}

impl AnalyticsStore for MockAnalytics {
    async fn record_search(&self, query: &str, top_result: &Movie) -> anyhow::Result<()> {
        tokio::time::sleep(self.record_delay).await;
        if self.fail_record {
            anyhow::bail!("analytics store unavailable");
        }
        self.recorded
            .lock()
            .unwrap()
            .push((String::from(query), top_result.id));
        Ok(())
    }

    async fn trending(&self, limit: usize) -> anyhow::Result<Vec<TrendingEntry>> {
        self.trending_calls.fetch_add(1, Ordering::SeqCst);
        self.trending
            .clone()
            .map(|entries| entries.into_iter().take(limit).collect())
            .ok_or_else(|| anyhow::anyhow!("analytics store unavailable"))
    }
}

pub fn trending_entry(rank: usize, id: u64, title: &str) -> TrendingEntry {
    TrendingEntry {
        id,
        title: String::from(title),
        poster_url: Some(format!("https://image.tmdb.org/t/p/w500/{id}.jpg")),
        rank,
        count: 1,
    }
}
