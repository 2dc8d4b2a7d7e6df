//! Search orchestration: debounced queries, fetch sequencing, analytics.
//!
//! The orchestrator owns [`PageState`] and is only mutated from the event
//! loop task. Fetches run as spawned tasks and report back through an
//! unbounded channel as [`PageEvent`]s.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use cinefind_api::tmdb::{CatalogApi, CatalogError, Movie, MovieQuery};
use cinefind_db::{AnalyticsStore, TrendingEntry};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::debounce::{DEFAULT_QUIET_PERIOD, Debouncer};
use crate::state::PageState;

/// Number of trending entries shown by default.
pub const DEFAULT_TRENDING_LIMIT: usize = 5;

/// What to do with a search result that is not from the latest search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaleResponsePolicy {
    /// Drop results of superseded searches.
    #[default]
    Discard,
    /// Apply every result as it arrives; the last to complete wins.
    Apply,
}

/// Orchestrator tuning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSettings {
    /// Quiet period before a typed query is searched.
    pub quiet_period: Duration,
    /// Handling of superseded search results.
    pub stale_responses: StaleResponsePolicy,
    /// Number of trending entries to load.
    pub trending_limit: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            quiet_period: DEFAULT_QUIET_PERIOD,
            stale_responses: StaleResponsePolicy::default(),
            trending_limit: DEFAULT_TRENDING_LIMIT,
        }
    }
}

/// Completion reported by a background task.
#[derive(Debug)]
pub enum PageEvent {
    /// A search finished.
    SearchSettled {
        /// Sequence number assigned when the search started.
        seq: u64,
        /// Query the search was issued for.
        query: String,
        /// Movies, or the catalog failure.
        outcome: Result<Vec<Movie>, CatalogError>,
    },
    /// The trending list was loaded.
    TrendingLoaded(Vec<TrendingEntry>),
}

/// Callback invoked with the new state after every mutation.
type Listener = Box<dyn FnMut(&PageState) + Send>;

/// Owns the page state and sequences catalog searches.
pub struct SearchOrchestrator<C, A> {
    catalog: Arc<C>,
    analytics: Arc<A>,
    settings: SearchSettings,
    state: PageState,
    debouncer: Debouncer<String>,
    /// Sequence number of the most recently started search.
    latest_seq: u64,
    mounted: bool,
    events: mpsc::UnboundedSender<PageEvent>,
    listeners: Vec<Listener>,
}

impl<C, A> fmt::Debug for SearchOrchestrator<C, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchOrchestrator")
            .field("settings", &self.settings)
            .field("state", &self.state)
            .field("latest_seq", &self.latest_seq)
            .field("mounted", &self.mounted)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl<C, A> SearchOrchestrator<C, A> {
    /// Creates an orchestrator and the receiver its tasks report to.
    ///
    /// Nothing is fetched until [`mount`](Self::mount) is called.
    #[must_use]
    pub fn new(
        catalog: Arc<C>,
        analytics: Arc<A>,
        settings: SearchSettings,
    ) -> (Self, mpsc::UnboundedReceiver<PageEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let debouncer = Debouncer::new(settings.quiet_period);
        let orchestrator = Self {
            catalog,
            analytics,
            settings,
            state: PageState::default(),
            debouncer,
            latest_seq: 0,
            mounted: false,
            events,
            listeners: Vec::new(),
        };
        (orchestrator, receiver)
    }

    /// Current page state.
    #[must_use]
    pub const fn state(&self) -> &PageState {
        &self.state
    }

    /// Registers a listener called synchronously after every state change.
    pub fn subscribe(&mut self, listener: impl FnMut(&PageState) + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Updates the search text and restarts the quiet period at `now`.
    pub fn set_query(&mut self, text: String, now: Instant) {
        self.debouncer.push(text.clone(), now);
        self.state.query = text;
        self.notify();
    }

    /// Instant at which the pending query settles, if any.
    #[must_use]
    pub fn debounce_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// Moves the results cursor up by `step` rows.
    pub fn select_previous(&mut self, step: usize) {
        self.state.move_up(step);
        self.notify();
    }

    /// Moves the results cursor down by `step` rows.
    pub fn select_next(&mut self, step: usize) {
        self.state.move_down(step);
        self.notify();
    }

    /// Applies a completion reported by a background task.
    pub fn apply(&mut self, event: PageEvent) {
        match event {
            PageEvent::SearchSettled {
                seq,
                query,
                outcome,
            } => {
                if seq != self.latest_seq
                    && self.settings.stale_responses == StaleResponsePolicy::Discard
                {
                    tracing::debug!(
                        seq,
                        latest = self.latest_seq,
                        query = %query,
                        "Discarding stale search result"
                    );
                    return;
                }
                match &outcome {
                    Ok(movies) => {
                        tracing::debug!(seq, query = %query, count = movies.len(), "Search settled");
                    }
                    Err(e) => tracing::warn!(seq, query = %query, error = %e, "Search failed"),
                }
                self.state.settle(outcome);
            }
            PageEvent::TrendingLoaded(entries) => {
                tracing::debug!(count = entries.len(), "Trending loaded");
                self.state.trending = entries;
            }
        }
        self.notify();
    }

    /// Cancels the pending query so nothing is searched after teardown.
    pub fn teardown(&mut self) {
        if self.debouncer.cancel() {
            tracing::debug!("Cancelled pending search");
        }
    }

    fn notify(&mut self) {
        for listener in &mut self.listeners {
            listener(&self.state);
        }
    }
}

impl<C, A> SearchOrchestrator<C, A>
where
    C: CatalogApi + Send + Sync + 'static,
    A: AnalyticsStore + Send + Sync + 'static,
{
    /// Starts the initial search and the one-time trending load.
    ///
    /// Must be called from within a tokio runtime. Later calls do nothing.
    pub fn mount(&mut self) {
        if self.mounted {
            return;
        }
        self.mounted = true;
        self.start_search(self.state.debounced_query.clone());
        self.load_trending();
    }

    /// Starts a search if the pending query has settled at `now`.
    ///
    /// Returns `true` if a search was started. A settled value equal to the
    /// current debounced query does not search again.
    pub fn poll_debounce(&mut self, now: Instant) -> bool {
        let Some(query) = self.debouncer.poll_ready(now) else {
            return false;
        };
        if query == self.state.debounced_query {
            return false;
        }
        self.state.debounced_query.clone_from(&query);
        self.start_search(query);
        true
    }

    fn start_search(&mut self, query: String) {
        self.latest_seq = self.latest_seq.saturating_add(1);
        let seq = self.latest_seq;
        self.state.begin_search();
        self.notify();

        tracing::debug!(seq, query = %query, "Starting search");
        let catalog = Arc::clone(&self.catalog);
        let analytics = Arc::clone(&self.analytics);
        let events = self.events.clone();
        tokio::spawn(async move {
            let outcome = fetch_movies(catalog.as_ref(), &query).await;
            let top = outcome.as_ref().ok().and_then(|movies| movies.first().cloned());
            let settled = PageEvent::SearchSettled {
                seq,
                query: query.clone(),
                outcome,
            };
            if events.send(settled).is_err() {
                tracing::debug!(seq, "Page closed before search settled");
            }
            // Results must not wait on the analytics write.
            tokio::spawn(async move {
                report_search(analytics.as_ref(), &query, top.as_ref()).await;
            });
        });
    }

    fn load_trending(&self) {
        let analytics = Arc::clone(&self.analytics);
        let events = self.events.clone();
        let limit = self.settings.trending_limit;
        tokio::spawn(async move {
            match analytics.trending(limit).await {
                Ok(entries) => {
                    if events.send(PageEvent::TrendingLoaded(entries)).is_err() {
                        tracing::debug!("Page closed before trending loaded");
                    }
                }
                Err(e) => tracing::warn!(error = ?e, "Failed to load trending"),
            }
        });
    }
}

impl<C, A> Drop for SearchOrchestrator<C, A> {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Fetches the listing for `query` and reports its first result.
///
/// Empty `query` selects the popularity listing. When `query` is non-empty
/// and at least one movie came back, `(query, first movie)` is recorded in
/// `analytics`; a recording failure is logged and does not affect the
/// returned movies.
///
/// # Errors
///
/// Returns the [`CatalogError`] of the fetch or of decoding its body.
pub async fn search_movies<C, A>(
    catalog: &C,
    analytics: &A,
    query: &str,
) -> Result<Vec<Movie>, CatalogError>
where
    C: CatalogApi + Sync,
    A: AnalyticsStore + Sync,
{
    let movies = fetch_movies(catalog, query).await?;
    report_search(analytics, query, movies.first()).await;
    Ok(movies)
}

/// Fetches the listing selected by `query`.
async fn fetch_movies<C>(catalog: &C, query: &str) -> Result<Vec<Movie>, CatalogError>
where
    C: CatalogApi + Sync,
{
    catalog
        .fetch_listing(&MovieQuery::from_text(query))
        .await?
        .into_movies()
}

/// Records `(query, top)` unless the query is empty or nothing came back.
async fn report_search<A>(analytics: &A, query: &str, top: Option<&Movie>)
where
    A: AnalyticsStore + Sync,
{
    if !query.is_empty()
        && let Some(top) = top
        && let Err(e) = analytics.record_search(query, top).await
    {
        tracing::warn!(query, error = ?e, "Failed to record search");
    }
}
