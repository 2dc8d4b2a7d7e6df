//! Discovery page main loop.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use cinefind_api::tmdb::CatalogApi;
use cinefind_db::AnalyticsStore;
use crossterm::event::{Event, EventStream, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use futures::StreamExt;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::orchestrator::{PageEvent, SearchOrchestrator, SearchSettings};
use crate::state::PageState;
use crate::ui;
use crate::view::view;

/// TMDB web page of a movie, followed by its ID.
const MOVIE_PAGE_BASE_URL: &str = "https://www.themoviedb.org/movie";

/// Rows moved by `PageUp` / `PageDown`.
const PAGE_STEP: usize = 5;

/// Whether the loop keeps running after a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopControl {
    Continue,
    Exit,
}

/// Runs the discovery page until the user quits.
///
/// # Errors
///
/// Returns an error if terminal setup, drawing, or event handling fails.
pub async fn run_page<C, A>(
    catalog: Arc<C>,
    analytics: Arc<A>,
    settings: SearchSettings,
) -> Result<()>
where
    C: CatalogApi + Send + Sync + 'static,
    A: AnalyticsStore + Send + Sync + 'static,
{
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)
        .context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    let (mut orchestrator, events) = SearchOrchestrator::new(catalog, analytics, settings);

    let result = run_event_loop(&mut terminal, &mut orchestrator, events).await;
    orchestrator.teardown();

    // Cleanup (always attempt even if event loop failed)
    disable_raw_mode().context("failed to disable raw mode")?;
    crossterm::execute!(io::stdout(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;

    result
}

/// Main event loop: terminal input, debounce deadline, and fetch results.
async fn run_event_loop<C, A>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    orchestrator: &mut SearchOrchestrator<C, A>,
    mut events: mpsc::UnboundedReceiver<PageEvent>,
) -> Result<()>
where
    C: CatalogApi + Send + Sync + 'static,
    A: AnalyticsStore + Send + Sync + 'static,
{
    let dirty = Arc::new(AtomicBool::new(true));
    let flag = Arc::clone(&dirty);
    orchestrator.subscribe(move |_| flag.store(true, Ordering::Relaxed));
    orchestrator.mount();

    let mut input = EventStream::new();

    loop {
        if dirty.swap(false, Ordering::Relaxed) {
            let page = view(orchestrator.state());
            terminal
                .draw(|frame| ui::draw(frame, &page))
                .context("failed to draw TUI")?;
        }

        let deadline = orchestrator.debounce_deadline();
        tokio::select! {
            maybe_event = input.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        let control =
                            handle_key(orchestrator, key.code, key.modifiers, Instant::now());
                        if control == LoopControl::Exit {
                            return Ok(());
                        }
                    }
                    Some(Ok(Event::Resize(..))) => dirty.store(true, Ordering::Relaxed),
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e).context("failed to read terminal event"),
                    None => return Ok(()),
                }
            }
            Some(event) = events.recv() => orchestrator.apply(event),
            () = wait_for_deadline(deadline) => {
                orchestrator.poll_debounce(Instant::now());
            }
        }
    }
}

/// Sleeps until `deadline`, or forever when nothing is pending.
async fn wait_for_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending::<()>().await,
    }
}

/// Handles one key press.
fn handle_key<C, A>(
    orchestrator: &mut SearchOrchestrator<C, A>,
    key: KeyCode,
    modifiers: KeyModifiers,
    now: Instant,
) -> LoopControl {
    match key {
        KeyCode::Esc => return LoopControl::Exit,
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            return LoopControl::Exit;
        }
        KeyCode::Char('u') if modifiers.contains(KeyModifiers::CONTROL) => {
            orchestrator.set_query(String::new(), now);
        }
        KeyCode::Char(c)
            if !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            let mut query = orchestrator.state().query.clone();
            query.push(c);
            orchestrator.set_query(query, now);
        }
        KeyCode::Backspace => {
            let mut query = orchestrator.state().query.clone();
            if query.pop().is_some() {
                orchestrator.set_query(query, now);
            }
        }
        KeyCode::Up => orchestrator.select_previous(1),
        KeyCode::Down => orchestrator.select_next(1),
        KeyCode::PageUp => orchestrator.select_previous(PAGE_STEP),
        KeyCode::PageDown => orchestrator.select_next(PAGE_STEP),
        KeyCode::Enter => open_selected(orchestrator.state()),
        _ => {}
    }
    LoopControl::Continue
}

/// Opens the TMDB page of the movie under the cursor in the browser.
fn open_selected(state: &PageState) {
    let Some(movie) = state.selected_movie() else {
        return;
    };
    let url = movie_page_url(movie.id);
    if let Err(e) = open::that(&url) {
        tracing::warn!(url = %url, error = %e, "Failed to open browser");
    }
}

fn movie_page_url(id: u64) -> String {
    format!("{MOVIE_PAGE_BASE_URL}/{id}")
}
