//! Terminal movie discovery page for cinefind.
//!
//! Uses `ratatui` + `crossterm` for rendering and a single-threaded
//! `tokio` event loop for input, debouncing, and catalog fetches.

/// Trailing-edge debounce timer.
pub mod debounce;
/// Search orchestration and fetch sequencing.
pub mod orchestrator;
mod page;
/// Page state types.
pub mod state;
#[cfg(test)]
mod testing;
mod ui;
/// Pure projection of page state into renderable rows.
pub mod view;

pub use orchestrator::{
    PageEvent, SearchOrchestrator, SearchSettings, StaleResponsePolicy, search_movies,
};
pub use page::run_page;
