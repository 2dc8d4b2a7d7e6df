//! TUI rendering logic for the discovery page.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use crate::view::{MovieCard, PageView, ResultsView, TrendingRow};

/// Draws the discovery page.
#[allow(clippy::indexing_slicing)]
pub fn draw(frame: &mut Frame, view: &PageView) {
    let trending_height = if view.trending.is_empty() {
        0
    } else {
        u16::try_from(view.trending.len())
            .unwrap_or(u16::MAX)
            .saturating_add(2)
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),               // search box
            Constraint::Length(trending_height), // trending
            Constraint::Min(5),                  // results
            Constraint::Length(3),               // footer
        ])
        .split(frame.area());

    draw_search(frame, chunks[0], &view.search);
    if !view.trending.is_empty() {
        draw_trending(frame, chunks[1], &view.trending);
    }
    draw_results(frame, chunks[2], &view.results);
    draw_footer(frame, chunks[3]);
}

/// Draws the search box and places the cursor after the query.
fn draw_search(frame: &mut Frame, area: Rect, query: &str) {
    let input = Paragraph::new(query)
        .style(Style::default().fg(Color::Yellow))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Search through thousands of movies "),
        );
    frame.render_widget(input, area);

    let typed = u16::try_from(query.chars().count()).unwrap_or(u16::MAX);
    let x = area
        .x
        .saturating_add(1)
        .saturating_add(typed)
        .min(area.right().saturating_sub(2));
    frame.set_cursor_position(Position::new(x, area.y.saturating_add(1)));
}

/// Draws the trending list in rank order.
fn draw_trending(frame: &mut Frame, area: Rect, rows: &[TrendingRow]) {
    let items: Vec<ListItem> = rows
        .iter()
        .map(|row| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:>2}. ", row.rank),
                    Style::default().fg(Color::Magenta),
                ),
                Span::styled(
                    row.title.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  {}", row.poster),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Trending Movies "),
    );
    frame.render_widget(list, area);
}

/// Draws the loading indicator, the error, or the movie cards.
fn draw_results(frame: &mut Frame, area: Rect, results: &ResultsView) {
    let block = Block::default().borders(Borders::ALL).title(" All Movies ");

    match results {
        ResultsView::Loading => {
            let loading = Paragraph::new("Loading movies...")
                .style(Style::default().fg(Color::Yellow))
                .block(block);
            frame.render_widget(loading, area);
        }
        ResultsView::Error(message) => {
            let error = Paragraph::new(message.as_str())
                .style(Style::default().fg(Color::Red))
                .block(block);
            frame.render_widget(error, area);
        }
        ResultsView::Movies { cards, .. } if cards.is_empty() => {
            let empty = Paragraph::new("No movies found.")
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(empty, area);
        }
        ResultsView::Movies { cards, selected } => {
            let items: Vec<ListItem> = cards.iter().map(card_item).collect();
            let list = List::new(items)
                .block(block)
                .highlight_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                )
                .highlight_symbol("\u{25b8} ");
            let mut list_state = ListState::default().with_selected(Some(*selected));
            frame.render_stateful_widget(list, area, &mut list_state);
        }
    }
}

/// Three-line list item for one movie card.
fn card_item(card: &MovieCard) -> ListItem<'static> {
    let dim = Style::default().fg(Color::DarkGray);
    ListItem::new(vec![
        Line::from(Span::styled(
            card.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("  \u{2605} ", Style::default().fg(Color::Yellow)),
            Span::raw(card.rating.clone()),
            Span::styled(" \u{00b7} ", dim),
            Span::raw(card.language.clone()),
            Span::styled(" \u{00b7} ", dim),
            Span::raw(card.year.clone()),
        ]),
        Line::from(Span::styled(format!("  {}", card.poster), dim)),
    ])
}

/// Draws the footer with key hints.
fn draw_footer(frame: &mut Frame, area: Rect) {
    let help_text = "Type to search  Backspace: delete  Ctrl+U: clear  \u{2191}\u{2193}/PgUp/PgDn: move  Enter: open in browser  Esc: quit";
    let footer = Paragraph::new(help_text).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}
