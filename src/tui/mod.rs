//! Interactive catalog browser.
//!
//! The event loop owns the [`CatalogController`]. Page fetches and bulk
//! selections run as tokio tasks and report back over a channel; the loop
//! applies their results in arrival order.

mod render;
pub mod table;

use std::io::stdout;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use ratatui::layout::{Position, Rect};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

use crate::catalog::{fetch_page_or_empty, CatalogSource};
use crate::config::PAGE_SIZE;
use crate::controller::{BulkRequest, CatalogController, PageTicket};
use crate::models::CatalogPage;
use crate::services::BulkSelection;
use table::SortOrder;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Results delivered by background tasks.
enum AppEvent {
    PageLoaded(PageTicket, CatalogPage),
    BulkSelected(BulkSelection),
}

struct App {
    controller: CatalogController,
    source: Arc<dyn CatalogSource>,
    tx: UnboundedSender<AppEvent>,
    rx: UnboundedReceiver<AppEvent>,
    /// Row under the cursor, indexing the sorted view.
    cursor: usize,
    sort: SortOrder,
    /// Screen areas from the last draw, for mouse hit testing.
    caret_area: Option<Rect>,
    popup_area: Option<Rect>,
    should_quit: bool,
}

/// Run the browser until the user quits.
pub async fn run(source: Arc<dyn CatalogSource>) -> Result<()> {
    let mut app = App::new(source);
    let ticket = app.controller.reload();
    app.spawn_page_fetch(ticket);

    let mut terminal = ratatui::init();
    with_teardown(
        || execute!(stdout(), EnableMouseCapture),
        || app.event_loop(&mut terminal),
        || {
            let _ = execute!(stdout(), DisableMouseCapture);
            ratatui::restore();
        },
    )
}

/// Run `body` after `setup` succeeds. `teardown` runs either way.
fn with_teardown<T>(
    setup: impl FnOnce() -> std::io::Result<()>,
    body: impl FnOnce() -> Result<T>,
    teardown: impl FnOnce(),
) -> Result<T> {
    let result = setup().map_err(anyhow::Error::from).and_then(|()| body());
    teardown();
    result
}

impl App {
    fn new(source: Arc<dyn CatalogSource>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            controller: CatalogController::new(PAGE_SIZE),
            source,
            tx,
            rx,
            cursor: 0,
            sort: SortOrder::default(),
            caret_area: None,
            popup_area: None,
            should_quit: false,
        }
    }

    fn event_loop(&mut self, terminal: &mut ratatui::DefaultTerminal) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| render::draw(frame, self))?;

            while let Ok(event) = self.rx.try_recv() {
                self.apply(event);
            }

            // Short poll so task results show up promptly. Fetch tasks run on
            // the runtime's worker threads, not this one.
            let input = if event::poll(POLL_INTERVAL)? {
                Some(event::read()?)
            } else {
                None
            };

            match input {
                Some(Event::Key(key)) if key.kind == KeyEventKind::Press => self.handle_key(key),
                Some(Event::Mouse(mouse)) => self.handle_mouse(mouse),
                _ => {}
            }
        }
        Ok(())
    }

    fn apply(&mut self, event: AppEvent) {
        match event {
            AppEvent::PageLoaded(ticket, page) => {
                if self.controller.commit_page(ticket, page) {
                    self.cursor = 0;
                }
            }
            AppEvent::BulkSelected(outcome) => {
                info!(
                    "bulk selection finished: {} of {} records",
                    outcome.records.len(),
                    outcome.requested
                );
                if let Some(ticket) = self.controller.apply_bulk_selection(&outcome) {
                    self.spawn_page_fetch(ticket);
                }
            }
        }
    }

    fn spawn_page_fetch(&self, ticket: PageTicket) {
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let page = fetch_page_or_empty(source.as_ref(), ticket.page).await;
            let _ = tx.send(AppEvent::PageLoaded(ticket, page));
        });
    }

    fn spawn_bulk_select(&self, request: BulkRequest) {
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        debug!("starting bulk selection of {} records", request.count);
        tokio::spawn(async move {
            let outcome = request.run(source.as_ref()).await;
            let _ = tx.send(AppEvent::BulkSelected(outcome));
        });
    }

    /// Paginator move to a 1-based page, clamped to the known pages.
    fn go_to_page(&mut self, page: u32) {
        let last = self.controller.window().page_count();
        let index = page.clamp(1, last) - 1;
        if let Some(ticket) = self.controller.on_page_change(index as usize) {
            self.spawn_page_fetch(ticket);
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.controller.notice().is_some() {
            self.controller.dismiss_notice();
            return;
        }

        if self.controller.popup().open {
            match key.code {
                KeyCode::Esc => self.controller.close_popup(),
                KeyCode::Enter => {
                    if let Ok(request) = self.controller.submit_popup() {
                        self.spawn_bulk_select(request);
                    }
                }
                KeyCode::Backspace => self.controller.popup_backspace(),
                KeyCode::Char(c) => self.controller.popup_input(c),
                _ => {}
            }
            return;
        }

        let page = self.controller.page();
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                let rows = self.controller.data().len();
                if self.cursor + 1 < rows {
                    self.cursor += 1;
                }
            }
            KeyCode::Char(' ') | KeyCode::Enter => self.toggle_cursor_row(),
            KeyCode::Left | KeyCode::Char('h') | KeyCode::PageUp => {
                self.go_to_page(page.saturating_sub(1))
            }
            KeyCode::Right | KeyCode::Char('l') | KeyCode::PageDown => {
                self.go_to_page(page.saturating_add(1))
            }
            KeyCode::Home | KeyCode::Char('g') => self.go_to_page(1),
            KeyCode::End | KeyCode::Char('G') => self.go_to_page(u32::MAX),
            KeyCode::Char('v') => self.controller.toggle_popup(),
            KeyCode::Char('s') => self.sort = self.sort.cycle(),
            KeyCode::Char('r') => {
                let ticket = self.controller.reload();
                self.spawn_page_fetch(ticket);
            }
            _ => {}
        }
    }

    fn toggle_cursor_row(&mut self) {
        let record = self
            .sort
            .apply(self.controller.data())
            .get(self.cursor)
            .map(|r| (*r).clone());
        if let Some(record) = record {
            let mut next = self.controller.selection().clone();
            next.toggle(&record);
            self.controller.set_selection(next.records().to_vec());
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        if self.controller.notice().is_some() {
            return;
        }
        let position = Position::new(mouse.column, mouse.row);

        if self.controller.popup().open {
            if !hit(self.popup_area, position) {
                self.controller.close_popup();
            }
            return;
        }
        if hit(self.caret_area, position) {
            self.controller.toggle_popup();
        }
    }
}

fn hit(area: Option<Rect>, position: Position) -> bool {
    area.is_some_and(|area| area.contains(position))
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use async_trait::async_trait;
    use crossterm::event::KeyModifiers;

    use super::*;
    use crate::catalog::CatalogError;
    use crate::models::Artwork;

    struct EmptyCatalog;

    #[async_trait]
    impl CatalogSource for EmptyCatalog {
        async fn fetch_page(&self, page: u32) -> Result<CatalogPage, CatalogError> {
            Ok(CatalogPage::failed(page))
        }
    }

    fn art(id: i64) -> Artwork {
        Artwork {
            id,
            title: Some(format!("Artwork {id}")),
            place_of_origin: None,
            artist_display: None,
            inscriptions: None,
            date_start: None,
            date_end: None,
        }
    }

    /// App showing page 1 of a 30-record catalog.
    fn loaded_app() -> App {
        let mut app = App::new(Arc::new(EmptyCatalog));
        let ticket = app.controller.reload();
        app.controller.commit_page(
            ticket,
            CatalogPage {
                page: 1,
                records: (1..=12).map(art).collect(),
                total: Some(30),
            },
        );
        app
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn click(app: &mut App, column: u16, row: u16) {
        app.handle_mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        });
    }

    #[test]
    fn test_hit_testing() {
        let area = Some(Rect::new(2, 3, 10, 4));
        assert!(hit(area, Position::new(2, 3)));
        assert!(hit(area, Position::new(11, 6)));
        assert!(!hit(area, Position::new(12, 6)));
        assert!(!hit(area, Position::new(5, 7)));
        assert!(!hit(None, Position::new(5, 5)));
    }

    #[test]
    fn test_teardown_runs_when_setup_fails() {
        let torn_down = Cell::new(false);
        let body_ran = Cell::new(false);

        let result = with_teardown(
            || Err(std::io::Error::other("no mouse")),
            || {
                body_ran.set(true);
                Ok(())
            },
            || torn_down.set(true),
        );

        assert!(result.is_err());
        assert!(!body_ran.get());
        assert!(torn_down.get());
    }

    #[test]
    fn test_teardown_runs_after_body() {
        let torn_down = Cell::new(false);
        let result = with_teardown(|| Ok(()), || Ok(7), || torn_down.set(true));
        assert_eq!(result.unwrap(), 7);
        assert!(torn_down.get());
    }

    #[test]
    fn test_clicks_ignored_while_notice_shows() {
        let mut app = loaded_app();
        app.caret_area = Some(Rect::new(0, 2, 4, 1));
        app.controller.popup_input('0');
        assert!(app.controller.submit_popup().is_err());
        assert!(app.controller.notice().is_some());

        click(&mut app, 1, 2);
        assert!(!app.controller.popup().open);

        press(&mut app, KeyCode::Enter);
        assert!(app.controller.notice().is_none());
        click(&mut app, 1, 2);
        assert!(app.controller.popup().open);
    }

    #[tokio::test]
    async fn test_paginator_keys_stay_within_known_pages() {
        let mut app = loaded_app();

        press(&mut app, KeyCode::Left);
        assert_eq!(app.controller.page(), 1);

        press(&mut app, KeyCode::Right);
        assert_eq!(app.controller.page(), 2);

        press(&mut app, KeyCode::End);
        assert_eq!(app.controller.page(), 3);

        press(&mut app, KeyCode::Right);
        assert_eq!(app.controller.page(), 3);

        press(&mut app, KeyCode::Home);
        assert_eq!(app.controller.page(), 1);
    }

    #[test]
    fn test_toggle_key_sends_full_selection() {
        let mut app = loaded_app();
        app.controller.set_selection([art(25)]);

        app.cursor = 2;
        press(&mut app, KeyCode::Char(' '));
        assert_eq!(
            app.controller.selection().ids().collect::<Vec<_>>(),
            vec![25, 3]
        );

        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.controller.selection().ids().collect::<Vec<_>>(), vec![25]);
    }
}
