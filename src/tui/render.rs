//! Drawing for the catalog browser.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use super::table::{cells, COLUMNS};
use super::App;
use crate::controller::Notice;

const CHECKBOX_WIDTH: u16 = 5;
const POPUP_WIDTH: u16 = 26;
const POPUP_HEIGHT: u16 = 6;
const FOOTER_MAX_ROWS: usize = 8;

pub(super) fn draw(frame: &mut Frame, app: &mut App) {
    let selected = app.controller.selection().len();
    let footer_height = (selected.clamp(1, FOOTER_MAX_ROWS) + 2) as u16;

    let [title_area, table_area, pager_area, footer_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(5),
        Constraint::Length(1),
        Constraint::Length(footer_height),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    frame.render_widget(
        Paragraph::new("Art Institute of Chicago").bold(),
        title_area,
    );
    draw_table(frame, app, table_area);
    draw_paginator(frame, app, pager_area);
    draw_footer(frame, app, footer_area);
    draw_status(frame, app, status_area);

    // Checkbox column header acts as the popup's caret.
    app.caret_area = Some(Rect::new(
        table_area.x + 1,
        table_area.y + 1,
        CHECKBOX_WIDTH.min(table_area.width.saturating_sub(2)),
        1,
    ));

    app.popup_area = if app.controller.popup().open {
        let area = popup_rect(table_area, frame.area());
        draw_popup(frame, app, area);
        Some(area)
    } else {
        None
    };

    if let Some(Notice::Warning(message)) = app.controller.notice() {
        draw_notice(frame, message);
    }
}

fn draw_table(frame: &mut Frame, app: &App, area: Rect) {
    let rows_view = app.sort.apply(app.controller.data());
    let selection = app.controller.selection();

    let rows: Vec<Row> = rows_view
        .iter()
        .map(|record| {
            let checkbox = if selection.contains(record.id) {
                "[x]"
            } else {
                "[ ]"
            };
            let mut row_cells = vec![checkbox.to_string()];
            row_cells.extend(cells(record));
            Row::new(row_cells)
        })
        .collect();

    let mut header_cells = vec![" ▾ ".to_string(), app.sort.title_header().to_string()];
    header_cells.extend(COLUMNS[1..].iter().map(|c| c.to_string()));
    let header = Row::new(header_cells)
        .style(Style::default().add_modifier(Modifier::BOLD));

    let widths = [
        Constraint::Length(CHECKBOX_WIDTH),
        Constraint::Percentage(24),
        Constraint::Percentage(12),
        Constraint::Percentage(22),
        Constraint::Percentage(22),
        Constraint::Length(6),
        Constraint::Length(6),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::bordered())
        .row_highlight_style(Style::default().bg(Color::DarkGray));

    let mut state = TableState::default();
    if !rows_view.is_empty() {
        state.select(Some(app.cursor.min(rows_view.len() - 1)));
    }
    frame.render_stateful_widget(table, area, &mut state);
}

fn draw_paginator(frame: &mut Frame, app: &App, area: Rect) {
    let window = app.controller.window();
    let range = if window.total == 0 {
        "no records".to_string()
    } else {
        format!(
            "{}–{} of {}",
            window.first + 1,
            window.last() + 1,
            window.total
        )
    };
    let line = Line::from(vec![
        Span::raw("«  ‹  "),
        Span::styled(
            format!("Page {} of {}", window.page, window.page_count()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("  ›  »   "),
        Span::styled(range, Style::default().fg(Color::Gray)),
    ]);
    frame.render_widget(Paragraph::new(line).centered(), area);
}

fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    let selection = app.controller.selection();
    let block = Block::bordered().title(format!(" Selected Rows ({}) ", selection.len()));

    let lines: Vec<Line> = if selection.is_empty() {
        vec![Line::from("No rows selected yet.")]
    } else {
        let visible = area.height.saturating_sub(2) as usize;
        let mut lines: Vec<Line> = selection
            .titles()
            .take(visible)
            .map(|title| Line::from(format!("• {title}")))
            .collect();
        if selection.len() > visible && visible > 0 {
            lines.pop();
            lines.push(Line::from(format!(
                "… and {} more",
                selection.len() - visible + 1
            )));
        }
        lines
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_status(frame: &mut Frame, app: &App, area: Rect) {
    let keys = "↑↓ move  space toggle  ←→ page  v select N  s sort  r reload  q quit";
    let text = if app.controller.is_busy() {
        format!("Loading…   {keys}")
    } else {
        keys.to_string()
    };
    frame.render_widget(Paragraph::new(text).fg(Color::DarkGray), area);
}

/// Popup anchored under the checkbox column header.
fn popup_rect(table_area: Rect, screen: Rect) -> Rect {
    let x = table_area.x + 1;
    let y = table_area.y + 2;
    let width = POPUP_WIDTH.min(screen.width.saturating_sub(x));
    let height = POPUP_HEIGHT.min(screen.height.saturating_sub(y));
    Rect::new(x, y, width, height)
}

fn draw_popup(frame: &mut Frame, app: &App, area: Rect) {
    let input = &app.controller.popup().input;
    let lines = vec![
        Line::from(Span::styled(
            format!("> {input}_"),
            Style::default().fg(Color::Yellow),
        )),
        Line::from(""),
        Line::from("[ Select ]  enter").bold(),
    ];

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines).block(Block::bordered().title(" Select N rows ")),
        area,
    );
}

fn draw_notice(frame: &mut Frame, message: &str) {
    let area = centered_rect(40, 5, frame.area());
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(vec![
            Line::from(message.to_string()).bold(),
            Line::from(""),
            Line::from("press any key").fg(Color::DarkGray),
        ])
        .centered()
        .wrap(Wrap { trim: true })
        .block(Block::bordered().title(" Warning ").fg(Color::Yellow)),
        area,
    );
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
