//! UI rendering

use super::app::{App, HitAreas};
use super::highlight::highlight_json;
use crate::collection::{CollectionTable, TableState};
use crate::detail::{DetailState, RecordDetail};
use crate::nav::Section;
use crate::search::{SearchBrowser, SearchStatus, details_line};
use crate::views::View;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, Table, Wrap},
};
use std::time::Instant;
use unicode_width::UnicodeWidthStr;

/// Width of the cursor gutter in front of each grid row
const GUTTER: u16 = 2;

/// Render the entire UI
pub fn render(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tab bar
            Constraint::Min(3),    // Mounted view
            Constraint::Length(1), // Status bar
            Constraint::Length(1), // Toast line
        ])
        .split(frame.area());

    let mut hits = HitAreas {
        tabs: render_tab_bar(frame, app, chunks[0]),
        rows: None,
    };

    match &mut app.view {
        View::Collection(table) => {
            hits.rows = render_collection(frame, table, chunks[1], app.started_at);
        }
        View::Detail(detail) => {
            render_detail(frame, detail, chunks[1], app.started_at)
        }
        View::Search(search) => {
            render_search(frame, search, &app.search_input.text, chunks[1], app.started_at)
        }
        View::NotFound(path) => render_not_found(frame, path, chunks[1]),
    }

    render_status_bar(frame, app, chunks[2]);
    render_toast_line(frame, app, chunks[3]);
    app.hits = hits;
}

/// Tab labels on one line; returns the screen rect of each tab
fn render_tab_bar(frame: &mut Frame, app: &App, area: Rect) -> Vec<Rect> {
    let active = app.shell.active_tab();
    let mut spans = Vec::new();
    let mut rects = Vec::new();
    let mut x = area.x;

    for (i, section) in Section::ALL.iter().enumerate() {
        let label = format!(" {} ", section.label());
        let width = (label.width() as u16).min(area.right().saturating_sub(x));
        rects.push(Rect::new(x, area.y, width, 1));
        x = x.saturating_add(width);

        let style = if i == active {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(label, style));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
    rects
}

fn spinner_frame(started_at: Instant) -> &'static str {
    const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
    let elapsed = started_at.elapsed().as_millis() / 80;
    let idx = (elapsed as usize) % FRAMES.len();
    FRAMES[idx]
}

fn loading_line(started_at: Instant) -> Line<'static> {
    Line::styled(
        format!("{} Loading...", spinner_frame(started_at)),
        Style::default().fg(Color::Yellow).add_modifier(Modifier::DIM),
    )
}

fn error_line(message: &str) -> Line<'static> {
    Line::styled(
        format!("✗ {}", message),
        Style::default().fg(Color::Red),
    )
}

/// Returns the rect holding the data rows, if rows were drawn
fn render_collection(
    frame: &mut Frame,
    table: &mut CollectionTable,
    area: Rect,
    started_at: Instant,
) -> Option<Rect> {
    let mut block = Block::default().borders(Borders::ALL);
    if let Some(header) = table.header() {
        block = block.title(format!(" {} ", header));
    }
    let inner = block.inner(area);

    // Header line plus data rows
    table.set_viewport_rows(inner.height.saturating_sub(1) as usize);

    let body = match table.state() {
        TableState::Loading => Some(loading_line(started_at)),
        TableState::Empty => Some(Line::styled(
            "No records",
            Style::default().fg(Color::DarkGray),
        )),
        TableState::Error(message) => Some(error_line(message)),
        TableState::Loaded(_) => None,
    };
    if let Some(line) = body {
        frame.render_widget(Paragraph::new(line).block(block), area);
        return None;
    }

    let dim = Style::default().fg(Color::DarkGray);
    block = block.title_bottom(Line::styled(
        format!(
            " page {}/{} · {} rows ",
            table.page() + 1,
            table.page_count(),
            table.rows().len()
        ),
        dim,
    ));

    let columns = table.columns();
    let spacing = columns.len().saturating_sub(1) as u16;
    let available = inner.width.saturating_sub(GUTTER + spacing);
    let widths = table.column_widths(available);

    let header = Row::new(
        std::iter::once(String::new())
            .chain(columns.labels().into_iter().map(str::to_string))
            .collect::<Vec<_>>(),
    )
    .style(Style::default().add_modifier(Modifier::BOLD));

    let cursor = table.cursor();
    let rows: Vec<Row> = table
        .page_rows()
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let marker = if i == cursor { "▶" } else { "" };
            let mut cells = vec![marker.to_string()];
            cells.extend(columns.cells(row));
            let style = if row.id.is_ephemeral() { dim } else { Style::default() };
            Row::new(cells).style(style)
        })
        .collect();

    let constraints: Vec<Constraint> = std::iter::once(Constraint::Length(GUTTER - 1))
        .chain(widths.iter().map(|w| Constraint::Length(*w)))
        .collect();

    let grid = Table::new(rows, constraints)
        .header(header)
        .column_spacing(1)
        .block(block);
    frame.render_widget(grid, area);

    Some(Rect::new(
        inner.x,
        inner.y.saturating_add(1),
        inner.width,
        table.page_rows().len() as u16,
    ))
}

fn render_detail(frame: &mut Frame, detail: &RecordDetail, area: Rect, started_at: Instant) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", detail.title()))
        .title_bottom(Line::styled(
            " Esc back · ↑↓ scroll ",
            Style::default().fg(Color::DarkGray),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut body_area = inner;
    if let Some(preamble) = detail.preamble() {
        let height = 2.min(inner.height);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(height), Constraint::Min(0)])
            .split(inner);
        frame.render_widget(
            Paragraph::new(preamble)
                .style(Style::default().fg(Color::Gray))
                .wrap(Wrap { trim: true }),
            chunks[0],
        );
        body_area = chunks[1];
    }

    let lines = match detail.state() {
        DetailState::Idle => vec![Line::styled(
            "No record selected",
            Style::default().fg(Color::DarkGray),
        )],
        DetailState::Loading => vec![loading_line(started_at)],
        DetailState::Error(message) => vec![error_line(message)],
        DetailState::Loaded(_) => detail
            .pretty()
            .map(|text| highlight_json(&text))
            .unwrap_or_default(),
    };
    frame.render_widget(
        Paragraph::new(lines).scroll((detail.scroll(), 0)),
        body_area,
    );
}

fn render_search(
    frame: &mut Frame,
    search: &SearchBrowser,
    input: &str,
    area: Rect,
    started_at: Instant,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Input
            Constraint::Length(1), // Summary
            Constraint::Min(1),    // Results
            Constraint::Length(1), // Pagination
        ])
        .split(area);

    let input_line = Line::from(vec![
        Span::styled(input.to_string(), Style::default().fg(Color::White)),
        Span::styled("█", Style::default().fg(Color::White)),
    ]);
    frame.render_widget(
        Paragraph::new(input_line).block(Block::default().borders(Borders::ALL).title(" Search ")),
        chunks[0],
    );

    let dim = Style::default().fg(Color::DarkGray);
    let summary = match search.status() {
        SearchStatus::Idle => Line::styled("Enter search term...", dim),
        SearchStatus::Loading => loading_line(started_at),
        SearchStatus::Error(message) => error_line(message),
        SearchStatus::Ready => match (search.summary(), search.empty_message()) {
            (Some(summary), _) => Line::styled(summary, dim),
            (None, Some(empty)) => Line::raw(empty),
            (None, None) => Line::default(),
        },
    };
    frame.render_widget(Paragraph::new(summary), chunks[1]);

    if !search.results().is_empty() {
        let header = Row::new(vec!["Type", "Resource", "Module", "Details"])
            .style(Style::default().add_modifier(Modifier::BOLD));
        let rows: Vec<Row> = search
            .results()
            .iter()
            .skip(search.scroll())
            .map(|result| {
                Row::new(vec![
                    result.kind.as_str().to_string(),
                    result.resource.clone().unwrap_or_default(),
                    result.module.clone().unwrap_or_default(),
                    details_line(result),
                ])
            })
            .collect();
        let widths = [
            Constraint::Length(12),
            Constraint::Percentage(25),
            Constraint::Length(12),
            Constraint::Fill(1),
        ];
        frame.render_widget(
            Table::new(rows, widths).header(header).column_spacing(1),
            chunks[2],
        );
    }

    if search.show_pagination() {
        let line = Line::from(vec![
            Span::styled("PgUp ", dim),
            Span::raw(format!("page {} of {}", search.page(), search.total_pages())),
            Span::styled(" PgDn", dim),
        ]);
        frame.render_widget(Paragraph::new(line).centered(), chunks[3]);
    }
}

fn render_not_found(frame: &mut Frame, path: &str, area: Rect) {
    let lines = vec![
        Line::styled(
            format!("Nothing here: {}", path),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Line::styled(
            "Pick a tab above or press Esc to go back.",
            Style::default().fg(Color::DarkGray),
        ),
    ];
    frame.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL)),
        area,
    );
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let dim = Style::default().fg(Color::DarkGray);
    let bracket = Style::default().fg(Color::DarkGray);

    let mut spans = vec![
        Span::styled("  ", dim),
        Span::styled(
            app.shell.current_path().to_string(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" [", bracket),
        Span::styled("Tab sections", dim),
        Span::styled("] [", bracket),
        Span::styled("Alt+←→ history", dim),
        Span::styled("] [", bracket),
        Span::styled("^c quit", dim),
        Span::styled("]", bracket),
    ];

    if app.view.is_loading() {
        spans.push(Span::styled(" [", bracket));
        spans.push(Span::styled(
            format!("{} fetching", spinner_frame(app.started_at)),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::DIM),
        ));
        spans.push(Span::styled("]", bracket));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_toast_line(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(ref toast) = app.toast {
        let bracket = Style::default().fg(Color::DarkGray);
        let toast_style = if toast.is_error {
            Style::default().fg(Color::Red).add_modifier(Modifier::DIM)
        } else {
            Style::default().fg(Color::Blue).add_modifier(Modifier::DIM)
        };

        let spans = vec![
            Span::styled("  [", bracket),
            Span::styled(toast.message.as_str(), toast_style),
            Span::styled("]", bracket),
        ];
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}
