use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::config::ColorConfig;
use crate::connectivity::{error_message, NetworkProbe};
use crate::domain::{ImageItem, SearchState};
use crate::tui::app::TuiApp;
use crate::tui::text::{strip_markup, truncate};

pub const CARD_WIDTH: u16 = 28;
pub const CARD_HEIGHT: u16 = 5;
/// Terminals at least this wide show the detail view beside the grid.
pub const SPLIT_MIN_WIDTH: u16 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    Grid,
    Detail,
    Split,
}

impl LayoutMode {
    pub fn for_width(width: u16, detail_open: bool) -> Self {
        if !detail_open {
            LayoutMode::Grid
        } else if width >= SPLIT_MIN_WIDTH {
            LayoutMode::Split
        } else {
            LayoutMode::Detail
        }
    }
}

/// How many cards fit side by side in `width` columns.
pub fn grid_columns(width: u16) -> usize {
    (width / CARD_WIDTH).max(1) as usize
}

pub fn render(
    frame: &mut Frame,
    app: &mut TuiApp,
    state: &SearchState,
    colors: &ColorConfig,
    probe: &dyn NetworkProbe,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search bar
            Constraint::Min(5),    // Grid / detail
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_search_bar(frame, app, chunks[0], colors);

    let body = chunks[1];
    match LayoutMode::for_width(body.width, app.detail_open) {
        LayoutMode::Grid => render_grid(frame, app, state, body, colors),
        LayoutMode::Detail => render_detail(frame, state, body, colors),
        LayoutMode::Split => {
            let halves = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
                .split(body);
            render_grid(frame, app, state, halves[0], colors);
            render_detail(frame, state, halves[1], colors);
        }
    }

    render_status_bar(frame, app, state, chunks[2], colors);

    if let Some(error) = &state.error {
        render_error_dialog(frame, &error_message(error, probe), colors);
    }
}

fn render_search_bar(frame: &mut Frame, app: &TuiApp, area: Rect, colors: &ColorConfig) {
    let border = if app.detail_open {
        colors.inactive_border
    } else {
        colors.active_border
    };

    let line = if app.input.is_empty() {
        Line::from(Span::styled(
            "Type to search (empty shows the default feed)",
            Style::default().fg(colors.inactive_border),
        ))
    } else {
        Line::from(format!("{}_", app.input))
    };

    let block = Block::default()
        .title(" Search ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));

    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_grid(
    frame: &mut Frame,
    app: &mut TuiApp,
    state: &SearchState,
    area: Rect,
    colors: &ColorConfig,
) {
    let title = format!(
        " Photos ({}) [{}/{}] ",
        state.results.len(),
        (app.cursor + 1).min(state.results.len()),
        state.results.len()
    );
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.inactive_border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if state.results.is_empty() {
        let message = if state.is_loading {
            "Searching..."
        } else {
            "No photos"
        };
        frame.render_widget(Paragraph::new(message), inner);
        return;
    }

    app.columns = grid_columns(inner.width);
    let visible_rows = (inner.height / CARD_HEIGHT).max(1) as usize;
    app.scroll_to_cursor(visible_rows);

    let card_width = inner.width / app.columns as u16;
    let first = app.first_row * app.columns;
    let last = (first + visible_rows * app.columns).min(state.results.len());

    for (index, item) in state.results[first..last].iter().enumerate() {
        let row = (index / app.columns) as u16;
        let col = (index % app.columns) as u16;
        let card = Rect {
            x: inner.x + col * card_width,
            y: inner.y + row * CARD_HEIGHT,
            width: card_width,
            height: CARD_HEIGHT.min(inner.height.saturating_sub(row * CARD_HEIGHT)),
        };
        render_card(frame, item, card, first + index == app.cursor, colors);
    }
}

fn render_card(frame: &mut Frame, item: &ImageItem, area: Rect, highlighted: bool, colors: &ColorConfig) {
    let width = area.width.saturating_sub(2) as usize;

    let (border_style, title_style) = if highlighted {
        (
            Style::default().fg(colors.active_border),
            Style::default()
                .bg(colors.selection_bg)
                .fg(colors.selection_fg)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        (
            Style::default().fg(colors.inactive_border),
            Style::default().fg(colors.card_title),
        )
    };

    let lines = vec![
        Line::from(Span::styled(truncate(item.display_title(), width), title_style)),
        Line::from(Span::styled(
            truncate(item.display_author(), width),
            Style::default().fg(colors.metadata_author),
        )),
        Line::from(Span::styled(
            truncate(&item.published_at, width),
            Style::default().fg(colors.metadata_date),
        )),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style);

    frame.render_widget(Paragraph::new(Text::from(lines)).block(block), area);
}

fn render_detail(frame: &mut Frame, state: &SearchState, area: Rect, colors: &ColorConfig) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.active_border));

    let Some(item) = &state.current_item else {
        frame.render_widget(
            Paragraph::new("No photo selected").block(block.title(" Detail ")),
            area,
        );
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled(
            item.display_title().to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("By: {}", item.display_author()),
            Style::default().fg(colors.metadata_author),
        )),
        Line::from(Span::styled(
            format!("Published: {}", item.published_at),
            Style::default().fg(colors.metadata_date),
        )),
        Line::from(Span::styled(
            format!("Image: {}", item.image_link),
            Style::default().fg(colors.metadata_link),
        )),
    ];
    if !item.link.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("Page: {}", item.link),
            Style::default().fg(colors.metadata_link),
        )));
    }
    if !item.tags.is_empty() {
        lines.push(Line::from(format!("Tags: {}", item.tags.join(", "))));
    }
    lines.push(Line::from(""));
    lines.push(Line::from("─".repeat(area.width.saturating_sub(2) as usize)));
    lines.push(Line::from(""));

    for line in strip_markup(&item.description).lines() {
        lines.push(Line::from(line.to_string()));
    }

    let paragraph = Paragraph::new(Text::from(lines))
        .block(block.title(format!(" {} ", truncate(item.display_title(), 40))))
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}

fn render_status_bar(
    frame: &mut Frame,
    app: &TuiApp,
    state: &SearchState,
    area: Rect,
    colors: &ColorConfig,
) {
    let status = if state.is_loading {
        "Searching...".to_string()
    } else if let Some(ref msg) = app.status_message {
        msg.clone()
    } else if app.detail_open {
        "Esc:Back  ←→↑↓:Move  Enter:Show  ^O:Open image  ^R:Reload  ^C:Quit".to_string()
    } else {
        "Type to search  ←→↑↓:Move  Enter:Details  ^O:Open image  ^R:Reload  ^U:Clear  Esc/^C:Quit"
            .to_string()
    };

    let paragraph =
        Paragraph::new(status).style(Style::default().fg(colors.status_fg).bg(colors.status_bg));

    frame.render_widget(paragraph, area);
}

fn render_error_dialog(frame: &mut Frame, message: &str, colors: &ColorConfig) {
    let area = centered(frame.area(), 60, 7);

    let text = Text::from(vec![
        Line::from(message.to_string()),
        Line::from(""),
        Line::from(Span::styled(
            "Enter/Esc: dismiss",
            Style::default().fg(colors.inactive_border),
        )),
    ]);

    let block = Block::default()
        .title(" Error ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.error_border));

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(text).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
